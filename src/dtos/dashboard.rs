// src/dtos/dashboard.rs
use serde::Serialize;
use sqlx::FromRow;

#[derive(Serialize)]
pub struct DashboardStats {
    pub total_products: i64,
    pub total_categories: i64,
    pub total_customers: i64,
    pub low_stock_items: i64,
}

#[derive(Serialize, FromRow)]
pub struct LowStockItem {
    pub id: i64,
    pub name: String,
    pub stock_quantity: i32,
    pub price: f64,
    pub category_name: Option<String>,
}

#[derive(Serialize)]
pub struct LowStockReport {
    pub threshold: i32,
    pub items: Vec<LowStockItem>,
}
