// src/dtos/product.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub price: f64,
    pub stock_quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub price: Option<f64>,
    pub stock_quantity: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub price: f64,
    pub stock_quantity: i32,
    pub created_at: Option<String>,
}

// Convert from Model to Response DTO
impl From<crate::models::product::Product> for ProductResponse {
    fn from(product: crate::models::product::Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            category_id: product.category_id,
            category_name: product.category_name,
            price: product.price,
            stock_quantity: product.stock_quantity,
            created_at: product.created_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

#[derive(Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
    pub total_count: i64,
    pub page: i64,
    pub total_pages: i64,
}
