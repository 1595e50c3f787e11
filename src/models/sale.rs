use sqlx::FromRow;
use chrono::{DateTime, Utc};

/// Sale header joined with the (possibly deleted) customer.
#[derive(Debug, FromRow)]
pub struct SaleWithCustomer {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub sale_date: DateTime<Utc>,
    pub total_amount: f64,
    pub payment_method: String,
    pub customer_first_name: Option<String>,
    pub customer_last_name: Option<String>,
    pub customer_email: Option<String>,
}

/// Sale history row (JOIN result with item count).
#[derive(Debug, FromRow)]
pub struct SaleListRow {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub sale_date: DateTime<Utc>,
    pub total_amount: f64,
    pub payment_method: String,
    pub customer_first_name: Option<String>,
    pub customer_last_name: Option<String>,
    pub customer_email: Option<String>,
    pub total_items: i64,
}

/// Line item joined with the product name.
#[derive(Debug, FromRow)]
pub struct SaleItemDetail {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub total_price: f64,
}
