use sqlx::FromRow;
use chrono::{DateTime, Utc};

/// Product row joined with its category name.
#[derive(Debug, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub price: f64,
    pub stock_quantity: i32,
    pub created_at: Option<DateTime<Utc>>,
}
