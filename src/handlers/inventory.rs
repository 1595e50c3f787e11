use axum::{extract::{Query, State}, Json};
use std::collections::HashMap;

use crate::state::AppState;
use crate::error::AppError;
use crate::dtos::dashboard::{LowStockItem, LowStockReport};

const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

/// Stock level under which a product counts as "low stock".
/// Overridable via LOW_STOCK_THRESHOLD.
pub fn low_stock_threshold() -> i32 {
    std::env::var("LOW_STOCK_THRESHOLD")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD)
}

pub async fn low_stock_report(
    State(AppState { db_pool }): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<LowStockReport>, AppError> {
    let threshold = params
        .get("threshold")
        .and_then(|t| t.parse::<i32>().ok())
        .filter(|t| *t > 0)
        .unwrap_or_else(low_stock_threshold);

    let items = sqlx::query_as::<_, LowStockItem>(
        "SELECT p.id, p.name, p.stock_quantity, p.price::FLOAT8 AS price,
                c.name AS category_name
         FROM products p
         LEFT JOIN categories c ON p.category_id = c.id
         WHERE p.stock_quantity < $1
         ORDER BY p.stock_quantity ASC, p.name ASC",
    )
    .bind(threshold)
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(LowStockReport { threshold, items }))
}
