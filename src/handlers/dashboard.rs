use axum::{extract::State, Json};

use crate::state::AppState;
use crate::error::AppError;
use crate::dtos::dashboard::DashboardStats;
use crate::handlers::inventory::low_stock_threshold;

pub async fn get_dashboard(
    State(AppState { db_pool }): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    let total_products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&db_pool)
        .await?;
    let total_categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(&db_pool)
        .await?;
    let total_customers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
        .fetch_one(&db_pool)
        .await?;
    let low_stock_items: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE stock_quantity < $1")
            .bind(low_stock_threshold())
            .fetch_one(&db_pool)
            .await?;

    Ok(Json(DashboardStats {
        total_products,
        total_categories,
        total_customers,
        low_stock_items,
    }))
}
