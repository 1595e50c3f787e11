use axum::{routing::get, Router};
use crate::handlers::inventory::low_stock_report;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/inventory/low-stock", get(low_stock_report))
}
