pub mod products;
pub mod categories;
pub mod customers;
pub mod sales;
pub mod dashboard;
pub mod inventory;

use axum::Router;
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(products::routes())
        .merge(categories::routes())
        .merge(customers::routes())
        .merge(sales::routes())
        .merge(dashboard::routes())
        .merge(inventory::routes())
}
