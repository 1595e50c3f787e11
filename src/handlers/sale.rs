use axum::{extract::State, Json};
use axum::http::StatusCode;
use sqlx::PgPool;
use tracing::info;

use crate::state::AppState;
use crate::error::AppError;
use crate::dtos::sale::{
    display_name, CreateSaleRequest, SaleResponse, SaleItemResponse, SaleListItem,
};
use crate::models::sale::{SaleWithCustomer, SaleListRow, SaleItemDetail};

/// Product row as read under the row lock.
#[derive(sqlx::FromRow)]
struct ProductForSale {
    id: i64,
    name: String,
    price: f64,
    stock_quantity: i32,
}

/// A validated, priced line item waiting to be written.
struct PricedLine {
    product_id: i64,
    quantity: i32,
    unit_price: f64,
    total_price: f64,
}

/// Resolves the effective unit price for a line and computes its total.
/// A caller-supplied override wins over the catalog price but must not be
/// negative.
fn price_line(
    requested_price: Option<f64>,
    catalog_price: f64,
    quantity: i32,
) -> Result<(f64, f64), AppError> {
    let unit_price = requested_price.unwrap_or(catalog_price);
    if unit_price < 0.0 {
        return Err(AppError::validation("Unit price cannot be negative"));
    }
    Ok((unit_price, unit_price * quantity as f64))
}

pub async fn create_sale(
    State(AppState { db_pool }): State<AppState>,
    Json(req): Json<CreateSaleRequest>,
) -> Result<(StatusCode, Json<SaleResponse>), AppError> {
    if req.items.is_empty() {
        return Err(AppError::validation("Sale must contain at least one item"));
    }
    if req.payment_method.trim().is_empty() {
        return Err(AppError::validation("Payment method is required"));
    }

    let sale_id = process_sale(&db_pool, &req).await?;

    let sale = fetch_sale_by_id(&db_pool, sale_id).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// Runs the whole sale inside one transaction: validate and price every
/// line under a `FOR UPDATE` lock, then write the sale, its items, the
/// stock decrements, and the inventory log entries. Every early return
/// drops the transaction, which rolls it back; only the final commit
/// persists anything.
async fn process_sale(db_pool: &PgPool, req: &CreateSaleRequest) -> Result<i64, AppError> {
    let mut tx = db_pool.begin().await?;

    // Verify customer exists when the sale is not a guest sale
    if let Some(customer_id) = req.customer_id {
        sqlx::query_scalar::<_, i64>("SELECT id FROM customers WHERE id = $1")
            .bind(customer_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found("Customer not found"))?;
    }

    let mut total_amount: f64 = 0.0;
    let mut lines: Vec<PricedLine> = Vec::with_capacity(req.items.len());

    for item in &req.items {
        if item.quantity <= 0 {
            return Err(AppError::validation(format!(
                "Invalid quantity ({}) for product {}",
                item.quantity, item.product_id
            )));
        }

        // Lock the product row so concurrent sales of the same product
        // serialize until this transaction commits or rolls back.
        let product = sqlx::query_as::<_, ProductForSale>(
            "SELECT id, name, price::FLOAT8 AS price, stock_quantity
             FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(item.product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", item.product_id)))?;

        if product.stock_quantity < item.quantity {
            return Err(AppError::validation(format!(
                "Insufficient stock for product '{}'. Available: {}, Requested: {}",
                product.name, product.stock_quantity, item.quantity
            )));
        }

        let (unit_price, total_price) = price_line(item.unit_price, product.price, item.quantity)?;
        total_amount += total_price;

        lines.push(PricedLine {
            product_id: product.id,
            quantity: item.quantity,
            unit_price,
            total_price,
        });
    }

    let sale_id: i64 = sqlx::query_scalar(
        "INSERT INTO sales (customer_id, total_amount, payment_method)
         VALUES ($1, $2::FLOAT8, $3)
         RETURNING id",
    )
    .bind(req.customer_id)
    .bind(total_amount)
    .bind(req.payment_method.trim())
    .fetch_one(&mut *tx)
    .await?;

    for line in &lines {
        sqlx::query(
            "INSERT INTO sale_items (sale_id, product_id, quantity, unit_price, total_price)
             VALUES ($1, $2, $3, $4::FLOAT8, $5::FLOAT8)",
        )
        .bind(sale_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.total_price)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE products SET stock_quantity = stock_quantity - $1 WHERE id = $2")
            .bind(line.quantity)
            .bind(line.product_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO inventory_logs (product_id, change_type, quantity_change, notes)
             VALUES ($1, 'Sale', $2, $3)",
        )
        .bind(line.product_id)
        .bind(-line.quantity)
        .bind(format!("Sale ID: {}", sale_id))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    info!(sale_id, total_amount, "Sale processed");
    Ok(sale_id)
}

pub async fn get_sale(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<Json<SaleResponse>, AppError> {
    fetch_sale_by_id(&db_pool, id).await.map(Json)
}

pub async fn list_sales(
    State(AppState { db_pool }): State<AppState>,
) -> Result<Json<Vec<SaleListItem>>, AppError> {
    let rows = sqlx::query_as::<_, SaleListRow>(
        "SELECT s.id, s.customer_id, s.sale_date,
                s.total_amount::FLOAT8 AS total_amount, s.payment_method,
                c.first_name AS customer_first_name,
                c.last_name AS customer_last_name,
                c.email AS customer_email,
                COUNT(si.id) AS total_items
         FROM sales s
         LEFT JOIN customers c ON s.customer_id = c.id
         LEFT JOIN sale_items si ON si.sale_id = s.id
         GROUP BY s.id, c.id
         ORDER BY s.sale_date DESC, s.id DESC",
    )
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(
        rows.into_iter()
            .map(|r| SaleListItem {
                id: r.id,
                customer_id: r.customer_id,
                customer_name: display_name(
                    r.customer_first_name.as_deref(),
                    r.customer_last_name.as_deref(),
                ),
                customer_email: r.customer_email,
                sale_date: r.sale_date,
                total_amount: r.total_amount,
                payment_method: r.payment_method,
                total_items: r.total_items,
            })
            .collect(),
    ))
}

// Helper function to fetch full sale details
async fn fetch_sale_by_id(db_pool: &PgPool, id: i64) -> Result<SaleResponse, AppError> {
    let sale = sqlx::query_as::<_, SaleWithCustomer>(
        "SELECT s.id, s.customer_id, s.sale_date,
                s.total_amount::FLOAT8 AS total_amount, s.payment_method,
                c.first_name AS customer_first_name,
                c.last_name AS customer_last_name,
                c.email AS customer_email
         FROM sales s
         LEFT JOIN customers c ON s.customer_id = c.id
         WHERE s.id = $1",
    )
    .bind(id)
    .fetch_optional(db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Sale not found"))?;

    let items = sqlx::query_as::<_, SaleItemDetail>(
        "SELECT si.product_id, p.name AS product_name, si.quantity,
                si.unit_price::FLOAT8 AS unit_price,
                si.total_price::FLOAT8 AS total_price
         FROM sale_items si
         JOIN products p ON si.product_id = p.id
         WHERE si.sale_id = $1
         ORDER BY p.name",
    )
    .bind(id)
    .fetch_all(db_pool)
    .await?;

    Ok(SaleResponse {
        id: sale.id,
        customer_id: sale.customer_id,
        customer_name: display_name(
            sale.customer_first_name.as_deref(),
            sale.customer_last_name.as_deref(),
        ),
        customer_email: sale.customer_email,
        sale_date: sale.sale_date,
        total_amount: sale.total_amount,
        payment_method: sale.payment_method,
        items: items
            .into_iter()
            .map(|i| SaleItemResponse {
                product_id: i.product_id,
                product_name: i.product_name,
                quantity: i.quantity,
                unit_price: i.unit_price,
                total_price: i.total_price,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_line_uses_catalog_price() {
        let (unit, total) = price_line(None, 2.00, 3).unwrap();
        assert_eq!(unit, 2.00);
        assert_eq!(total, 6.00);
    }

    #[test]
    fn test_price_line_override_wins() {
        let (unit, total) = price_line(Some(1.50), 2.00, 2).unwrap();
        assert_eq!(unit, 1.50);
        assert_eq!(total, 3.00);
    }

    #[test]
    fn test_price_line_rejects_negative_override() {
        let err = price_line(Some(-0.01), 2.00, 1).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_price_line_zero_override_is_allowed() {
        // Giveaways are legitimate; only negative prices are rejected.
        let (unit, total) = price_line(Some(0.0), 4.99, 5).unwrap();
        assert_eq!(unit, 0.0);
        assert_eq!(total, 0.0);
    }

    #[test]
    fn test_sale_total_is_sum_of_line_totals() {
        let cart = [(None, 0.75, 4), (Some(1.99), 2.49, 2), (None, 3.19, 1)];
        let mut total = 0.0;
        for (override_price, catalog, qty) in cart {
            let (_, line_total) = price_line(override_price, catalog, qty).unwrap();
            total += line_total;
        }
        assert!((total - (3.00 + 3.98 + 3.19)).abs() < 1e-9);
    }
}
