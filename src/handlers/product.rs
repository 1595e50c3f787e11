// src/handlers/product.rs
use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum::http::StatusCode;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{error, instrument};

use crate::dtos::product::{
    CreateProductRequest, UpdateProductRequest, ProductResponse, ProductListResponse,
};
use crate::models::product::Product;
use crate::state::AppState;
use crate::error::{map_fk_violation, map_unique_violation, AppError};

const ITEMS_PER_PAGE: i64 = 10;

const PRODUCT_SELECT: &str =
    "SELECT p.id, p.name, p.description, p.category_id, c.name AS category_name,
            p.price::FLOAT8 AS price, p.stock_quantity, p.created_at
     FROM products p
     LEFT JOIN categories c ON p.category_id = c.id";

fn total_pages(total_count: i64, items_per_page: i64) -> i64 {
    if total_count > 0 {
        (total_count + items_per_page - 1) / items_per_page
    } else {
        0
    }
}

// GET /products - Paginated catalog with optional name search
#[instrument(skip(state))]
pub async fn get_products(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ProductListResponse>, AppError> {
    let search = params
        .get("search_query")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", s));
    let requested_page = params
        .get("page")
        .and_then(|p| p.parse::<i64>().ok())
        .unwrap_or(1)
        .max(1);

    let total_count: i64 = if let Some(ref like) = search {
        sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE name ILIKE $1")
            .bind(like)
            .fetch_one(&state.db_pool)
            .await?
    } else {
        sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&state.db_pool)
            .await?
    };

    let total_pages = total_pages(total_count, ITEMS_PER_PAGE);
    // Clamp the page into range instead of returning an empty tail page
    let page = if total_pages > 0 && requested_page > total_pages {
        total_pages
    } else {
        requested_page
    };
    let offset = (page - 1) * ITEMS_PER_PAGE;

    let result = if let Some(ref like) = search {
        sqlx::query_as::<_, Product>(&format!(
            "{} WHERE p.name ILIKE $1 ORDER BY p.name LIMIT $2 OFFSET $3",
            PRODUCT_SELECT
        ))
        .bind(like)
        .bind(ITEMS_PER_PAGE)
        .bind(offset)
        .fetch_all(&state.db_pool)
        .await
    } else {
        sqlx::query_as::<_, Product>(&format!(
            "{} ORDER BY p.name LIMIT $1 OFFSET $2",
            PRODUCT_SELECT
        ))
        .bind(ITEMS_PER_PAGE)
        .bind(offset)
        .fetch_all(&state.db_pool)
        .await
    };

    match result {
        Ok(products) => Ok(Json(ProductListResponse {
            products: products.into_iter().map(ProductResponse::from).collect(),
            total_count,
            page,
            total_pages,
        })),
        Err(e) => {
            error!(?e, "Failed to fetch products");
            Err(AppError::db(e))
        }
    }
}

// GET /products/:id - Get single product
#[instrument(skip(state), fields(id))]
pub async fn get_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = fetch_product_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ProductResponse::from(product)))
}

// POST /products - Create new product
#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Product name is required"));
    }
    if payload.price < 0.0 {
        return Err(AppError::validation("Price cannot be negative"));
    }
    if payload.stock_quantity < 0 {
        return Err(AppError::validation("Stock quantity cannot be negative"));
    }

    // Verify the category exists up front for a clean error
    sqlx::query_scalar::<_, i64>("SELECT id FROM categories WHERE id = $1")
        .bind(payload.category_id)
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Category not found"))?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO products (name, description, category_id, price, stock_quantity)
         VALUES ($1, $2, $3, $4::FLOAT8, $5)
         RETURNING id",
    )
    .bind(payload.name.trim())
    .bind(payload.description)
    .bind(payload.category_id)
    .bind(payload.price)
    .bind(payload.stock_quantity)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Product name already exists"))?;

    let product = fetch_product_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

// PUT /products/:id - Update product (name is immutable)
#[instrument(skip(state, payload), fields(id))]
pub async fn update_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    if let Some(price) = payload.price {
        if price < 0.0 {
            return Err(AppError::validation("Price cannot be negative"));
        }
    }
    if let Some(stock) = payload.stock_quantity {
        if stock < 0 {
            return Err(AppError::validation("Stock quantity cannot be negative"));
        }
    }
    if let Some(category_id) = payload.category_id {
        sqlx::query_scalar::<_, i64>("SELECT id FROM categories WHERE id = $1")
            .bind(category_id)
            .fetch_optional(&state.db_pool)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found"))?;
    }

    let updated: Option<i64> = sqlx::query_scalar(
        "UPDATE products SET
         description = COALESCE($1, description),
         category_id = COALESCE($2, category_id),
         price = COALESCE($3::FLOAT8, price),
         stock_quantity = COALESCE($4, stock_quantity)
         WHERE id = $5
         RETURNING id",
    )
    .bind(payload.description)
    .bind(payload.category_id)
    .bind(payload.price)
    .bind(payload.stock_quantity)
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?;

    if updated.is_none() {
        return Err(AppError::not_found("Product not found"));
    }

    let product = fetch_product_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ProductResponse::from(product)))
}

// DELETE /products/:id - Delete product
#[instrument(skip(state), fields(id))]
pub async fn delete_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await
        .map_err(|e| map_fk_violation(e, "Cannot delete product that is referenced in sales records"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Product not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_product_by_id(db_pool: &PgPool, id: i64) -> Result<Option<Product>, AppError> {
    let product = sqlx::query_as::<_, Product>(&format!("{} WHERE p.id = $1", PRODUCT_SELECT))
        .bind(id)
        .fetch_optional(db_pool)
        .await?;

    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(95, 10), 10);
    }
}
