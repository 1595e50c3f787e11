use axum::{extract::State, Json};
use axum::http::StatusCode;

use crate::state::AppState;
use crate::error::{map_fk_violation, map_unique_violation, AppError};
use crate::dtos::category::{CreateCategoryRequest, UpdateCategoryRequest, CategoryResponse};
use crate::models::category::Category;

pub async fn list_categories(
    State(AppState { db_pool }): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, name, description, created_at FROM categories ORDER BY name",
    )
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

pub async fn get_category(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<Json<CategoryResponse>, AppError> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, name, description, created_at FROM categories WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Category not found"))?;

    Ok(Json(CategoryResponse::from(category)))
}

pub async fn create_category(
    State(AppState { db_pool }): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::validation("Category name is required"));
    }

    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name, description)
         VALUES ($1, $2)
         RETURNING id, name, description, created_at",
    )
    .bind(req.name.trim())
    .bind(req.description)
    .fetch_one(&db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Category name already exists"))?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

pub async fn update_category(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<i64>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::validation("Category name is required"));
    }

    let category = sqlx::query_as::<_, Category>(
        "UPDATE categories SET name = $2, description = $3
         WHERE id = $1
         RETURNING id, name, description, created_at",
    )
    .bind(id)
    .bind(req.name.trim())
    .bind(req.description)
    .fetch_optional(&db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Category name already exists"))?
    .ok_or_else(|| AppError::not_found("Category not found"))?;

    Ok(Json(CategoryResponse::from(category)))
}

pub async fn delete_category(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(&db_pool)
        .await
        .map_err(|e| map_fk_violation(e, "Cannot delete category that is in use by products"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Category not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
