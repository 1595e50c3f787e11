use axum::{extract::State, Json};
use axum::http::StatusCode;

use crate::state::AppState;
use crate::error::{map_unique_violation, AppError};
use crate::dtos::customer::{CreateCustomerRequest, UpdateCustomerRequest, CustomerResponse};
use crate::models::customer::Customer;

const CUSTOMER_COLUMNS: &str =
    "id, first_name, last_name, email, phone_number, address, registered_at";

pub async fn list_customers(
    State(AppState { db_pool }): State<AppState>,
) -> Result<Json<Vec<CustomerResponse>>, AppError> {
    let customers = sqlx::query_as::<_, Customer>(&format!(
        "SELECT {} FROM customers ORDER BY last_name, first_name",
        CUSTOMER_COLUMNS
    ))
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(
        customers.into_iter().map(CustomerResponse::from).collect(),
    ))
}

pub async fn get_customer(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<Json<CustomerResponse>, AppError> {
    let customer = sqlx::query_as::<_, Customer>(&format!(
        "SELECT {} FROM customers WHERE id = $1",
        CUSTOMER_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Customer not found"))?;

    Ok(Json(CustomerResponse::from(customer)))
}

pub async fn create_customer(
    State(AppState { db_pool }): State<AppState>,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), AppError> {
    if req.first_name.trim().is_empty() {
        return Err(AppError::validation("First name is required"));
    }

    let customer = sqlx::query_as::<_, Customer>(&format!(
        "INSERT INTO customers (first_name, last_name, email, phone_number, address)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {}",
        CUSTOMER_COLUMNS
    ))
    .bind(req.first_name.trim())
    .bind(req.last_name)
    .bind(req.email)
    .bind(req.phone_number)
    .bind(req.address)
    .fetch_one(&db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Customer with this email already exists"))?;

    Ok((StatusCode::CREATED, Json(CustomerResponse::from(customer))))
}

pub async fn update_customer(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<i64>,
    Json(req): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>, AppError> {
    if req.first_name.trim().is_empty() {
        return Err(AppError::validation("First name is required"));
    }

    // Optional fields are written as given so a blank submission clears them
    let customer = sqlx::query_as::<_, Customer>(&format!(
        "UPDATE customers SET
            first_name = $2,
            last_name = $3,
            email = $4,
            phone_number = $5,
            address = $6
         WHERE id = $1
         RETURNING {}",
        CUSTOMER_COLUMNS
    ))
    .bind(id)
    .bind(req.first_name.trim())
    .bind(req.last_name)
    .bind(req.email)
    .bind(req.phone_number)
    .bind(req.address)
    .fetch_optional(&db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Customer with this email already exists"))?
    .ok_or_else(|| AppError::not_found("Customer not found"))?;

    Ok(Json(CustomerResponse::from(customer)))
}

pub async fn delete_customer(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<StatusCode, AppError> {
    // Sales keep their history; the customer link is nulled by the schema
    let result = sqlx::query("DELETE FROM customers WHERE id = $1")
        .bind(id)
        .execute(&db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Customer not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
