use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    services::customers::{
        CreateCustomerRequest, CustomerListResponse, CustomerResponse, UpdateCustomerRequest,
    },
    ApiResponse, AppState, ListQuery,
};

/// Create a customer
#[utoipa::path(
    post,
    path = "/api/v1/customers",
    summary = "Create customer",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = ApiResponse<CustomerResponse>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let customer = state.services.customers.create_customer(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(customer))))
}

/// List customers, newest first
#[utoipa::path(
    get,
    path = "/api/v1/customers",
    summary = "List customers",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
    ),
    responses(
        (status = 200, description = "Customers retrieved", body = ApiResponse<CustomerListResponse>),
    )
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<CustomerListResponse>>, ServiceError> {
    let result = state
        .services
        .customers
        .list_customers(query.page, query.limit)
        .await?;

    Ok(Json(ApiResponse::success(result)))
}

/// Get one customer
#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    summary = "Get customer",
    params(("id" = Uuid, Path, description = "Customer UUID")),
    responses(
        (status = 200, description = "Customer retrieved", body = ApiResponse<CustomerResponse>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CustomerResponse>>, ServiceError> {
    let customer = state
        .services
        .customers
        .get_customer(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Customer {} not found", id)))?;

    Ok(Json(ApiResponse::success(customer)))
}

/// Update a customer
#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    summary = "Update customer",
    params(("id" = Uuid, Path, description = "Customer UUID")),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = ApiResponse<CustomerResponse>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCustomerRequest>,
) -> Result<Json<ApiResponse<CustomerResponse>>, ServiceError> {
    let customer = state
        .services
        .customers
        .update_customer(id, request)
        .await?;

    Ok(Json(ApiResponse::success(customer)))
}

/// Delete a customer (refused while orders reference it)
#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    summary = "Delete customer",
    params(("id" = Uuid, Path, description = "Customer UUID")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Customer still referenced by orders", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.customers.delete_customer(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
