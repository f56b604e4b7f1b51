use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    models::order::OrderStatus,
    services::order_status::{ProgressResponse, RecordTransitionInput, TransitionResponse},
    services::orders::{CreateOrderRequest, OrderListResponse, OrderResponse},
    ApiResponse, AppState, ListQuery,
};

/// Parses status text arriving over the wire. Unknown values fail before any
/// mutation happens.
fn map_status_str(status: &str) -> Result<OrderStatus, ServiceError> {
    OrderStatus::from_str(status.trim()).map_err(|_| {
        ServiceError::InvalidStatus(format!("Unknown order status: {}", status.trim()))
    })
}

/// Resolves an order identifier that may be a UUID or an order code
async fn resolve_order_id(state: &AppState, id: &str) -> Result<Uuid, ServiceError> {
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }
    if let Some(uuid) = state.services.orders.find_order_id_by_code(id).await? {
        return Ok(uuid);
    }
    Err(ServiceError::NotFound(format!("Order {} not found", id)))
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateOrderStatusRequest {
    /// Display name of the user performing the change
    pub actor: String,
    /// Target pipeline stage, e.g. "Design"
    pub status: String,
    pub notes: Option<String>,
    /// Filename reference carried into the transition record
    pub attachment_ref: Option<String>,
}

/// Create a new order
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    summary = "Create order",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.orders.create_order(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(order))))
}

/// List orders with pagination and filtering
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    summary = "List orders",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
        ("search" = Option<String>, Query, description = "Search over order code and customer name"),
        ("status" = Option<String>, Query, description = "Filter by pipeline status"),
    ),
    responses(
        (status = 200, description = "Orders retrieved", body = ApiResponse<OrderListResponse>),
        (status = 400, description = "Invalid status filter", body = crate::errors::ErrorResponse),
    )
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<OrderListResponse>>, ServiceError> {
    let status = query
        .status
        .as_deref()
        .map(map_status_str)
        .transpose()?;

    let result = state
        .services
        .orders
        .list_orders(query.page, query.limit, status, query.search.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(result)))
}

/// Get one order by UUID or order code
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    summary = "Get order",
    params(("id" = String, Path, description = "Order UUID or order code (e.g. SF1006)")),
    responses(
        (status = 200, description = "Order retrieved", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<OrderResponse>>, ServiceError> {
    let order_id = resolve_order_id(&state, &id).await?;
    let order = state
        .services
        .orders
        .get_order(order_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", id)))?;

    Ok(Json(ApiResponse::success(order)))
}

/// Record a status transition on an order
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    summary = "Update order status",
    params(("id" = String, Path, description = "Order UUID or order code")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Transition recorded", body = ApiResponse<TransitionResponse>),
        (status = 400, description = "Unknown status", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Concurrent modification", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<Json<ApiResponse<TransitionResponse>>, ServiceError> {
    let order_id = resolve_order_id(&state, &id).await?;
    let to_status = map_status_str(&request.status)?;

    let record = state
        .services
        .order_status
        .record_transition(
            order_id,
            RecordTransitionInput {
                actor: request.actor,
                to_status,
                notes: request.notes,
                attachment_ref: request.attachment_ref,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(record)))
}

/// Get an order's transition history, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/history",
    summary = "Get order history",
    params(("id" = String, Path, description = "Order UUID or order code")),
    responses(
        (status = 200, description = "History retrieved", body = ApiResponse<Vec<TransitionResponse>>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_order_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<TransitionResponse>>>, ServiceError> {
    let order_id = resolve_order_id(&state, &id).await?;
    let history = state.services.order_status.history(order_id).await?;

    Ok(Json(ApiResponse::success(history)))
}

/// Get the per-stage progress breakdown for an order
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/progress",
    summary = "Get order progress",
    params(("id" = String, Path, description = "Order UUID or order code")),
    responses(
        (status = 200, description = "Progress retrieved", body = ApiResponse<ProgressResponse>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_order_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ProgressResponse>>, ServiceError> {
    let order_id = resolve_order_id(&state, &id).await?;
    let progress = state.services.order_status.progress(order_id).await?;

    Ok(Json(ApiResponse::success(progress)))
}

/// Archive an order (soft delete)
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/archive",
    summary = "Archive order",
    params(("id" = String, Path, description = "Order UUID or order code")),
    responses(
        (status = 200, description = "Order archived", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn archive_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<OrderResponse>>, ServiceError> {
    let order_id = resolve_order_id(&state, &id).await?;
    let order = state.services.orders.archive_order(order_id).await?;

    Ok(Json(ApiResponse::success(order)))
}
