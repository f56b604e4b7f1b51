use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::str::FromStr;
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    models::order::Department,
    services::messages::{MessageListResponse, MessageResponse, SendMessageRequest},
    ApiResponse, AppState, ListQuery,
};

fn map_department_str(value: &str) -> Result<Department, ServiceError> {
    Department::from_str(value.trim())
        .map_err(|_| ServiceError::InvalidInput(format!("Unknown department: {}", value.trim())))
}

/// Send an inter-department message
#[utoipa::path(
    post,
    path = "/api/v1/messages",
    summary = "Send message",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = ApiResponse<MessageResponse>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
    )
)]
pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let message = state.services.messages.send_message(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(message))))
}

/// List a department's inbox, newest first
#[utoipa::path(
    get,
    path = "/api/v1/messages/inbox/{department}",
    summary = "Department inbox",
    params(
        ("department" = String, Path, description = "Recipient department"),
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
    ),
    responses(
        (status = 200, description = "Messages retrieved", body = ApiResponse<MessageListResponse>),
        (status = 400, description = "Unknown department", body = crate::errors::ErrorResponse),
    )
)]
pub async fn inbox(
    State(state): State<AppState>,
    Path(department): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<MessageListResponse>>, ServiceError> {
    let department = map_department_str(&department)?;
    let result = state
        .services
        .messages
        .inbox(department, query.page, query.limit)
        .await?;

    Ok(Json(ApiResponse::success(result)))
}

/// List a department's sent messages, newest first
#[utoipa::path(
    get,
    path = "/api/v1/messages/sent/{department}",
    summary = "Department sent messages",
    params(
        ("department" = String, Path, description = "Sender department"),
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
    ),
    responses(
        (status = 200, description = "Messages retrieved", body = ApiResponse<MessageListResponse>),
        (status = 400, description = "Unknown department", body = crate::errors::ErrorResponse),
    )
)]
pub async fn sent(
    State(state): State<AppState>,
    Path(department): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<MessageListResponse>>, ServiceError> {
    let department = map_department_str(&department)?;
    let result = state
        .services
        .messages
        .sent(department, query.page, query.limit)
        .await?;

    Ok(Json(ApiResponse::success(result)))
}

/// Mark a message read
#[utoipa::path(
    post,
    path = "/api/v1/messages/{id}/read",
    summary = "Mark message read",
    params(("id" = Uuid, Path, description = "Message UUID")),
    responses(
        (status = 200, description = "Message marked read", body = ApiResponse<MessageResponse>),
        (status = 404, description = "Message not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ServiceError> {
    let message = state.services.messages.mark_read(id).await?;

    Ok(Json(ApiResponse::success(message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn department_names_parse() {
        for name in ["Admin", "Design", "Production", "Machining", "Inspection"] {
            assert!(map_department_str(name).is_ok(), "{name} should parse");
        }
        assert_matches!(
            map_department_str("Shipping"),
            Err(ServiceError::InvalidInput(_))
        );
    }
}
