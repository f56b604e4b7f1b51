use axum::{extract::State, response::Json};

use crate::{
    errors::ServiceError,
    services::reports::{DepartmentCount, StatusCount},
    ApiResponse, AppState,
};

/// Order counts per pipeline status, zero-filled
#[utoipa::path(
    get,
    path = "/api/v1/reports/orders-by-status",
    summary = "Orders by status",
    responses(
        (status = 200, description = "Counts retrieved", body = ApiResponse<Vec<StatusCount>>),
    )
)]
pub async fn orders_by_status(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<StatusCount>>>, ServiceError> {
    let counts = state.services.reports.orders_by_status().await?;
    Ok(Json(ApiResponse::success(counts)))
}

/// Order counts per owning department, zero-filled
#[utoipa::path(
    get,
    path = "/api/v1/reports/orders-by-department",
    summary = "Orders by department",
    responses(
        (status = 200, description = "Counts retrieved", body = ApiResponse<Vec<DepartmentCount>>),
    )
)]
pub async fn orders_by_department(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DepartmentCount>>>, ServiceError> {
    let counts = state.services.reports.orders_by_department().await?;
    Ok(Json(ApiResponse::success(counts)))
}
