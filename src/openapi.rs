use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SwiftFlow API",
        version = "0.1.0",
        description = r#"
# SwiftFlow Manufacturing Order Tracking API

Tracks manufacturing orders through a fixed six-stage pipeline
(Inquiry, Design, Production, Machining, Inspection, Completed) with an
append-only status ledger per order, plus customers, products,
inter-department messaging, and dashboard aggregates.

## Error Handling

Failures use a consistent body with the HTTP status category, a
human-readable message, the request id, and a timestamp. Supplying a status
outside the pipeline is rejected with 400 before any mutation; a status
update that loses an optimistic-concurrency race returns 409.

## Pagination

List endpoints accept `page` (default 1) and `limit` (default 20).
"#
    ),
    paths(
        crate::handlers::orders::create_order,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::update_order_status,
        crate::handlers::orders::get_order_history,
        crate::handlers::orders::get_order_progress,
        crate::handlers::orders::archive_order,
        crate::handlers::customers::create_customer,
        crate::handlers::customers::list_customers,
        crate::handlers::customers::get_customer,
        crate::handlers::customers::update_customer,
        crate::handlers::customers::delete_customer,
        crate::handlers::products::create_product,
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::messages::send_message,
        crate::handlers::messages::inbox,
        crate::handlers::messages::sent,
        crate::handlers::messages::mark_read,
        crate::handlers::reports::orders_by_status,
        crate::handlers::reports::orders_by_department,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::models::order::OrderStatus,
        crate::models::order::StageState,
        crate::models::order::Department,
        crate::models::customer::CustomerStatus,
        crate::models::product::ProductStatus,
        crate::models::message::MessagePriority,
        crate::services::orders::CreateOrderRequest,
        crate::services::orders::OrderResponse,
        crate::services::orders::OrderListResponse,
        crate::services::order_status::RecordTransitionInput,
        crate::services::order_status::TransitionResponse,
        crate::services::order_status::StageProgress,
        crate::services::order_status::ProgressResponse,
        crate::services::customers::CreateCustomerRequest,
        crate::services::customers::UpdateCustomerRequest,
        crate::services::customers::CustomerResponse,
        crate::services::customers::CustomerListResponse,
        crate::services::products::CreateProductRequest,
        crate::services::products::UpdateProductRequest,
        crate::services::products::ProductResponse,
        crate::services::products::ProductListResponse,
        crate::services::messages::SendMessageRequest,
        crate::services::messages::MessageResponse,
        crate::services::messages::MessageListResponse,
        crate::services::reports::StatusCount,
        crate::services::reports::DepartmentCount,
        crate::handlers::orders::UpdateOrderStatusRequest,
    )),
    tags(
        (name = "orders", description = "Order pipeline and status ledger"),
        (name = "customers", description = "Customer reference records"),
        (name = "products", description = "Product catalog"),
        (name = "messages", description = "Inter-department messaging"),
        (name = "reports", description = "Dashboard aggregates"),
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at `/docs`, serving the document at
/// `/api-docs/openapi.json`.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
