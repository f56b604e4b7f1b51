use crate::{
    db::DbPool,
    entities::customer,
    entities::order::{
        self, ActiveModel as OrderActiveModel, Entity as OrderEntity, Model as OrderModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    models::order::{Department, OrderStatus},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request/Response types for the order service
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    #[validate(length(min = 1, message = "Product description is required"))]
    pub product_description: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub material: Option<String>,
    pub department: Department,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_code: String,
    pub customer_id: Uuid,
    pub customer_name: Option<String>,
    pub product_description: String,
    pub quantity: i32,
    pub material: Option<String>,
    pub department: Department,
    pub status: OrderStatus,
    /// Fraction of the pipeline traversed, 0.0 at `Inquiry`, 1.0 at `Completed`
    pub progress: f64,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub version: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Extracts the numeric portion of an order code (`SF1006` -> 1006).
fn numeric_suffix(code: &str) -> Option<i64> {
    let digits: String = code.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Highest numeric suffix across a set of existing codes.
fn max_numeric_suffix<'a>(codes: impl IntoIterator<Item = &'a str>) -> Option<i64> {
    codes.into_iter().filter_map(numeric_suffix).max()
}

/// Hands out unique order codes from an atomic counter. The counter holds the
/// highest suffix already allocated, so concurrent creates never collide the
/// way a max-plus-one scan per create would.
#[derive(Debug)]
pub struct OrderCodeAllocator {
    prefix: String,
    counter: AtomicI64,
}

impl OrderCodeAllocator {
    pub fn new(prefix: impl Into<String>, highest_in_use: i64) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicI64::new(highest_in_use),
        }
    }

    pub fn next_code(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}{}", self.prefix, n)
    }
}

/// Service for creating and querying orders. Status mutation lives in
/// [`crate::services::order_status::OrderStatusService`].
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
    code_allocator: Arc<OrderCodeAllocator>,
}

impl OrderService {
    /// Builds the service, seeding the code allocator from the configured
    /// floor and the highest suffix already present in the database.
    pub async fn bootstrap(
        db_pool: Arc<DbPool>,
        event_sender: Option<Arc<EventSender>>,
        code_prefix: &str,
        code_floor: i64,
    ) -> Result<Self, ServiceError> {
        let codes: Vec<String> = OrderEntity::find()
            .select_only()
            .column(order::Column::OrderCode)
            .into_tuple()
            .all(&*db_pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to scan existing order codes");
                ServiceError::DatabaseError(e)
            })?;

        let highest = max_numeric_suffix(codes.iter().map(String::as_str))
            .unwrap_or(0)
            .max(code_floor);

        info!(
            code_prefix = code_prefix,
            highest_in_use = highest,
            "Order code allocator seeded"
        );

        Ok(Self {
            db_pool,
            event_sender,
            code_allocator: Arc::new(OrderCodeAllocator::new(code_prefix, highest)),
        })
    }

    /// Creates a new order at the start of the pipeline.
    #[instrument(skip(self, request), fields(customer_id = %request.customer_id))]
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        if !request.department.is_assignable() {
            return Err(ServiceError::ValidationError(format!(
                "Orders cannot be assigned to the {} department",
                request.department
            )));
        }

        let db = &*self.db_pool;

        let customer_row = customer::Entity::find_by_id(request.customer_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "Unknown customer: {}",
                    request.customer_id
                ))
            })?;

        let now = Utc::now();
        let order_id = Uuid::new_v4();
        let order_code = self.code_allocator.next_code();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for order creation");
            ServiceError::DatabaseError(e)
        })?;

        let order_active_model = OrderActiveModel {
            id: Set(order_id),
            order_code: Set(order_code.clone()),
            customer_id: Set(request.customer_id),
            product_description: Set(request.product_description.trim().to_string()),
            quantity: Set(request.quantity),
            material: Set(request
                .material
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())),
            department: Set(request.department),
            status: Set(OrderStatus::Inquiry),
            is_archived: Set(false),
            created_at: Set(now),
            updated_at: Set(Some(now)),
            version: Set(1),
        };

        let order_model = order_active_model.insert(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to create order in database");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit order creation transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id = %order_id, order_code = %order_model.order_code, "Order created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::OrderCreated(order_id)).await {
                warn!(error = %e, order_id = %order_id, "Failed to send order created event");
            }
        }

        Ok(model_to_response(order_model, Some(customer_row.name)))
    }

    /// Retrieves an order by ID.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<Option<OrderResponse>, ServiceError> {
        let db = &*self.db_pool;

        let found = OrderEntity::find_by_id(order_id)
            .find_also_related(customer::Entity)
            .one(db)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to fetch order");
                ServiceError::DatabaseError(e)
            })?;

        Ok(found.map(|(order_model, customer_model)| {
            model_to_response(order_model, customer_model.map(|c| c.name))
        }))
    }

    /// Resolves an order code (`SF1006`) to its ID.
    pub async fn find_order_id_by_code(&self, code: &str) -> Result<Option<Uuid>, ServiceError> {
        let db = &*self.db_pool;

        let id: Option<Uuid> = OrderEntity::find()
            .select_only()
            .column(order::Column::Id)
            .filter(order::Column::OrderCode.eq(code))
            .into_tuple()
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(id)
    }

    /// Lists non-archived orders, newest first, with optional status filter
    /// and search over order code and customer name.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        page: u64,
        per_page: u64,
        status: Option<OrderStatus>,
        search: Option<&str>,
    ) -> Result<OrderListResponse, ServiceError> {
        let db = &*self.db_pool;

        let mut query = OrderEntity::find()
            .find_also_related(customer::Entity)
            .filter(order::Column::IsArchived.eq(false));

        if let Some(status) = status {
            query = query.filter(order::Column::Status.eq(status));
        }

        if let Some(q) = search.map(str::trim).filter(|q| !q.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(order::Column::OrderCode.contains(q))
                    .add(customer::Column::Name.contains(q)),
            );
        }

        let paginator = query
            .order_by_desc(order::Column::CreatedAt)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Failed to count orders");
            ServiceError::DatabaseError(e)
        })?;

        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| {
                error!(error = %e, page = page, per_page = per_page, "Failed to fetch orders page");
                ServiceError::DatabaseError(e)
            })?;

        let orders: Vec<OrderResponse> = rows
            .into_iter()
            .map(|(order_model, customer_model)| {
                model_to_response(order_model, customer_model.map(|c| c.name))
            })
            .collect();

        Ok(OrderListResponse {
            orders,
            total,
            page,
            per_page,
        })
    }

    /// Archives an order (soft delete). The transition ledger survives.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn archive_order(&self, order_id: Uuid) -> Result<OrderResponse, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();

        let order_model = OrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                warn!(order_id = %order_id, "Order not found for archiving");
                ServiceError::NotFound(format!("Order {} not found", order_id))
            })?;

        let version = order_model.version;
        let mut active: OrderActiveModel = order_model.into();
        active.is_archived = Set(true);
        active.updated_at = Set(Some(now));
        active.version = Set(version + 1);

        let archived = active.update(db).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to archive order");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id = %order_id, "Order archived");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::OrderArchived(order_id)).await {
                warn!(error = %e, order_id = %order_id, "Failed to send order archived event");
            }
        }

        Ok(model_to_response(archived, None))
    }
}

/// Converts an order model to response format.
fn model_to_response(model: OrderModel, customer_name: Option<String>) -> OrderResponse {
    let progress = model.status.progress_fraction();
    OrderResponse {
        id: model.id,
        order_code: model.order_code,
        customer_id: model.customer_id,
        customer_name,
        product_description: model.product_description,
        quantity: model.quantity,
        material: model.material,
        department: model.department,
        status: model.status,
        progress,
        is_archived: model.is_archived,
        created_at: model.created_at,
        updated_at: model.updated_at,
        version: model.version,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_suffix_strips_prefix() {
        assert_eq!(numeric_suffix("SF1006"), Some(1006));
        assert_eq!(numeric_suffix("SF"), None);
        assert_eq!(numeric_suffix("JOB-042"), Some(42));
    }

    #[test]
    fn allocator_continues_from_highest_existing_code() {
        let existing = ["SF1001", "SF1002", "SF1003", "SF1004", "SF1005"];
        let highest = max_numeric_suffix(existing).unwrap().max(1000);
        let allocator = OrderCodeAllocator::new("SF", highest);

        let next = allocator.next_code();
        assert_eq!(next, "SF1006");
        assert!(!existing.contains(&next.as_str()));
        assert_eq!(allocator.next_code(), "SF1007");
    }

    #[test]
    fn allocator_starts_at_floor_for_empty_set() {
        let highest = max_numeric_suffix([]).unwrap_or(0).max(1000);
        let allocator = OrderCodeAllocator::new("SF", highest);
        assert_eq!(allocator.next_code(), "SF1001");
    }

    #[test]
    fn model_to_response_carries_progress() {
        let now = Utc::now();
        let model = OrderModel {
            id: Uuid::new_v4(),
            order_code: "SF1001".to_string(),
            customer_id: Uuid::new_v4(),
            product_description: "High-precision gear shafts".to_string(),
            quantity: 12,
            material: Some("Stainless Steel 316".to_string()),
            department: Department::Production,
            status: OrderStatus::Completed,
            is_archived: false,
            created_at: now,
            updated_at: Some(now),
            version: 3,
        };

        let response = model_to_response(model, Some("ACME Corp".to_string()));
        assert_eq!(response.order_code, "SF1001");
        assert_eq!(response.customer_name.as_deref(), Some("ACME Corp"));
        assert!((response.progress - 1.0).abs() < f64::EPSILON);
    }
}
