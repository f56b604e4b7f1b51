use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::order::{self, Entity as OrderEntity},
    entities::order_transition::{
        self, ActiveModel as TransitionActiveModel, Entity as TransitionEntity,
        Model as TransitionModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    models::order::{OrderStatus, StageState},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordTransitionInput {
    /// Display name of the user performing the change.
    pub actor: String,
    pub to_status: OrderStatus,
    pub notes: Option<String>,
    /// Filename reference; at most one per transition.
    pub attachment_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransitionResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub position: i32,
    pub actor: String,
    pub from_status: OrderStatus,
    pub to_status: OrderStatus,
    pub notes: Option<String>,
    pub attachment_ref: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StageProgress {
    pub stage: OrderStatus,
    pub state: StageState,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProgressResponse {
    pub order_id: Uuid,
    pub status: OrderStatus,
    /// 0.0 at `Inquiry`, 1.0 at `Completed`
    pub fraction: f64,
    pub stages: Vec<StageProgress>,
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The status-update protocol: appends an immutable transition record and
/// moves the order's current status, atomically.
///
/// Any member of the status enum is a legal target, including earlier stages
/// and the current stage; only statuses outside the enum are rejected, at the
/// parsing boundary.
#[derive(Clone)]
pub struct OrderStatusService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl OrderStatusService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Appends one transition record and updates the order's status.
    ///
    /// The append and the status update commit in a single transaction; the
    /// status update is conditional on the version read at the start, so a
    /// concurrent writer surfaces as `ConcurrentModification` and nothing is
    /// applied.
    #[instrument(skip(self, input), fields(order_id = %order_id, to_status = %input.to_status))]
    pub async fn record_transition(
        &self,
        order_id: Uuid,
        input: RecordTransitionInput,
    ) -> Result<TransitionResponse, ServiceError> {
        let actor = input.actor.trim().to_string();
        if actor.is_empty() {
            return Err(ServiceError::ValidationError(
                "Actor display name is required".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to start transaction for status update");
            ServiceError::DatabaseError(e)
        })?;

        let order_model = OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to fetch order for status update");
                ServiceError::DatabaseError(e)
            })?
            .ok_or_else(|| {
                warn!(order_id = %order_id, "Order not found for status update");
                ServiceError::NotFound(format!("Order {} not found", order_id))
            })?;

        if order_model.is_archived {
            return Err(ServiceError::InvalidOperation(format!(
                "Order {} is archived and cannot change status",
                order_model.order_code
            )));
        }

        let last = TransitionEntity::find()
            .filter(order_transition::Column::OrderId.eq(order_id))
            .order_by_desc(order_transition::Column::Position)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        // From-status comes from the ledger itself; the order row's status is
        // only the fallback for an empty ledger (i.e. the creation status).
        let from_status = last
            .as_ref()
            .map(|t| t.to_status)
            .unwrap_or(order_model.status);
        let position = last.map(|t| t.position).unwrap_or(0) + 1;

        let now = Utc::now();
        let transition = TransitionActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            position: Set(position),
            actor: Set(actor),
            from_status: Set(from_status),
            to_status: Set(input.to_status),
            notes: Set(normalize_text(input.notes)),
            attachment_ref: Set(normalize_text(input.attachment_ref)),
            recorded_at: Set(now),
        };

        let inserted = transition.insert(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to append transition record");
            ServiceError::DatabaseError(e)
        })?;

        let update = OrderEntity::update_many()
            .col_expr(order::Column::Status, Expr::value(input.to_status))
            .col_expr(order::Column::UpdatedAt, Expr::value(Some(now)))
            .col_expr(order::Column::Version, Expr::value(order_model.version + 1))
            .filter(order::Column::Id.eq(order_id))
            .filter(order::Column::Version.eq(order_model.version))
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to update order status");
                ServiceError::DatabaseError(e)
            })?;

        if update.rows_affected == 0 {
            // Another writer advanced the order between our read and write;
            // dropping the transaction rolls the append back.
            warn!(order_id = %order_id, "Concurrent status update detected");
            return Err(ServiceError::ConcurrentModification(order_id));
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit status update transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            order_id = %order_id,
            from_status = %from_status,
            to_status = %inserted.to_status,
            position = inserted.position,
            "Order status updated"
        );

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::OrderStatusChanged {
                    order_id,
                    old_status: from_status,
                    new_status: inserted.to_status,
                })
                .await
            {
                warn!(error = %e, order_id = %order_id, "Failed to send status changed event");
            }
        }

        Ok(model_to_response(inserted))
    }

    /// The order's transition ledger in insertion order (oldest first).
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn history(&self, order_id: Uuid) -> Result<Vec<TransitionResponse>, ServiceError> {
        let db = &*self.db_pool;

        self.require_order(order_id).await?;

        let records = TransitionEntity::find()
            .filter(order_transition::Column::OrderId.eq(order_id))
            .order_by_asc(order_transition::Column::Position)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to fetch transition history");
                ServiceError::DatabaseError(e)
            })?;

        Ok(records.into_iter().map(model_to_response).collect())
    }

    /// The order's current pipeline status.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn current_status(&self, order_id: Uuid) -> Result<OrderStatus, ServiceError> {
        Ok(self.require_order(order_id).await?.status)
    }

    /// Per-stage progress breakdown for rendering.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn progress(&self, order_id: Uuid) -> Result<ProgressResponse, ServiceError> {
        let status = self.current_status(order_id).await?;

        Ok(ProgressResponse {
            order_id,
            status,
            fraction: status.progress_fraction(),
            stages: status
                .stage_states()
                .into_iter()
                .map(|(stage, state)| StageProgress { stage, state })
                .collect(),
        })
    }

    async fn require_order(&self, order_id: Uuid) -> Result<order::Model, ServiceError> {
        let db = &*self.db_pool;
        OrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))
    }
}

fn model_to_response(model: TransitionModel) -> TransitionResponse {
    TransitionResponse {
        id: model.id,
        order_id: model.order_id,
        position: model.position,
        actor: model.actor,
        from_status: model.from_status,
        to_status: model.to_status,
        notes: model.notes,
        attachment_ref: model.attachment_ref,
        recorded_at: model.recorded_at,
    }
}
