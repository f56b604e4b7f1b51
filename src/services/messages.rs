use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::department_message::{
        self, ActiveModel as MessageActiveModel, Entity as MessageEntity, Model as MessageModel,
    },
    entities::order,
    errors::ServiceError,
    events::{Event, EventSender},
    models::message::MessagePriority,
    models::order::Department,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    pub from_department: Department,
    pub to_department: Department,
    /// Optional order the message is about; must exist when given.
    pub order_id: Option<Uuid>,
    pub priority: Option<MessagePriority>,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub id: Uuid,
    pub from_department: Department,
    pub to_department: Department,
    pub order_id: Option<Uuid>,
    pub priority: MessagePriority,
    pub body: String,
    pub is_read: bool,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageListResponse {
    pub messages: Vec<MessageResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Inter-department messaging. Messages are immutable once sent; marking one
/// read is the only mutation.
#[derive(Clone)]
pub struct MessageService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl MessageService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request), fields(from = %request.from_department, to = %request.to_department))]
    pub async fn send_message(
        &self,
        request: SendMessageRequest,
    ) -> Result<MessageResponse, ServiceError> {
        let body = request.body.trim().to_string();
        if body.is_empty() {
            return Err(ServiceError::ValidationError(
                "Message body must not be empty".to_string(),
            ));
        }

        let db = &*self.db_pool;

        if let Some(order_id) = request.order_id {
            let exists = order::Entity::find_by_id(order_id)
                .count(db)
                .await
                .map_err(ServiceError::DatabaseError)?;
            if exists == 0 {
                return Err(ServiceError::ValidationError(format!(
                    "Unknown order reference: {}",
                    order_id
                )));
            }
        }

        let message_id = Uuid::new_v4();
        let priority = request.priority.unwrap_or_default();

        let active = MessageActiveModel {
            id: Set(message_id),
            from_department: Set(request.from_department),
            to_department: Set(request.to_department),
            order_id: Set(request.order_id),
            priority: Set(priority),
            body: Set(body),
            is_read: Set(false),
            sent_at: Set(Utc::now()),
        };

        let model = active.insert(db).await.map_err(|e| {
            error!(error = %e, message_id = %message_id, "Failed to send message");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            message_id = %message_id,
            from = %model.from_department,
            to = %model.to_department,
            "Message sent"
        );

        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender
                .send(Event::MessageSent {
                    message_id,
                    from_department: model.from_department,
                    to_department: model.to_department,
                    priority: model.priority,
                })
                .await
            {
                warn!(error = %e, message_id = %message_id, "Failed to send message event");
            }
        }

        Ok(model_to_response(model))
    }

    /// Messages addressed to a department, newest first.
    #[instrument(skip(self), fields(department = %department))]
    pub async fn inbox(
        &self,
        department: Department,
        page: u64,
        per_page: u64,
    ) -> Result<MessageListResponse, ServiceError> {
        self.list_by_column(department_message::Column::ToDepartment, department, page, per_page)
            .await
    }

    /// Messages sent by a department, newest first.
    #[instrument(skip(self), fields(department = %department))]
    pub async fn sent(
        &self,
        department: Department,
        page: u64,
        per_page: u64,
    ) -> Result<MessageListResponse, ServiceError> {
        self.list_by_column(
            department_message::Column::FromDepartment,
            department,
            page,
            per_page,
        )
        .await
    }

    /// Marks a message read. Idempotent.
    #[instrument(skip(self), fields(message_id = %message_id))]
    pub async fn mark_read(&self, message_id: Uuid) -> Result<MessageResponse, ServiceError> {
        let db = &*self.db_pool;

        let model = MessageEntity::find_by_id(message_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Message {} not found", message_id)))?;

        if model.is_read {
            return Ok(model_to_response(model));
        }

        let mut active: MessageActiveModel = model.into();
        active.is_read = Set(true);

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, message_id = %message_id, "Failed to mark message read");
            ServiceError::DatabaseError(e)
        })?;

        Ok(model_to_response(updated))
    }

    async fn list_by_column(
        &self,
        column: department_message::Column,
        department: Department,
        page: u64,
        per_page: u64,
    ) -> Result<MessageListResponse, ServiceError> {
        let db = &*self.db_pool;

        let paginator = MessageEntity::find()
            .filter(column.eq(department))
            .order_by_desc(department_message::Column::SentAt)
            .paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;

        let messages = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?
            .into_iter()
            .map(model_to_response)
            .collect();

        Ok(MessageListResponse {
            messages,
            total,
            page,
            per_page,
        })
    }
}

fn model_to_response(model: MessageModel) -> MessageResponse {
    MessageResponse {
        id: model.id,
        from_department: model.from_department,
        to_department: model.to_department,
        order_id: model.order_id,
        priority: model.priority,
        body: model.body,
        is_read: model.is_read,
        sent_at: model.sent_at,
    }
}
