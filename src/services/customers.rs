use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::customer::{
        self, ActiveModel as CustomerActiveModel, Entity as CustomerEntity,
        Model as CustomerModel,
    },
    entities::order,
    errors::ServiceError,
    events::{Event, EventSender},
    models::customer::CustomerStatus,
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 120, message = "Customer name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<CustomerStatus>,
}

#[derive(Debug, Serialize, Deserialize, Default, ToSchema)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<CustomerStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: CustomerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerListResponse {
    pub customers: Vec<CustomerResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

#[derive(Clone)]
pub struct CustomerService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl CustomerService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request))]
    pub async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<CustomerResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let now = Utc::now();
        let customer_id = Uuid::new_v4();

        let active = CustomerActiveModel {
            id: Set(customer_id),
            name: Set(request.name.trim().to_string()),
            email: Set(request.email.trim().to_string()),
            phone: Set(normalize(request.phone)),
            address: Set(normalize(request.address)),
            status: Set(request.status.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let model = active.insert(db).await.map_err(|e| {
            error!(error = %e, customer_id = %customer_id, "Failed to create customer");
            ServiceError::DatabaseError(e)
        })?;

        info!(customer_id = %customer_id, "Customer created");

        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(Event::CustomerCreated(customer_id)).await {
                warn!(error = %e, customer_id = %customer_id, "Failed to send customer created event");
            }
        }

        Ok(model_to_response(model))
    }

    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn get_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Option<CustomerResponse>, ServiceError> {
        let db = &*self.db_pool;

        let model = CustomerEntity::find_by_id(customer_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(model.map(model_to_response))
    }

    #[instrument(skip(self))]
    pub async fn list_customers(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<CustomerListResponse, ServiceError> {
        let db = &*self.db_pool;

        let paginator = CustomerEntity::find()
            .order_by_desc(customer::Column::CreatedAt)
            .paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;

        let customers = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?
            .into_iter()
            .map(model_to_response)
            .collect();

        Ok(CustomerListResponse {
            customers,
            total,
            page,
            per_page,
        })
    }

    #[instrument(skip(self, request), fields(customer_id = %customer_id))]
    pub async fn update_customer(
        &self,
        customer_id: Uuid,
        request: UpdateCustomerRequest,
    ) -> Result<CustomerResponse, ServiceError> {
        if let Some(email) = request.email.as_deref() {
            if !validator::validate_email(email) {
                return Err(ServiceError::ValidationError(format!(
                    "Invalid email address: {}",
                    email
                )));
            }
        }
        if let Some(name) = request.name.as_deref() {
            if name.trim().is_empty() {
                return Err(ServiceError::ValidationError(
                    "Customer name must not be empty".to_string(),
                ));
            }
        }

        let db = &*self.db_pool;

        let model = CustomerEntity::find_by_id(customer_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Customer {} not found", customer_id))
            })?;

        let mut active: CustomerActiveModel = model.into();
        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(email) = request.email {
            active.email = Set(email.trim().to_string());
        }
        if let Some(phone) = request.phone {
            active.phone = Set(normalize(Some(phone)));
        }
        if let Some(address) = request.address {
            active.address = Set(normalize(Some(address)));
        }
        if let Some(status) = request.status {
            active.status = Set(status);
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, customer_id = %customer_id, "Failed to update customer");
            ServiceError::DatabaseError(e)
        })?;

        info!(customer_id = %customer_id, "Customer updated");

        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(Event::CustomerUpdated(customer_id)).await {
                warn!(error = %e, customer_id = %customer_id, "Failed to send customer updated event");
            }
        }

        Ok(model_to_response(updated))
    }

    /// Deletes a customer. Refused while any order still references it.
    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn delete_customer(&self, customer_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let referencing_orders = order::Entity::find()
            .filter(order::Column::CustomerId.eq(customer_id))
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if referencing_orders > 0 {
            return Err(ServiceError::Conflict(format!(
                "Customer {} is referenced by {} order(s)",
                customer_id, referencing_orders
            )));
        }

        let result = CustomerEntity::delete_by_id(customer_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Customer {} not found",
                customer_id
            )));
        }

        info!(customer_id = %customer_id, "Customer deleted");

        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(Event::CustomerDeleted(customer_id)).await {
                warn!(error = %e, customer_id = %customer_id, "Failed to send customer deleted event");
            }
        }

        Ok(())
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn model_to_response(model: CustomerModel) -> CustomerResponse {
    CustomerResponse {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        address: model.address,
        status: model.status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
