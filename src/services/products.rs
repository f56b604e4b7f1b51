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
    entities::product::{
        self, ActiveModel as ProductActiveModel, Entity as ProductEntity, Model as ProductModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    models::product::ProductStatus,
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 32, message = "Product code is required"))]
    pub code: String,
    #[validate(length(min = 1, max = 200, message = "Product name is required"))]
    pub name: String,
    pub status: Option<ProductStatus>,
}

#[derive(Debug, Serialize, Deserialize, Default, ToSchema)]
pub struct UpdateProductRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub status: Option<ProductStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

#[derive(Clone)]
pub struct ProductService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl ProductService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request))]
    pub async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> Result<ProductResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let code = request.code.trim().to_string();

        let existing = ProductEntity::find()
            .filter(product::Column::Code.eq(code.clone()))
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if existing > 0 {
            return Err(ServiceError::Conflict(format!(
                "Product code {} already exists",
                code
            )));
        }

        let now = Utc::now();
        let product_id = Uuid::new_v4();

        let active = ProductActiveModel {
            id: Set(product_id),
            code: Set(code),
            name: Set(request.name.trim().to_string()),
            status: Set(request.status.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let model = active.insert(db).await.map_err(|e| {
            error!(error = %e, product_id = %product_id, "Failed to create product");
            ServiceError::DatabaseError(e)
        })?;

        info!(product_id = %product_id, code = %model.code, "Product created");

        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(Event::ProductCreated(product_id)).await {
                warn!(error = %e, product_id = %product_id, "Failed to send product created event");
            }
        }

        Ok(model_to_response(model))
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(
        &self,
        product_id: Uuid,
    ) -> Result<Option<ProductResponse>, ServiceError> {
        let db = &*self.db_pool;

        let model = ProductEntity::find_by_id(product_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(model.map(model_to_response))
    }

    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<ProductListResponse, ServiceError> {
        let db = &*self.db_pool;

        let paginator = ProductEntity::find()
            .order_by_desc(product::Column::CreatedAt)
            .paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;

        let products = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?
            .into_iter()
            .map(model_to_response)
            .collect();

        Ok(ProductListResponse {
            products,
            total,
            page,
            per_page,
        })
    }

    #[instrument(skip(self, request), fields(product_id = %product_id))]
    pub async fn update_product(
        &self,
        product_id: Uuid,
        request: UpdateProductRequest,
    ) -> Result<ProductResponse, ServiceError> {
        let db = &*self.db_pool;

        let model = ProductEntity::find_by_id(product_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;

        if let Some(code) = request.code.as_deref() {
            let code = code.trim();
            if code.is_empty() {
                return Err(ServiceError::ValidationError(
                    "Product code must not be empty".to_string(),
                ));
            }
            if code != model.code {
                let taken = ProductEntity::find()
                    .filter(product::Column::Code.eq(code))
                    .count(db)
                    .await
                    .map_err(ServiceError::DatabaseError)?;
                if taken > 0 {
                    return Err(ServiceError::Conflict(format!(
                        "Product code {} already exists",
                        code
                    )));
                }
            }
        }

        let mut active: ProductActiveModel = model.into();
        if let Some(code) = request.code {
            active.code = Set(code.trim().to_string());
        }
        if let Some(name) = request.name {
            if name.trim().is_empty() {
                return Err(ServiceError::ValidationError(
                    "Product name must not be empty".to_string(),
                ));
            }
            active.name = Set(name.trim().to_string());
        }
        if let Some(status) = request.status {
            active.status = Set(status);
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, product_id = %product_id, "Failed to update product");
            ServiceError::DatabaseError(e)
        })?;

        info!(product_id = %product_id, "Product updated");

        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(Event::ProductUpdated(product_id)).await {
                warn!(error = %e, product_id = %product_id, "Failed to send product updated event");
            }
        }

        Ok(model_to_response(updated))
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn delete_product(&self, product_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let result = ProductEntity::delete_by_id(product_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Product {} not found",
                product_id
            )));
        }

        info!(product_id = %product_id, "Product deleted");

        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(Event::ProductDeleted(product_id)).await {
                warn!(error = %e, product_id = %product_id, "Failed to send product deleted event");
            }
        }

        Ok(())
    }
}

fn model_to_response(model: ProductModel) -> ProductResponse {
    ProductResponse {
        id: model.id,
        code: model.code,
        name: model.name,
        status: model.status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
