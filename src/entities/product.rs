use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::product::ProductStatus;

/// The `products` table: catalog entries offered on the order form. Orders
/// carry a free-text product description rather than a foreign key, so these
/// rows are reference data with an independent lifecycle.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Unique short code, e.g. `HG-S316`.
    #[validate(length(min = 1, max = 32, message = "Product code is required"))]
    pub code: String,

    #[validate(length(min = 1, max = 200, message = "Product name is required"))]
    pub name: String,

    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
