use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::order::{Department, OrderStatus};

/// The `orders` table. One row per manufacturing job.
///
/// `status` always mirrors the `to_status` of the newest row in
/// `order_transitions` (or `Inquiry` while the ledger is empty); `version` is
/// the optimistic-locking guard for status updates.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Unique human-facing code, e.g. `SF1006`.
    #[validate(length(
        min = 1,
        max = 32,
        message = "Order code must be between 1 and 32 characters"
    ))]
    pub order_code: String,

    pub customer_id: Uuid,

    #[validate(length(min = 1, message = "Product description is required"))]
    pub product_description: String,

    pub quantity: i32,
    pub material: Option<String>,
    pub department: Department,
    pub status: OrderStatus,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_transition::Entity")]
    OrderTransitions,
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Customer,
}

impl Related<super::order_transition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderTransitions.def()
    }
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        Ok(self)
    }
}
