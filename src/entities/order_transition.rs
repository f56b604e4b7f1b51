use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::order::OrderStatus;

/// The `order_transitions` table: the append-only status ledger.
///
/// Rows are written exactly once and never updated or deleted. `position` is
/// the 1-based index within the owning order's ledger; the unique
/// `(order_id, position)` index makes insertion order deterministic
/// independent of timestamp ties.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_transitions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub order_id: Uuid,
    pub position: i32,

    /// Display name of the user who performed the transition.
    pub actor: String,

    pub from_status: OrderStatus,
    pub to_status: OrderStatus,

    /// Trimmed free-text comment; never stored empty.
    pub notes: Option<String>,

    /// Filename reference only; at most one per transition, no stored file.
    pub attachment_ref: Option<String>,

    pub recorded_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
