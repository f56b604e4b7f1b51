use sea_orm::entity::prelude::*;
use sea_orm::Iterable;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The fixed manufacturing pipeline, in progression order. Declaration order
/// is significant: it drives progress math and the per-stage partition below.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum OrderStatus {
    #[sea_orm(string_value = "Inquiry")]
    Inquiry,
    #[sea_orm(string_value = "Design")]
    Design,
    #[sea_orm(string_value = "Production")]
    Production,
    #[sea_orm(string_value = "Machining")]
    Machining,
    #[sea_orm(string_value = "Inspection")]
    Inspection,
    #[sea_orm(string_value = "Completed")]
    Completed,
}

impl OrderStatus {
    /// Zero-based position of the stage in the pipeline.
    pub fn position(&self) -> usize {
        match self {
            OrderStatus::Inquiry => 0,
            OrderStatus::Design => 1,
            OrderStatus::Production => 2,
            OrderStatus::Machining => 3,
            OrderStatus::Inspection => 4,
            OrderStatus::Completed => 5,
        }
    }

    /// Number of stages in the pipeline.
    pub fn stage_count() -> usize {
        Self::iter().count()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }

    /// Successor stage, `None` once the pipeline is complete.
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Inquiry => Some(OrderStatus::Design),
            OrderStatus::Design => Some(OrderStatus::Production),
            OrderStatus::Production => Some(OrderStatus::Machining),
            OrderStatus::Machining => Some(OrderStatus::Inspection),
            OrderStatus::Inspection => Some(OrderStatus::Completed),
            OrderStatus::Completed => None,
        }
    }

    /// Fraction of the pipeline traversed: 0.0 at `Inquiry`, 1.0 at
    /// `Completed`. Pure; used by progress-bar rendering.
    pub fn progress_fraction(&self) -> f64 {
        self.position() as f64 / (Self::stage_count() - 1) as f64
    }

    /// Partition every stage relative to this (current) status. Exactly one
    /// stage is `Current`; everything before it is `Completed`, everything
    /// after it `Pending`.
    pub fn stage_states(&self) -> Vec<(OrderStatus, StageState)> {
        Self::iter()
            .map(|stage| (stage, StageState::classify(*self, stage)))
            .collect()
    }
}

/// How a single pipeline stage relates to an order's current status.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, strum::Display)]
pub enum StageState {
    Completed,
    Current,
    Pending,
}

impl StageState {
    pub fn classify(current: OrderStatus, stage: OrderStatus) -> StageState {
        use std::cmp::Ordering;
        match stage.position().cmp(&current.position()) {
            Ordering::Less => StageState::Completed,
            Ordering::Equal => StageState::Current,
            Ordering::Greater => StageState::Pending,
        }
    }
}

/// Departments that staff orders and exchange messages. `Admin` participates
/// in messaging but is not a valid owning department for an order.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum Department {
    #[sea_orm(string_value = "Admin")]
    Admin,
    #[sea_orm(string_value = "Design")]
    Design,
    #[sea_orm(string_value = "Production")]
    Production,
    #[sea_orm(string_value = "Machining")]
    Machining,
    #[sea_orm(string_value = "Inspection")]
    Inspection,
}

impl Department {
    /// Departments an order can be assigned to.
    pub fn is_assignable(&self) -> bool {
        !matches!(self, Department::Admin)
    }
}
