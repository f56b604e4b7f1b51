use std::sync::Arc;

use sea_orm::{ColumnTrait, EntityTrait, Iterable, PaginatorTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::{
    db::DbPool,
    entities::order::{self, Entity as OrderEntity},
    errors::ServiceError,
    models::order::{Department, OrderStatus},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DepartmentCount {
    pub department: Department,
    pub count: u64,
}

/// Pre-aggregated counts for dashboard charts. Pure queries over non-archived
/// orders; zero-filled across the closed enums so chart axes never miss a
/// category.
#[derive(Clone)]
pub struct ReportService {
    db_pool: Arc<DbPool>,
}

impl ReportService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn orders_by_status(&self) -> Result<Vec<StatusCount>, ServiceError> {
        let db = &*self.db_pool;
        let mut counts = Vec::with_capacity(OrderStatus::stage_count());

        for status in OrderStatus::iter() {
            let count = OrderEntity::find()
                .filter(order::Column::IsArchived.eq(false))
                .filter(order::Column::Status.eq(status))
                .count(db)
                .await
                .map_err(ServiceError::DatabaseError)?;
            counts.push(StatusCount { status, count });
        }

        Ok(counts)
    }

    #[instrument(skip(self))]
    pub async fn orders_by_department(&self) -> Result<Vec<DepartmentCount>, ServiceError> {
        let db = &*self.db_pool;
        let mut counts = Vec::new();

        for department in Department::iter().filter(Department::is_assignable) {
            let count = OrderEntity::find()
                .filter(order::Column::IsArchived.eq(false))
                .filter(order::Column::Department.eq(department))
                .count(db)
                .await
                .map_err(ServiceError::DatabaseError)?;
            counts.push(DepartmentCount { department, count });
        }

        Ok(counts)
    }
}
