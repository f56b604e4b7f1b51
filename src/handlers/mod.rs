pub mod customers;
pub mod messages;
pub mod orders;
pub mod products;
pub mod reports;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::errors::ServiceError;
use crate::events::EventSender;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub orders: Arc<crate::services::orders::OrderService>,
    pub order_status: Arc<crate::services::order_status::OrderStatusService>,
    pub customers: Arc<crate::services::customers::CustomerService>,
    pub products: Arc<crate::services::products::ProductService>,
    pub messages: Arc<crate::services::messages::MessageService>,
    pub reports: Arc<crate::services::reports::ReportService>,
}

impl AppServices {
    /// Builds the service container. Async because the order service seeds
    /// its code allocator from the database.
    pub async fn bootstrap(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        config: &AppConfig,
    ) -> Result<Self, ServiceError> {
        let orders = Arc::new(
            crate::services::orders::OrderService::bootstrap(
                db_pool.clone(),
                Some(event_sender.clone()),
                &config.order_code_prefix,
                config.order_code_floor,
            )
            .await?,
        );
        let order_status = Arc::new(crate::services::order_status::OrderStatusService::new(
            db_pool.clone(),
            Some(event_sender.clone()),
        ));
        let customers = Arc::new(crate::services::customers::CustomerService::new(
            db_pool.clone(),
            Some(event_sender.clone()),
        ));
        let products = Arc::new(crate::services::products::ProductService::new(
            db_pool.clone(),
            Some(event_sender.clone()),
        ));
        let messages = Arc::new(crate::services::messages::MessageService::new(
            db_pool.clone(),
            Some(event_sender),
        ));
        let reports = Arc::new(crate::services::reports::ReportService::new(db_pool));

        Ok(Self {
            orders,
            order_status,
            customers,
            products,
            messages,
            reports,
        })
    }
}
