use std::sync::Arc;

use axum::{
    body,
    http::{Method, Request},
    response::Response,
    Router,
};
use axum::body::Body;
use serde_json::{json, Value};
use swiftflow_api::{
    config::AppConfig,
    db,
    events::{self, EventSender},
    handlers::AppServices,
    AppState,
};
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

/// Helper harness that stands up the full router over an in-memory SQLite
/// database. Each instance is a fresh, fully migrated schema.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new("sqlite::memory:", "127.0.0.1", 18_080, "test");
        cfg.auto_migrate = true;
        // A single pooled connection keeps the in-memory database alive and
        // shared across the whole test.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);

        let (event_tx, event_rx) = mpsc::channel(64);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::bootstrap(db_arc.clone(), Arc::new(event_sender.clone()), &cfg)
            .await
            .expect("failed to build services");

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };

        let router = Router::new()
            .nest("/api/v1", swiftflow_api::api_v1_routes())
            .layer(axum::middleware::from_fn(
                swiftflow_api::request_id::request_id_middleware,
            ))
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Drives one request through the router.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json_body) => builder
                .header("content-type", "application/json")
                .body(Body::from(json_body.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router response")
    }

    /// Creates a customer and returns its id.
    pub async fn seed_customer(&self, name: &str, email: &str) -> Uuid {
        let response = self
            .request(
                Method::POST,
                "/api/v1/customers",
                Some(json!({ "name": name, "email": email })),
            )
            .await;
        assert_eq!(response.status(), 201, "customer seed should succeed");

        let body = response_json(response).await;
        body["data"]["id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .expect("customer id")
    }

    /// Creates an order for the given customer and returns the response data.
    pub async fn seed_order(&self, customer_id: Uuid, description: &str) -> Value {
        let response = self
            .request(
                Method::POST,
                "/api/v1/orders",
                Some(json!({
                    "customer_id": customer_id.to_string(),
                    "product_description": description,
                    "quantity": 1,
                    "material": null,
                    "department": "Design",
                })),
            )
            .await;
        assert_eq!(response.status(), 201, "order seed should succeed");

        let body = response_json(response).await;
        body["data"].clone()
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
