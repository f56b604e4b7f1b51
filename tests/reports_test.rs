//! Dashboard aggregates: zero-filled counts by status and department.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::{json, Value};

fn count_for<'a>(rows: &'a [Value], key: &str, name: &str) -> u64 {
    rows.iter()
        .find(|row| row[key] == name)
        .and_then(|row| row["count"].as_u64())
        .unwrap_or_else(|| panic!("missing {key} {name}"))
}

#[tokio::test]
async fn reports_count_orders_by_status_and_department() {
    let app = TestApp::new().await;
    let customer_id = app.seed_customer("ACME Corp", "contact@acme.com").await;

    // Three orders: one left at Inquiry, one moved to Design, one archived.
    app.seed_order(customer_id, "Gear shafts").await;
    let moved = app.seed_order(customer_id, "Custom brackets").await;
    let archived = app.seed_order(customer_id, "Titanium shafts").await;

    let moved_id = moved["id"].as_str().unwrap();
    app.request(
        Method::PUT,
        &format!("/api/v1/orders/{moved_id}/status"),
        Some(json!({ "actor": "Admin", "status": "Design" })),
    )
    .await;

    let archived_id = archived["id"].as_str().unwrap();
    app.request(
        Method::POST,
        &format!("/api/v1/orders/{archived_id}/archive"),
        None,
    )
    .await;

    let by_status = response_json(
        app.request(Method::GET, "/api/v1/reports/orders-by-status", None)
            .await,
    )
    .await;
    let rows = by_status["data"].as_array().unwrap().clone();

    // Zero-filled across all six stages.
    assert_eq!(rows.len(), 6);
    assert_eq!(count_for(&rows, "status", "Inquiry"), 1);
    assert_eq!(count_for(&rows, "status", "Design"), 1);
    assert_eq!(count_for(&rows, "status", "Production"), 0);
    assert_eq!(count_for(&rows, "status", "Machining"), 0);
    assert_eq!(count_for(&rows, "status", "Inspection"), 0);
    assert_eq!(count_for(&rows, "status", "Completed"), 0);

    let by_department = response_json(
        app.request(Method::GET, "/api/v1/reports/orders-by-department", None)
            .await,
    )
    .await;
    let rows = by_department["data"].as_array().unwrap().clone();

    // Zero-filled across the four assignable departments; archived order
    // excluded here too.
    assert_eq!(rows.len(), 4);
    assert_eq!(count_for(&rows, "department", "Design"), 2);
    assert_eq!(count_for(&rows, "department", "Production"), 0);
    assert_eq!(count_for(&rows, "department", "Machining"), 0);
    assert_eq!(count_for(&rows, "department", "Inspection"), 0);
}

#[tokio::test]
async fn reports_are_empty_but_complete_without_orders() {
    let app = TestApp::new().await;

    let by_status = response_json(
        app.request(Method::GET, "/api/v1/reports/orders-by-status", None)
            .await,
    )
    .await;
    let rows = by_status["data"].as_array().unwrap();
    assert_eq!(rows.len(), 6);
    assert!(rows.iter().all(|row| row["count"] == 0));
}
