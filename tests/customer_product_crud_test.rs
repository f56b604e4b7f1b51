//! CRUD coverage for the customer and product reference records.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::json;

#[tokio::test]
async fn customer_crud_round_trip() {
    let app = TestApp::new().await;

    let created = response_json(
        app.request(
            Method::POST,
            "/api/v1/customers",
            Some(json!({
                "name": "John Doe",
                "email": "john@example.com",
                "phone": "+1 (555) 123-4567",
                "address": "123 Main St, New York, NY",
            })),
        )
        .await,
    )
    .await;

    let customer = &created["data"];
    assert_eq!(customer["name"], "John Doe");
    assert_eq!(customer["status"], "Active");
    let id = customer["id"].as_str().unwrap().to_string();

    let fetched = response_json(
        app.request(Method::GET, &format!("/api/v1/customers/{id}"), None)
            .await,
    )
    .await;
    assert_eq!(fetched["data"]["email"], "john@example.com");

    let updated = response_json(
        app.request(
            Method::PUT,
            &format!("/api/v1/customers/{id}"),
            Some(json!({ "status": "Inactive", "phone": "" })),
        )
        .await,
    )
    .await;
    assert_eq!(updated["data"]["status"], "Inactive");
    assert!(updated["data"]["phone"].is_null());
    assert!(updated["data"]["updated_at"].is_string());

    let deleted = app
        .request(Method::DELETE, &format!("/api/v1/customers/{id}"), None)
        .await;
    assert_eq!(deleted.status(), 204);

    let missing = app
        .request(Method::GET, &format!("/api/v1/customers/{id}"), None)
        .await;
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn customer_with_orders_cannot_be_deleted() {
    let app = TestApp::new().await;
    let customer_id = app.seed_customer("ACME Corp", "contact@acme.com").await;
    app.seed_order(customer_id, "Gear shafts").await;

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/customers/{customer_id}"),
            None,
        )
        .await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn customer_creation_rejects_invalid_email() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/customers",
            Some(json!({ "name": "Bob Johnson", "email": "invalid_email" })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn customers_list_newest_first() {
    let app = TestApp::new().await;
    app.seed_customer("First Corp", "first@example.com").await;
    app.seed_customer("Second Corp", "second@example.com").await;

    let list = response_json(app.request(Method::GET, "/api/v1/customers", None).await).await;
    assert_eq!(list["data"]["total"], 2);
    let customers = list["data"]["customers"].as_array().unwrap();
    assert_eq!(customers.len(), 2);
}

#[tokio::test]
async fn product_crud_round_trip() {
    let app = TestApp::new().await;

    let created = response_json(
        app.request(
            Method::POST,
            "/api/v1/products",
            Some(json!({ "code": "HG-S316", "name": "High-precision gear shafts" })),
        )
        .await,
    )
    .await;
    let product = &created["data"];
    assert_eq!(product["code"], "HG-S316");
    assert_eq!(product["status"], "Active");
    let id = product["id"].as_str().unwrap().to_string();

    let updated = response_json(
        app.request(
            Method::PUT,
            &format!("/api/v1/products/{id}"),
            Some(json!({ "name": "Gear shafts (v2)", "status": "Inactive" })),
        )
        .await,
    )
    .await;
    assert_eq!(updated["data"]["name"], "Gear shafts (v2)");
    assert_eq!(updated["data"]["status"], "Inactive");

    let deleted = app
        .request(Method::DELETE, &format!("/api/v1/products/{id}"), None)
        .await;
    assert_eq!(deleted.status(), 204);
}

#[tokio::test]
async fn duplicate_product_codes_conflict() {
    let app = TestApp::new().await;

    let first = app
        .request(
            Method::POST,
            "/api/v1/products",
            Some(json!({ "code": "VK-ES", "name": "Empathy sensors" })),
        )
        .await;
    assert_eq!(first.status(), 201);

    let duplicate = app
        .request(
            Method::POST,
            "/api/v1/products",
            Some(json!({ "code": "VK-ES", "name": "Other sensors" })),
        )
        .await;
    assert_eq!(duplicate.status(), 409);

    // Renaming another product onto a taken code also conflicts.
    let other = response_json(
        app.request(
            Method::POST,
            "/api/v1/products",
            Some(json!({ "code": "ARC-PI", "name": "Arc reactor casings" })),
        )
        .await,
    )
    .await;
    let other_id = other["data"]["id"].as_str().unwrap();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/products/{other_id}"),
            Some(json!({ "code": "VK-ES" })),
        )
        .await;
    assert_eq!(response.status(), 409);
}
