//! End-to-end tests for the order pipeline and its status ledger:
//! creation at `Inquiry`, transition recording, history ordering,
//! rejection of unknown statuses, progress math, and archival.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::json;

#[tokio::test]
async fn create_order_starts_at_inquiry_with_sequential_code() {
    let app = TestApp::new().await;
    let customer_id = app.seed_customer("ACME Corp", "contact@acme.com").await;

    let order = app
        .seed_order(customer_id, "High-precision gear shafts")
        .await;

    assert_eq!(order["status"], "Inquiry");
    assert_eq!(order["order_code"], "SF1001");
    assert_eq!(order["progress"], 0.0);
    assert_eq!(order["customer_name"], "ACME Corp");

    let second = app.seed_order(customer_id, "Custom brackets").await;
    assert_eq!(second["order_code"], "SF1002");
}

#[tokio::test]
async fn order_codes_continue_past_existing_ones() {
    let app = TestApp::new().await;
    let customer_id = app.seed_customer("Stark Industries", "tony@stark.com").await;

    // Occupy SF1001..SF1005, then the next allocation must be SF1006.
    let mut codes = Vec::new();
    for i in 0..5 {
        let order = app
            .seed_order(customer_id, &format!("Arc reactor casing #{i}"))
            .await;
        codes.push(order["order_code"].as_str().unwrap().to_string());
    }
    assert_eq!(
        codes,
        vec!["SF1001", "SF1002", "SF1003", "SF1004", "SF1005"]
    );

    let next = app.seed_order(customer_id, "One more casing").await;
    let next_code = next["order_code"].as_str().unwrap();
    assert_eq!(next_code, "SF1006");
    assert!(!codes.iter().any(|c| c == next_code));
}

#[tokio::test]
async fn first_transition_derives_from_creation_status() {
    let app = TestApp::new().await;
    let customer_id = app
        .seed_customer("Tyrell Corporation", "sales@tyrell.com")
        .await;
    let order = app
        .seed_order(customer_id, "Voight-Kampff machine empathy sensors")
        .await;
    let order_id = order["id"].as_str().unwrap();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{order_id}/status"),
            Some(json!({
                "actor": "Admin",
                "status": "Design",
                "notes": "looks good",
                "attachment_ref": null,
            })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let record = &body["data"];
    assert_eq!(record["from_status"], "Inquiry");
    assert_eq!(record["to_status"], "Design");
    assert_eq!(record["notes"], "looks good");
    assert_eq!(record["position"], 1);

    // Order now reports the new status.
    let order_response = app
        .request(Method::GET, &format!("/api/v1/orders/{order_id}"), None)
        .await;
    let order_body = response_json(order_response).await;
    assert_eq!(order_body["data"]["status"], "Design");

    // Exactly one ledger entry.
    let history = app
        .request(
            Method::GET,
            &format!("/api/v1/orders/{order_id}/history"),
            None,
        )
        .await;
    let history_body = response_json(history).await;
    assert_eq!(history_body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn second_transition_derives_from_prior_record() {
    let app = TestApp::new().await;
    let customer_id = app
        .seed_customer("Wayne Enterprises", "lucius@wayne.com")
        .await;
    let order = app
        .seed_order(customer_id, "Graphene-composite body armor plates")
        .await;
    let order_id = order["id"].as_str().unwrap();

    for (status, notes) in [("Design", "spec approved"), ("Machining", "on the mill")] {
        let response = app
            .request(
                Method::PUT,
                &format!("/api/v1/orders/{order_id}/status"),
                Some(json!({ "actor": "Admin", "status": status, "notes": notes })),
            )
            .await;
        assert_eq!(response.status(), 200);
    }

    let history = response_json(
        app.request(
            Method::GET,
            &format!("/api/v1/orders/{order_id}/history"),
            None,
        )
        .await,
    )
    .await;

    let records = history["data"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    // Insertion order, oldest first.
    assert_eq!(records[0]["to_status"], "Design");
    assert_eq!(records[1]["from_status"], "Design");
    assert_eq!(records[1]["to_status"], "Machining");
    assert_eq!(records[0]["position"], 1);
    assert_eq!(records[1]["position"], 2);
}

#[tokio::test]
async fn backward_and_same_status_transitions_are_allowed() {
    let app = TestApp::new().await;
    let customer_id = app.seed_customer("ACME Corp", "contact@acme.com").await;
    let order = app.seed_order(customer_id, "Gear shafts").await;
    let order_id = order["id"].as_str().unwrap();

    for status in ["Completed", "Design", "Design"] {
        let response = app
            .request(
                Method::PUT,
                &format!("/api/v1/orders/{order_id}/status"),
                Some(json!({ "actor": "Admin", "status": status })),
            )
            .await;
        assert_eq!(response.status(), 200, "transition to {status} is legal");
    }

    let history = response_json(
        app.request(
            Method::GET,
            &format!("/api/v1/orders/{order_id}/history"),
            None,
        )
        .await,
    )
    .await;
    let records = history["data"].as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1]["from_status"], "Completed");
    assert_eq!(records[2]["from_status"], "Design");
    assert_eq!(records[2]["to_status"], "Design");
}

#[tokio::test]
async fn unknown_status_is_rejected_without_mutation() {
    let app = TestApp::new().await;
    let customer_id = app.seed_customer("ACME Corp", "contact@acme.com").await;
    let order = app.seed_order(customer_id, "Gear shafts").await;
    let order_id = order["id"].as_str().unwrap();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{order_id}/status"),
            Some(json!({ "actor": "Admin", "status": "Shipped" })),
        )
        .await;
    assert_eq!(response.status(), 400);

    let body = response_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Unknown order status"));

    // Neither the order nor its ledger changed.
    let order_body = response_json(
        app.request(Method::GET, &format!("/api/v1/orders/{order_id}"), None)
            .await,
    )
    .await;
    assert_eq!(order_body["data"]["status"], "Inquiry");

    let history = response_json(
        app.request(
            Method::GET,
            &format!("/api/v1/orders/{order_id}/history"),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(history["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn notes_are_trimmed_and_attachment_is_carried() {
    let app = TestApp::new().await;
    let customer_id = app.seed_customer("ACME Corp", "contact@acme.com").await;
    let order = app.seed_order(customer_id, "Gear shafts").await;
    let order_id = order["id"].as_str().unwrap();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{order_id}/status"),
            Some(json!({
                "actor": "  Inspection User  ",
                "status": "Inspection",
                "notes": "   dimensions verified   ",
                "attachment_ref": "inspection-report.pdf",
            })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let record = response_json(response).await["data"].clone();
    assert_eq!(record["actor"], "Inspection User");
    assert_eq!(record["notes"], "dimensions verified");
    assert_eq!(record["attachment_ref"], "inspection-report.pdf");

    // Whitespace-only notes collapse to none.
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{order_id}/status"),
            Some(json!({ "actor": "Admin", "status": "Completed", "notes": "   " })),
        )
        .await;
    let record = response_json(response).await["data"].clone();
    assert!(record["notes"].is_null());
}

#[tokio::test]
async fn progress_endpoint_partitions_stages() {
    let app = TestApp::new().await;
    let customer_id = app.seed_customer("ACME Corp", "contact@acme.com").await;
    let order = app.seed_order(customer_id, "Gear shafts").await;
    let order_id = order["id"].as_str().unwrap();

    app.request(
        Method::PUT,
        &format!("/api/v1/orders/{order_id}/status"),
        Some(json!({ "actor": "Admin", "status": "Machining" })),
    )
    .await;

    let progress = response_json(
        app.request(
            Method::GET,
            &format!("/api/v1/orders/{order_id}/progress"),
            None,
        )
        .await,
    )
    .await;

    let data = &progress["data"];
    assert_eq!(data["status"], "Machining");
    assert_eq!(data["fraction"], 0.6);

    let stages = data["stages"].as_array().unwrap();
    assert_eq!(stages.len(), 6);
    let states: Vec<&str> = stages
        .iter()
        .map(|s| s["state"].as_str().unwrap())
        .collect();
    assert_eq!(
        states,
        vec![
            "Completed",
            "Completed",
            "Completed",
            "Current",
            "Pending",
            "Pending"
        ]
    );
}

#[tokio::test]
async fn orders_are_fetchable_by_code() {
    let app = TestApp::new().await;
    let customer_id = app.seed_customer("ACME Corp", "contact@acme.com").await;
    let order = app.seed_order(customer_id, "Gear shafts").await;

    let by_code = response_json(app.request(Method::GET, "/api/v1/orders/SF1001", None).await).await;
    assert_eq!(by_code["data"]["id"], order["id"]);

    let missing = app.request(Method::GET, "/api/v1/orders/SF9999", None).await;
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn archived_orders_leave_lists_and_refuse_transitions() {
    let app = TestApp::new().await;
    let customer_id = app.seed_customer("ACME Corp", "contact@acme.com").await;
    let order = app.seed_order(customer_id, "Gear shafts").await;
    let order_id = order["id"].as_str().unwrap();
    app.seed_order(customer_id, "Custom brackets").await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/orders/{order_id}/archive"),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(response_json(response).await["data"]["is_archived"], true);

    // Archived order is gone from the listing, the other one remains.
    let list = response_json(app.request(Method::GET, "/api/v1/orders", None).await).await;
    assert_eq!(list["data"]["total"], 1);

    // Its ledger refuses further transitions.
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{order_id}/status"),
            Some(json!({ "actor": "Admin", "status": "Design" })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn list_orders_filters_by_status_and_search() {
    let app = TestApp::new().await;
    let acme = app.seed_customer("ACME Corp", "contact@acme.com").await;
    let stark = app.seed_customer("Stark Industries", "tony@stark.com").await;

    let first = app.seed_order(acme, "Gear shafts").await;
    app.seed_order(stark, "Arc reactor casings").await;

    let first_id = first["id"].as_str().unwrap();
    app.request(
        Method::PUT,
        &format!("/api/v1/orders/{first_id}/status"),
        Some(json!({ "actor": "Admin", "status": "Design" })),
    )
    .await;

    let by_status = response_json(
        app.request(Method::GET, "/api/v1/orders?status=Design", None)
            .await,
    )
    .await;
    assert_eq!(by_status["data"]["total"], 1);
    assert_eq!(by_status["data"]["orders"][0]["id"], first["id"]);

    let bad_status = app
        .request(Method::GET, "/api/v1/orders?status=Shipped", None)
        .await;
    assert_eq!(bad_status.status(), 400);

    let by_search = response_json(
        app.request(Method::GET, "/api/v1/orders?search=Stark", None)
            .await,
    )
    .await;
    assert_eq!(by_search["data"]["total"], 1);
    assert_eq!(
        by_search["data"]["orders"][0]["customer_name"],
        "Stark Industries"
    );

    let by_code = response_json(
        app.request(Method::GET, "/api/v1/orders?search=SF1001", None)
            .await,
    )
    .await;
    assert_eq!(by_code["data"]["total"], 1);
}

#[tokio::test]
async fn unknown_order_returns_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::PUT,
            "/api/v1/orders/00000000-0000-0000-0000-000000000000/status",
            Some(json!({ "actor": "Admin", "status": "Design" })),
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn order_creation_validates_inputs() {
    let app = TestApp::new().await;
    let customer_id = app.seed_customer("ACME Corp", "contact@acme.com").await;

    // Unknown customer
    let response = app
        .request(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "customer_id": "11111111-2222-3333-4444-555555555555",
                "product_description": "Gear shafts",
                "quantity": 1,
                "department": "Design",
            })),
        )
        .await;
    assert_eq!(response.status(), 400);

    // Zero quantity
    let response = app
        .request(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "customer_id": customer_id.to_string(),
                "product_description": "Gear shafts",
                "quantity": 0,
                "department": "Design",
            })),
        )
        .await;
    assert_eq!(response.status(), 400);

    // Admin is not an assignable department
    let response = app
        .request(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "customer_id": customer_id.to_string(),
                "product_description": "Gear shafts",
                "quantity": 1,
                "department": "Admin",
            })),
        )
        .await;
    assert_eq!(response.status(), 400);
}
