//! Inter-department message flow: send, inbox/sent listing, mark-read.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::json;

#[tokio::test]
async fn message_flow_send_receive_mark_read() {
    let app = TestApp::new().await;
    let customer_id = app.seed_customer("ACME Corp", "contact@acme.com").await;
    let order = app.seed_order(customer_id, "Gear shafts").await;
    let order_id = order["id"].as_str().unwrap();

    let sent = response_json(
        app.request(
            Method::POST,
            "/api/v1/messages",
            Some(json!({
                "from_department": "Production",
                "to_department": "Machining",
                "order_id": order_id,
                "priority": "High",
                "body": "Material shipment has arrived. Ready for machining.",
            })),
        )
        .await,
    )
    .await;

    let message = &sent["data"];
    assert_eq!(message["is_read"], false);
    assert_eq!(message["priority"], "High");
    let message_id = message["id"].as_str().unwrap().to_string();

    // Recipient sees it in the inbox.
    let inbox = response_json(
        app.request(Method::GET, "/api/v1/messages/inbox/Machining", None)
            .await,
    )
    .await;
    assert_eq!(inbox["data"]["total"], 1);
    assert_eq!(inbox["data"]["messages"][0]["id"], message["id"]);

    // Sender sees it in sent, and their own inbox stays empty.
    let sent_list = response_json(
        app.request(Method::GET, "/api/v1/messages/sent/Production", None)
            .await,
    )
    .await;
    assert_eq!(sent_list["data"]["total"], 1);

    let own_inbox = response_json(
        app.request(Method::GET, "/api/v1/messages/inbox/Production", None)
            .await,
    )
    .await;
    assert_eq!(own_inbox["data"]["total"], 0);

    // Mark read is idempotent.
    for _ in 0..2 {
        let read = response_json(
            app.request(
                Method::POST,
                &format!("/api/v1/messages/{message_id}/read"),
                None,
            )
            .await,
        )
        .await;
        assert_eq!(read["data"]["is_read"], true);
    }
}

#[tokio::test]
async fn message_priority_defaults_to_medium() {
    let app = TestApp::new().await;

    let sent = response_json(
        app.request(
            Method::POST,
            "/api/v1/messages",
            Some(json!({
                "from_department": "Design",
                "to_department": "Production",
                "body": "Design specifications are ready for review.",
            })),
        )
        .await,
    )
    .await;
    assert_eq!(sent["data"]["priority"], "Medium");
    assert!(sent["data"]["order_id"].is_null());
}

#[tokio::test]
async fn message_validation_rejects_bad_input() {
    let app = TestApp::new().await;

    // Empty body
    let response = app
        .request(
            Method::POST,
            "/api/v1/messages",
            Some(json!({
                "from_department": "Design",
                "to_department": "Production",
                "body": "   ",
            })),
        )
        .await;
    assert_eq!(response.status(), 400);

    // Unknown order reference
    let response = app
        .request(
            Method::POST,
            "/api/v1/messages",
            Some(json!({
                "from_department": "Design",
                "to_department": "Production",
                "order_id": "11111111-2222-3333-4444-555555555555",
                "body": "Where is this order?",
            })),
        )
        .await;
    assert_eq!(response.status(), 400);

    // Unknown department in the path
    let response = app
        .request(Method::GET, "/api/v1/messages/inbox/Shipping", None)
        .await;
    assert_eq!(response.status(), 400);

    // Unknown message id for mark-read
    let response = app
        .request(
            Method::POST,
            "/api/v1/messages/11111111-2222-3333-4444-555555555555/read",
            None,
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn inbox_lists_newest_first() {
    let app = TestApp::new().await;

    for body in ["first message", "second message"] {
        let response = app
            .request(
                Method::POST,
                "/api/v1/messages",
                Some(json!({
                    "from_department": "Admin",
                    "to_department": "Inspection",
                    "body": body,
                })),
            )
            .await;
        assert_eq!(response.status(), 201);
    }

    let inbox = response_json(
        app.request(Method::GET, "/api/v1/messages/inbox/Inspection", None)
            .await,
    )
    .await;
    let messages = inbox["data"]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["body"], "second message");
    assert_eq!(messages[1]["body"], "first message");
}
