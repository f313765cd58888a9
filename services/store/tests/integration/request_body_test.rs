use axum::{Router, http::StatusCode, routing::post};
use axum_test::TestServer;
use serde_json::{Value, json};

use gka_store::handlers::JsonBody;
use gka_store::handlers::order::CreateOrderRequest;

async fn count_items(JsonBody(body): JsonBody<CreateOrderRequest>) -> String {
    body.items.len().to_string()
}

fn server() -> TestServer {
    TestServer::new(Router::new().route("/order/create", post(count_items))).unwrap()
}

fn item() -> Value {
    json!({ "id": "p-1", "name": "Mango pickle", "qty": 2, "price": 199.0 })
}

fn assert_invalid_input(body: &Value, needle: &str) {
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "INVALID_INPUT");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains(needle), "got {message}");
}

#[tokio::test]
async fn should_accept_well_formed_body() {
    let response = server()
        .post("/order/create")
        .json(&json!({ "items": [item()] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "1");
}

#[tokio::test]
async fn should_answer_missing_item_field_in_error_envelope() {
    let response = server()
        .post("/order/create")
        .json(&json!({ "items": [{ "id": "p-1", "name": "Mango pickle", "qty": 2 }] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_invalid_input(&response.json::<Value>(), "price");
}

#[tokio::test]
async fn should_answer_negative_quantity_in_error_envelope() {
    let mut bad = item();
    bad["qty"] = json!(-1);
    let response = server()
        .post("/order/create")
        .json(&json!({ "items": [bad] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_invalid_input(&response.json::<Value>(), "qty");
}

#[tokio::test]
async fn should_answer_malformed_json_in_error_envelope() {
    let response = server()
        .post("/order/create")
        .bytes("{\"items\": [".into())
        .content_type("application/json")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "INVALID_INPUT");
}

#[tokio::test]
async fn should_answer_missing_content_type_in_error_envelope() {
    let response = server().post("/order/create").text("items").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["success"], false);
}
