mod common;

use axum::{Router, http::StatusCode, routing::get};
use axum_test::TestServer;
use common::{CITY, add_shop, add_user, test_state};
use delivery_marketplace_api::{
    models::UserRole,
    routes::{create_app, panic_response},
    state::AppState,
};
use serde_json::{Value, json};
use tower_http::catch_panic::CatchPanicLayer;

fn server(state: AppState) -> TestServer {
    TestServer::try_new(create_app(state)).expect("test server")
}

#[tokio::test]
async fn health_check_returns_ok_with_request_id() {
    let server = server(test_state());

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["service"], "delivery-marketplace-api");

    let request_id = response.header("x-request-id");
    assert!(!request_id.is_empty());
}

#[tokio::test]
async fn unknown_routes_get_the_error_envelope() {
    let server = server(test_state());

    let response = server.get("/api/nowhere").expect_failure().await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No route for /api/nowhere");
}

async fn explode() -> StatusCode {
    panic!("handler blew up")
}

#[tokio::test]
async fn handler_panics_get_the_error_envelope() {
    let app = Router::new()
        .route("/explode", get(explode))
        .layer(CatchPanicLayer::custom(panic_response));
    let server = TestServer::try_new(app).expect("test server");

    let response = server.get("/explode").expect_failure().await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Internal Server Error");
}

#[tokio::test]
async fn order_round_trip_over_http() {
    let state = test_state();
    let customer = add_user(&state, UserRole::Customer, "http@example.com");
    let shop = add_shop(&state, "httpvendor@example.com");
    let server = server(state);

    let created = server
        .post("/api/orders")
        .json(&json!({
            "customer_id": customer.id,
            "store_id": shop.store.id,
            "items": [{ "product_id": shop.product.id, "quantity": 2 }],
            "delivery_address": "3 Rue Emir Abdelkader",
            "city": CITY,
            "customer_phone": "0555444444"
        }))
        .await;
    created.assert_status_ok();
    let body: Value = created.json();
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["subtotal"], 1600);
    let order_id = body["data"]["id"].as_str().expect("order id").to_string();

    let fetched: Value = server.get(&format!("/api/orders/{order_id}")).await.json();
    assert_eq!(fetched["data"]["id"], order_id.as_str());

    let listed: Value = server
        .get("/api/orders")
        .add_query_param("customer_id", customer.id)
        .await
        .json();
    assert_eq!(listed["data"]["items"].as_array().map(Vec::len), Some(1));

    // pending cannot jump straight to ready
    let conflict = server
        .patch("/api/vendors/orders")
        .json(&json!({
            "order_id": order_id,
            "vendor_id": shop.vendor.id,
            "status": "ready"
        }))
        .expect_failure()
        .await;
    conflict.assert_status(StatusCode::CONFLICT);
    let body: Value = conflict.json();
    assert_eq!(body["success"], false);

    let accepted = server
        .patch("/api/vendors/orders")
        .json(&json!({
            "order_id": order_id,
            "vendor_id": shop.vendor.id,
            "status": "accepted"
        }))
        .await;
    accepted.assert_status_ok();
    let body: Value = accepted.json();
    assert_eq!(body["data"]["status"], "accepted");
}

#[tokio::test]
async fn missing_order_is_not_found() {
    let server = server(test_state());

    let response = server
        .get(&format!("/api/orders/{}", uuid::Uuid::new_v4()))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Order not found");
}

#[tokio::test]
async fn customers_register_and_log_in() {
    let server = server(test_state());

    let registered = server
        .post("/api/auth/register")
        .json(&json!({
            "role": "customer",
            "name": "Sofiane",
            "email": "sofiane@example.com",
            "phone": "0555666666",
            "password": "s3cret-pass"
        }))
        .await;
    registered.assert_status_ok();
    let body: Value = registered.json();
    assert_eq!(body["data"]["auto_approved"], true);
    assert!(body["data"]["user"].get("password_hash").is_none());

    let login = server
        .post("/api/auth/login")
        .json(&json!({ "email": "sofiane@example.com", "password": "s3cret-pass" }))
        .await;
    login.assert_status_ok();

    let wrong = server
        .post("/api/auth/login")
        .json(&json!({ "email": "sofiane@example.com", "password": "nope" }))
        .expect_failure()
        .await;
    wrong.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wallet_overdraft_is_a_bad_request() {
    let state = test_state();
    let customer = add_user(&state, UserRole::Customer, "wallet@example.com");
    let server = server(state);

    server
        .post("/api/wallet/balance")
        .json(&json!({ "customer_id": customer.id, "amount": 300 }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/wallet/balance")
        .json(&json!({ "customer_id": customer.id, "amount": -500 }))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let wallet: Value = server
        .get("/api/wallet/balance")
        .add_query_param("customer_id", customer.id)
        .await
        .json();
    assert_eq!(wallet["data"]["balance"], 300);
}

#[tokio::test]
async fn docs_are_served() {
    let server = server(test_state());
    server.get("/docs").await.assert_status_ok();
}
