//! 下单与订单管理接口测试：请求体校验、租户状态和下单前检查

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use resto_saas::models::restaurant::RestaurantStatus;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

mod common;
use common::{cookie_header, read_json, request, set_cookies, TestApp, TEST_PASSWORD};

async fn operator(app: &TestApp, slug: &str) -> Vec<String> {
    let email = format!("owner@{}.id", slug);
    app.seed_owner(&email, slug, RestaurantStatus::Approved);

    let response = app
        .router()
        .oneshot(request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": email, "password": TEST_PASSWORD })),
            &[],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    cookie_header(&set_cookies(&response))
}

async fn post(app: &TestApp, uri: &str, body: Value, cookies: &[String]) -> (StatusCode, Value) {
    let response = app
        .router()
        .oneshot(request("POST", uri, Some(body), cookies))
        .await
        .unwrap();
    let status = response.status();
    (status, read_json(response).await)
}

/// 建一个分类和一个菜品，返回菜品 id
async fn menu_item(app: &TestApp, cookies: &[String], available: bool) -> String {
    let (status, category) =
        post(app, "/api/categories", json!({ "name": "Makanan" }), cookies).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, item) = post(
        app,
        "/api/menu-items",
        json!({
            "categoryId": category["data"]["id"],
            "name": "Nasi Goreng",
            "price": 25000,
            "isAvailable": available,
        }),
        cookies,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    item["data"]["id"].as_str().unwrap().to_string()
}

fn order_body(slug: &str, items: Value) -> Value {
    json!({
        "restaurantSlug": slug,
        "customerName": "Budi",
        "tableNumber": "7",
        "totalAmount": 50000,
        "items": items,
    })
}

fn assert_error_envelope(body: &Value, needle: &str) {
    assert_eq!(body["success"], false);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains(needle), "unexpected error message: {}", error);
}

#[tokio::test]
async fn test_order_without_total_amount_is_400_envelope() {
    let app = TestApp::new();
    app.seed_owner("owner@warung-sri.id", "warung-sri", RestaurantStatus::Approved);

    let (status, body) = post(
        &app,
        "/api/orders",
        json!({
            "restaurantSlug": "warung-sri",
            "customerName": "Budi",
            "items": [{ "menuItemId": Uuid::new_v4(), "quantity": 1, "price": 25000 }],
        }),
        &[],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body, "totalAmount");
}

#[tokio::test]
async fn test_order_item_missing_fields_are_400_envelope() {
    let app = TestApp::new();

    let (status, body) = post(
        &app,
        "/api/orders",
        order_body("warung-sri", json!([{ "menuItemId": Uuid::new_v4(), "quantity": 1 }])),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body, "price");

    let (status, body) = post(
        &app,
        "/api/orders",
        order_body("warung-sri", json!([{ "quantity": 1, "price": 25000 }])),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body, "menuItemId");
}

#[tokio::test]
async fn test_malformed_json_is_400_envelope() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/orders")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"restaurantSlug\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_error_envelope(&read_json(response).await, "Malformed JSON");
}

#[tokio::test]
async fn test_payment_method_without_type_is_400_envelope() {
    let app = TestApp::new();
    let cookies = operator(&app, "warung-sri").await;

    let (status, body) = post(
        &app,
        "/api/payment-methods",
        json!({ "accountName": "Warung Sri" }),
        &cookies,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body, "type");
}

#[tokio::test]
async fn test_menu_item_without_category_is_400_envelope() {
    let app = TestApp::new();
    let cookies = operator(&app, "warung-sri").await;

    let (status, body) = post(
        &app,
        "/api/menu-items",
        json!({ "name": "Es Teh", "price": 5000 }),
        &cookies,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body, "categoryId");
}

#[tokio::test]
async fn test_order_for_unknown_restaurant_is_404() {
    let app = TestApp::new();

    let (status, body) = post(
        &app,
        "/api/orders",
        order_body(
            "tidak-ada",
            json!([{ "menuItemId": Uuid::new_v4(), "quantity": 1, "price": 25000 }]),
        ),
        &[],
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_closed_restaurant_rejects_orders() {
    let app = TestApp::new();
    app.seed_owner("owner@warung-sri.id", "warung-sri", RestaurantStatus::Pending);

    let (status, body) = post(
        &app,
        "/api/orders",
        order_body(
            "warung-sri",
            json!([{ "menuItemId": Uuid::new_v4(), "quantity": 1, "price": 25000 }]),
        ),
        &[],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body, "not accepting orders");
}

#[tokio::test]
async fn test_inactive_payment_method_rejected() {
    let app = TestApp::new();
    let cookies = operator(&app, "warung-sri").await;
    let item_id = menu_item(&app, &cookies, true).await;

    let (status, method) = post(
        &app,
        "/api/payment-methods",
        json!({ "type": "QRIS", "isActive": false }),
        &cookies,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let mut body = order_body(
        "warung-sri",
        json!([{ "menuItemId": item_id, "quantity": 2, "price": 25000 }]),
    );
    body["paymentMethodId"] = method["data"]["id"].clone();

    let (status, body) = post(&app, "/api/orders", body, &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body, "Invalid payment method");

    // 其它餐厅的支付方式同样无效
    let mut body = order_body(
        "warung-sri",
        json!([{ "menuItemId": item_id, "quantity": 2, "price": 25000 }]),
    );
    body["paymentMethodId"] = json!(Uuid::new_v4());
    let (status, _) = post(&app, "/api/orders", body, &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unavailable_or_foreign_item_rejected() {
    let app = TestApp::new();
    let cookies = operator(&app, "warung-sri").await;
    let sold_out = menu_item(&app, &cookies, false).await;

    let (status, body) = post(
        &app,
        "/api/orders",
        order_body(
            "warung-sri",
            json!([{ "menuItemId": sold_out, "quantity": 1, "price": 25000 }]),
        ),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body, "not available");

    // 别家餐厅的菜品
    let other_cookies = operator(&app, "kopi-pak-dul").await;
    let foreign = menu_item(&app, &other_cookies, true).await;
    let (status, body) = post(
        &app,
        "/api/orders",
        order_body(
            "warung-sri",
            json!([{ "menuItemId": foreign, "quantity": 1, "price": 25000 }]),
        ),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body, "not available");
}

#[tokio::test]
async fn test_order_status_update_validation() {
    let app = TestApp::new();
    let cookies = operator(&app, "warung-sri").await;
    let uri = format!("/api/orders/{}/status", Uuid::new_v4());

    let response = app
        .router()
        .oneshot(request("PATCH", &uri, Some(json!({})), &cookies))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_error_envelope(&read_json(response).await, "status or paymentStatus");

    let response = app
        .router()
        .oneshot(request("PATCH", &uri, Some(json!({ "status": "BURNT" })), &cookies))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_error_envelope(&read_json(response).await, "status");

    let response = app
        .router()
        .oneshot(request("PATCH", &uri, Some(json!({ "status": "READY" })), &[]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
