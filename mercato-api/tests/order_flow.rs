use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

use mercato_api::{app, AppState};
use mercato_order::memory::{
    MemoryAddressDirectory, MemoryCartRepository, MemoryOrderRepository,
    MemoryShippingCostResolver,
};
use mercato_order::models::{Address, CartItem, ShippingCost};
use mercato_order::notification::MockNotificationGateway;
use mercato_order::{CartRepository, OrderOrchestrator};

struct TestApp {
    router: Router,
    carts: Arc<MemoryCartRepository>,
    notifier: Arc<MockNotificationGateway>,
    user_id: Uuid,
    address_id: Uuid,
}

/// Router over in-memory collaborators, seeded with one address, its
/// shipping cost, and a two-line cart.
fn test_app() -> TestApp {
    let addresses = Arc::new(MemoryAddressDirectory::new());
    let shipping = Arc::new(MemoryShippingCostResolver::new());
    let carts = Arc::new(MemoryCartRepository::new());
    let orders = Arc::new(MemoryOrderRepository::new());
    let notifier = Arc::new(MockNotificationGateway::new());

    let user_id = Uuid::new_v4();
    let address_id = Uuid::new_v4();

    addresses.put(Address {
        id: address_id,
        province_code: "79".to_string(),
        province_name: "Ho Chi Minh".to_string(),
        district_name: "District 1".to_string(),
        ward_name: "Ben Nghe".to_string(),
        street_address: "12 Le Loi".to_string(),
    });
    shipping.put(ShippingCost {
        id: Uuid::new_v4(),
        province_code: "79".to_string(),
        cost_cents: 20,
    });
    carts.put_items(
        user_id,
        vec![
            CartItem {
                product_id: Uuid::new_v4(),
                category_name: "Books".to_string(),
                product_name: "Paperback".to_string(),
                quantity: 1,
                price_cents: 100,
                discount_cents: 10,
                image_path: None,
            },
            CartItem {
                product_id: Uuid::new_v4(),
                category_name: "Books".to_string(),
                product_name: "Hardcover".to_string(),
                quantity: 1,
                price_cents: 50,
                discount_cents: 0,
                image_path: None,
            },
        ],
    );

    let orchestrator = OrderOrchestrator::new(
        addresses,
        shipping,
        Arc::clone(&carts) as _,
        orders,
        Arc::clone(&notifier) as _,
    );

    let router = app(AppState {
        orders: Arc::new(orchestrator),
    });

    TestApp {
        router,
        carts,
        notifier,
        user_id,
        address_id,
    }
}

fn create_payload(user_id: Uuid, address_id: Uuid) -> Value {
    json!({
        "user_id": user_id,
        "address_id": address_id,
        "customer_name": "Lan Tran",
        "phone_number": "+84 90 000 0000",
        "email": "lan@example.com",
        "note": null,
    })
}

async fn send_json(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

#[tokio::test]
async fn test_create_order_prices_the_cart() {
    let app = test_app();

    let (status, body) = send_json(
        &app.router,
        "POST",
        "/orders",
        Some(create_payload(app.user_id, app.address_id)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["price_cents"], 150);
    assert_eq!(body["discount_cents"], 10);
    assert_eq!(body["shipping_cost_cents"], 20);
    assert_eq!(body["total_cents"], 160);
    assert_eq!(body["status"], "PENDING");
}

#[tokio::test]
async fn test_second_order_is_a_conflict() {
    let app = test_app();
    let payload = create_payload(app.user_id, app.address_id);

    send_json(&app.router, "POST", "/orders", Some(payload.clone())).await;
    let (status, _) = send_json(&app.router, "POST", "/orders", Some(payload)).await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_requires_an_empty_cart() {
    let app = test_app();

    let (_, created) = send_json(
        &app.router,
        "POST",
        "/orders",
        Some(create_payload(app.user_id, app.address_id)),
    )
    .await;
    let order_uri = format!("/orders/{}", created["id"].as_str().unwrap());

    let (status, _) = send_json(&app.router, "DELETE", &order_uri, None).await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);

    app.carts.clear_for_user(app.user_id).await.unwrap();

    let (status, _) = send_json(&app.router, "DELETE", &order_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_payment_settles_the_order() {
    let app = test_app();

    let (_, created) = send_json(
        &app.router,
        "POST",
        "/orders",
        Some(create_payload(app.user_id, app.address_id)),
    )
    .await;
    let payment_uri = format!("/orders/{}/payment", created["id"].as_str().unwrap());

    let (status, confirmation) = send_json(&app.router, "POST", &payment_uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmation["total_cents"], 160);
    assert_eq!(app.notifier.sent_count(), 1);
    assert!(app.carts.items_for_user(app.user_id).await.unwrap().is_empty());

    // The order is gone once settled.
    let (status, _) = send_json(&app.router, "POST", &payment_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_failed_delivery_leaves_the_order_open() {
    let app = test_app();

    let (_, created) = send_json(
        &app.router,
        "POST",
        "/orders",
        Some(create_payload(app.user_id, app.address_id)),
    )
    .await;
    let payment_uri = format!("/orders/{}/payment", created["id"].as_str().unwrap());
    app.notifier.set_failing(true);

    let (status, _) = send_json(&app.router, "POST", &payment_uri, None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(app.carts.items_for_user(app.user_id).await.unwrap().len(), 2);

    // Delivery restored: the same order settles on retry.
    app.notifier.set_failing(false);
    let (status, _) = send_json(&app.router, "POST", &payment_uri, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_order_payment_is_not_found() {
    let app = test_app();

    let uri = format!("/orders/{}/payment", Uuid::new_v4());
    let (status, _) = send_json(&app.router, "POST", &uri, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.notifier.sent_count(), 0);
}
