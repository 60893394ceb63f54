use actix_web::{http::StatusCode, web, web::ServiceConfig};
use serde_json::json;
use storefront_engine::{
    db_types::{AddressId, OrderId, OrderStatusType, ProductId},
    events::EventProducers,
    BuyerLocks,
    OrderFlowApi,
    OrderFlowError,
    PlaceOrderResult,
};

use super::{helpers::*, mocks::MockOrderManager};
use crate::routes::{AllOrdersRoute, MyOrdersRoute, PlaceCodOrderRoute, UpdateOrderStatusRoute};

fn configure(orders: MockOrderManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(OrderFlowApi::new(orders, BuyerLocks::default(), EventProducers::default())))
            .service(PlaceCodOrderRoute::<MockOrderManager>::new())
            .service(MyOrdersRoute::<MockOrderManager>::new())
            .service(AllOrdersRoute::<MockOrderManager>::new())
            .service(UpdateOrderStatusRoute::<MockOrderManager>::new());
    }
}

fn checkout(token: &str) -> actix_web::test::TestRequest {
    post_request("/order/cod", token, &json!({"addressId": 1}))
}

#[actix_web::test]
async fn place_cod_order() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders
        .expect_place_cod_order()
        .withf(|buyer, req| buyer.as_str() == "alice" && req.address_id == AddressId(1) && req.idempotency_key.is_none())
        .times(1)
        .returning(|buyer, _| Ok(PlaceOrderResult::Placed(order(10, buyer.as_str(), OrderStatusType::Placed))));
    let (status, body) = send_request(checkout(&buyer_token("alice")), configure(orders)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let order: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["id"], 10);
    assert_eq!(order["amount"], 230);
    assert_eq!(order["status"], "Order Placed");
    assert_eq!(order["paymentType"], "COD");
    assert_eq!(order["isPaid"], false);
    assert_eq!(order["items"].as_array().map(Vec::len), Some(2));
}

#[actix_web::test]
async fn replayed_checkout_returns_the_original_order() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders
        .expect_place_cod_order()
        .withf(|_, req| req.idempotency_key.as_deref() == Some("k-1"))
        .returning(|buyer, _| Ok(PlaceOrderResult::AlreadyPlaced(order(10, buyer.as_str(), OrderStatusType::Placed))));
    let req = post_request("/order/cod", &buyer_token("alice"), &json!({"addressId": 1, "idempotencyKey": "k-1"}));
    let (status, body) = send_request(req, configure(orders)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""id":10"#), "{body}");
}

#[actix_web::test]
async fn empty_cart_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders.expect_place_cod_order().returning(|_, _| Err(OrderFlowError::EmptyCart));
    let (status, body) = send_request(checkout(&buyer_token("alice")), configure(orders)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"success":false,"message":"Invalid request. The cart is empty"}"#);
}

#[actix_web::test]
async fn out_of_stock_is_a_conflict() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders
        .expect_place_cod_order()
        .returning(|_, _| Err(OrderFlowError::OutOfStock { id: ProductId(2), name: "Milk".into() }));
    let (status, body) = send_request(checkout(&buyer_token("alice")), configure(orders)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("Milk (product 2) is out of stock"), "{body}");
}

#[actix_web::test]
async fn overflowing_total_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders
        .expect_place_cod_order()
        .returning(|_, _| Err(OrderFlowError::PricingError("The total overflowed at product 1".into())));
    let (status, body) = send_request(checkout(&buyer_token("alice")), configure(orders)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("overflowed"), "{body}");
}

#[actix_web::test]
async fn unknown_address_is_not_found() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders.expect_place_cod_order().returning(|_, req| Err(OrderFlowError::AddressNotFound(req.address_id)));
    let (status, _) = send_request(checkout(&buyer_token("alice")), configure(orders)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn missing_address_id_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders.expect_place_cod_order().never();
    let req = post_request("/order/cod", &buyer_token("alice"), &json!({"paymentType": "COD"}));
    let (status, _) = send_request(req, configure(orders)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn sellers_cannot_check_out() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders.expect_place_cod_order().never();
    let (status, _) = send_request(checkout(&seller_token("sam")), configure(orders)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn fetch_my_orders() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_orders_for_buyer().withf(|buyer| buyer.as_str() == "alice").returning(|buyer| {
        Ok(vec![order(2, buyer.as_str(), OrderStatusType::Shipped), order(1, buyer.as_str(), OrderStatusType::Delivered)])
    });
    let (status, body) = send_request(get_request("/order/user", &buyer_token("alice")), configure(orders)).await;
    assert_eq!(status, StatusCode::OK);
    let list: Vec<serde_json::Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], 2);
    assert_eq!(list[1]["isPaid"], true);
}

#[actix_web::test]
async fn buyers_cannot_see_all_orders() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_all_orders().never();
    let (status, body) = send_request(get_request("/order/seller", &buyer_token("alice")), configure(orders)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("Insufficient Permissions"), "{body}");
}

#[actix_web::test]
async fn sellers_see_all_orders() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_all_orders().returning(|| {
        Ok(vec![order(3, "bob", OrderStatusType::Placed), order(2, "alice", OrderStatusType::Cancelled)])
    });
    let (status, body) = send_request(get_request("/order/seller", &seller_token("sam")), configure(orders)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""buyerId":"bob""#), "{body}");
    assert!(body.contains(r#""buyerId":"alice""#), "{body}");
}

#[actix_web::test]
async fn seller_ships_an_order() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders
        .expect_update_order_status()
        .withf(|id, status| *id == OrderId(4) && *status == OrderStatusType::Shipped)
        .returning(|id, status| Ok((order(id.as_i64(), "alice", OrderStatusType::Placed), order(id.as_i64(), "alice", status))));
    let req = post_request("/order/status", &seller_token("sam"), &json!({"orderId": 4, "status": "Shipped"}));
    let (status, body) = send_request(req, configure(orders)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body.contains(r#""status":"Shipped""#), "{body}");
}

#[actix_web::test]
async fn terminal_orders_cannot_move() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders.expect_update_order_status().returning(|_, to| {
        Err(OrderFlowError::InvalidStatusTransition { from: OrderStatusType::Delivered, to })
    });
    let req = post_request("/order/status", &seller_token("sam"), &json!({"orderId": 4, "status": "Cancelled"}));
    let (status, body) = send_request(req, configure(orders)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("cannot move from Delivered to Cancelled"), "{body}");
}

#[actix_web::test]
async fn unknown_status_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders.expect_update_order_status().never();
    let req = post_request("/order/status", &seller_token("sam"), &json!({"orderId": 4, "status": "Lost"}));
    let (status, _) = send_request(req, configure(orders)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
