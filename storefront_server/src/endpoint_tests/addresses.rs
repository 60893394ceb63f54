use actix_web::{http::StatusCode, web, web::ServiceConfig};
use serde_json::json;
use storefront_engine::{db_types::AddressId, AddressApi, AddressApiError};

use super::{helpers::*, mocks::MockAddressManager};
use crate::routes::{AddAddressRoute, DeleteAddressRoute, MyAddressesRoute};

fn configure(addresses: MockAddressManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(AddressApi::new(addresses)))
            .service(AddAddressRoute::<MockAddressManager>::new())
            .service(MyAddressesRoute::<MockAddressManager>::new())
            .service(DeleteAddressRoute::<MockAddressManager>::new());
    }
}

fn new_address(street: &str) -> serde_json::Value {
    json!({
        "address": {
            "firstName": "Alice",
            "lastName": "Smith",
            "email": "alice@example.com",
            "street": street,
            "city": "Springfield",
            "state": "IL",
            "zipCode": "62701",
            "country": "US",
            "phone": "555-0100"
        }
    })
}

#[actix_web::test]
async fn add_address() {
    let _ = env_logger::try_init().ok();
    let mut addresses = MockAddressManager::new();
    addresses
        .expect_insert_address()
        .withf(|buyer, a| buyer.as_str() == "alice" && a.street == "1 Main St")
        .returning(|buyer, _| Ok(address(3, buyer.as_str())));
    let req = post_request("/address/add", &buyer_token("alice"), &new_address("1 Main St"));
    let (status, body) = send_request(req, configure(addresses)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body.contains(r#""id":3"#), "{body}");
    assert!(body.contains(r#""buyerId":"alice""#), "{body}");
}

#[actix_web::test]
async fn blank_fields_are_rejected() {
    let _ = env_logger::try_init().ok();
    let mut addresses = MockAddressManager::new();
    addresses.expect_insert_address().never();
    let req = post_request("/address/add", &buyer_token("alice"), &new_address("   "));
    let (status, body) = send_request(req, configure(addresses)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Missing address fields: street"), "{body}");
}

#[actix_web::test]
async fn list_my_addresses() {
    let _ = env_logger::try_init().ok();
    let mut addresses = MockAddressManager::new();
    addresses
        .expect_fetch_addresses()
        .withf(|buyer| buyer.as_str() == "bob")
        .returning(|buyer| Ok(vec![address(1, buyer.as_str()), address(2, buyer.as_str())]));
    let (status, body) = send_request(get_request("/address/get", &buyer_token("bob")), configure(addresses)).await;
    assert_eq!(status, StatusCode::OK);
    let list: Vec<serde_json::Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|a| a["buyerId"] == "bob"));
}

#[actix_web::test]
async fn delete_address() {
    let _ = env_logger::try_init().ok();
    let mut addresses = MockAddressManager::new();
    addresses
        .expect_delete_address()
        .withf(|buyer, id| buyer.as_str() == "alice" && *id == AddressId(5))
        .returning(|_, _| Ok(()));
    let (status, body) = send_request(delete_request("/address/5", &buyer_token("alice")), configure(addresses)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Address 5 deleted"}"#);
}

#[actix_web::test]
async fn delete_someone_elses_address() {
    let _ = env_logger::try_init().ok();
    let mut addresses = MockAddressManager::new();
    addresses.expect_delete_address().returning(|_, id| Err(AddressApiError::AddressNotFound(id)));
    let (status, body) = send_request(delete_request("/address/5", &buyer_token("mallory")), configure(addresses)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Address 5 does not exist"), "{body}");
}

#[actix_web::test]
async fn delete_address_used_by_an_order() {
    let _ = env_logger::try_init().ok();
    let mut addresses = MockAddressManager::new();
    addresses.expect_delete_address().returning(|_, id| Err(AddressApiError::AddressInUse(id)));
    let (status, body) = send_request(delete_request("/address/5", &buyer_token("alice")), configure(addresses)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("used by an existing order"), "{body}");
}

#[actix_web::test]
async fn sellers_have_no_address_book() {
    let _ = env_logger::try_init().ok();
    let mut addresses = MockAddressManager::new();
    addresses.expect_fetch_addresses().never();
    let (status, _) = send_request(get_request("/address/get", &seller_token("sam")), configure(addresses)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
