use std::time::Duration;

use actix_web::{http::StatusCode, test::TestRequest, web::ServiceConfig};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use log::*;
use storefront_engine::db_types::{Actor, Role};

use super::helpers::*;
use crate::{
    auth::{JwtClaims, TokenIssuer},
    config::AuthConfig,
    routes::CheckTokenRoute,
};

fn configure(cfg: &mut ServiceConfig) {
    cfg.service(CheckTokenRoute::new());
}

#[actix_web::test]
async fn check_token_without_credentials() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send_request(get_request("/auth/check", ""), configure).await;
    info!("Response body: {body}");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"success":false,"message":"Authentication Error. No access token was provided."}"#);
}

#[actix_web::test]
async fn check_token_with_cookie() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send_request(get_request("/auth/check", &buyer_token("alice")), configure).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"id":"alice","role":"buyer"}"#);
}

#[actix_web::test]
async fn check_token_with_header() {
    let _ = env_logger::try_init().ok();
    let req = with_header(TestRequest::get().uri("/auth/check"), &seller_token("sam"));
    let (status, body) = send_request(req, configure).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"id":"sam","role":"seller"}"#);
}

#[actix_web::test]
async fn cookie_takes_precedence_over_header() {
    let _ = env_logger::try_init().ok();
    let req = with_header(get_request("/auth/check", &buyer_token("alice")), &seller_token("sam"));
    let (status, body) = send_request(req, configure).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"id":"alice","role":"buyer"}"#);
}

#[actix_web::test]
async fn forged_token_is_rejected() {
    let _ = env_logger::try_init().ok();
    let forger = AuthConfig::new("not-the-server-secret-but-long-enough", Duration::from_secs(3600));
    let token = TokenIssuer::new(&forger).issue_token(&Actor::seller("mallory")).unwrap();
    let (status, body) = send_request(get_request("/auth/check", &token), configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains(r#""success":false"#), "{body}");
}

#[actix_web::test]
async fn garbage_token_is_rejected() {
    let _ = env_logger::try_init().ok();
    let (status, _) = send_request(get_request("/auth/check", "made up nonsense"), configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn expired_token_is_rejected() {
    let _ = env_logger::try_init().ok();
    let now = Utc::now().timestamp();
    let expired = JwtClaims { sub: "alice".into(), role: Role::Buyer, iat: now - 7200, exp: now - 3600 };
    let key = EncodingKey::from_secret(get_auth_config().jwt_secret.reveal().as_bytes());
    let token = encode(&Header::default(), &expired, &key).unwrap();
    let (status, body) = send_request(get_request("/auth/check", &token), configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("No access token was provided"), "{body}");
}
