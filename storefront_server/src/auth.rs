//! Access tokens.
//!
//! Access tokens are HS256 JWTs carrying the actor id (`sub`) and role. Clients send them in the `token` cookie, or in
//! the `sf_access_token` header. This server does not log anyone in: tokens are minted by whatever owns identity, or
//! by the `token` CLI command, using the shared `SF_JWT_SECRET`.
use std::{
    future::{ready, Ready},
    time::Duration,
};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use serde::{Deserialize, Serialize};
use storefront_engine::db_types::{Actor, ActorId, Role};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

pub const TOKEN_COOKIE: &str = "token";
pub const TOKEN_HEADER: &str = "sf_access_token";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: ActorId,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl JwtClaims {
    pub fn actor(&self) -> Actor {
        Actor::new(self.sub.clone(), self.role)
    }
}

/// Handlers that take `JwtClaims` as an argument only run for authenticated requests.
impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<JwtClaims>().cloned();
        ready(claims.ok_or(ServerError::AuthenticationError(AuthError::MissingToken)))
    }
}

#[derive(Debug, Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let key = EncodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        Self { key, lifetime: config.token_lifetime }
    }

    /// Issue a new access token for the given actor, valid for the configured lifetime.
    /// This method DOES NOT check that the actor is who they say they are. That must be done prior to calling it.
    pub fn issue_token(&self, actor: &Actor) -> Result<String, AuthError> {
        self.issue_token_with_lifetime(actor, self.lifetime)
    }

    pub fn issue_token_with_lifetime(&self, actor: &Actor, lifetime: Duration) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let lifetime = i64::try_from(lifetime.as_secs()).map_err(|e| AuthError::SigningError(e.to_string()))?;
        let claims = JwtClaims { sub: actor.id.clone(), role: actor.role, iat: now, exp: now.saturating_add(lifetime) };
        encode(&Header::default(), &claims, &self.key).map_err(|e| AuthError::SigningError(e.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let key = DecodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        Self { key, validation }
    }

    pub fn verify(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let data = decode::<JwtClaims>(token, &self.key, &self.validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::ValidationError(e.to_string()),
        })?;
        trace!("🔐️ Access token verified for {} ({})", data.claims.sub, data.claims.role);
        Ok(data.claims)
    }
}

/// Picks the access token out of a request: the `token` cookie first, then the `sf_access_token` header.
pub fn token_from_request(req: &HttpRequest) -> Option<String> {
    req.cookie(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| req.headers().get(TOKEN_HEADER).and_then(|v| v.to_str().ok()).map(str::to_string))
        .filter(|t| !t.trim().is_empty())
}
