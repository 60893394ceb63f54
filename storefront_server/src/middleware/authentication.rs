//! Authentication middleware.
//!
//! Looks for an access token on every request it wraps (see [`token_from_request`]). A valid token is decoded and its
//! [`JwtClaims`] are placed in the request extensions for the handlers and the ACL middleware to use. Requests without
//! a valid token pass through anonymously; the routes that need an identity reject them later with a 401.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
    HttpMessage,
};
use futures::future::LocalBoxFuture;
use log::*;

use crate::auth::{token_from_request, TokenVerifier};

pub struct AuthenticationMiddlewareFactory {
    verifier: Rc<TokenVerifier>,
}

impl AuthenticationMiddlewareFactory {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier: Rc::new(verifier) }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthenticationMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = AuthenticationMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticationMiddlewareService { verifier: Rc::clone(&self.verifier), service: Rc::new(service) }))
    }
}

pub struct AuthenticationMiddlewareService<S> {
    verifier: Rc<TokenVerifier>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match token_from_request(req.request()).map(|token| self.verifier.verify(&token)) {
            Some(Ok(claims)) => {
                trace!("🔐️ Request authenticated as {} ({})", claims.sub, claims.role);
                req.extensions_mut().insert(claims);
            },
            Some(Err(e)) => debug!("🔐️ Ignoring access token on {}. {e}", req.path()),
            None => trace!("🔐️ Anonymous request to {}", req.path()),
        }
        let service = Rc::clone(&self.service);
        Box::pin(async move { service.call(req).await })
    }
}
