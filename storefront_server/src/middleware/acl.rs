//! Access control list middleware.
//!
//! Placed on individual routes by the `route!` macro. It expects [`AuthenticationMiddlewareFactory`] further out in the
//! stack. Requests without claims are rejected with a 401, and requests whose role is not in the route's list with a
//! 403.
//!
//! [`AuthenticationMiddlewareFactory`]: super::AuthenticationMiddlewareFactory

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
use storefront_engine::db_types::Role;

use crate::{
    auth::JwtClaims,
    errors::{AuthError, ServerError},
};

pub struct AclMiddlewareFactory {
    allowed_roles: Vec<Role>,
}

impl AclMiddlewareFactory {
    pub fn new(allowed_roles: &[Role]) -> Self {
        AclMiddlewareFactory { allowed_roles: allowed_roles.to_vec() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = AclMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AclMiddlewareService { allowed_roles: self.allowed_roles.clone(), service: Rc::new(service) }))
    }
}

pub struct AclMiddlewareService<S> {
    allowed_roles: Vec<Role>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
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
        let service = Rc::clone(&self.service);
        let claims = req.extensions().get::<JwtClaims>().cloned();
        let check = match claims {
            None => {
                debug!("🔐️ No access token for {}", req.path());
                Err(ServerError::AuthenticationError(AuthError::MissingToken))
            },
            Some(claims) => claims.actor().require_any_role(&self.allowed_roles).map(|_| ()).map_err(|e| {
                debug!("🔐️ {} denied access to {}. {e}", claims.sub, req.path());
                ServerError::from(e)
            }),
        };
        Box::pin(async move {
            check?;
            service.call(req).await
        })
    }
}
