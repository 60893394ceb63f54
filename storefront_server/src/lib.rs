//! # Storefront server
//! The HTTP front end for the storefront engine. It is responsible for:
//! * Authenticating requests from the access token in the `token` cookie (or `sf_access_token` header).
//! * Checking the caller's role against each route's access list.
//! * Handing the request to the engine and rendering the result, or the error, as JSON.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/product/*`: The catalog. Reads are public, writes need the seller role.
//! * `/api/cart`, `/api/cart/update`: The buyer's cart.
//! * `/api/address/*`: The buyer's address book.
//! * `/api/order/*`: Cash-on-delivery checkout, order history and (for sellers) fulfilment.
//! * `/api/auth/check`: Returns the identity in the caller's access token.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
