//! Storefront Engine
//!
//! The storefront engine holds the core logic of a small online shop: a product catalog, one cart per buyer, a
//! per-buyer address book and cash-on-delivery checkout. It knows nothing about HTTP.
//!
//! The library is divided into two main sections:
//! 1. Storage ([`mod@traits`] and [`mod@sqlite`]). The traits define what a backend must provide; `SqliteDatabase` is
//!    the backend that ships with the engine. The data types stored by the backends live in [`mod@db_types`].
//! 2. The public API ([`CatalogApi`], [`CartApi`], [`AddressApi`] and [`OrderFlowApi`]). Callers should only go
//!    through these. They normalise input, serialise writes per buyer with [`BuyerLocks`] and publish events.
//!
//! The engine emits events when orders are placed or change status. See [`mod@events`] for how to hook into them.
pub mod db_types;
pub mod events;
mod sf_api;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;

#[cfg(feature = "test_utils")]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use sf_api::{
    address_api::AddressApi,
    buyer_locks::{BuyerGuard, BuyerLocks, LockTimeout},
    cart_api::CartApi,
    catalog_api::CatalogApi,
    errors::{AddressApiError, AuthApiError, CartApiError, CatalogApiError, OrderFlowError},
    order_flow_api::OrderFlowApi,
    order_objects,
};
pub use traits::{AddressManagement, CartManagement, CatalogManagement, OrderManagement, PlaceOrderResult};
