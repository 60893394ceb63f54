//! # Backend contracts
//!
//! These traits define what a storage backend has to provide for the storefront APIs to work on top of it.
//!
//! * [`CatalogManagement`] stores products. Everything else only reads from it.
//! * [`CartManagement`] holds one mutable cart per buyer.
//! * [`AddressManagement`] is a per-buyer address book.
//! * [`OrderManagement`] turns a cart into an order. Placement must be atomic: the order insert and the cart clear
//!   either both happen or neither does.
//!
//! Serialisation of writes per buyer is handled above the backend, in [`crate::BuyerLocks`].
mod address_management;
mod cart_management;
mod catalog_management;
mod order_management;

pub use address_management::AddressManagement;
pub use cart_management::CartManagement;
pub use catalog_management::CatalogManagement;
pub use order_management::{OrderManagement, PlaceOrderResult};
