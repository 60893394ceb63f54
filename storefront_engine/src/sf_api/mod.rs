//! The storefront's public API.
//!
//! Each API is a thin struct over a backend `B` that implements the matching trait from [`crate::traits`]. The APIs
//! own the rules that do not depend on storage: input normalisation and validation, per-buyer serialisation and event
//! publication.
pub mod address_api;
pub mod buyer_locks;
pub mod cart_api;
pub mod catalog_api;
pub mod errors;
pub mod order_flow_api;
pub mod order_objects;
