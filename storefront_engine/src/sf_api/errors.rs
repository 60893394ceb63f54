use thiserror::Error;

use crate::{
    db_types::{AddressId, OrderId, OrderStatusType, ProductId, Role},
    sf_api::buyer_locks::LockTimeout,
};

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("This operation requires one of the roles {required:?}, but the caller is a {actual}")]
    RoleNotAllowed { required: Vec<Role>, actual: Role },
}

#[derive(Debug, Clone, Error)]
pub enum CatalogApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The storage layer is unavailable. {0}")]
    Unavailable(String),
    #[error("Product {0} does not exist")]
    ProductNotFound(ProductId),
    #[error("Invalid product. {0}")]
    InvalidProduct(String),
}

#[derive(Debug, Clone, Error)]
pub enum CartApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The storage layer is unavailable. {0}")]
    Unavailable(String),
    #[error("Product {0} does not exist")]
    ProductNotFound(ProductId),
    #[error("Invalid cart. {0}")]
    InvalidQuantity(String),
}

#[derive(Debug, Clone, Error)]
pub enum AddressApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The storage layer is unavailable. {0}")]
    Unavailable(String),
    #[error("Address {0} does not exist")]
    AddressNotFound(AddressId),
    #[error("Address {0} is used by an existing order and cannot be deleted")]
    AddressInUse(AddressId),
    #[error("Invalid address. {0}")]
    InvalidAddress(String),
}

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The storage layer is unavailable. {0}")]
    Unavailable(String),
    #[error("The cart is empty")]
    EmptyCart,
    #[error("Address {0} does not exist")]
    AddressNotFound(AddressId),
    #[error("Product {0} does not exist")]
    ProductNotFound(ProductId),
    #[error("{name} (product {id}) is out of stock")]
    OutOfStock { id: ProductId, name: String },
    #[error("The cart changed while the order was being placed. Please try again.")]
    CartChanged,
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("An order cannot move from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatusType, to: OrderStatusType },
    #[error("The order total could not be computed. {0}")]
    PricingError(String),
}

impl From<LockTimeout> for CartApiError {
    fn from(e: LockTimeout) -> Self {
        Self::Unavailable(format!("Timed out after {:?} waiting for the cart lock", e.0))
    }
}

impl From<LockTimeout> for OrderFlowError {
    fn from(e: LockTimeout) -> Self {
        Self::Unavailable(format!("Timed out after {:?} waiting for the cart lock", e.0))
    }
}
