use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{check_cart_quantities, normalize_cart_items, ActorId, Cart, CartItems},
    sf_api::{buyer_locks::BuyerLocks, errors::CartApiError},
    traits::CartManagement,
};

/// `CartApi` manages each buyer's pre-order cart.
///
/// A cart update is a *replacement*: the client always sends the full desired state of the cart. Stock is not checked
/// here; that happens when the order is placed.
pub struct CartApi<B> {
    db: B,
    locks: BuyerLocks,
}

impl<B> Debug for CartApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CartApi ({:?})", self.locks)
    }
}

impl<B> CartApi<B> {
    /// `locks` must be the same instance handed to the [`crate::OrderFlowApi`] so that cart edits and checkouts for a
    /// buyer are serialised against each other.
    pub fn new(db: B, locks: BuyerLocks) -> Self {
        Self { db, locks }
    }
}

impl<B> CartApi<B>
where B: CartManagement
{
    pub async fn cart(&self, buyer: &ActorId) -> Result<Cart, CartApiError> {
        self.db.fetch_cart(buyer).await
    }

    /// Replaces the buyer's cart with `items`, after dropping entries with a quantity of zero or less.
    pub async fn update_cart(&self, buyer: &ActorId, items: CartItems) -> Result<Cart, CartApiError> {
        let items = normalize_cart_items(items);
        check_cart_quantities(&items).map_err(CartApiError::InvalidQuantity)?;
        let _guard = self.locks.lock(buyer).await?;
        trace!("🛒️ Replacing the cart of {buyer} with {} entries", items.len());
        let cart = self.db.replace_cart(buyer, items).await?;
        debug!("🛒️ Cart for {buyer} updated to version {}", cart.version);
        Ok(cart)
    }
}
