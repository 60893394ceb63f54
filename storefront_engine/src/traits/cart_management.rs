use crate::{
    db_types::{ActorId, Cart, CartItems},
    sf_api::errors::CartApiError,
};

#[allow(async_fn_in_trait)]
pub trait CartManagement {
    /// Returns the buyer's cart. A buyer that has never written a cart gets an empty one.
    async fn fetch_cart(&self, buyer: &ActorId) -> Result<Cart, CartApiError>;

    /// Replaces the buyer's whole cart with `items`.
    ///
    /// Every product id in `items` must exist in the catalog, otherwise the call fails with
    /// [`CartApiError::ProductNotFound`] and the stored cart is left untouched. `items` has already been normalised, so
    /// every quantity is positive.
    async fn replace_cart(&self, buyer: &ActorId, items: CartItems) -> Result<Cart, CartApiError>;
}
