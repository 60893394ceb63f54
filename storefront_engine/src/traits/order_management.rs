use crate::{
    db_types::{ActorId, Order, OrderId, OrderStatusType},
    order_objects::CodOrderRequest,
    sf_api::errors::OrderFlowError,
};

/// The result of a cash-on-delivery checkout.
#[derive(Debug, Clone)]
pub enum PlaceOrderResult {
    /// A new order was created and the cart was cleared.
    Placed(Order),
    /// The idempotency key matched an earlier order. Nothing was written.
    AlreadyPlaced(Order),
}

#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Converts the buyer's cart into a cash-on-delivery order.
    ///
    /// In one atomic unit this
    /// 1. returns the existing order if `request.idempotency_key` was already used by this buyer,
    /// 2. fails with [`OrderFlowError::EmptyCart`] when the cart has no entries,
    /// 3. fails with [`OrderFlowError::AddressNotFound`] unless the address belongs to the buyer,
    /// 4. fails with [`OrderFlowError::ProductNotFound`] or [`OrderFlowError::OutOfStock`] for any unavailable product,
    /// 5. prices every line at the product's current unit price, stores the order and clears the cart.
    ///
    /// If any step fails nothing is written.
    async fn place_cod_order(
        &self,
        buyer: &ActorId,
        request: CodOrderRequest,
    ) -> Result<PlaceOrderResult, OrderFlowError>;

    /// The buyer's orders, newest first.
    async fn fetch_orders_for_buyer(&self, buyer: &ActorId) -> Result<Vec<Order>, OrderFlowError>;

    /// Every order, newest first.
    async fn fetch_all_orders(&self) -> Result<Vec<Order>, OrderFlowError>;

    async fn fetch_order(&self, id: OrderId) -> Result<Option<Order>, OrderFlowError>;

    /// Moves an order to `status`, enforcing the order state machine. Returns the order before and after the change.
    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatusType,
    ) -> Result<(Order, Order), OrderFlowError>;
}
