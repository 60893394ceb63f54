use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{ActorId, Order, OrderId, OrderStatusType},
    events::{EventProducers, OrderPlacedEvent, OrderStatusChangedEvent},
    sf_api::{buyer_locks::BuyerLocks, errors::OrderFlowError, order_objects::CodOrderRequest},
    traits::{OrderManagement, PlaceOrderResult},
};

/// `OrderFlowApi` turns carts into cash-on-delivery orders and moves orders through fulfilment.
///
/// Orders are price-immutable: the unit price of every line is captured when the order is placed and never recomputed.
pub struct OrderFlowApi<B> {
    db: B,
    locks: BuyerLocks,
    producers: EventProducers,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi ({:?})", self.locks)
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, locks: BuyerLocks, producers: EventProducers) -> Self {
        Self { db, locks, producers }
    }
}

impl<B> OrderFlowApi<B>
where B: OrderManagement
{
    /// Places a cash-on-delivery order for everything in the buyer's cart and empties the cart.
    ///
    /// The buyer's cart lock is held throughout, so no cart update can interleave with the checkout. Repeating a request
    /// with the same idempotency key returns the original order. Repeating one without a key fails with
    /// [`OrderFlowError::EmptyCart`], since the first attempt emptied the cart.
    pub async fn place_order_cod(&self, buyer: &ActorId, request: CodOrderRequest) -> Result<Order, OrderFlowError> {
        let guard = self.locks.lock(buyer).await?;
        trace!("📦️ Placing a COD order for {buyer} to address #{}", request.address_id);
        let result = self.db.place_cod_order(buyer, request).await;
        // Events are published outside the buyer lock.
        drop(guard);
        let result = result?;
        match result {
            PlaceOrderResult::Placed(order) => {
                info!("📦️ Order #{} placed by {buyer} for {} ({} lines)", order.id, order.amount, order.items.len());
                self.call_order_placed_hook(&order).await;
                Ok(order)
            },
            PlaceOrderResult::AlreadyPlaced(order) => {
                debug!("📦️ Idempotent replay for {buyer}. Returning order #{}", order.id);
                Ok(order)
            },
        }
    }

    /// The buyer's own orders, newest first.
    pub async fn orders_for_buyer(&self, buyer: &ActorId) -> Result<Vec<Order>, OrderFlowError> {
        self.db.fetch_orders_for_buyer(buyer).await
    }

    /// All orders across all buyers, newest first.
    pub async fn all_orders(&self) -> Result<Vec<Order>, OrderFlowError> {
        self.db.fetch_all_orders().await
    }

    pub async fn order(&self, id: OrderId) -> Result<Order, OrderFlowError> {
        self.db.fetch_order(id).await?.ok_or(OrderFlowError::OrderNotFound(id))
    }

    /// Moves an order along the fulfilment state machine. `Delivered` and `Cancelled` are terminal.
    pub async fn update_order_status(&self, id: OrderId, status: OrderStatusType) -> Result<Order, OrderFlowError> {
        let (old, new) = self.db.update_order_status(id, status).await?;
        info!("📦️ Order #{id} moved from {} to {}", old.status, new.status);
        self.call_status_changed_hook(old.status, &new).await;
        Ok(new)
    }

    async fn call_order_placed_hook(&self, order: &Order) {
        for emitter in &self.producers.order_placed_producer {
            debug!("📦️ Notifying order placed hook subscribers");
            emitter.publish_event(OrderPlacedEvent::new(order.clone())).await;
        }
    }

    async fn call_status_changed_hook(&self, old_status: OrderStatusType, order: &Order) {
        for emitter in &self.producers.order_status_changed_producer {
            debug!("📦️ Notifying order status hook subscribers");
            emitter.publish_event(OrderStatusChangedEvent::new(old_status, order.clone())).await;
        }
    }
}
