use cucumber::{then, when};
use storefront_engine::{
    db_types::{ActorId, CartItems, OrderStatusType},
    order_objects::CodOrderRequest,
};

use crate::cucumber::StorefrontWorld;

#[when(expr = "'{word}' puts {int} {string} in the cart")]
async fn add_to_cart(world: &mut StorefrontWorld, buyer: String, quantity: i64, product: String) {
    let buyer = ActorId::new(buyer);
    let id = world.product(&product);
    let carts = &world.store().carts;
    let mut items = carts.cart(&buyer).await.expect("Error fetching cart").items;
    *items.entry(id).or_default() += quantity;
    carts.update_cart(&buyer, items).await.expect("Error updating cart");
}

#[when(expr = "'{word}' empties the cart")]
async fn empty_cart(world: &mut StorefrontWorld, buyer: String) {
    let buyer = ActorId::new(buyer);
    world.store().carts.update_cart(&buyer, CartItems::new()).await.expect("Error emptying cart");
}

#[when(expr = "product {string} goes out of stock")]
async fn out_of_stock(world: &mut StorefrontWorld, product: String) {
    let id = world.product(&product);
    world.store().catalog.set_stock(id, false).await.expect("Error updating stock");
}

#[when(expr = "product {string} is repriced to {int}")]
async fn reprice(world: &mut StorefrontWorld, product: String, price: i64) {
    let id = world.product(&product);
    world.store().catalog.set_price(id, price.into(), None).await.expect("Error updating price");
}

async fn checkout(world: &mut StorefrontWorld, buyer: String, key: Option<String>) {
    let buyer = ActorId::new(buyer);
    let mut request = CodOrderRequest::new(world.address(&buyer));
    if let Some(key) = key {
        request = request.with_idempotency_key(key);
    }
    let result = world.store().orders.place_order_cod(&buyer, request).await;
    match result {
        Ok(order) => {
            world.last_order = Some(order);
            world.last_error = None;
        },
        Err(e) => world.last_error = Some(e.to_string()),
    }
}

#[when(expr = "'{word}' checks out with cash on delivery")]
async fn place_cod_order(world: &mut StorefrontWorld, buyer: String) {
    checkout(world, buyer, None).await;
}

#[when(expr = "'{word}' checks out with cash on delivery using key {string}")]
async fn place_cod_order_with_key(world: &mut StorefrontWorld, buyer: String, key: String) {
    checkout(world, buyer, Some(key)).await;
}

#[when(expr = "the seller marks the order as {string}")]
async fn mark_order(world: &mut StorefrontWorld, status: String) {
    let status = status.parse::<OrderStatusType>().expect("Not a valid order status");
    let id = world.last_order().id;
    let result = world.store().orders.update_order_status(id, status).await;
    match result {
        Ok(order) => {
            world.last_order = Some(order);
            world.last_error = None;
        },
        Err(e) => world.last_error = Some(e.to_string()),
    }
}

#[then(expr = "the order total is {int}")]
async fn order_total(world: &mut StorefrontWorld, total: i64) {
    assert_eq!(world.last_order().amount.value(), total, "Order total is incorrect");
}

#[then(expr = "the order has {int} line(s)")]
async fn order_lines(world: &mut StorefrontWorld, lines: usize) {
    assert_eq!(world.last_order().items.len(), lines);
}

#[then(expr = "the order status is {string}")]
async fn order_status(world: &mut StorefrontWorld, status: String) {
    assert_eq!(world.last_order().status.to_string(), status);
}

#[then("the order is paid")]
async fn order_paid(world: &mut StorefrontWorld) {
    assert!(world.last_order().is_paid, "Order is not paid");
}

#[then("the order is not paid")]
async fn order_not_paid(world: &mut StorefrontWorld) {
    assert!(!world.last_order().is_paid, "Order is already paid");
}

#[then(expr = "the stored order total is still {int}")]
async fn stored_order_total(world: &mut StorefrontWorld, total: i64) {
    let id = world.last_order().id;
    let order = world.store().orders.order(id).await.expect("Error fetching order");
    assert_eq!(order.amount.value(), total);
}

#[then(expr = "the request fails with {string}")]
async fn request_failed(world: &mut StorefrontWorld, message: String) {
    let err = world.last_error.as_deref().expect("The request did not fail");
    assert!(err.contains(&message), "Expected an error containing '{message}', got '{err}'");
}

#[then(expr = "the cart for '{word}' is empty")]
async fn cart_is_empty(world: &mut StorefrontWorld, buyer: String) {
    let cart = world.store().carts.cart(&ActorId::new(buyer)).await.expect("Error fetching cart");
    assert!(cart.is_empty(), "Cart still holds {:?}", cart.items);
}

#[then(expr = "the cart for '{word}' holds {int} {string}")]
async fn cart_holds(world: &mut StorefrontWorld, buyer: String, quantity: i64, product: String) {
    let id = world.product(&product);
    let cart = world.store().carts.cart(&ActorId::new(buyer)).await.expect("Error fetching cart");
    assert_eq!(cart.items.get(&id).copied(), Some(quantity), "Cart holds {:?}", cart.items);
}

#[then(expr = "'{word}' has {int} order(s)")]
async fn order_count(world: &mut StorefrontWorld, buyer: String, count: usize) {
    let orders = world.store().orders.orders_for_buyer(&ActorId::new(buyer)).await.expect("Error fetching orders");
    assert_eq!(orders.len(), count);
}

#[then(expr = "the seller sees {int} order(s)")]
async fn seller_order_count(world: &mut StorefrontWorld, count: usize) {
    let orders = world.store().orders.all_orders().await.expect("Error fetching orders");
    assert_eq!(orders.len(), count);
}
