use cucumber::given;
use storefront_engine::db_types::ActorId;

use crate::{
    cucumber::{storefront_world::StorefrontSystem, StorefrontWorld},
    support::Storefront,
};

#[given("a fresh install")]
async fn fresh_database(world: &mut StorefrontWorld) {
    let store = Storefront::new().await;
    for product in [&store.seeded.apples, &store.seeded.milk, &store.seeded.bread] {
        world.products.insert(product.name.clone(), product.id);
    }
    world.system = Some(StorefrontSystem { store });
}

#[given(expr = "a product {string} priced at {int}")]
async fn product_without_offer(world: &mut StorefrontWorld, name: String, price: i64) {
    let product = world.store().add_product(&name, price, None).await;
    world.products.insert(name, product.id);
}

#[given(expr = "a product {string} priced at {int} with an offer price of {int}")]
async fn product_with_offer(world: &mut StorefrontWorld, name: String, price: i64, offer: i64) {
    let product = world.store().add_product(&name, price, Some(offer)).await;
    world.products.insert(name, product.id);
}

#[given(expr = "'{word}' has a delivery address")]
async fn buyer_address(world: &mut StorefrontWorld, buyer: String) {
    let buyer = ActorId::new(buyer);
    let address = world.store().add_address(&buyer).await;
    world.addresses.insert(buyer.as_str().to_string(), address.id);
}
