#![allow(dead_code)]

use std::time::Duration;

use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};
use storefront_engine::{
    db_types::{ActorId, Address, CartItems, Money, NewAddress, NewProduct, Product, ProductId},
    events::EventProducers,
    test_utils::{prepare_test_env, random_db_path, seed_products, SeededProducts},
    AddressApi,
    BuyerLocks,
    CartApi,
    CatalogApi,
    OrderFlowApi,
    SqliteDatabase,
};

/// A full set of engine APIs over a throwaway database.
pub struct Storefront {
    pub url: String,
    pub db: SqliteDatabase,
    pub catalog: CatalogApi<SqliteDatabase>,
    pub carts: CartApi<SqliteDatabase>,
    pub addresses: AddressApi<SqliteDatabase>,
    pub orders: OrderFlowApi<SqliteDatabase>,
    pub seeded: SeededProducts,
}

impl Storefront {
    pub async fn new() -> Self {
        Self::with_producers(EventProducers::default()).await
    }

    pub async fn with_producers(producers: EventProducers) -> Self {
        let url = random_db_path();
        prepare_test_env(&url).await;
        let db = SqliteDatabase::new_with_url(&url, 5, Duration::from_secs(5))
            .await
            .expect("Error creating connection to database");
        let seeded = seed_products(&db).await;
        let locks = BuyerLocks::new(Duration::from_secs(5));
        Self {
            url,
            catalog: CatalogApi::new(db.clone()),
            carts: CartApi::new(db.clone(), locks.clone()),
            addresses: AddressApi::new(db.clone()),
            orders: OrderFlowApi::new(db.clone(), locks, producers),
            db,
            seeded,
        }
    }

    pub async fn add_product(&self, name: &str, price: i64, offer_price: Option<i64>) -> Product {
        let mut product = NewProduct::new(name, "Test", Money::from(price));
        if let Some(offer) = offer_price {
            product = product.with_offer_price(Money::from(offer));
        }
        self.catalog.add_product(product).await.expect("Error adding product")
    }

    pub async fn add_address(&self, buyer: &ActorId) -> Address {
        self.addresses.add_address(buyer, new_address(buyer.as_str())).await.expect("Error adding address")
    }

    pub async fn fill_cart(&self, buyer: &ActorId, items: &[(ProductId, i64)]) {
        let items = items.iter().copied().collect::<CartItems>();
        self.carts.update_cart(buyer, items).await.expect("Error updating cart");
    }

    pub async fn tear_down(self) {
        self.db.close().await;
        if let Err(e) = Sqlite::drop_database(&self.url).await {
            warn!("🚀️ Could not remove test database {}: {e}", self.url);
        }
    }
}

pub fn new_address(name: &str) -> NewAddress {
    NewAddress {
        first_name: name.to_string(),
        last_name: "Tester".into(),
        email: format!("{name}@example.com"),
        street: "42 Market Street".into(),
        city: "Springfield".into(),
        state: "IL".into(),
        zip_code: "62701".into(),
        country: "US".into(),
        phone: "555-0100".into(),
    }
}

pub fn cart_items(items: &[(ProductId, i64)]) -> CartItems {
    items.iter().copied().collect()
}
