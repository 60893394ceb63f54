use std::time::Duration;

use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

use crate::{
    db_types::{Money, NewProduct, Product},
    sqlite::db::products,
    SqliteDatabase,
};

pub async fn prepare_test_env(url: &str) {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    create_database(url).await;
    run_migrations(url).await;
}

pub fn random_db_path() -> String {
    let dir = std::env::temp_dir();
    format!("sqlite://{}/sf_test_store_{}.db", dir.display(), rand::random::<u64>())
}

pub async fn run_migrations(url: &str) {
    let db = SqliteDatabase::new_with_url(url, 5, Duration::from_secs(5))
        .await
        .expect("Error creating connection to database");
    db.migrate().await.expect("Error running DB migrations");
    db.close().await;
    info!("🚀️ Migrations complete");
}

pub async fn create_database(url: &str) {
    if let Err(e) = Sqlite::drop_database(url).await {
        warn!("Error dropping database {url}: {e:?}");
    }
    Sqlite::create_database(url).await.expect("Error creating database");
    info!("Created Sqlite database {url}");
}

/// The products inserted by [`seed_products`].
#[derive(Debug, Clone)]
pub struct SeededProducts {
    pub apples: Product,
    pub milk: Product,
    pub bread: Product,
}

/// Inserts the demo catalogue, priced in whole currency units.
pub async fn seed_products(db: &SqliteDatabase) -> SeededProducts {
    let mut conn = db.pool().acquire().await.expect("Error acquiring a connection");
    let apples = NewProduct::new("Apples", "Fruits", Money::from_major_units(120))
        .with_offer_price(Money::from_major_units(99))
        .with_description("Fresh and juicy")
        .with_description("Rich in fiber");
    let milk = NewProduct::new("Milk", "Dairy", Money::from_major_units(60))
        .with_offer_price(Money::from_major_units(50))
        .with_description("Pure and fresh")
        .with_description("Rich in calcium");
    let bread = NewProduct::new("Bread", "Bakery", Money::from_major_units(40))
        .with_offer_price(Money::from_major_units(35))
        .with_description("Whole wheat")
        .with_description("Baked fresh daily");
    let apples = products::insert_product(apples, &mut conn).await.expect("Error seeding apples");
    let milk = products::insert_product(milk, &mut conn).await.expect("Error seeding milk");
    let bread = products::insert_product(bread, &mut conn).await.expect("Error seeding bread");
    SeededProducts { apples, milk, bread }
}
