use std::collections::HashMap;

use log::*;
use sqlx::{sqlite::SqliteRow, FromRow, QueryBuilder, Row, Sqlite, SqliteConnection};

use super::json_column;
use crate::{
    db_types::{Money, NewProduct, Product, ProductId},
    sqlite::errors::SqliteDatabaseError,
};

impl FromRow<'_, SqliteRow> for Product {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            category: row.try_get("category")?,
            description: json_column(row, "description")?,
            price: row.try_get("price")?,
            offer_price: row.try_get("offer_price")?,
            images: json_column(row, "images")?,
            in_stock: row.try_get("in_stock")?,
            rating: row.try_get("rating")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

pub async fn fetch_products(conn: &mut SqliteConnection) -> Result<Vec<Product>, SqliteDatabaseError> {
    let products = sqlx::query_as("SELECT * FROM products ORDER BY id").fetch_all(conn).await?;
    Ok(products)
}

pub async fn fetch_product(id: ProductId, conn: &mut SqliteConnection) -> Result<Option<Product>, SqliteDatabaseError> {
    let product = sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(product)
}

/// Fetches the given products, keyed by id. Ids with no matching product are simply absent from the result.
pub async fn fetch_products_by_ids(
    ids: &[ProductId],
    conn: &mut SqliteConnection,
) -> Result<HashMap<ProductId, Product>, SqliteDatabaseError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM products WHERE id IN (");
    let mut list = builder.separated(", ");
    for id in ids {
        list.push_bind(*id);
    }
    list.push_unseparated(")");
    trace!("🗃️ Executing query: {}", builder.sql());
    let products: Vec<Product> = builder.build_query_as().fetch_all(conn).await?;
    Ok(products.into_iter().map(|p| (p.id, p)).collect())
}

pub async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, SqliteDatabaseError> {
    let description = serde_json::to_string(&product.description)?;
    let images = serde_json::to_string(&product.images)?;
    let product = sqlx::query_as(
        r#"
        INSERT INTO products (name, category, description, price, offer_price, images, in_stock, rating)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(product.name)
    .bind(product.category)
    .bind(description)
    .bind(product.price)
    .bind(product.offer_price)
    .bind(images)
    .bind(product.in_stock)
    .bind(product.rating)
    .fetch_one(conn)
    .await?;
    Ok(product)
}

pub async fn update_stock(
    id: ProductId,
    in_stock: bool,
    conn: &mut SqliteConnection,
) -> Result<Option<Product>, SqliteDatabaseError> {
    let product = sqlx::query_as(
        "UPDATE products SET in_stock = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(in_stock)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(product)
}

pub async fn update_price(
    id: ProductId,
    price: Money,
    offer_price: Option<Money>,
    conn: &mut SqliteConnection,
) -> Result<Option<Product>, SqliteDatabaseError> {
    let product = sqlx::query_as(
        r#"
        UPDATE products SET price = $1, offer_price = $2, updated_at = CURRENT_TIMESTAMP
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(price)
    .bind(offer_price)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(product)
}
