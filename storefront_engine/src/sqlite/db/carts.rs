use chrono::{DateTime, Utc};
use log::*;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db_types::{ActorId, Cart, CartItems, ProductId},
    sqlite::errors::SqliteDatabaseError,
};

/// Creates the buyer's cart row if it does not exist yet.
///
/// Run as the first statement of a transaction, this also makes the transaction a write transaction from the start, so
/// the buyer's cart cannot change between the reads and writes that follow.
pub async fn ensure_cart(buyer: &ActorId, conn: &mut SqliteConnection) -> Result<(), SqliteDatabaseError> {
    sqlx::query("INSERT INTO carts (buyer_id) VALUES ($1) ON CONFLICT (buyer_id) DO NOTHING")
        .bind(buyer)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn fetch_cart(buyer: &ActorId, conn: &mut SqliteConnection) -> Result<Cart, SqliteDatabaseError> {
    let header: Option<(i64, DateTime<Utc>)> =
        sqlx::query_as("SELECT version, updated_at FROM carts WHERE buyer_id = $1")
            .bind(buyer)
            .fetch_optional(&mut *conn)
            .await?;
    let Some((version, updated_at)) = header else {
        return Ok(Cart::empty(buyer.clone()));
    };
    let rows: Vec<(ProductId, i64)> =
        sqlx::query_as("SELECT product_id, quantity FROM cart_items WHERE buyer_id = $1 ORDER BY product_id")
            .bind(buyer)
            .fetch_all(conn)
            .await?;
    let items = rows.into_iter().collect::<CartItems>();
    Ok(Cart { buyer_id: buyer.clone(), items, version, updated_at: Some(updated_at) })
}

/// Removes every entry from the buyer's cart. The cart row itself, and its version, stay.
pub async fn clear_items(buyer: &ActorId, conn: &mut SqliteConnection) -> Result<u64, SqliteDatabaseError> {
    let result = sqlx::query("DELETE FROM cart_items WHERE buyer_id = $1").bind(buyer).execute(conn).await?;
    Ok(result.rows_affected())
}

/// Replaces the buyer's cart entries with `items`. All quantities must be positive.
pub async fn replace_items(
    buyer: &ActorId,
    items: &CartItems,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    clear_items(buyer, &mut *conn).await?;
    if items.is_empty() {
        return Ok(());
    }
    let mut builder = QueryBuilder::<Sqlite>::new("INSERT INTO cart_items (buyer_id, product_id, quantity) ");
    builder.push_values(items.iter(), |mut row, (product_id, quantity)| {
        row.push_bind(buyer).push_bind(*product_id).push_bind(*quantity);
    });
    trace!("🗃️ Executing query: {}", builder.sql());
    builder.build().execute(conn).await?;
    Ok(())
}

/// Bumps the cart version if it still equals `expected`. Returns `false` when the cart was changed by someone else.
pub async fn bump_version(
    buyer: &ActorId,
    expected: i64,
    conn: &mut SqliteConnection,
) -> Result<bool, SqliteDatabaseError> {
    let result = sqlx::query(
        "UPDATE carts SET version = version + 1, updated_at = CURRENT_TIMESTAMP WHERE buyer_id = $1 AND version = $2",
    )
    .bind(buyer)
    .bind(expected)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() == 1)
}
