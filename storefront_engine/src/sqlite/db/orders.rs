use log::*;
use sqlx::{sqlite::SqliteRow, FromRow, Row, SqliteConnection};

use super::{json_column, parsed_column};
use crate::{
    db_types::{ActorId, NewOrder, Order, OrderId, OrderStatusType},
    sqlite::errors::SqliteDatabaseError,
};

impl FromRow<'_, SqliteRow> for Order {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            buyer_id: row.try_get("buyer_id")?,
            items: json_column(row, "items")?,
            amount: row.try_get("amount")?,
            address_id: row.try_get("address_id")?,
            address: json_column(row, "address")?,
            payment_type: parsed_column(row, "payment_type")?,
            status: parsed_column(row, "status")?,
            is_paid: row.try_get("is_paid")?,
            idempotency_key: row.try_get("idempotency_key")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Inserts a new order with status "Order Placed". This is not atomic. Embed the call in a transaction, passing
/// `&mut *tx` as the connection, when it must commit together with other writes.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, SqliteDatabaseError> {
    let items = serde_json::to_string(&order.items)?;
    let address = serde_json::to_string(&order.address)?;
    let order: Order = sqlx::query_as(
        r#"
        INSERT INTO orders (buyer_id, items, amount, address_id, address, payment_type, status, is_paid, idempotency_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE, $8)
        RETURNING *
        "#,
    )
    .bind(order.buyer_id)
    .bind(items)
    .bind(order.amount)
    .bind(order.address_id)
    .bind(address)
    .bind(order.payment_type.to_string())
    .bind(OrderStatusType::Placed.to_string())
    .bind(order.idempotency_key)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Order #{} inserted for {}", order.id, order.buyer_id);
    Ok(order)
}

pub async fn fetch_order(id: OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, SqliteDatabaseError> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_order_by_idempotency_key(
    buyer: &ActorId,
    key: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, SqliteDatabaseError> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE buyer_id = $1 AND idempotency_key = $2")
        .bind(buyer)
        .bind(key)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// The buyer's orders, newest first.
pub async fn fetch_orders_for_buyer(
    buyer: &ActorId,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, SqliteDatabaseError> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE buyer_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(buyer)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

/// Every order, newest first.
pub async fn fetch_all_orders(conn: &mut SqliteConnection) -> Result<Vec<Order>, SqliteDatabaseError> {
    let orders = sqlx::query_as("SELECT * FROM orders ORDER BY created_at DESC, id DESC").fetch_all(conn).await?;
    Ok(orders)
}

/// Writes the new status and paid flag without checking the state machine. Callers do that.
pub async fn update_status(
    id: OrderId,
    status: OrderStatusType,
    is_paid: bool,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, SqliteDatabaseError> {
    let order = sqlx::query_as(
        r#"
        UPDATE orders SET status = $1, is_paid = $2, updated_at = CURRENT_TIMESTAMP
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(status.to_string())
    .bind(is_paid)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}
