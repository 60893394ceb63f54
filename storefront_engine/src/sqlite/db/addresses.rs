use sqlx::SqliteConnection;

use crate::{
    db_types::{ActorId, Address, AddressId, NewAddress},
    sqlite::errors::SqliteDatabaseError,
};

pub async fn insert_address(
    buyer: &ActorId,
    address: NewAddress,
    conn: &mut SqliteConnection,
) -> Result<Address, SqliteDatabaseError> {
    let address = sqlx::query_as(
        r#"
        INSERT INTO addresses (buyer_id, first_name, last_name, email, street, city, state, zip_code, country, phone)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(buyer)
    .bind(address.first_name)
    .bind(address.last_name)
    .bind(address.email)
    .bind(address.street)
    .bind(address.city)
    .bind(address.state)
    .bind(address.zip_code)
    .bind(address.country)
    .bind(address.phone)
    .fetch_one(conn)
    .await?;
    Ok(address)
}

pub async fn fetch_addresses_for_buyer(
    buyer: &ActorId,
    conn: &mut SqliteConnection,
) -> Result<Vec<Address>, SqliteDatabaseError> {
    let addresses =
        sqlx::query_as("SELECT * FROM addresses WHERE buyer_id = $1 ORDER BY id").bind(buyer).fetch_all(conn).await?;
    Ok(addresses)
}

/// Fetches the address only if it belongs to `buyer`.
pub async fn fetch_address(
    buyer: &ActorId,
    id: AddressId,
    conn: &mut SqliteConnection,
) -> Result<Option<Address>, SqliteDatabaseError> {
    let address = sqlx::query_as("SELECT * FROM addresses WHERE id = $1 AND buyer_id = $2")
        .bind(id)
        .bind(buyer)
        .fetch_optional(conn)
        .await?;
    Ok(address)
}

/// The number of orders that were delivered to this address.
pub async fn order_count_for_address(id: AddressId, conn: &mut SqliteConnection) -> Result<i64, SqliteDatabaseError> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE address_id = $1").bind(id).fetch_one(conn).await?;
    Ok(count)
}

pub async fn delete_address(id: AddressId, conn: &mut SqliteConnection) -> Result<bool, SqliteDatabaseError> {
    let result = sqlx::query("DELETE FROM addresses WHERE id = $1").bind(id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}
