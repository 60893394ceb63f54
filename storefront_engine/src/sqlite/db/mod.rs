//! # SQLite Database methods
//!
//! This module contains the "low-level" SQLite database interactions.
//!
//! Every interaction is a plain function that accepts a `&mut SqliteConnection` argument. Callers can obtain a
//! connection from a pool, or open a transaction and pass `&mut *tx`, without any other changes. Queries are checked at
//! runtime, so building the crate does not need a live database.
use std::{str::FromStr, time::Duration};

use serde::de::DeserializeOwned;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow},
    Error as SqlxError,
    Row,
    SqlitePool,
};

pub mod addresses;
pub mod carts;
pub mod orders;
pub mod products;

/// Opens a connection pool. `timeout` bounds both the wait for a free connection and the wait for a locked database
/// file, so no storage call can hang indefinitely.
pub async fn new_pool(url: &str, max_connections: u32, timeout: Duration) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(timeout);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(timeout)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Reads a TEXT column holding JSON.
pub(crate) fn json_column<T: DeserializeOwned>(row: &SqliteRow, column: &str) -> Result<T, SqlxError> {
    let raw: String = row.try_get(column)?;
    serde_json::from_str(&raw)
        .map_err(|e| SqlxError::ColumnDecode { index: column.to_string(), source: Box::new(e) })
}

/// Reads a TEXT column holding a value's `Display` form.
pub(crate) fn parsed_column<T>(row: &SqliteRow, column: &str) -> Result<T, SqlxError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.try_get(column)?;
    raw.parse::<T>().map_err(|e| SqlxError::ColumnDecode { index: column.to_string(), source: Box::new(e) })
}
