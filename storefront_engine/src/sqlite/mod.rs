//! SQLite backend for the storefront engine.
mod sqlite_impl;

pub mod db;
pub mod errors;

pub use errors::SqliteDatabaseError;
pub use sqlite_impl::SqliteDatabase;
