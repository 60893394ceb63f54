use thiserror::Error;

use crate::sf_api::errors::{AddressApiError, CartApiError, CatalogApiError, OrderFlowError};

// Primary SQLite result codes. Extended codes carry these in their low byte.
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database connection error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Could not run database migrations: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    #[error("Could not serialize a column value: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl SqliteDatabaseError {
    /// True for failures where retrying the whole operation later may succeed: pool exhaustion or a database file
    /// that stayed locked for longer than the busy timeout.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::DriverError(e) => is_transient(e),
            _ => false,
        }
    }
}

pub fn is_transient(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => true,
        sqlx::Error::Database(db_err) => db_err
            .code()
            .and_then(|code| code.parse::<i32>().ok())
            .map(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
            .unwrap_or(false),
        _ => false,
    }
}

macro_rules! into_api_error {
    ($api_error:ident) => {
        impl From<SqliteDatabaseError> for $api_error {
            fn from(e: SqliteDatabaseError) -> Self {
                if e.is_transient() {
                    Self::Unavailable(e.to_string())
                } else {
                    Self::DatabaseError(e.to_string())
                }
            }
        }

        impl From<sqlx::Error> for $api_error {
            fn from(e: sqlx::Error) -> Self {
                SqliteDatabaseError::from(e).into()
            }
        }
    };
}

into_api_error!(CatalogApiError);
into_api_error!(CartApiError);
into_api_error!(AddressApiError);
into_api_error!(OrderFlowError);
