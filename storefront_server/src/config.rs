use std::{env, io::Write, time::Duration};

use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use serde_json::json;
use storefront_common::{helpers::is_blank, Secret};
use tempfile::NamedTempFile;

use crate::errors::ServerError;

const DEFAULT_SF_HOST: &str = "127.0.0.1";
const DEFAULT_SF_PORT: u16 = 5000;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/storefront.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 25;
const DEFAULT_DB_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(7 * 24 * 60 * 60);
const MIN_SECRET_LENGTH: usize = 32;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    /// Upper bound on waiting for a pooled connection, a locked SQLite file or a buyer's cart lock.
    pub db_timeout: Duration,
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SF_HOST.to_string(),
            port: DEFAULT_SF_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            db_timeout: DEFAULT_DB_TIMEOUT,
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SF_HOST").ok().unwrap_or_else(|| DEFAULT_SF_HOST.into());
        let port = parse_env("SF_PORT", DEFAULT_SF_PORT);
        let database_url = env::var("SF_DATABASE_URL").ok().filter(|s| !is_blank(s)).unwrap_or_else(|| {
            info!("🪛️ SF_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}");
            DEFAULT_DATABASE_URL.to_string()
        });
        let max_connections = parse_env("SF_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS);
        let db_timeout = Duration::from_secs(parse_env("SF_DB_TIMEOUT_SECS", DEFAULT_DB_TIMEOUT.as_secs()));
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        Self { host, port, database_url, max_connections, db_timeout, auth }
    }
}

/// Reads and parses an environment variable, falling back to `default` (with a log message) when it is missing or
/// invalid.
fn parse_env<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(s) => s.trim().parse::<T>().unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
            default
        }),
        Err(_) => {
            debug!("🪛️ {name} is not set. Using the default, {default}.");
            default
        },
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The HS256 secret used to sign and verify access tokens.
    pub jwt_secret: Secret<String>,
    /// How long newly issued access tokens remain valid.
    pub token_lifetime: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let mut tmpfile = NamedTempFile::new().ok().and_then(|f| f.keep().ok());
        warn!(
            "🚨️🚨️🚨️ The JWT secret has not been set. I'm using a random value for this session. DO NOT operate on \
             production like this since every token will be invalidated when the server restarts. 🚨️🚨️🚨️"
        );
        let secret: String = thread_rng().sample_iter(&Alphanumeric).take(48).map(char::from).collect();
        match &mut tmpfile {
            Some((f, p)) => {
                let key_data = json!({ "jwt_secret": secret }).to_string();
                match writeln!(f, "{key_data}") {
                    Ok(()) => warn!(
                        "🚨️🚨️🚨️ The JWT secret for this session was written to {}. If this is a production instance, \
                         you are doing it wrong! Set the SF_JWT_SECRET environment variable instead. 🚨️🚨️🚨️",
                        p.to_str().unwrap_or("???")
                    ),
                    Err(e) => warn!("🪛️ Could not write the JWT secret to the temporary file. {e}"),
                }
            },
            None => {
                warn!("🪛️ Could not create a temporary file to store the JWT secret.");
            },
        }
        Self { jwt_secret: Secret::new(secret), token_lifetime: DEFAULT_TOKEN_LIFETIME }
    }
}

impl AuthConfig {
    pub fn new<S: Into<String>>(secret: S, token_lifetime: Duration) -> Self {
        Self { jwt_secret: Secret::new(secret.into()), token_lifetime }
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret = env::var("SF_JWT_SECRET")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [SF_JWT_SECRET]")))?;
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(ServerError::ConfigurationError(format!(
                "SF_JWT_SECRET must be at least {MIN_SECRET_LENGTH} characters long"
            )));
        }
        let hours = parse_env("SF_TOKEN_LIFETIME_HRS", DEFAULT_TOKEN_LIFETIME.as_secs() / 3600);
        Ok(Self::new(secret, Duration::from_secs(hours * 3600)))
    }
}
