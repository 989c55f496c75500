//! Server configuration loaded from environment variables.

use chrono::TimeDelta;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::identity::domain::PasswordHasher;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_JWT_TTL_HOURS: i64 = 24;
const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    /// A variable is set but cannot be used.
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Credential signing settings.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// HMAC secret used to sign credentials.
    pub jwt_secret: String,
    /// Credential lifetime.
    pub jwt_ttl: TimeDelta,
    /// PBKDF2 iteration count for new password hashes.
    pub password_iterations: u32,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_ttl", &self.jwt_ttl)
            .field("password_iterations", &self.password_iterations)
            .finish()
    }
}

/// `PostgreSQL` connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Connection URL.
    pub url: String,
    /// Maximum pooled connections.
    pub pool_size: u32,
    /// Time to wait for a pooled connection.
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    /// Returns the URL with any password replaced by `***`, for logging.
    #[must_use]
    pub fn redacted_url(&self) -> String {
        let Some((scheme, rest)) = self.url.split_once("://") else {
            return self.url.clone();
        };
        let Some((credentials, host)) = rest.rsplit_once('@') else {
            return self.url.clone();
        };
        let user = credentials
            .split_once(':')
            .map_or(credentials, |(user, _)| user);
        format!("{scheme}://{user}:***@{host}")
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.redacted_url())
            .field("pool_size", &self.pool_size)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Credential settings.
    pub auth: AuthConfig,
    /// Database settings; `None` selects the in-memory store.
    pub database: Option<DatabaseConfig>,
}

impl ServerConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `JWT_SECRET` is missing or a variable
    /// holds an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET".to_owned()))?;
        let ttl_hours = parse_or(&lookup, "JWT_TTL_HOURS", DEFAULT_JWT_TTL_HOURS)?;
        let jwt_ttl = TimeDelta::try_hours(ttl_hours)
            .filter(|ttl| *ttl > TimeDelta::zero())
            .ok_or_else(|| {
                ConfigError::InvalidValue("JWT_TTL_HOURS".to_owned(), ttl_hours.to_string())
            })?;
        let password_iterations = parse_or(
            &lookup,
            "PASSWORD_HASH_ITERATIONS",
            PasswordHasher::DEFAULT_ITERATIONS,
        )?;

        let database = match lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            Some(url) => Some(DatabaseConfig {
                url,
                pool_size: parse_or(&lookup, "DATABASE_POOL_SIZE", DEFAULT_POOL_SIZE)?,
                connect_timeout: Duration::from_secs(parse_or(
                    &lookup,
                    "DATABASE_CONNECT_TIMEOUT_SECS",
                    DEFAULT_CONNECT_TIMEOUT_SECS,
                )?),
            }),
            None => None,
        };

        Ok(Self {
            host,
            port,
            auth: AuthConfig {
                jwt_secret,
                jwt_ttl,
                password_iterations,
            },
            database,
        })
    }

    /// Returns the `host:port` bind address.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|err: T::Err| ConfigError::InvalidValue(key.to_owned(), err.to_string()))
    })
}
