//! Connection settings for the key-value store.
//!
//! Every setting the connector needs is explicit: host, port, logical
//! database index, and both timeout bounds. Values are read from the
//! environment with [`StoreConfig::from_env`] or assembled with the `with_*`
//! builder methods.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the store host.
pub const HOST_ENV: &str = "TASKKEEPER_REDIS_HOST";
/// Environment variable naming the store port.
pub const PORT_ENV: &str = "TASKKEEPER_REDIS_PORT";
/// Environment variable naming the logical database index.
pub const DATABASE_ENV: &str = "TASKKEEPER_REDIS_DB";
/// Environment variable holding the connect timeout in milliseconds.
pub const CONNECT_TIMEOUT_ENV: &str = "TASKKEEPER_REDIS_CONNECT_TIMEOUT_MS";
/// Environment variable holding the per-operation timeout in milliseconds.
pub const OPERATION_TIMEOUT_ENV: &str = "TASKKEEPER_REDIS_OPERATION_TIMEOUT_MS";
/// Environment variable holding the number of keys requested per scan page.
pub const SCAN_BATCH_ENV: &str = "TASKKEEPER_REDIS_SCAN_BATCH";

/// Errors raised while loading or validating store configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A setting is present but cannot be used.
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// Name of the offending setting.
        key: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            message: message.into(),
        }
    }
}

/// Connection settings for the key-value store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Host name or address of the store.
    pub host: String,
    /// TCP port of the store.
    pub port: u16,
    /// Logical database index selected after connecting.
    pub database: u32,
    /// Upper bound on establishing the connection.
    pub connect_timeout: Duration,
    /// Upper bound on every individual store round trip.
    pub operation_timeout: Duration,
    /// Number of keys requested per scan page.
    pub scan_batch_size: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 6379,
            database: 0,
            connect_timeout: Duration::from_secs(5),
            operation_timeout: Duration::from_secs(5),
            scan_batch_size: 100,
        }
    }
}

impl StoreConfig {
    /// Creates a configuration for the given host with default settings.
    #[must_use]
    pub fn with_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Sets the TCP port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the logical database index.
    #[must_use]
    pub const fn with_database(mut self, database: u32) -> Self {
        self.database = database;
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Sets the per-operation timeout.
    #[must_use]
    pub const fn with_operation_timeout(mut self, operation_timeout: Duration) -> Self {
        self.operation_timeout = operation_timeout;
        self
    }

    /// Sets the scan page size.
    #[must_use]
    pub const fn with_scan_batch_size(mut self, scan_batch_size: u32) -> Self {
        self.scan_batch_size = scan_batch_size;
        self
    }

    /// Loads settings from the process environment.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a variable cannot be parsed
    /// or the resulting configuration fails [`StoreConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a value cannot be parsed or
    /// the resulting configuration fails [`StoreConfig::validate`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            host: lookup(HOST_ENV).map_or(defaults.host, |raw| raw.trim().to_owned()),
            port: parse_or(&lookup, PORT_ENV, defaults.port)?,
            database: parse_or(&lookup, DATABASE_ENV, defaults.database)?,
            connect_timeout: Duration::from_millis(parse_or(
                &lookup,
                CONNECT_TIMEOUT_ENV,
                millis(defaults.connect_timeout),
            )?),
            operation_timeout: Duration::from_millis(parse_or(
                &lookup,
                OPERATION_TIMEOUT_ENV,
                millis(defaults.operation_timeout),
            )?),
            scan_batch_size: parse_or(&lookup, SCAN_BATCH_ENV, defaults.scan_batch_size)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty host, a zero
    /// timeout, or a zero scan page size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::invalid(HOST_ENV, "host must not be empty"));
        }
        if self.connect_timeout.is_zero() {
            return Err(ConfigError::invalid(
                CONNECT_TIMEOUT_ENV,
                "connect timeout must be greater than zero",
            ));
        }
        if self.operation_timeout.is_zero() {
            return Err(ConfigError::invalid(
                OPERATION_TIMEOUT_ENV,
                "operation timeout must be greater than zero",
            ));
        }
        if self.scan_batch_size == 0 {
            return Err(ConfigError::invalid(
                SCAN_BATCH_ENV,
                "scan batch size must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Renders the connection URL understood by the Redis client.
    #[must_use]
    pub fn connection_url(&self) -> String {
        let host = self.host.trim();
        if host.contains(':') {
            format!("redis://[{host}]:{}/{}", self.port, self.database)
        } else {
            format!("redis://{host}:{}/{}", self.port, self.database)
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|err| ConfigError::invalid(key, format!("'{raw}': {err}")))
    })
}
