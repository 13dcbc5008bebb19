//! Primitive operations offered by a key-value store.

use crate::store::config::ConfigError;
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Named sub-fields of one composite record, decoded as UTF-8 text.
pub type FieldMap = BTreeMap<String, String>;

/// Lazily produced keys from a prefix scan.
pub type KeyStream = BoxStream<'static, StoreResult<String>>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Narrow key-value contract used by the task repository.
///
/// Implementations must be safe for concurrent use by many operations at
/// once and must not cache values locally.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Round-trips a liveness probe.
    async fn ping(&self) -> StoreResult<()>;

    /// Writes the given fields of a composite record.
    ///
    /// Fields not named in `fields` are left untouched. The record is
    /// created when absent.
    async fn set_fields(&self, key: &str, fields: &FieldMap) -> StoreResult<()>;

    /// Reads every field of a composite record.
    ///
    /// Returns an empty map when the key does not exist.
    async fn get_fields(&self, key: &str) -> StoreResult<FieldMap>;

    /// Reports whether the key exists.
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Removes the key, returning whether anything was deleted.
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Enumerates keys starting with `prefix`.
    ///
    /// Keys are produced page by page as the stream is polled. Order is
    /// unspecified and a key may be produced more than once. A transport
    /// failure ends the stream after yielding the error.
    fn scan_keys(&self, prefix: &str) -> KeyStream;

    /// Atomically increments a counter and returns the new value.
    async fn increment(&self, counter_key: &str) -> StoreResult<i64>;
}

/// Errors reported by store adapters.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store could not be reached or the connection was lost.
    #[error("store unreachable during {operation}: {cause}")]
    Unreachable {
        /// Operation that failed.
        operation: &'static str,
        /// Underlying transport failure.
        cause: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// The store did not answer within the configured bound.
    #[error("store {operation} timed out after {after:?}")]
    Timeout {
        /// Operation that timed out.
        operation: &'static str,
        /// Bound that elapsed.
        after: Duration,
    },

    /// A stored key or value is not valid UTF-8 text.
    #[error("value at '{key}' is not valid UTF-8 text")]
    Decode {
        /// Key holding the undecodable data.
        key: String,
    },

    /// The key holds a value of a different kind than the operation expects.
    #[error("key '{key}' holds a value of the wrong type")]
    WrongType {
        /// Key holding the mismatched value.
        key: String,
    },

    /// The connection settings are unusable.
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    /// Any other failure reported by the backend.
    #[error("store backend error during {operation}: {cause}")]
    Backend {
        /// Operation that failed.
        operation: &'static str,
        /// Underlying failure.
        cause: Arc<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    /// Wraps a transport failure.
    #[must_use]
    pub fn unreachable(
        operation: &'static str,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Unreachable {
            operation,
            cause: Arc::new(err),
        }
    }

    /// Wraps an unclassified backend failure.
    #[must_use]
    pub fn backend(
        operation: &'static str,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Backend {
            operation,
            cause: Arc::new(err),
        }
    }

    /// Returns `true` when the store could not serve the request at all.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unreachable { .. } | Self::Timeout { .. })
    }

    /// Returns `true` when the failure stems from malformed stored data.
    #[must_use]
    pub const fn is_corruption(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::WrongType { .. })
    }
}
