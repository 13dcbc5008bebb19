//! Translation of Redis client failures into [`StoreError`] values.

use crate::store::ports::{StoreError, StoreResult};
use ::redis::{ErrorKind, RedisError, RedisResult};
use std::future::Future;
use std::time::Duration;

/// Runs one store round trip under `timeout` and classifies its failure.
///
/// Dropping the returned future abandons the request; the multiplexed
/// connection discards the late reply.
pub(super) async fn bounded<T, F>(
    timeout: Duration,
    operation: &'static str,
    key: &str,
    call: F,
) -> StoreResult<T>
where
    F: Future<Output = RedisResult<T>>,
{
    tokio::time::timeout(timeout, call)
        .await
        .map_err(|_elapsed| StoreError::Timeout {
            operation,
            after: timeout,
        })?
        .map_err(|err| classify(operation, key, timeout, err))
}

/// Maps a client error onto the store error taxonomy.
pub(super) fn classify(
    operation: &'static str,
    key: &str,
    timeout: Duration,
    err: RedisError,
) -> StoreError {
    if err.is_timeout() {
        return StoreError::Timeout {
            operation,
            after: timeout,
        };
    }
    if err.code() == Some("WRONGTYPE") {
        return StoreError::WrongType {
            key: key.to_owned(),
        };
    }
    if err.kind() == ErrorKind::TypeError {
        return StoreError::Decode {
            key: key.to_owned(),
        };
    }
    if err.kind() == ErrorKind::IoError
        || err.is_io_error()
        || err.is_connection_dropped()
        || err.is_connection_refusal()
    {
        return StoreError::unreachable(operation, err);
    }
    StoreError::backend(operation, err)
}
