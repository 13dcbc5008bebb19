//! Redis-backed [`KeyValueStore`] implementation.
//!
//! Composite records are Redis hashes and counters are plain integer keys.
//! Every clone of [`RedisStore`] shares one multiplexed connection, and
//! concurrent operations pipeline over it. A call that finds the link broken
//! or stalled reports its own failure and discards the connection; the next
//! call dials the store again, so a restarted server is picked up without
//! rebuilding the store.

use super::errors::{bounded, classify};
use crate::store::{
    config::StoreConfig,
    ports::{FieldMap, KeyStream, KeyValueStore, StoreError, StoreResult},
};
use ::redis::{Client, FromRedisValue, aio::MultiplexedConnection};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Key-value store adapter speaking the Redis protocol.
#[derive(Clone)]
pub struct RedisStore {
    client: Arc<Client>,
    link: Arc<Mutex<Link>>,
    config: Arc<StoreConfig>,
}

/// The shared connection slot.
///
/// `generation` grows with every dial so a caller holding a stale
/// connection cannot discard its replacement.
struct Link {
    generation: u64,
    connection: Option<MultiplexedConnection>,
}

impl RedisStore {
    /// Connects to the configured store and confirms the link with `PING`.
    ///
    /// The initial connection is not retried; retry policy belongs to the
    /// caller. Later calls re-dial on their own after the link breaks.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] for unusable settings,
    /// [`StoreError::Timeout`] when the connect or probe bound elapses, and
    /// [`StoreError::Unreachable`] when the store refuses the connection.
    pub async fn connect(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let client = Client::open(config.connection_url())
            .map_err(|err| StoreError::backend("connect", err))?;
        let connection = dial(&client, &config).await?;

        let store = Self {
            client: Arc::new(client),
            link: Arc::new(Mutex::new(Link {
                generation: 1,
                connection: Some(connection),
            })),
            config: Arc::new(config),
        };
        store.ping().await?;
        tracing::debug!(
            host = %store.config.host,
            port = store.config.port,
            database = store.config.database,
            "connected to key-value store"
        );
        Ok(store)
    }

    /// Returns the settings this store was connected with.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the live connection, dialling a new one if the last was
    /// discarded. Concurrent callers wait for a single dial.
    async fn connection(&self) -> StoreResult<(u64, MultiplexedConnection)> {
        let mut link = self.link.lock().await;
        if let Some(connection) = &link.connection {
            return Ok((link.generation, connection.clone()));
        }
        let fresh = dial(&self.client, &self.config).await?;
        link.generation = link.generation.wrapping_add(1);
        link.connection = Some(fresh.clone());
        tracing::info!(
            host = %self.config.host,
            port = self.config.port,
            "re-established connection to key-value store"
        );
        Ok((link.generation, fresh))
    }

    async fn discard(&self, generation: u64, cause: &StoreError) {
        let mut link = self.link.lock().await;
        if link.generation == generation && link.connection.take().is_some() {
            tracing::warn!(
                "Discarding key-value store connection after failure: {}",
                cause
            );
        }
    }

    /// Runs one command and drops the shared connection when the failure
    /// says the link is gone. The failed command is never replayed.
    async fn query<T>(
        &self,
        operation: &'static str,
        key: &str,
        command: &::redis::Cmd,
    ) -> StoreResult<T>
    where
        T: FromRedisValue,
    {
        let (generation, mut connection) = self.connection().await?;
        let result = bounded(
            self.config.operation_timeout,
            operation,
            key,
            command.query_async(&mut connection),
        )
        .await;
        if let Err(err) = &result
            && err.is_unavailable()
        {
            self.discard(generation, err).await;
        }
        result
    }
}

async fn dial(client: &Client, config: &StoreConfig) -> StoreResult<MultiplexedConnection> {
    tokio::time::timeout(
        config.connect_timeout,
        client.get_multiplexed_async_connection(),
    )
    .await
    .map_err(|_elapsed| StoreError::Timeout {
        operation: "connect",
        after: config.connect_timeout,
    })?
    .map_err(|err| classify("connect", "", config.connect_timeout, err))
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RedisStore")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("database", &self.config.database)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn ping(&self) -> StoreResult<()> {
        let reply: String = self.query("ping", "", &::redis::cmd("PING")).await?;
        if reply != "PONG" {
            return Err(StoreError::backend(
                "ping",
                std::io::Error::other(format!("unexpected PING reply '{reply}'")),
            ));
        }
        Ok(())
    }

    async fn set_fields(&self, key: &str, fields: &FieldMap) -> StoreResult<()> {
        if fields.is_empty() {
            return Ok(());
        }
        let mut command = ::redis::cmd("HSET");
        command.arg(key);
        for (field, value) in fields {
            command.arg(field).arg(value);
        }
        let _added: i64 = self.query("hset", key, &command).await?;
        Ok(())
    }

    async fn get_fields(&self, key: &str) -> StoreResult<FieldMap> {
        let mut command = ::redis::cmd("HGETALL");
        command.arg(key);
        let raw: HashMap<Vec<u8>, Vec<u8>> = self.query("hgetall", key, &command).await?;

        raw.into_iter()
            .map(|(field, value)| Ok((decode_text(key, field)?, decode_text(key, value)?)))
            .collect()
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let mut command = ::redis::cmd("EXISTS");
        command.arg(key);
        let count: i64 = self.query("exists", key, &command).await?;
        Ok(count > 0)
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut command = ::redis::cmd("DEL");
        command.arg(key);
        let removed: i64 = self.query("del", key, &command).await?;
        Ok(removed > 0)
    }

    fn scan_keys(&self, prefix: &str) -> KeyStream {
        let scan = ScanCursor {
            store: self.clone(),
            pattern: format!("{}*", escape_glob(prefix)),
            cursor: Some(0),
        };
        stream::unfold(scan, next_page)
            .flat_map(stream::iter)
            .boxed()
    }

    async fn increment(&self, counter_key: &str) -> StoreResult<i64> {
        let mut command = ::redis::cmd("INCR");
        command.arg(counter_key);
        self.query("incr", counter_key, &command).await
    }
}

/// Iteration state of an incremental `SCAN`.
struct ScanCursor {
    store: RedisStore,
    pattern: String,
    /// `None` once the server reported the end of the iteration.
    cursor: Option<u64>,
}

async fn next_page(mut scan: ScanCursor) -> Option<(Vec<StoreResult<String>>, ScanCursor)> {
    let cursor = scan.cursor?;
    let mut command = ::redis::cmd("SCAN");
    command
        .arg(cursor)
        .arg("MATCH")
        .arg(&scan.pattern)
        .arg("COUNT")
        .arg(scan.store.config.scan_batch_size);
    let page: StoreResult<(u64, Vec<Vec<u8>>)> =
        scan.store.query("scan", &scan.pattern, &command).await;

    match page {
        Ok((next_cursor, keys)) => {
            scan.cursor = (next_cursor != 0).then_some(next_cursor);
            let decoded = keys
                .into_iter()
                .map(|key| {
                    String::from_utf8(key).map_err(|err| StoreError::Decode {
                        key: String::from_utf8_lossy(err.as_bytes()).into_owned(),
                    })
                })
                .collect();
            Some((decoded, scan))
        }
        Err(err) => {
            scan.cursor = None;
            Some((vec![Err(err)], scan))
        }
    }
}

fn decode_text(key: &str, raw: Vec<u8>) -> StoreResult<String> {
    String::from_utf8(raw).map_err(|_| StoreError::Decode {
        key: key.to_owned(),
    })
}

/// Escapes glob metacharacters so a prefix matches literally in `SCAN MATCH`.
fn escape_glob(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for ch in prefix.chars() {
        if matches!(ch, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
