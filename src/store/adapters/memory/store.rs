//! In-memory key-value store for tests and local runs.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::store::ports::{FieldMap, KeyStream, KeyValueStore, StoreError, StoreResult};

/// Thread-safe in-memory key-value store.
///
/// Mirrors the semantics the task repository relies on: hashes and counters
/// live in one keyspace, so a hash operation against a counter key fails
/// with [`StoreError::WrongType`]. An outage can be simulated with
/// [`InMemoryStore::set_reachable`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<RwLock<BTreeMap<String, Entry>>>,
    offline: Arc<AtomicBool>,
}

#[derive(Debug, Clone)]
enum Entry {
    Record(FieldMap),
    Counter(i64),
}

impl InMemoryStore {
    /// Creates an empty, reachable store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles simulated reachability.
    ///
    /// While unreachable every operation fails with
    /// [`StoreError::Unreachable`]; stored data is kept.
    pub fn set_reachable(&self, reachable: bool) {
        self.offline.store(!reachable, Ordering::SeqCst);
    }

    fn check_reachable(&self, operation: &'static str) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::unreachable(
                operation,
                std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "in-memory store is offline",
                ),
            ));
        }
        Ok(())
    }

    fn read(
        &self,
        operation: &'static str,
    ) -> StoreResult<RwLockReadGuard<'_, BTreeMap<String, Entry>>> {
        self.check_reachable(operation)?;
        self.entries.read().map_err(|err| {
            StoreError::backend(operation, std::io::Error::other(err.to_string()))
        })
    }

    fn write(
        &self,
        operation: &'static str,
    ) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<String, Entry>>> {
        self.check_reachable(operation)?;
        self.entries.write().map_err(|err| {
            StoreError::backend(operation, std::io::Error::other(err.to_string()))
        })
    }
}

fn wrong_type(key: &str) -> StoreError {
    StoreError::WrongType {
        key: key.to_owned(),
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.check_reachable("ping")
    }

    async fn set_fields(&self, key: &str, fields: &FieldMap) -> StoreResult<()> {
        let mut entries = self.write("hset")?;
        if fields.is_empty() {
            return Ok(());
        }
        match entries
            .entry(key.to_owned())
            .or_insert_with(|| Entry::Record(FieldMap::new()))
        {
            Entry::Record(record) => {
                record.extend(fields.iter().map(|(f, v)| (f.clone(), v.clone())));
                Ok(())
            }
            Entry::Counter(_) => Err(wrong_type(key)),
        }
    }

    async fn get_fields(&self, key: &str) -> StoreResult<FieldMap> {
        let entries = self.read("hgetall")?;
        match entries.get(key) {
            Some(Entry::Record(record)) => Ok(record.clone()),
            Some(Entry::Counter(_)) => Err(wrong_type(key)),
            None => Ok(FieldMap::new()),
        }
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.read("exists")?.contains_key(key))
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        Ok(self.write("del")?.remove(key).is_some())
    }

    fn scan_keys(&self, prefix: &str) -> KeyStream {
        let keys: StoreResult<Vec<String>> = self.read("scan").map(|entries| {
            entries
                .keys()
                .filter(|key| key.starts_with(prefix))
                .cloned()
                .collect()
        });
        match keys {
            Ok(keys) => stream::iter(keys.into_iter().map(Ok)).boxed(),
            Err(err) => stream::once(async move { Err(err) }).boxed(),
        }
    }

    async fn increment(&self, counter_key: &str) -> StoreResult<i64> {
        let mut entries = self.write("incr")?;
        match entries
            .entry(counter_key.to_owned())
            .or_insert(Entry::Counter(0))
        {
            Entry::Counter(value) => {
                *value = value.checked_add(1).ok_or_else(|| {
                    StoreError::backend(
                        "incr",
                        std::io::Error::other(format!("counter '{counter_key}' overflowed")),
                    )
                })?;
                Ok(*value)
            }
            Entry::Record(_) => Err(wrong_type(counter_key)),
        }
    }
}
