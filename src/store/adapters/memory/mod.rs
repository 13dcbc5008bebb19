//! In-memory adapter for the key-value store port.

mod store;

pub use store::InMemoryStore;
