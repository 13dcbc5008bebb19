//! Redis adapter for the key-value store port.

mod errors;
mod store;

pub use store::RedisStore;
