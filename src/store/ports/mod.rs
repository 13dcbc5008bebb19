//! Port contracts for key-value store access.
//!
//! The task repository depends only on these traits, never on a concrete
//! client library.

pub mod key_value;

pub use key_value::{FieldMap, KeyStream, KeyValueStore, StoreError, StoreResult};
