//! Taskkeeper: task tracking persisted in a Redis key-value store.
//!
//! Tasks are created with a store-assigned identifier, listed, read, edited
//! one field at a time and deleted. Every task lives in the store; nothing
//! is cached in process, so any number of instances may share one database.
//!
//! # Architecture
//!
//! Taskkeeper follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (Redis, in-memory)
//!
//! # Modules
//!
//! - [`store`]: Connection settings and the key-value connector
//! - [`task`]: Task entity semantics and the collaborator service

pub mod store;
pub mod task;
