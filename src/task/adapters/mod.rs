//! Adapter implementations of the task ports.

pub mod store;
