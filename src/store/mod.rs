//! Key-value store connector.
//!
//! The connector owns the network connection to the external store and
//! exposes the narrow set of primitives the task repository builds on:
//! composite-record field access, prefix scans, existence checks, deletion,
//! and an atomic counter. Failures never escape as panics; every primitive
//! reports a [`ports::StoreError`] instead.
//!
//! - Connection settings in [`config`]
//! - Port contract in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod config;
pub mod ports;

#[cfg(test)]
mod tests;
