//! Task tracking for Taskkeeper.
//!
//! Each task is one composite record at `task:<id>`, with identifiers drawn
//! from an atomic counter. Listing tolerates corrupt records by reporting
//! them as warnings next to the valid tasks. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Collaborator services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
