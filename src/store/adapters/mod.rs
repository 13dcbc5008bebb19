//! Store adapter implementations.

pub mod memory;
pub mod redis;
