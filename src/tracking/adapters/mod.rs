//! Adapter implementations for tracking ports.

pub mod memory;
pub mod sqlite;
