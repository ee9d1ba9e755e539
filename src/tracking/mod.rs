//! Project and issue tracking.
//!
//! Issues belong to projects and move through a fixed lifecycle
//! (`OPEN → IN_PROGRESS → DONE`). The module follows hexagonal
//! architecture:
//!
//! - Domain types and the lifecycle state machine in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
