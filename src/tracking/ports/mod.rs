//! Port contracts for project and issue tracking.
//!
//! Ports define infrastructure-agnostic interfaces used by tracking services.

pub mod repository;

pub use repository::{TrackingRepository, TrackingRepositoryError, TrackingRepositoryResult};
