//! Issueflow: project and issue tracking with a guarded issue lifecycle.
//!
//! Issues belong to projects and move forward through a fixed sequence of
//! statuses. The crate validates every status change against the issue's
//! persisted status before committing it.
//!
//! # Architecture
//!
//! Issueflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (`SQLite`, in-memory)
//!
//! # Modules
//!
//! - [`tracking`]: Projects, issues, and the issue lifecycle
//! - [`config`]: Layered runtime configuration
//! - [`telemetry`]: Structured logging setup

pub mod config;
pub mod telemetry;
pub mod tracking;
