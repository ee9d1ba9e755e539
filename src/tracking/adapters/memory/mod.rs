//! In-memory adapters for tracking ports.

mod repository;

pub use repository::InMemoryTrackingRepository;
