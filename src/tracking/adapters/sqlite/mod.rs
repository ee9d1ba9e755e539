//! `SQLite` adapters for project and issue persistence.

mod models;
mod pool;
mod repository;
mod schema;

pub use pool::{IN_MEMORY_DATABASE_URL, TrackingSqlitePool, build_pool};
pub use repository::{SCHEMA_SQL, SqliteTrackingRepository};
