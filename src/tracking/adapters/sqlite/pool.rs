//! Connection pool construction for the `SQLite` tracking store.

use crate::tracking::ports::{TrackingRepositoryError, TrackingRepositoryResult};
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Error as R2d2Error, Pool};
use diesel::sqlite::SqliteConnection;
use std::time::Duration;

/// `SQLite` connection pool type used by tracking adapters.
pub type TrackingSqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Database URL selecting a private in-memory database.
pub const IN_MEMORY_DATABASE_URL: &str = ":memory:";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-connection settings applied whenever the pool opens a connection.
#[derive(Debug, Clone, Copy)]
struct ConnectionPragmas {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, R2d2Error> for ConnectionPragmas {
    fn on_acquire(&self, connection: &mut SqliteConnection) -> Result<(), R2d2Error> {
        let pragmas = format!(
            "PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;",
            self.busy_timeout.as_millis()
        );
        connection
            .batch_execute(&pragmas)
            .map_err(R2d2Error::QueryError)
    }
}

/// Builds a connection pool for `database_url`.
///
/// Every pooled connection enforces foreign keys. An in-memory database
/// exists per connection, so [`IN_MEMORY_DATABASE_URL`] always yields a
/// single-connection pool whose connection is never reaped or recycled.
///
/// # Errors
///
/// Returns [`TrackingRepositoryError::Persistence`] when the pool cannot
/// open its connections.
pub fn build_pool(
    database_url: &str,
    max_connections: u32,
) -> TrackingRepositoryResult<TrackingSqlitePool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let builder = Pool::builder().connection_customizer(Box::new(ConnectionPragmas {
        busy_timeout: BUSY_TIMEOUT,
    }));
    // Replacing the only connection would open a new, empty database.
    let builder = if database_url == IN_MEMORY_DATABASE_URL {
        builder.max_size(1).idle_timeout(None).max_lifetime(None)
    } else {
        builder.max_size(max_connections.max(1))
    };
    builder
        .build(manager)
        .map_err(TrackingRepositoryError::persistence)
}
