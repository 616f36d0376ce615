//! Database module for the intent catalogue and its append-only logs

pub mod feedback;
pub mod intent;
pub mod interaction;
mod schema;
mod store;

use std::path::Path;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;

use crate::{Error, Result};

pub use feedback::{Feedback, FeedbackRepo};
pub use intent::{Intent, IntentRepo, IntentSummary, Response, ResponseCandidate};
pub use interaction::{Interaction, InteractionRepo};
pub use schema::SCHEMA_VERSION;
pub use store::IntentStore;

/// Database connection pool
pub type DbPool = Pool<SqliteConnectionManager>;

/// Pooled database connection
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// How long a writer waits on a locked database before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Initialize the database
///
/// Every pooled connection enforces foreign keys and waits out short write
/// locks held by concurrent writers.
///
/// # Errors
///
/// Returns `StorageUnavailable` if the database cannot be opened or migrated
pub fn init<P: AsRef<Path>>(path: P) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(path).with_init(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get::<_, String>(0))?;
        conn.pragma_update(None, "foreign_keys", true)
    });
    let pool = Pool::builder()
        .max_size(4)
        .connection_timeout(BUSY_TIMEOUT)
        .build(manager)
        .map_err(|e| Error::StorageUnavailable(e.to_string()))?;

    migrate(&pool)?;

    tracing::info!(version = SCHEMA_VERSION, "database initialized");
    Ok(pool)
}

/// Initialize an in-memory database (for testing)
///
/// # Errors
///
/// Returns `StorageUnavailable` if the database cannot be initialized
pub fn init_memory() -> Result<DbPool> {
    // Each in-memory connection is its own database, so the pool holds one
    // and never recycles it
    let manager = SqliteConnectionManager::memory()
        .with_init(|conn| conn.pragma_update(None, "foreign_keys", true));
    let pool = Pool::builder()
        .max_size(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .build(manager)
        .map_err(|e| Error::StorageUnavailable(e.to_string()))?;

    migrate(&pool)?;

    Ok(pool)
}

/// Run schema migrations on a pooled connection
fn migrate(pool: &DbPool) -> Result<()> {
    let conn = pool
        .get()
        .map_err(|e| Error::StorageUnavailable(e.to_string()))?;
    schema::init(&conn).map_err(|e| Error::StorageUnavailable(e.to_string()))
}

/// Check out a connection for a single operation
pub(crate) fn checkout(pool: &DbPool) -> Result<DbConn> {
    pool.get().map_err(|e| Error::Database(e.to_string()))
}
