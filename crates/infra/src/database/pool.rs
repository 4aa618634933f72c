//! SQLite connection pool
//!
//! r2d2 pool over `r2d2_sqlite`, with the per-connection pragmas every
//! writer relies on applied when a connection is opened.

use std::path::Path;
use std::time::Duration;

use calsync_domain::{CalSyncError, Result as DomainResult};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use tracing::warn;

/// Pool of SQLite connections.
pub type SqlitePool = Pool<SqliteConnectionManager>;

/// Connection checked out of a [`SqlitePool`].
pub type SqliteConnection = PooledConnection<SqliteConnectionManager>;

/// Pool sizing and lock-contention settings.
#[derive(Debug, Clone)]
pub struct SqlitePoolConfig {
    pub max_size: u32,
    pub connection_timeout: Duration,
    pub busy_timeout: Duration,
}

impl Default for SqlitePoolConfig {
    fn default() -> Self {
        Self {
            max_size: 8,
            connection_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_millis(5000),
        }
    }
}

/// Build a pool for the database file at `path`, creating it if needed.
pub fn create_sqlite_pool(path: &Path, config: &SqlitePoolConfig) -> DomainResult<SqlitePool> {
    let busy_timeout = config.busy_timeout;
    let manager = SqliteConnectionManager::file(path)
        .with_init(move |conn| apply_connection_pragmas(conn, busy_timeout));

    Pool::builder()
        .max_size(config.max_size.max(1))
        .connection_timeout(config.connection_timeout)
        .build(manager)
        .map_err(|e| {
            warn!("Failed to create connection pool: {}", e);
            CalSyncError::Database(format!("failed to create pool: {e}"))
        })
}

/// Apply connection-level pragmas
///
/// - WAL mode so readers never block the single writer
/// - NORMAL synchronous mode
/// - Busy timeout for handling lock contention
fn apply_connection_pragmas(conn: &mut Connection, busy_timeout: Duration) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;\n\
         PRAGMA wal_autocheckpoint=1000;\n\
         PRAGMA synchronous=NORMAL;\n\
         PRAGMA foreign_keys=ON;",
    )?;
    conn.busy_timeout(busy_timeout)
}
