//! Database implementations

pub mod calendar_event_repository;
pub mod manager;
pub mod pool;

pub use calendar_event_repository::SqliteCalendarEventRepository;
pub use manager::DbManager;
pub use pool::{create_sqlite_pool, SqliteConnection, SqlitePool, SqlitePoolConfig};
