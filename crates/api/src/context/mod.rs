//! Application context - dependency injection container

use std::sync::Arc;

use calsync_core::{CalendarEventRepository, CalendarSyncService, RemoteCalendarProvider};
use calsync_domain::{Config, Result};
use calsync_infra::{config, DbManager, GoogleCalendarProvider, SqliteCalendarEventRepository};
use tracing::info;

/// Type alias for event store port trait object
type DynCalendarEventRepository = dyn CalendarEventRepository + Send + Sync + 'static;

/// Type alias for remote provider port trait object
type DynRemoteCalendarProvider = dyn RemoteCalendarProvider + Send + Sync + 'static;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub calendar: Arc<CalendarSyncService>,
}

impl AppContext {
    /// Create a context from configuration found in the environment or a
    /// config file.
    pub fn from_env() -> Result<Self> {
        Self::new(config::load()?)
    }

    /// Create a new application context with custom configuration
    ///
    /// Opens the database, applies the schema and wires the Google provider
    /// into the sync service.
    pub fn new(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::from_config(&config.database)?);
        db.run_migrations()?;

        let repository: Arc<DynCalendarEventRepository> =
            Arc::new(SqliteCalendarEventRepository::new(Arc::clone(&db)));
        let provider: Arc<DynRemoteCalendarProvider> =
            Arc::new(GoogleCalendarProvider::from_config(&config.provider)?);

        let calendar = Arc::new(
            CalendarSyncService::new(provider, repository)
                .with_window_months(config.sync.window_months),
        );

        info!(
            db_path = %db.path().display(),
            calendar_id = %config.provider.calendar_id,
            window_months = config.sync.window_months,
            "calsync context initialized"
        );

        Ok(Self { config, db, calendar })
    }
}
