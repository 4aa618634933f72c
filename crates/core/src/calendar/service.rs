//! Calendar sync service - the entry points callers use
//!
//! Strings the remote provider, the normalizer, the reconciler and the query
//! service together for the three caller-facing flows: refresh, local
//! creation and windowed reads.

use std::sync::Arc;

use calsync_domain::constants::DEFAULT_SYNC_WINDOW_MONTHS;
use calsync_domain::{CalendarEvent, Credential, EventSubmission, Result, SyncWindow};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use super::normalizer::{normalize_created, normalize_user_submission};
use super::ports::{CalendarEventRepository, RemoteCalendarProvider};
use super::query::QueryService;
use super::reconciler::{ReconcileReport, Reconciler};
use super::window::default_sync_window;

/// Result of a refresh: what was asked of the provider and what was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    pub window: SyncWindow,
    /// Events the provider returned, skipped ones included.
    pub fetched: usize,
    pub report: ReconcileReport,
}

/// Calendar sync service
pub struct CalendarSyncService {
    provider: Arc<dyn RemoteCalendarProvider>,
    reconciler: Reconciler,
    query: QueryService,
    window_months: u32,
}

impl CalendarSyncService {
    /// Create a new sync service over an injected provider and store
    pub fn new(
        provider: Arc<dyn RemoteCalendarProvider>,
        repository: Arc<dyn CalendarEventRepository>,
    ) -> Self {
        Self {
            provider,
            reconciler: Reconciler::new(Arc::clone(&repository)),
            query: QueryService::new(repository),
            window_months: DEFAULT_SYNC_WINDOW_MONTHS,
        }
    }

    /// Months either side of today covered by [`refresh`](Self::refresh).
    pub fn with_window_months(mut self, months: u32) -> Self {
        self.window_months = months;
        self
    }

    /// Reconciler shared by refresh and event creation.
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Pull the default window from the provider and reconcile it for
    /// `user_id`.
    ///
    /// Provider and store errors propagate unchanged; `RemoteAuth` in
    /// particular is never retried here.
    #[instrument(skip(self, credential))]
    pub async fn refresh(&self, user_id: &str, credential: &Credential) -> Result<RefreshReport> {
        self.refresh_at(user_id, credential, Utc::now()).await
    }

    /// [`refresh`](Self::refresh) with the window anchored to `now`.
    pub async fn refresh_at(
        &self,
        user_id: &str,
        credential: &Credential,
        now: DateTime<Utc>,
    ) -> Result<RefreshReport> {
        let window = default_sync_window(now, self.window_months)?;
        let remote_events = self.provider.fetch_events(credential, &window).await?;
        let fetched = remote_events.len();

        let report = self.reconciler.reconcile_batch(user_id, &remote_events).await?;

        info!(user_id, fetched, processed = report.processed, "Calendar refresh complete");
        Ok(RefreshReport { window, fetched, report })
    }

    /// Create an event through the provider and store what it returned.
    ///
    /// Invalid submissions fail before the provider is called. The stored
    /// record is keyed by the id in the provider's response.
    #[instrument(skip(self, credential, submission), fields(title = %submission.title))]
    pub async fn create_event(
        &self,
        user_id: &str,
        credential: &Credential,
        submission: &EventSubmission,
    ) -> Result<CalendarEvent> {
        let draft = normalize_user_submission(submission, Utc::now())?;

        let created = self.provider.create_event(credential, &draft).await?;
        let normalized = normalize_created(&created, &draft)?;

        let outcome =
            self.reconciler.upsert_one(user_id, &normalized.external_id, &normalized.fields).await?;

        info!(event_id = %outcome.event.id, external_id = %normalized.external_id, "Created calendar event");
        Ok(outcome.event)
    }

    /// Windowed read; see [`QueryService::list_events`].
    pub async fn list_events(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        self.query.list_events(user_id, from, to).await
    }
}
