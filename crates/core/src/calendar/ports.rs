//! Port interfaces for calendar reconciliation
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use calsync_domain::{
    CalendarEvent, Credential, EventDraft, EventFields, RemoteEvent, Result, SyncWindow,
    UpsertOutcome,
};

/// Persistence for canonical calendar events
#[async_trait]
pub trait CalendarEventRepository: Send + Sync {
    /// Create or update the record keyed by `(user_id, external_id)`.
    ///
    /// Must be a single atomic write against the store's uniqueness
    /// constraint: concurrent callers with the same key end up with one
    /// record, and a writer that loses the race updates instead of failing.
    /// Writing fields identical to the stored ones reports
    /// [`UpsertChange::Unchanged`](calsync_domain::UpsertChange) and leaves
    /// `updated_at` untouched.
    async fn upsert_by_external_id(
        &self,
        user_id: &str,
        external_id: &str,
        fields: &EventFields,
    ) -> Result<UpsertOutcome>;

    /// Events for `user_id` matched by [`SyncWindow::contains`], ascending by
    /// start time.
    async fn find_events_in_window(
        &self,
        user_id: &str,
        window: &SyncWindow,
    ) -> Result<Vec<CalendarEvent>>;
}

/// Remote calendar provider operations over a single default calendar
#[async_trait]
pub trait RemoteCalendarProvider: Send + Sync {
    /// List every event instance in `window`, recurring events expanded,
    /// ordered by start time. Zero matches is an empty list, not an error.
    ///
    /// Credential rejection must surface as `RemoteAuth` and is never retried.
    async fn fetch_events(
        &self,
        credential: &Credential,
        window: &SyncWindow,
    ) -> Result<Vec<RemoteEvent>>;

    /// Insert one event. The returned event is authoritative for the id and
    /// the stored start/end.
    async fn create_event(&self, credential: &Credential, draft: &EventDraft)
        -> Result<RemoteEvent>;
}
