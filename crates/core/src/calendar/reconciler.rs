//! Reconciliation of provider events into the local store

use std::sync::Arc;

use calsync_domain::{
    CalSyncError, EventFields, RemoteEvent, Result, UpsertChange, UpsertOutcome,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::normalizer::{normalize, SkippedEvent};
use super::ports::CalendarEventRepository;

/// Tally of one reconciliation batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    /// Events actually written (created + updated + unchanged).
    pub processed: usize,
    /// Records inserted for the first time.
    pub created: usize,
    /// Records whose stored fields changed.
    pub updated: usize,
    /// Records already matching the provider.
    pub unchanged: usize,
    /// Provider events that could not be normalized.
    pub skipped: Vec<SkippedEvent>,
}

impl ReconcileReport {
    fn record(&mut self, change: UpsertChange) {
        self.processed += 1;
        match change {
            UpsertChange::Created => self.created += 1,
            UpsertChange::Updated => self.updated += 1,
            UpsertChange::Unchanged => self.unchanged += 1,
        }
    }

    /// True when the batch left the store exactly as it found it.
    pub fn is_noop(&self) -> bool {
        self.created == 0 && self.updated == 0
    }
}

/// Converges the store onto observed provider events by upserting on
/// `(user_id, external_id)`.
///
/// Holds no locks and keeps no in-memory state: the repository's atomic
/// upsert is the only coordination between concurrent batches.
#[derive(Clone)]
pub struct Reconciler {
    repository: Arc<dyn CalendarEventRepository>,
}

impl Reconciler {
    /// Reconciler writing through `repository`.
    pub fn new(repository: Arc<dyn CalendarEventRepository>) -> Self {
        Self { repository }
    }

    /// Create or update the single record keyed by `(user_id, external_id)`.
    #[instrument(skip(self, fields), fields(title = %fields.title))]
    pub async fn upsert_one(
        &self,
        user_id: &str,
        external_id: &str,
        fields: &EventFields,
    ) -> Result<UpsertOutcome> {
        if user_id.trim().is_empty() {
            return Err(CalSyncError::validation("userId", "User id is required"));
        }
        if external_id.trim().is_empty() {
            return Err(CalSyncError::validation("externalId", "External id is required"));
        }
        if fields.start_time >= fields.end_time {
            return Err(CalSyncError::validation("endTime", "End time must be after start time"));
        }

        let outcome = self.repository.upsert_by_external_id(user_id, external_id, fields).await?;
        debug!(event_id = %outcome.event.id, change = %outcome.change, "Upserted calendar event");
        Ok(outcome)
    }

    /// Normalize and upsert every event in `remote_events`, in order.
    ///
    /// Events that fail normalization are recorded as skipped and the batch
    /// continues. Store errors abort the batch; events written before the
    /// failure stay committed.
    #[instrument(skip(self, remote_events), fields(batch_size = remote_events.len()))]
    pub async fn reconcile_batch(
        &self,
        user_id: &str,
        remote_events: &[RemoteEvent],
    ) -> Result<ReconcileReport> {
        let mut report = ReconcileReport::default();

        for raw in remote_events {
            let normalized = match normalize(raw) {
                Ok(normalized) => normalized,
                Err(skipped) => {
                    warn!(event_id = %skipped.event_id, reason = %skipped.reason, "Skipping remote event");
                    report.skipped.push(skipped);
                    continue;
                }
            };

            let outcome =
                self.upsert_one(user_id, &normalized.external_id, &normalized.fields).await?;
            report.record(outcome.change);
        }

        info!(
            processed = report.processed,
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            skipped = report.skipped.len(),
            "Reconciled calendar batch"
        );

        Ok(report)
    }
}
