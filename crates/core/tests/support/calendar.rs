use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use calsync_core::CalendarEventRepository;
use calsync_domain::{
    CalSyncError, CalendarEvent, EventFields, Result as DomainResult, SyncWindow, UpsertChange,
    UpsertOutcome,
};
use chrono::Utc;

/// In-memory mock for `CalendarEventRepository`.
///
/// Records are keyed by `(user_id, external_id)` and every upsert runs under
/// a single lock, which gives the same atomicity the SQL store gets from its
/// uniqueness constraint.
#[derive(Default, Clone)]
pub struct InMemoryEventRepository {
    events: Arc<Mutex<HashMap<(String, String), CalendarEvent>>>,
    next_id: Arc<AtomicUsize>,
    upserts: Arc<AtomicUsize>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored record, ordered by start time.
    pub fn all(&self) -> Vec<CalendarEvent> {
        let mut events: Vec<_> = self.events.lock().unwrap().values().cloned().collect();
        events.sort_by_key(|e| e.start_time);
        events
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn get(&self, user_id: &str, external_id: &str) -> Option<CalendarEvent> {
        self.events
            .lock()
            .unwrap()
            .get(&(user_id.to_string(), external_id.to_string()))
            .cloned()
    }

    /// Number of upsert calls received.
    pub fn upsert_calls(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CalendarEventRepository for InMemoryEventRepository {
    async fn upsert_by_external_id(
        &self,
        user_id: &str,
        external_id: &str,
        fields: &EventFields,
    ) -> DomainResult<UpsertOutcome> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let mut events = self.events.lock().unwrap();

        let key = (user_id.to_string(), external_id.to_string());
        if let Some(existing) = events.get_mut(&key) {
            if existing.fields() == *fields {
                return Ok(UpsertOutcome { event: existing.clone(), change: UpsertChange::Unchanged });
            }
            existing.title = fields.title.clone();
            existing.summary = fields.summary.clone();
            existing.start_time = fields.start_time;
            existing.end_time = fields.end_time;
            existing.is_all_day = fields.is_all_day;
            existing.updated_at = now;
            return Ok(UpsertOutcome { event: existing.clone(), change: UpsertChange::Updated });
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let event = CalendarEvent {
            id: format!("evt-{id}"),
            user_id: user_id.to_string(),
            external_id: Some(external_id.to_string()),
            title: fields.title.clone(),
            summary: fields.summary.clone(),
            start_time: fields.start_time,
            end_time: fields.end_time,
            is_all_day: fields.is_all_day,
            created_at: now,
            updated_at: now,
        };
        events.insert(key, event.clone());
        Ok(UpsertOutcome { event, change: UpsertChange::Created })
    }

    async fn find_events_in_window(
        &self,
        user_id: &str,
        window: &SyncWindow,
    ) -> DomainResult<Vec<CalendarEvent>> {
        let mut events: Vec<_> = self
            .events
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.user_id == user_id && window.contains(e))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.start_time);
        Ok(events)
    }
}

/// Repository that accepts `fail_after` upserts and then reports a database
/// error on every call.
pub struct FailingEventRepository {
    inner: InMemoryEventRepository,
    fail_after: usize,
}

impl FailingEventRepository {
    pub fn new(inner: InMemoryEventRepository, fail_after: usize) -> Self {
        Self { inner, fail_after }
    }
}

#[async_trait]
impl CalendarEventRepository for FailingEventRepository {
    async fn upsert_by_external_id(
        &self,
        user_id: &str,
        external_id: &str,
        fields: &EventFields,
    ) -> DomainResult<UpsertOutcome> {
        if self.inner.upsert_calls() >= self.fail_after {
            return Err(CalSyncError::Database("disk I/O error".to_string()));
        }
        self.inner.upsert_by_external_id(user_id, external_id, fields).await
    }

    async fn find_events_in_window(
        &self,
        user_id: &str,
        window: &SyncWindow,
    ) -> DomainResult<Vec<CalendarEvent>> {
        self.inner.find_events_in_window(user_id, window).await
    }
}
