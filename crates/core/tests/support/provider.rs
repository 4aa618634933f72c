use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use calsync_core::RemoteCalendarProvider;
use calsync_domain::{
    CalSyncError, Credential, EventDraft, RemoteEvent, RemoteEventTime, Result as DomainResult,
    SyncWindow,
};

/// Scripted `RemoteCalendarProvider`.
///
/// Listings return the seeded events; inserts echo the draft back under
/// `created_id` unless a response was scripted. Either call can be made to
/// fail with a fixed error.
#[derive(Clone)]
pub struct FakeCalendarProvider {
    events: Arc<Mutex<Vec<RemoteEvent>>>,
    created_id: String,
    created_response: Arc<Mutex<Option<RemoteEvent>>>,
    failure: Arc<Mutex<Option<CalSyncError>>>,
    fetch_calls: Arc<AtomicUsize>,
    create_calls: Arc<AtomicUsize>,
    last_window: Arc<Mutex<Option<SyncWindow>>>,
    last_token: Arc<Mutex<Option<String>>>,
}

impl FakeCalendarProvider {
    pub fn new(events: Vec<RemoteEvent>) -> Self {
        Self {
            events: Arc::new(Mutex::new(events)),
            created_id: "g9".to_string(),
            created_response: Arc::new(Mutex::new(None)),
            failure: Arc::new(Mutex::new(None)),
            fetch_calls: Arc::new(AtomicUsize::new(0)),
            create_calls: Arc::new(AtomicUsize::new(0)),
            last_window: Arc::new(Mutex::new(None)),
            last_token: Arc::new(Mutex::new(None)),
        }
    }

    pub fn failing_with(self, error: CalSyncError) -> Self {
        *self.failure.lock().unwrap() = Some(error);
        self
    }

    pub fn with_created_response(self, response: RemoteEvent) -> Self {
        *self.created_response.lock().unwrap() = Some(response);
        self
    }

    pub fn set_events(&self, events: Vec<RemoteEvent>) {
        *self.events.lock().unwrap() = events;
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn last_window(&self) -> Option<SyncWindow> {
        *self.last_window.lock().unwrap()
    }

    pub fn last_token(&self) -> Option<String> {
        self.last_token.lock().unwrap().clone()
    }

    fn check_failure(&self) -> DomainResult<()> {
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteCalendarProvider for FakeCalendarProvider {
    async fn fetch_events(
        &self,
        credential: &Credential,
        window: &SyncWindow,
    ) -> DomainResult<Vec<RemoteEvent>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_window.lock().unwrap() = Some(*window);
        *self.last_token.lock().unwrap() = Some(credential.access_token().to_string());
        self.check_failure()?;
        Ok(self.events.lock().unwrap().clone())
    }

    async fn create_event(
        &self,
        credential: &Credential,
        draft: &EventDraft,
    ) -> DomainResult<RemoteEvent> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_token.lock().unwrap() = Some(credential.access_token().to_string());
        self.check_failure()?;

        if let Some(response) = self.created_response.lock().unwrap().clone() {
            return Ok(response);
        }
        Ok(RemoteEvent {
            id: self.created_id.clone(),
            summary: Some(draft.title.clone()),
            description: draft.description.clone(),
            start: Some(RemoteEventTime::date_time(draft.start_time.to_rfc3339())),
            end: Some(RemoteEventTime::date_time(draft.end_time.to_rfc3339())),
        })
    }
}
