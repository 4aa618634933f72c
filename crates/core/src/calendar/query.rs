//! Windowed reads over the local store

use std::sync::Arc;

use calsync_domain::{CalendarEvent, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use super::ports::CalendarEventRepository;
use super::window::normalize_read_window;

/// Read path over stored events, independent of sync.
#[derive(Clone)]
pub struct QueryService {
    repository: Arc<dyn CalendarEventRepository>,
}

impl QueryService {
    /// Query service reading from `repository`.
    pub fn new(repository: Arc<dyn CalendarEventRepository>) -> Self {
        Self { repository }
    }

    /// Events for `user_id` starting at or after `from` and ending by the
    /// end of `to`'s day, ascending by start time.
    ///
    /// # Errors
    /// `InvalidRange` when `from` is not before the widened end.
    #[instrument(skip(self))]
    pub async fn list_events(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        let window = normalize_read_window(from, to)?;

        let mut events = self.repository.find_events_in_window(user_id, &window).await?;
        events.retain(|event| event.user_id == user_id && window.contains(event));
        events.sort_by_key(|event| event.start_time);

        debug!(count = events.len(), "Listed calendar events");
        Ok(events)
    }
}
