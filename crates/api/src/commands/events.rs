//! Calendar event commands

use calsync_core::ReconcileReport;
use calsync_domain::{CalSyncError, CalendarEvent, Credential, EventSubmission, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::utils::command_helpers::execute_logged;
use crate::AppContext;

/// Result of a user-triggered refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshOutcome {
    pub success: bool,
    pub message: String,
    /// Events returned by the provider for the refresh window.
    pub event_count: usize,
    pub report: ReconcileReport,
}

/// Stored events for `user_id` between `time_min` and the end of
/// `time_max`'s day.
///
/// Both bounds are ISO-8601 date-times or plain dates.
pub async fn list_events(
    ctx: &AppContext,
    user_id: &str,
    time_min: &str,
    time_max: &str,
) -> Result<Vec<CalendarEvent>> {
    execute_logged("events::list_events", || async {
        let from = parse_instant("timeMin", time_min)?;
        let to = parse_instant("timeMax", time_max)?;

        ctx.calendar.list_events(user_id, from, to).await
    })
    .await
}

/// Pull the provider's events for the default window into the store.
pub async fn refresh_events(
    ctx: &AppContext,
    user_id: &str,
    credential: &Credential,
) -> Result<RefreshOutcome> {
    execute_logged("events::refresh_events", || async {
        let refreshed = ctx.calendar.refresh(user_id, credential).await?;

        info!(user_id, event_count = refreshed.fetched, "Refreshed calendar events");
        Ok::<_, CalSyncError>(RefreshOutcome {
            success: true,
            message: format!("Successfully synced {} events", refreshed.fetched),
            event_count: refreshed.fetched,
            report: refreshed.report,
        })
    })
    .await
}

/// Create an event with the provider and store the provider's copy.
pub async fn create_event(
    ctx: &AppContext,
    user_id: &str,
    credential: &Credential,
    submission: &EventSubmission,
) -> Result<CalendarEvent> {
    execute_logged("events::create_event", || async {
        ctx.calendar.create_event(user_id, credential, submission).await
    })
    .await
}

/// RFC 3339 date-time, or a bare `YYYY-MM-DD` taken as midnight UTC.
fn parse_instant(field: &str, value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(CalSyncError::validation(
        field,
        format!("Invalid date '{value}': expected an ISO-8601 date or date-time"),
    ))
}
