//! Event normalization
//!
//! Maps provider events and user submissions onto the canonical event shape.
//! Provider anomalies become [`SkippedEvent`]s so a batch can carry on;
//! user input problems become field-tagged validation errors.

use std::fmt;

use calsync_domain::constants::{MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH, UNTITLED_EVENT_TITLE};
use calsync_domain::{
    CalSyncError, EventDraft, EventFields, EventSubmission, NormalizedEvent, RemoteEvent,
    RemoteEventTime, Result, ValidationErrors,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

/// Why a provider event was left out of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Blank or absent provider id.
    MissingId,
    /// No usable start time or date.
    MissingStart,
    /// No usable end time or date.
    MissingEnd,
    /// A `dateTime` or `date` value that could not be parsed.
    InvalidTimestamp(String),
    /// End at or before start.
    EmptyInterval,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingId => f.write_str("event has no id"),
            Self::MissingStart => f.write_str("event has no start"),
            Self::MissingEnd => f.write_str("event has no end"),
            Self::InvalidTimestamp(detail) => write!(f, "invalid timestamp: {detail}"),
            Self::EmptyInterval => f.write_str("end is not after start"),
        }
    }
}

/// A provider event that normalization declined, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedEvent {
    /// Provider id as received.
    pub event_id: String,
    pub reason: SkipReason,
}

/// Map a listed provider event to the canonical shape.
///
/// - `title` is the summary, or `"Untitled"` when it is absent or empty
/// - `summary` is the description, else the summary, else the title
/// - `is_all_day` holds when the start carries a date with no time-of-day
///
/// Events missing an id, either side of their interval, or a parsable
/// timestamp are skipped rather than failed.
pub fn normalize(raw: &RemoteEvent) -> std::result::Result<NormalizedEvent, SkippedEvent> {
    let skip = |reason| SkippedEvent { event_id: raw.id.clone(), reason };

    if raw.id.trim().is_empty() {
        return Err(skip(SkipReason::MissingId));
    }

    let start = raw.start.as_ref().ok_or_else(|| skip(SkipReason::MissingStart))?;
    let end = raw.end.as_ref().ok_or_else(|| skip(SkipReason::MissingEnd))?;

    let start = parse_event_time(start, "start")
        .map_err(skip)?
        .ok_or_else(|| skip(SkipReason::MissingStart))?;
    let end =
        parse_event_time(end, "end").map_err(skip)?.ok_or_else(|| skip(SkipReason::MissingEnd))?;
    let (start_time, end_time) = (start.instant, end.instant);

    if start_time >= end_time {
        return Err(skip(SkipReason::EmptyInterval));
    }

    let summary = non_empty(raw.summary.as_deref());
    let title = summary.unwrap_or(UNTITLED_EVENT_TITLE).to_string();
    let description = non_empty(raw.description.as_deref()).or(summary).unwrap_or(&title);

    Ok(NormalizedEvent {
        external_id: raw.id.clone(),
        fields: EventFields {
            summary: description.to_string(),
            title,
            start_time,
            end_time,
            is_all_day: start.date_only,
        },
    })
}

/// Map the provider's response to an insert onto the canonical shape.
///
/// The response is authoritative for the id and the stored interval. Its
/// summary and description fall back to the draft that was sent. A response
/// that cannot be normalized is an internal error: the provider accepted the
/// event but handed back something unusable.
pub fn normalize_created(created: &RemoteEvent, draft: &EventDraft) -> Result<NormalizedEvent> {
    let mut merged = created.clone();
    if non_empty(merged.summary.as_deref()).is_none() {
        merged.summary = Some(draft.title.clone());
    }
    if non_empty(merged.description.as_deref()).is_none() {
        merged.description = draft.description.clone();
    }

    normalize(&merged).map_err(|skipped| {
        CalSyncError::Internal(format!(
            "provider returned an unusable created event '{}': {}",
            skipped.event_id, skipped.reason
        ))
    })
}

/// Validate a user submission against `now`.
///
/// Every failing field is reported at once, keyed by its caller-facing
/// name (`title`, `description`, `startTime`, `endTime`).
pub fn normalize_user_submission(
    submission: &EventSubmission,
    now: DateTime<Utc>,
) -> Result<EventDraft> {
    let mut errors = ValidationErrors::default();

    let title = submission.title.trim();
    if title.is_empty() {
        errors.add("title", "Event title is required");
    } else if title.chars().count() > MAX_TITLE_LENGTH {
        errors.add("title", format!("Event title must be less than {MAX_TITLE_LENGTH} characters"));
    }

    let description = non_empty(submission.description.as_deref());
    if description.is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LENGTH) {
        errors.add(
            "description",
            format!("Description must be less than {MAX_DESCRIPTION_LENGTH} characters"),
        );
    }

    if submission.end_time <= submission.start_time {
        errors.add("endTime", "End time must be after start time");
    }
    if submission.start_time <= now {
        errors.add("startTime", "Event must be scheduled for the future");
    }

    errors.into_result()?;

    Ok(EventDraft {
        title: title.to_string(),
        description: description.map(str::to_string),
        start_time: submission.start_time,
        end_time: submission.end_time,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// One parsed side of a remote event.
struct ParsedTime {
    instant: DateTime<Utc>,
    /// Parsed from a bare date, so there is no time-of-day.
    date_only: bool,
}

/// `Ok(None)` when neither `dateTime` nor `date` carries a value.
fn parse_event_time(
    value: &RemoteEventTime,
    side: &str,
) -> std::result::Result<Option<ParsedTime>, SkipReason> {
    if let Some(date_time) = value.timestamp() {
        let instant = parse_timestamp(date_time)
            .map_err(|e| SkipReason::InvalidTimestamp(format!("{side} '{date_time}': {e}")))?;
        return Ok(Some(ParsedTime { instant, date_only: false }));
    }
    if let Some(date) = value.calendar_date() {
        let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|e| SkipReason::InvalidTimestamp(format!("{side} date '{date}': {e}")))?;
        return Ok(Some(ParsedTime { instant: day.and_time(NaiveTime::MIN).and_utc(), date_only: true }));
    }
    Ok(None)
}

/// RFC 3339, reading a timestamp without an offset as UTC.
fn parse_timestamp(value: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    let trimmed = value.trim();
    let has_explicit_timezone = trimmed.ends_with('Z')
        || trimmed
            .rfind('T')
            .is_some_and(|idx| trimmed[idx + 1..].chars().any(|c| matches!(c, '+' | '-')));

    let candidate = if has_explicit_timezone { trimmed.to_string() } else { format!("{trimmed}Z") };

    DateTime::parse_from_rfc3339(&candidate).map(|dt| dt.with_timezone(&Utc))
}
