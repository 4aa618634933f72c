//! Shared test helpers for `calsync-core` integration tests.
//!
//! In-memory fakes for both ports plus a few event builders, so the tests
//! can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod calendar;
pub mod provider;

use calsync_domain::{RemoteEvent, RemoteEventTime};

/// Timed provider event with RFC 3339 start and end.
pub fn remote_event(id: &str, summary: &str, start: &str, end: &str) -> RemoteEvent {
    RemoteEvent {
        id: id.to_string(),
        summary: Some(summary.to_string()),
        description: None,
        start: Some(RemoteEventTime::date_time(start)),
        end: Some(RemoteEventTime::date_time(end)),
    }
}

/// Date-only provider event covering `[start, end)`.
pub fn all_day_event(id: &str, summary: &str, start: &str, end: &str) -> RemoteEvent {
    RemoteEvent {
        id: id.to_string(),
        summary: Some(summary.to_string()),
        description: None,
        start: Some(RemoteEventTime::date(start)),
        end: Some(RemoteEventTime::date(end)),
    }
}

/// Provider event with neither start nor end.
pub fn malformed_event(id: &str) -> RemoteEvent {
    RemoteEvent { id: id.to_string(), summary: Some("Broken".to_string()), ..RemoteEvent::default() }
}
