//! Canonical calendar event records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_label_conversions;

/// Calendar event as stored locally.
///
/// `(user_id, external_id)` identifies at most one record; `start_time` is
/// always strictly before `end_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub user_id: String,
    /// Provider-assigned identifier; `None` only for purely local records.
    pub external_id: Option<String>,
    pub title: String,
    pub summary: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_all_day: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CalendarEvent {
    /// The mutable fields of this record.
    pub fn fields(&self) -> EventFields {
        EventFields {
            title: self.title.clone(),
            summary: self.summary.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
            is_all_day: self.is_all_day,
        }
    }
}

/// Fields an upsert writes on create and overwrites on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFields {
    pub title: String,
    pub summary: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_all_day: bool,
}

/// A remote event mapped to the canonical shape, ready to upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEvent {
    pub external_id: String,
    pub fields: EventFields,
}

/// What an upsert did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertChange {
    /// No record existed for the key.
    Created,
    /// The stored record differed and was overwritten.
    Updated,
    /// The stored record already matched; nothing was written.
    Unchanged,
}

impl_label_conversions!(UpsertChange {
    Created => "created",
    Updated => "updated",
    Unchanged => "unchanged",
});

/// Result of a single upsert: the record as stored plus what changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// Stored record after the write.
    pub event: CalendarEvent,
    /// What the write did.
    pub change: UpsertChange,
}
