//! Raw event shape returned by the remote provider

use serde::{Deserialize, Serialize};

/// Event as listed or returned by the provider.
///
/// Lives only for the duration of a sync call and is never persisted.
/// Missing fields deserialize to their defaults so one malformed item cannot
/// fail a whole listing; normalization decides what to skip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RemoteEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start: Option<RemoteEventTime>,
    pub end: Option<RemoteEventTime>,
}

/// One side of a remote event: either a full timestamp or a bare date.
///
/// Blank strings count as absent; the provider sometimes sends
/// `"dateTime": ""` next to a `date`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEventTime {
    /// RFC 3339 timestamp, offset optional.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    /// `YYYY-MM-DD`, used by all-day events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl RemoteEventTime {
    /// A side carrying a full timestamp.
    pub fn date_time(value: impl Into<String>) -> Self {
        Self { date_time: Some(value.into()), ..Self::default() }
    }

    /// A side carrying only a calendar date.
    pub fn date(value: impl Into<String>) -> Self {
        Self { date: Some(value.into()), ..Self::default() }
    }

    /// The timestamp, if present and not blank.
    pub fn timestamp(&self) -> Option<&str> {
        non_blank(self.date_time.as_deref())
    }

    /// The calendar date, if present and not blank.
    pub fn calendar_date(&self) -> Option<&str> {
        non_blank(self.date.as_deref())
    }

    /// True when the provider sent a date with no time-of-day.
    pub fn is_date_only(&self) -> bool {
        self.timestamp().is_none() && self.calendar_date().is_some()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
