//! Time windows used for remote queries and local reads

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::event::CalendarEvent;
use crate::errors::{CalSyncError, Result};

/// Closed interval `[from, to]`, with `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncWindow {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl SyncWindow {
    /// Window from `from` to `to`, rejecting an inverted range with `InvalidRange`.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self> {
        if from > to {
            return Err(CalSyncError::InvalidRange(format!(
                "window start {} is after window end {}",
                from.to_rfc3339(),
                to.to_rfc3339()
            )));
        }
        Ok(Self { from, to })
    }

    /// Inclusive lower bound.
    pub fn from(&self) -> DateTime<Utc> {
        self.from
    }

    /// Inclusive upper bound.
    pub fn to(&self) -> DateTime<Utc> {
        self.to
    }

    /// Whether a stored event falls inside this window.
    ///
    /// The event must start at or after `from` and end at or before `to`.
    /// All-day events carry an exclusive end (the midnight after their last
    /// day), so they may end one millisecond past an end-of-day bound.
    pub fn contains(&self, event: &CalendarEvent) -> bool {
        if event.start_time < self.from {
            return false;
        }
        if event.is_all_day {
            event.end_time <= self.to + Duration::milliseconds(1)
        } else {
            event.end_time <= self.to
        }
    }
}
