//! Time window construction for remote queries and local reads
//!
//! Day boundaries are computed in UTC.

use calsync_domain::{CalSyncError, Result, SyncWindow};
use chrono::{DateTime, Months, NaiveDate, NaiveTime, Utc};

/// Widen `to` to the last instant of its calendar day and pair it with
/// `from` unchanged.
///
/// Day-granularity reads (`from == to == D`) then cover everything on `D`,
/// including all-day events anchored at its midnight.
///
/// # Errors
/// `InvalidRange` unless `from` is strictly before the widened end.
pub fn normalize_read_window(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<SyncWindow> {
    let widened = end_of_day(to)?;
    if from >= widened {
        return Err(CalSyncError::InvalidRange(format!(
            "from {} must be before {}",
            from.to_rfc3339(),
            widened.to_rfc3339()
        )));
    }
    SyncWindow::new(from, widened)
}

/// 23:59:59.999 on the calendar day of `instant`.
pub fn end_of_day(instant: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let last_milli = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
        .ok_or_else(|| CalSyncError::Internal("could not derive end of day".into()))?;
    Ok(instant.date_naive().and_time(last_milli).and_utc())
}

/// Window used for provider listings: `months` calendar months either side of
/// the current date, both ends at midnight.
///
/// Anchored to the date rather than the instant, so every refresh on the
/// same day queries the same range.
pub fn default_sync_window(now: DateTime<Utc>, months: u32) -> Result<SyncWindow> {
    let today = now.date_naive();
    let span = Months::new(months);

    let from = today.checked_sub_months(span).ok_or_else(|| out_of_range(today, months))?;
    let to = today.checked_add_months(span).ok_or_else(|| out_of_range(today, months))?;

    SyncWindow::new(midnight(from), midnight(to))
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn out_of_range(today: NaiveDate, months: u32) -> CalSyncError {
    CalSyncError::InvalidRange(format!("{months} months around {today} is out of range"))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn widens_end_to_last_millisecond_of_day() {
        let window =
            normalize_read_window(utc(2024, 6, 3, 0, 0, 0), utc(2024, 6, 3, 0, 0, 0)).unwrap();

        assert_eq!(window.from(), utc(2024, 6, 3, 0, 0, 0));
        assert_eq!(window.to(), utc(2024, 6, 3, 23, 59, 59) + Duration::milliseconds(999));
    }

    #[test]
    fn keeps_start_boundary_as_given() {
        let window =
            normalize_read_window(utc(2024, 6, 3, 14, 30, 0), utc(2024, 6, 5, 8, 0, 0)).unwrap();

        assert_eq!(window.from(), utc(2024, 6, 3, 14, 30, 0));
        assert_eq!(window.to().date_naive(), utc(2024, 6, 5, 0, 0, 0).date_naive());
    }

    #[test]
    fn start_later_on_the_same_day_is_still_valid() {
        let window =
            normalize_read_window(utc(2024, 6, 3, 18, 0, 0), utc(2024, 6, 3, 9, 0, 0)).unwrap();
        assert_eq!(window.from(), utc(2024, 6, 3, 18, 0, 0));
    }

    #[test]
    fn rejects_start_after_widened_end() {
        let err = normalize_read_window(utc(2024, 6, 4, 0, 0, 0), utc(2024, 6, 3, 12, 0, 0))
            .unwrap_err();
        assert!(matches!(err, CalSyncError::InvalidRange(_)));
    }

    #[test]
    fn rejects_start_equal_to_widened_end() {
        let last = utc(2024, 6, 3, 23, 59, 59) + Duration::milliseconds(999);
        let err = normalize_read_window(last, last).unwrap_err();
        assert!(matches!(err, CalSyncError::InvalidRange(_)));
    }

    #[test]
    fn default_window_spans_six_months_around_today() {
        let window = default_sync_window(utc(2024, 8, 31, 15, 42, 7), 6).unwrap();

        assert_eq!(window.from(), utc(2024, 2, 29, 0, 0, 0));
        assert_eq!(window.to(), utc(2025, 2, 28, 0, 0, 0));
    }

    #[test]
    fn default_window_ignores_time_of_day() {
        let morning = default_sync_window(utc(2024, 6, 3, 0, 0, 1), 6).unwrap();
        let evening = default_sync_window(utc(2024, 6, 3, 23, 59, 59), 6).unwrap();
        assert_eq!(morning, evening);
    }
}
