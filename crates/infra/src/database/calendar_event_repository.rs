//! SQLite-backed implementation of the CalendarEventRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use calsync_core::CalendarEventRepository;
use calsync_domain::{
    CalSyncError, CalendarEvent, EventFields, Result as DomainResult, SyncWindow, UpsertChange,
    UpsertOutcome,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row, TransactionBehavior};
use tokio::task;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::manager::{map_sql_error, DbManager};
use super::pool::SqliteConnection;
use crate::errors::UNIQUE_VIOLATION;

/// Attempts per upsert when a racing writer trips the uniqueness constraint
/// or the database stays busy.
const MAX_UPSERT_ATTEMPTS: usize = 3;

const UPSERT_SQL: &str = "INSERT INTO calendar_events (
        id, user_id, external_id, title, summary,
        start_ms, end_ms, is_all_day, created_at_ms, updated_at_ms
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
    ON CONFLICT(user_id, external_id) DO UPDATE SET
        title = excluded.title,
        summary = excluded.summary,
        start_ms = excluded.start_ms,
        end_ms = excluded.end_ms,
        is_all_day = excluded.is_all_day,
        updated_at_ms = excluded.updated_at_ms
    WHERE calendar_events.title IS NOT excluded.title
       OR calendar_events.summary IS NOT excluded.summary
       OR calendar_events.start_ms IS NOT excluded.start_ms
       OR calendar_events.end_ms IS NOT excluded.end_ms
       OR calendar_events.is_all_day IS NOT excluded.is_all_day
    RETURNING id";

const SELECT_COLUMNS: &str = "id, user_id, external_id, title, summary,
        start_ms, end_ms, is_all_day, created_at_ms, updated_at_ms";

/// SQLite implementation of CalendarEventRepository
pub struct SqliteCalendarEventRepository {
    db: Arc<DbManager>,
}

impl SqliteCalendarEventRepository {
    /// Create a new calendar event repository
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    fn upsert(
        conn: &mut SqliteConnection,
        user_id: &str,
        external_id: &str,
        fields: &EventFields,
    ) -> DomainResult<UpsertOutcome> {
        let candidate_id = Uuid::now_v7().to_string();
        let now_ms = Utc::now().timestamp_millis();

        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(map_sql_error)?;

        let written: Option<String> = tx
            .query_row(
                UPSERT_SQL,
                params![
                    candidate_id,
                    user_id,
                    external_id,
                    fields.title,
                    fields.summary,
                    fields.start_time.timestamp_millis(),
                    fields.end_time.timestamp_millis(),
                    fields.is_all_day,
                    now_ms,
                ],
                |row| row.get(0),
            )
            .optional()
            .map_err(map_sql_error)?;

        let change = match written.as_deref() {
            Some(id) if id == candidate_id => UpsertChange::Created,
            Some(_) => UpsertChange::Updated,
            None => UpsertChange::Unchanged,
        };

        let row = tx
            .query_row(
                &format!(
                    "SELECT {SELECT_COLUMNS} FROM calendar_events
                     WHERE user_id = ?1 AND external_id = ?2"
                ),
                params![user_id, external_id],
                EventRow::from_row,
            )
            .map_err(map_sql_error)?;

        tx.commit().map_err(map_sql_error)?;

        Ok(UpsertOutcome { event: row.into_event()?, change })
    }

    fn query_window(
        conn: &SqliteConnection,
        user_id: &str,
        window: &SyncWindow,
    ) -> DomainResult<Vec<CalendarEvent>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM calendar_events
                 WHERE user_id = ?1
                   AND start_ms >= ?2
                   AND (end_ms <= ?3 OR (is_all_day = 1 AND end_ms <= ?3 + 1))
                 ORDER BY start_ms ASC, end_ms ASC, id ASC"
            ))
            .map_err(map_sql_error)?;

        let rows = stmt
            .query_map(
                params![user_id, window.from().timestamp_millis(), window.to().timestamp_millis()],
                EventRow::from_row,
            )
            .map_err(map_sql_error)?;

        let mut events = Vec::new();
        for row in rows {
            events.push(row.map_err(map_sql_error)?.into_event()?);
        }
        Ok(events)
    }
}

#[async_trait]
impl CalendarEventRepository for SqliteCalendarEventRepository {
    #[instrument(skip(self, fields))]
    async fn upsert_by_external_id(
        &self,
        user_id: &str,
        external_id: &str,
        fields: &EventFields,
    ) -> DomainResult<UpsertOutcome> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();
        let external_id = external_id.to_string();
        let fields = fields.clone();

        task::spawn_blocking(move || -> DomainResult<UpsertOutcome> {
            let mut conn = db.get_connection()?;
            let mut attempt = 1;
            loop {
                match Self::upsert(&mut conn, &user_id, &external_id, &fields) {
                    Ok(outcome) => {
                        debug!(event_id = %outcome.event.id, change = %outcome.change, "calendar event upserted");
                        return Ok(outcome);
                    }
                    Err(err) if attempt < MAX_UPSERT_ATTEMPTS && should_retry(&err) => {
                        warn!(attempt, error = %err, "retrying calendar event upsert");
                        attempt += 1;
                    }
                    Err(err) => return Err(err),
                }
            }
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self))]
    async fn find_events_in_window(
        &self,
        user_id: &str,
        window: &SyncWindow,
    ) -> DomainResult<Vec<CalendarEvent>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();
        let window = *window;

        task::spawn_blocking(move || -> DomainResult<Vec<CalendarEvent>> {
            let conn = db.get_connection()?;
            let events = Self::query_window(&conn, &user_id, &window)?;
            debug!(count = events.len(), "calendar events loaded for window");
            Ok(events)
        })
        .await
        .map_err(map_join_error)?
    }
}

/// Raw column values of one `calendar_events` row.
struct EventRow {
    id: String,
    user_id: String,
    external_id: Option<String>,
    title: String,
    summary: String,
    start_ms: i64,
    end_ms: i64,
    is_all_day: bool,
    created_at_ms: i64,
    updated_at_ms: i64,
}

impl EventRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            external_id: row.get(2)?,
            title: row.get(3)?,
            summary: row.get(4)?,
            start_ms: row.get(5)?,
            end_ms: row.get(6)?,
            is_all_day: row.get(7)?,
            created_at_ms: row.get(8)?,
            updated_at_ms: row.get(9)?,
        })
    }

    fn into_event(self) -> DomainResult<CalendarEvent> {
        Ok(CalendarEvent {
            start_time: from_millis(self.start_ms, "start_ms")?,
            end_time: from_millis(self.end_ms, "end_ms")?,
            created_at: from_millis(self.created_at_ms, "created_at_ms")?,
            updated_at: from_millis(self.updated_at_ms, "updated_at_ms")?,
            id: self.id,
            user_id: self.user_id,
            external_id: self.external_id,
            title: self.title,
            summary: self.summary,
            is_all_day: self.is_all_day,
        })
    }
}

fn from_millis(value: i64, column: &str) -> DomainResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value)
        .ok_or_else(|| CalSyncError::Database(format!("{column} out of range: {value}")))
}

fn should_retry(err: &CalSyncError) -> bool {
    matches!(err, CalSyncError::Database(msg) if msg == UNIQUE_VIOLATION) || err.is_retryable()
}

fn map_join_error(err: task::JoinError) -> CalSyncError {
    if err.is_cancelled() {
        CalSyncError::Internal("calendar repository task cancelled".into())
    } else {
        CalSyncError::Internal(format!("calendar repository task panic: {err}"))
    }
}
