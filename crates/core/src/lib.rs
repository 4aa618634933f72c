//! # Calsync Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the event store and the remote provider
//! - The reconciliation engine: time windows, event normalization,
//!   idempotent upserts and windowed reads
//! - The sync service that strings them together for callers
//!
//! ## Architecture Principles
//! - Only depends on `calsync-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod calendar;

pub use calendar::normalizer::{
    normalize, normalize_created, normalize_user_submission, SkipReason, SkippedEvent,
};
pub use calendar::ports::{CalendarEventRepository, RemoteCalendarProvider};
pub use calendar::query::QueryService;
pub use calendar::reconciler::{ReconcileReport, Reconciler};
pub use calendar::service::{CalendarSyncService, RefreshReport};
pub use calendar::window::{default_sync_window, end_of_day, normalize_read_window};
