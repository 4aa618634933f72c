//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Event normalization
pub const UNTITLED_EVENT_TITLE: &str = "Untitled";

// User submission limits
pub const MAX_TITLE_LENGTH: usize = 255;
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

// Provider defaults
pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";
pub const DEFAULT_CALENDAR_ID: &str = "primary";
pub const DEFAULT_PAGE_SIZE: u32 = 250;

// Sync window
pub const DEFAULT_SYNC_WINDOW_MONTHS: u32 = 6;
