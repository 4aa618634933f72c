//! Domain data types
//!
//! Canonical store records, transient provider shapes and the value types
//! passed between the engine's components.

pub mod credential;
pub mod event;
pub mod remote;
pub mod submission;
pub mod window;

pub use credential::Credential;
pub use event::{CalendarEvent, EventFields, NormalizedEvent, UpsertChange, UpsertOutcome};
pub use remote::{RemoteEvent, RemoteEventTime};
pub use submission::{EventDraft, EventSubmission};
pub use window::SyncWindow;
