//! Commands - the caller-facing operations

mod auth;
mod events;

pub use auth::*;
pub use events::*;
