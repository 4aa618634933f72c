//! # Calsync API
//!
//! Caller-facing layer - commands and application wiring.
//!
//! This crate contains:
//! - Commands for listing, refreshing and creating calendar events
//! - Application context (dependency injection)
//! - The post-login sync task
//! - Logging setup
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Transport-agnostic: an HTTP or desktop shell calls these functions

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
pub use utils::logging::init_tracing;
