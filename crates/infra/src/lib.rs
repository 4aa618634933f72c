//! # Calsync Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The SQLite event store (r2d2 pool, schema, atomic upserts)
//! - The Google Calendar provider and its retrying HTTP client
//! - Error conversions from rusqlite/r2d2/reqwest into domain errors
//! - Configuration loading from the environment or config files
//!
//! ## Architecture
//! - Implements traits defined in `calsync-core`
//! - Contains all "impure" code (I/O, network)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;

// Re-export commonly used items
pub use database::*;
pub use errors::InfraError;
pub use http::*;
pub use integrations::*;
