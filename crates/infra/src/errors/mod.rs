//! Infrastructure error handling

pub mod conversions;

pub use conversions::{classify_status, InfraError, UNIQUE_VIOLATION};
