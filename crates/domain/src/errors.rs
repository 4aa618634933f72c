//! Error types used throughout the application

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for calsync
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CalSyncError {
    /// Caller input is malformed; the map says which fields and why.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// The provider rejected the credential (expired or revoked).
    #[error("Remote authentication error: {0}")]
    RemoteAuth(String),

    /// Transport failure, timeout or provider-side 5xx.
    #[error("Remote provider unavailable: {0}")]
    RemoteUnavailable(String),

    /// The provider rejected the payload; message is the provider's own.
    #[error("Remote validation error: {0}")]
    RemoteValidation(String),

    #[error("Invalid time range: {0}")]
    InvalidRange(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CalSyncError {
    /// Build a validation error carrying a single field message.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::default();
        errors.add(field, message);
        Self::Validation(errors)
    }

    /// Whether a caller may retry the failed operation unchanged.
    ///
    /// Every write in the engine is idempotent, so a transient failure can be
    /// replayed safely. Auth failures are never retryable: a stale credential
    /// will keep failing.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RemoteUnavailable(_) => true,
            Self::Database(msg) => msg.contains("busy") || msg.contains("locked"),
            _ => false,
        }
    }

    /// Stable label suitable for logging and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::RemoteAuth(_) => "remote_auth",
            Self::RemoteUnavailable(_) => "remote_unavailable",
            Self::RemoteValidation(_) => "remote_validation",
            Self::InvalidRange(_) => "invalid_range",
            Self::Database(_) => "database",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::Internal(_) => "internal",
        }
    }
}

/// Field-tagged validation messages, keyed by the caller-facing field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Record `message` against `field`, keeping earlier messages.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// True when no field has a message.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `field` has at least one message.
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages recorded for `field`, empty when the field is valid.
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Failing field names in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(())` when nothing was recorded, otherwise a `Validation` error.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CalSyncError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Result type alias for calsync operations
pub type Result<T> = std::result::Result<T, CalSyncError>;
