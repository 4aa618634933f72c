//! Conversions from external infrastructure errors into domain errors.

use calsync_domain::CalSyncError;
use reqwest::Error as HttpError;
use reqwest::StatusCode;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CalSyncError);

impl From<InfraError> for CalSyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CalSyncError> for InfraError {
    fn from(value: CalSyncError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoCalSyncError {
    fn into_calsync(self) -> CalSyncError;
}

/// Message used for unique-constraint violations; the store retries on it.
pub const UNIQUE_VIOLATION: &str = "unique constraint violation";

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → CalSyncError */
/* -------------------------------------------------------------------------- */

impl IntoCalSyncError for SqlError {
    fn into_calsync(self) -> CalSyncError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        CalSyncError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        CalSyncError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067 | 1555) => {
                        CalSyncError::Database(UNIQUE_VIOLATION.into())
                    }
                    (ErrorCode::ConstraintViolation, 275) => {
                        CalSyncError::Database(format!("check constraint violation: {message}"))
                    }
                    _ => CalSyncError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => CalSyncError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                CalSyncError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, name, ty) => {
                CalSyncError::Database(format!("invalid column type for '{name}': {ty}"))
            }
            RE::InvalidPath(path) => CalSyncError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => CalSyncError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_calsync())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → CalSyncError */
/* -------------------------------------------------------------------------- */

impl IntoCalSyncError for r2d2::Error {
    fn into_calsync(self) -> CalSyncError {
        CalSyncError::Database(format!("failed to acquire pooled connection: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(value.into_calsync())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CalSyncError */
/* -------------------------------------------------------------------------- */

impl IntoCalSyncError for HttpError {
    fn into_calsync(self) -> CalSyncError {
        if self.is_timeout() {
            return CalSyncError::RemoteUnavailable("HTTP request timed out".into());
        }

        if self.is_connect() {
            return CalSyncError::RemoteUnavailable("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return classify_status(status, None);
        }

        if self.is_decode() {
            return CalSyncError::Internal(format!("malformed provider response: {self}"));
        }

        CalSyncError::RemoteUnavailable(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_calsync())
    }
}

/// Classify a non-success provider status.
///
/// `detail` is the provider's own error message, kept verbatim when present.
pub fn classify_status(status: StatusCode, detail: Option<&str>) -> CalSyncError {
    let code = status.as_u16();
    let message = match detail.map(str::trim).filter(|d| !d.is_empty()) {
        Some(detail) => detail.to_string(),
        None => format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status")),
    };

    match code {
        401 | 403 => CalSyncError::RemoteAuth(message),
        408 | 429 => CalSyncError::RemoteUnavailable(message),
        400..=499 => CalSyncError::RemoteValidation(message),
        _ => CalSyncError::RemoteUnavailable(message),
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
