//! Provider credential

use std::fmt;

/// Access credential for the remote provider, scoped to one request.
///
/// The engine treats the token as opaque and possibly expired; refreshing it
/// is the caller's job. Only the remote adapter ever reads it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    access_token: String,
    refresh_token: Option<String>,
}

impl Credential {
    /// Credential carrying only an access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self { access_token: access_token.into(), refresh_token: None }
    }

    /// Attach the refresh token issued alongside the access token.
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Bearer token sent to the provider.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Refresh token, if the caller supplied one.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
