//! Provider HTTP calls with timeout, bounded retry and error classification
//!
//! Callers get either a decoded body or a domain error. Rejected credentials
//! surface as `RemoteAuth` on the first attempt; timeouts, refused connections
//! and 5xx responses are retried with exponential backoff and surface as
//! `RemoteUnavailable` once the attempt budget is spent; any other 4xx is
//! `RemoteValidation` carrying the provider's own message.

use std::time::Duration;

use calsync_domain::{CalSyncError, ProviderConfig, Result};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{classify_status, InfraError};

/// Upper bound on the exponent of the backoff multiplier.
const MAX_BACKOFF_SHIFT: u32 = 8;

/// HTTP client for remote provider calls.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    retry: RetryPolicy,
}

/// What one attempt produced.
enum Attempt<T> {
    Done(T),
    /// Transient failure; may be retried while attempts remain.
    Transient(CalSyncError),
    /// Failure that retrying cannot fix.
    Fatal(CalSyncError),
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client with default timeout and attempt budget.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Client honouring the provider timeout and attempt budget.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        Self::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .max_attempts(config.max_attempts as usize)
            .user_agent(concat!("calsync/", env!("CARGO_PKG_VERSION")))
            .build()
    }

    /// Start a request against `url`.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Send `request` and decode a successful JSON body as `T`.
    ///
    /// `operation` names the call in logs and error messages. The request
    /// body must be buffered so the request can be replayed on retry.
    pub async fn send_json<T>(&self, request: RequestBuilder, operation: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let attempts = self.retry.max_attempts;

        for attempt in 1..=attempts {
            let replay = request.try_clone().ok_or_else(|| {
                CalSyncError::Internal(format!("{operation}: request body cannot be replayed"))
            })?;

            match self.attempt::<T>(replay, operation).await {
                Attempt::Done(body) => return Ok(body),
                Attempt::Fatal(err) => return Err(err),
                Attempt::Transient(err) if attempt < attempts => {
                    let delay = self.retry.delay_before(attempt + 1);
                    warn!(operation, attempt, error = %err, delay_ms = delay.as_millis() as u64, "retrying provider call");
                    tokio::time::sleep(delay).await;
                }
                Attempt::Transient(err) => {
                    warn!(operation, attempts, error = %err, "provider call failed after all attempts");
                    return Err(err);
                }
            }
        }

        Err(CalSyncError::Internal(format!("{operation}: no attempt was made")))
    }

    async fn attempt<T>(&self, request: RequestBuilder, operation: &str) -> Attempt<T>
    where
        T: DeserializeOwned,
    {
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                let retryable = err.is_timeout() || err.is_connect();
                let err = CalSyncError::from(InfraError::from(err));
                return if retryable { Attempt::Transient(err) } else { Attempt::Fatal(err) };
            }
        };

        let status = response.status();
        debug!(operation, %status, "provider responded");

        if status.is_success() {
            return match response.json::<T>().await {
                Ok(body) => Attempt::Done(body),
                Err(err) => Attempt::Fatal(CalSyncError::Internal(format!(
                    "{operation}: malformed provider response: {err}"
                ))),
            };
        }

        let err = rejection(status, response).await;
        if status.is_server_error() {
            Attempt::Transient(err)
        } else {
            Attempt::Fatal(err)
        }
    }
}

/// Classify a non-success response, preferring the provider's message.
async fn rejection(status: StatusCode, response: Response) -> CalSyncError {
    let body = response.text().await.unwrap_or_default();
    let detail = provider_message(&body).unwrap_or(body);
    classify_status(status, Some(&detail))
}

/// `error.message` from a JSON error envelope, or a top-level `message`.
fn provider_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .or_else(|| value.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[derive(Debug, Clone, Copy)]
struct RetryPolicy {
    max_attempts: usize,
    base_backoff: Duration,
}

impl RetryPolicy {
    /// Wait before attempt number `attempt` (2 for the first retry).
    fn delay_before(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(2) as u32).min(MAX_BACKOFF_SHIFT);
        self.base_backoff.saturating_mul(1u32 << shift)
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    /// Per-request timeout; an expired timeout counts as a transient failure.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts for transient failures (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Delay before the first retry; doubles on each later one.
    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    /// `User-Agent` header sent with every request.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    ///
    /// # Errors
    /// `Internal` or `RemoteUnavailable` when the TLS backend cannot start.
    pub fn build(self) -> Result<HttpClient> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        let client = builder.build().map_err(|err| CalSyncError::from(InfraError::from(err)))?;

        Ok(HttpClient {
            client,
            retry: RetryPolicy {
                max_attempts: self.max_attempts.max(1),
                base_backoff: self.base_backoff,
            },
        })
    }
}
