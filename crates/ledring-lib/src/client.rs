//! Resilient remote client — pacing, group scoping, and 429 retry.
//!
//! [`RemoteClient::call`] performs one logical operation against the light
//! service. It sleeps a fixed pacing delay before every attempt, attaches the
//! group id header, and retries rate-limited attempts with backoff. All other
//! failures surface immediately.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::credential::CredentialResolver;
use crate::error::Result;
use crate::retry::{RetryConfig, RetryState};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Method};
use crate::wait::Sleeper;

/// Default name of the header carrying the group id.
pub const DEFAULT_GROUP_HEADER: &str = "X-Hasura-Group-ID";

const STATUS_TOO_MANY_REQUESTS: u16 = 429;

// ── Error type ──

/// Remote-call errors.
#[derive(Debug)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read.
    Transport(String),
    /// Non-2xx response that is not retried.
    Status {
        method: Method,
        path: String,
        status: u16,
    },
    /// Still rate limited after the last allowed attempt.
    RetriesExhausted {
        method: Method,
        path: String,
        attempts: u32,
    },
    /// The response body was not the expected JSON.
    Parse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(e) => write!(f, "Request failed: {e}"),
            ApiError::Status {
                method,
                path,
                status,
            } => write!(f, "{method} {path} failed with status {status}"),
            ApiError::RetriesExhausted {
                method,
                path,
                attempts,
            } => write!(
                f,
                "{method} {path} exhausted retries: still rate limited (status 429) after {attempts} attempts"
            ),
            ApiError::Parse(e) => write!(f, "Invalid response body: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

// ── Client ──

/// Paced, retrying JSON client scoped to one group.
pub struct RemoteClient<T, W> {
    transport: T,
    sleeper: W,
    credentials: Arc<CredentialResolver>,
    retry: RetryConfig,
    group_header: String,
}

impl<T: HttpTransport, W: Sleeper> RemoteClient<T, W> {
    pub fn new(
        transport: T,
        sleeper: W,
        credentials: Arc<CredentialResolver>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            transport,
            sleeper,
            credentials,
            retry,
            group_header: DEFAULT_GROUP_HEADER.to_string(),
        }
    }

    /// Use a different header name for the group id.
    pub fn with_group_header(mut self, name: impl Into<String>) -> Self {
        self.group_header = name.into();
        self
    }

    /// Perform one logical call.
    ///
    /// Returns the parsed body, or an empty JSON object when the body is empty.
    /// Makes at most `1 + max_retries` attempts.
    pub fn call(&self, path: &str, method: Method, body: Option<&Value>) -> Result<Value> {
        let payload = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| ApiError::Parse(format!("serializing request: {e}")))?;

        let mut state = RetryState::new(&self.retry);
        loop {
            self.sleeper.sleep(self.retry.pacing)?;
            let attempt = state.begin_attempt();

            let request = self.build_request(path, method, payload.clone());
            log::debug!("{method} {path} (attempt {attempt})");
            let response = self.transport.execute(&request)?;

            if response.is_success() {
                return parse_body(&response);
            }

            if response.status == STATUS_TOO_MANY_REQUESTS {
                if !state.can_retry() {
                    log::warn!("{method} {path}: rate limited, giving up after {attempt} attempts");
                    return Err(ApiError::RetriesExhausted {
                        method,
                        path: path.to_string(),
                        attempts: attempt,
                    }
                    .into());
                }
                let delay = state.record_rate_limited(response.header("Retry-After"));
                log::warn!(
                    "{method} {path}: rate limited (attempt {attempt}), retrying in {:.1}s",
                    delay.as_secs_f64()
                );
                self.sleeper.sleep(delay)?;
                continue;
            }

            log::debug!("{method} {path}: status {}", response.status);
            return Err(ApiError::Status {
                method,
                path: path.to_string(),
                status: response.status,
            }
            .into());
        }
    }

    fn build_request(&self, path: &str, method: Method, body: Option<Vec<u8>>) -> HttpRequest {
        let mut headers = vec![(
            self.group_header.clone(),
            self.credentials.group_id().to_string(),
        )];
        if body.is_some() {
            headers.push(("Content-Type".into(), "application/json".into()));
        }
        HttpRequest {
            method,
            path: path.to_string(),
            headers,
            body,
        }
    }
}

fn parse_body(response: &HttpResponse) -> Result<Value> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_slice(&response.body).map_err(|e| ApiError::Parse(e.to_string()).into())
}
