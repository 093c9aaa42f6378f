//! Pacing and rate-limit backoff for remote calls.
//!
//! Every attempt is preceded by a fixed pacing delay. When the service answers
//! `429 Too Many Requests`, the client waits a linearly growing backoff (or the
//! server's `Retry-After`, whichever is longer) and tries again, up to a fixed
//! number of retries.

use std::time::Duration;

/// Configuration for pacing and rate-limit backoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Fixed delay before every attempt, including the first.
    pub pacing: Duration,
    /// Backoff unit; the Nth rate-limited attempt waits `base_backoff * N`.
    pub base_backoff: Duration,
    /// Retries after the first attempt. Total attempts = `1 + max_retries`.
    pub max_retries: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            pacing: Duration::from_millis(100),
            base_backoff: Duration::from_millis(500),
            max_retries: 5,
        }
    }
}

impl RetryConfig {
    /// Upper bound on attempts for one logical call.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Per-call retry bookkeeping. Not persisted.
#[derive(Debug)]
pub struct RetryState<'a> {
    config: &'a RetryConfig,
    attempt: u32,
}

impl<'a> RetryState<'a> {
    pub fn new(config: &'a RetryConfig) -> Self {
        Self {
            config,
            attempt: 0,
        }
    }

    /// Record the start of an attempt. Returns its 1-based number.
    pub fn begin_attempt(&mut self) -> u32 {
        self.attempt += 1;
        self.attempt
    }

    /// Whether another attempt is allowed after the current one.
    pub fn can_retry(&self) -> bool {
        self.attempt < self.config.max_attempts()
    }

    /// Backoff after the current attempt was rate-limited.
    ///
    /// `max(base_backoff * attempt, retry_after)`; a missing or unparsable
    /// `Retry-After` contributes zero.
    pub fn record_rate_limited(&mut self, retry_after: Option<&str>) -> Duration {
        let linear = self.config.base_backoff.saturating_mul(self.attempt);
        let server = parse_retry_after(retry_after).unwrap_or(Duration::ZERO);
        linear.max(server)
    }
}

/// Parse a `Retry-After` header given as an integer number of seconds.
///
/// HTTP-date forms and negative values are treated as absent.
pub fn parse_retry_after(value: Option<&str>) -> Option<Duration> {
    value?.trim().parse::<u64>().ok().map(Duration::from_secs)
}
