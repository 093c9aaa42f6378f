//! Unified error type for the ledring-lib crate.
//!
//! [`LedringError`] wraps the remote-call error ([`ApiError`]) and the
//! domain-specific kinds (`Config`, `Color`, `NotFound`, `Interrupted`).
//! `From` impls allow `?` to propagate across module boundaries seamlessly.

use std::fmt;

use crate::client::ApiError;
use crate::wait::Interrupted;

/// Unified error type for ledring-lib operations.
#[derive(Debug)]
pub enum LedringError {
    /// Remote service error (transport, status, retry exhaustion, bad body).
    Api(ApiError),
    /// Standard I/O error (config persistence).
    Io(std::io::Error),
    /// Configuration validation error.
    Config(String),
    /// Color parsing error.
    Color(String),
    /// A required light was not present in the fetched set.
    NotFound(String),
    /// A pacing, backoff, or animation wait was cancelled.
    Interrupted,
}

impl fmt::Display for LedringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedringError::Api(e) => write!(f, "{e}"),
            LedringError::Io(e) => write!(f, "I/O error: {e}"),
            LedringError::Config(e) => write!(f, "Config error: {e}"),
            LedringError::Color(e) => write!(f, "Color error: {e}"),
            LedringError::NotFound(e) => write!(f, "Not found: {e}"),
            LedringError::Interrupted => write!(f, "Interrupted while waiting"),
        }
    }
}

impl std::error::Error for LedringError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedringError::Api(e) => Some(e),
            LedringError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ApiError> for LedringError {
    fn from(e: ApiError) -> Self {
        LedringError::Api(e)
    }
}

impl From<std::io::Error> for LedringError {
    fn from(e: std::io::Error) -> Self {
        LedringError::Io(e)
    }
}

impl From<Interrupted> for LedringError {
    fn from(_: Interrupted) -> Self {
        LedringError::Interrupted
    }
}

/// Crate-level Result alias using [`LedringError`].
pub type Result<T> = std::result::Result<T, LedringError>;
