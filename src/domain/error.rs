//! Error types for the orchestration layer.
//!
//! This module defines the crate-level error type [`BizdirError`], the request
//! failure taxonomy [`RequestError`] and [`TransportError`], and a [`Result`]
//! alias. All errors are implemented using the `thiserror` crate.
//!
//! Application-level failures (`status: "FAIL"` or `"ERROR"` in an otherwise
//! successful response) are not errors here: they travel as ordinary
//! [`ApiResponse`](crate::domain::ApiResponse) values for the caller to branch on.

use std::time::Duration;
use thiserror::Error;

/// A failed network operation as reported by the REST client.
///
/// The orchestration layer treats the transport as opaque, so the failure is
/// carried as a message. Conversions exist for the error types a client
/// implementation typically produces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    /// Creates a transport error from any message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("malformed response body: {err}"))
    }
}

/// Why a tracked request produced no value.
///
/// Returned by [`RequestTracker`](crate::request::RequestTracker) in place of a
/// rejected future. Trackers never panic or unwind on failure; every failure
/// ends up as one of these variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The fetch itself failed (connection refused, DNS, malformed body).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The fetch did not settle within the configured limit.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Unbounded retry gave up without a positive response.
    #[error("no positive response after {attempts} attempts in {elapsed:?}")]
    DeadlineElapsed {
        /// Attempts made before giving up.
        attempts: u32,
        /// Time spent retrying.
        elapsed: Duration,
    },
}

impl RequestError {
    /// Returns `true` for failures caused by the network rather than by a
    /// retry budget.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}

/// The main error type for `bizdir` operations.
#[derive(Debug, Error)]
pub enum BizdirError {
    /// Configuration is invalid or could not be read.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A tracked request failed.
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// Page numbers are 1-based.
    #[error("Invalid page number: {0}")]
    InvalidPage(u32),
}

impl From<toml::de::Error> for BizdirError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// A specialized `Result` type for `bizdir` operations.
pub type Result<T> = std::result::Result<T, BizdirError>;

/// Result of a single fetch as produced by the REST client.
pub type TransportResult<T> = std::result::Result<T, TransportError>;
