//! Fetch timeout wrapper.

use crate::domain::{RequestError, TransportResult};
use std::future::Future;
use std::time::Duration;

/// Races `request` against a timer of length `limit`.
///
/// # Errors
///
/// Returns [`RequestError::Timeout`] when the timer wins and
/// [`RequestError::Transport`] when the request itself fails.
pub async fn with_timeout<T, F>(request: F, limit: Duration) -> Result<T, RequestError>
where
    F: Future<Output = TransportResult<T>>,
{
    match tokio::time::timeout(limit, request).await {
        Ok(outcome) => outcome.map_err(RequestError::from),
        Err(_elapsed) => Err(RequestError::Timeout(limit)),
    }
}
