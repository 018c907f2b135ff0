//! Loading and retry state around one asynchronous operation.
//!
//! A [`RequestTracker`] executes requests (typically REST fetches) and exposes
//! their progress as a [`RequestState`] so that the view layer never manages
//! loading flags by hand. State is published through a `tokio::sync::watch`
//! channel; views either poll [`RequestTracker::state`] or await changes on a
//! receiver from [`RequestTracker::subscribe`].
//!
//! # Lifecycle
//!
//! 1. `send` (or `send_with_retry`) marks the tracker loading immediately, before
//!    the returned future is polled.
//! 2. The request runs, with the configured timeout applied to each attempt.
//! 3. Failures are logged and returned as [`RequestError`]; nothing panics.
//! 4. When the last outstanding request settles (or its future is dropped),
//!    loading is cleared, unless auto-stop is disabled, in which case the
//!    caller ends it with [`RequestTracker::stop_loading`].
//!
//! ```
//! use bizdir::request::RequestTracker;
//! use bizdir::domain::TransportError;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let tracker = RequestTracker::new("business-profile");
//! let pending = tracker.send(async { Ok::<_, TransportError>("profile") });
//! assert!(tracker.is_loading());
//!
//! assert_eq!(pending.await, Ok("profile"));
//! assert!(!tracker.is_loading());
//! # }
//! ```

use super::retry::{RetryPolicy, RetrySettings};
use super::timeout::with_timeout;
use crate::domain::{RequestError, TransportResult};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::Instrument;

/// Observable progress of a tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestState {
    pub loading: bool,
    pub is_retrying: bool,
}

#[derive(Debug)]
struct TrackerInner {
    label: String,
    state: watch::Sender<RequestState>,
    in_flight: AtomicUsize,
    auto_stop: bool,
    timeout: Option<Duration>,
    retry: RetrySettings,
}

/// Tracks loading and retry state for requests issued through it.
///
/// Cloning is cheap and clones share state. Several requests may be
/// outstanding at once; they share one loading flag, which stays set until
/// the last of them settles. There is no de-duplication.
#[derive(Debug, Clone)]
pub struct RequestTracker {
    inner: Arc<TrackerInner>,
}

/// Builder for [`RequestTracker`].
#[derive(Debug, Clone)]
pub struct RequestTrackerBuilder {
    label: String,
    auto_stop: bool,
    timeout: Option<Duration>,
    retry: RetrySettings,
}

impl RequestTrackerBuilder {
    /// Whether loading clears itself when requests settle. Default: `true`.
    ///
    /// Disable when the loading indicator must outlive the request, e.g.
    /// across a redirect started by the response.
    #[must_use]
    pub const fn auto_stop(mut self, auto_stop: bool) -> Self {
        self.auto_stop = auto_stop;
        self
    }

    /// Applies a timeout to every attempt. Default: none.
    #[must_use]
    pub const fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the backoff used between retry attempts.
    ///
    /// # Parameters
    ///
    /// * `retry` - Delay bounds and the wall-clock cap for unbounded retry
    #[must_use]
    pub const fn retry_settings(mut self, retry: RetrySettings) -> Self {
        self.retry = retry;
        self
    }

    /// Finishes the tracker. It starts idle: not loading, not retrying.
    #[must_use]
    pub fn build(self) -> RequestTracker {
        let (state, _) = watch::channel(RequestState::default());
        RequestTracker {
            inner: Arc::new(TrackerInner {
                label: self.label,
                state,
                in_flight: AtomicUsize::new(0),
                auto_stop: self.auto_stop,
                timeout: self.timeout,
                retry: self.retry,
            }),
        }
    }
}

/// Marks one outstanding request; releasing it is the `finally` of the request.
struct LoadingGuard {
    inner: Arc<TrackerInner>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let remaining = self.inner.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
        if remaining > 0 {
            return;
        }
        let auto_stop = self.inner.auto_stop;
        self.inner.state.send_if_modified(|state| {
            let before = *state;
            state.is_retrying = false;
            if auto_stop {
                state.loading = false;
            }
            *state != before
        });
    }
}

impl RequestTracker {
    /// Creates a tracker with auto-stop, no timeout and default retry settings.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self::builder(label).build()
    }

    /// Starts configuring a tracker.
    ///
    /// # Parameters
    ///
    /// * `label` - Names the tracker in log output
    ///
    /// # Example
    ///
    /// ```rust
    /// use bizdir::request::RequestTracker;
    /// use std::time::Duration;
    ///
    /// let tracker = RequestTracker::builder("reviews")
    ///     .auto_stop(false)
    ///     .timeout(Some(Duration::from_secs(10)))
    ///     .build();
    /// assert!(!tracker.is_loading());
    /// ```
    #[must_use]
    pub fn builder(label: impl Into<String>) -> RequestTrackerBuilder {
        RequestTrackerBuilder {
            label: label.into(),
            auto_stop: true,
            timeout: None,
            retry: RetrySettings::default(),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Current snapshot of the tracker's progress.
    #[must_use]
    pub fn state(&self) -> RequestState {
        *self.inner.state.borrow()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    #[must_use]
    pub fn is_retrying(&self) -> bool {
        self.state().is_retrying
    }

    /// Returns a receiver notified on every state change.
    ///
    /// Setting a flag to the value it already has does not notify.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.inner.state.subscribe()
    }

    /// Clears the loading flag. Needed when auto-stop is disabled.
    pub fn stop_loading(&self) {
        self.inner.state.send_if_modified(|state| {
            let changed = state.loading;
            state.loading = false;
            changed
        });
    }

    /// Runs a single already-constructed request.
    ///
    /// Loading is set before this method returns. The future resolves to the
    /// request's value or to the logged failure.
    ///
    /// # Errors
    ///
    /// Resolves to [`RequestError::Transport`] if the request fails and
    /// [`RequestError::Timeout`] if it outlives the configured timeout.
    pub fn send<T, F>(&self, request: F) -> impl Future<Output = Result<T, RequestError>>
    where
        F: Future<Output = TransportResult<T>>,
    {
        let guard = self.begin();
        let tracker = self.clone();
        async move {
            let outcome = tracker.attempt(request).await;
            if let Err(e) = &outcome {
                tracing::warn!(tracker = %tracker.label(), error = %e, "request failed");
            }
            drop(guard);
            outcome
        }
    }

    /// Runs a request under a retry policy.
    ///
    /// `factory` is invoked once per attempt, so each attempt starts a fresh
    /// request. `is_positive` is consulted only by
    /// [`RetryPolicy::UntilPositive`].
    ///
    /// # Parameters
    ///
    /// * `factory` - Starts one attempt
    /// * `policy` - How many attempts to make
    /// * `is_positive` - Accepts a response as final under `UntilPositive`
    ///
    /// # Errors
    ///
    /// Resolves to the last attempt's error once the policy gives up, or to
    /// [`RequestError::DeadlineElapsed`] when unbounded retry exceeds
    /// [`RetrySettings::max_elapsed`].
    pub fn send_with_retry<T, F, Fut, P>(
        &self,
        mut factory: F,
        policy: RetryPolicy,
        is_positive: P,
    ) -> impl Future<Output = Result<T, RequestError>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = TransportResult<T>>,
        P: Fn(&T) -> bool,
    {
        let guard = self.begin();
        let tracker = self.clone();
        let span = tracing::debug_span!("tracked_request", tracker = %self.label(), policy = ?policy);
        async move {
            let outcome = tracker.run_with_retry(&mut factory, policy, &is_positive).await;
            drop(guard);
            outcome
        }
        .instrument(span)
    }

    /// Retries up to `retries` additional times on failure.
    ///
    /// # Errors
    ///
    /// See [`send_with_retry`](Self::send_with_retry).
    pub fn retry<T, F, Fut>(
        &self,
        factory: F,
        retries: u32,
    ) -> impl Future<Output = Result<T, RequestError>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = TransportResult<T>>,
    {
        self.send_with_retry(factory, RetryPolicy::Times(retries), |_: &T| true)
    }

    /// Retries until `is_positive` accepts a response.
    pub fn retry_until<T, F, Fut, P>(
        &self,
        factory: F,
        is_positive: P,
    ) -> impl Future<Output = Result<T, RequestError>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = TransportResult<T>>,
        P: Fn(&T) -> bool,
    {
        self.send_with_retry(factory, RetryPolicy::UntilPositive, is_positive)
    }

    fn begin(&self) -> LoadingGuard {
        self.inner.in_flight.fetch_add(1, Ordering::SeqCst);
        self.inner.state.send_if_modified(|state| {
            let changed = !state.loading;
            state.loading = true;
            changed
        });
        LoadingGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    fn set_retrying(&self, retrying: bool) {
        self.inner.state.send_if_modified(|state| {
            let changed = state.is_retrying != retrying;
            state.is_retrying = retrying;
            changed
        });
    }

    async fn attempt<T, F>(&self, request: F) -> Result<T, RequestError>
    where
        F: Future<Output = TransportResult<T>>,
    {
        match self.inner.timeout {
            Some(limit) => with_timeout(request, limit).await,
            None => request.await.map_err(RequestError::from),
        }
    }

    async fn run_with_retry<T, F, Fut, P>(
        &self,
        factory: &mut F,
        policy: RetryPolicy,
        is_positive: &P,
    ) -> Result<T, RequestError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = TransportResult<T>>,
        P: Fn(&T) -> bool,
    {
        let started = Instant::now();
        let mut delays = self.inner.retry.delays();
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            let outcome = self.attempt(factory()).await;

            let settled = match (&outcome, policy) {
                (_, RetryPolicy::Never) | (Ok(_), RetryPolicy::Times(_)) => true,
                (Err(_), RetryPolicy::Times(retries)) => attempts > retries,
                (Ok(value), RetryPolicy::UntilPositive) => is_positive(value),
                (Err(_), RetryPolicy::UntilPositive) => false,
            };

            if settled {
                if let Err(e) = &outcome {
                    tracing::warn!(tracker = %self.label(), attempts, error = %e, "request failed");
                }
                self.set_retrying(false);
                return outcome;
            }

            let elapsed = started.elapsed();
            if policy == RetryPolicy::UntilPositive {
                if let Some(max_elapsed) = self.inner.retry.max_elapsed {
                    if elapsed >= max_elapsed {
                        tracing::warn!(
                            tracker = %self.label(),
                            attempts,
                            elapsed_ms = elapsed.as_millis(),
                            "giving up, no positive response"
                        );
                        self.set_retrying(false);
                        return Err(RequestError::DeadlineElapsed { attempts, elapsed });
                    }
                }
            }

            match &outcome {
                Err(e) => {
                    tracing::debug!(tracker = %self.label(), attempt = attempts, error = %e, "attempt failed, retrying");
                }
                Ok(_) => {
                    tracing::debug!(tracker = %self.label(), attempt = attempts, "response not positive, retrying");
                }
            }

            self.set_retrying(true);
            let delay = delays.next().unwrap_or(self.inner.retry.max_delay);
            tokio::time::sleep(delay).await;
        }
    }
}
