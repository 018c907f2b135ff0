//! Search-as-you-type against a query-matching endpoint.
//!
//! A [`DebouncedSearch`] owns the suggestion state of one search field. It
//! offers two entry points:
//!
//! - [`DebouncedSearch::search`] issues the request immediately.
//! - [`DebouncedSearch::search_debounced`] is the keystroke entry point: it
//!   re-arms a timer on every call and searches only after a quiet period.
//!
//! Responses are fenced: each request takes a [`Ticket`](crate::request::Ticket)
//! and a response is applied only if no newer response has been applied
//! already, so a slow answer to an old query never replaces the answer to a
//! newer one.

use super::debouncer::Debouncer;
use super::state::{SearchState, Suggestions};
use crate::domain::{ApiResponse, ApiStatus, RequestError, SearchPayload, TransportResult};
use crate::request::{RequestTracker, SequenceFence};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;

/// Request function bound to a query-matching endpoint.
pub type SearchRequestFn<P> =
    Arc<dyn Fn(String) -> BoxFuture<'static, TransportResult<ApiResponse<P>>> + Send + Sync>;

/// What a completed search did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Results were replaced and made visible.
    Applied { count: usize },
    /// The endpoint answered `FAIL` or `ERROR`; prior results are kept, but
    /// older responses still in flight will no longer apply.
    Unsuccessful(ApiStatus),
    /// A newer response or a reset got there first; this response was
    /// dropped, whatever its status.
    Stale,
}

struct SearchInner<P: SearchPayload> {
    label: String,
    request: SearchRequestFn<P>,
    tracker: RequestTracker,
    fence: SequenceFence,
    suggestions: watch::Sender<Suggestions<P::Item>>,
    debouncer: Debouncer,
}

/// Debounced, fenced search over one endpoint.
///
/// Cloning is cheap and clones share state.
pub struct DebouncedSearch<P: SearchPayload> {
    inner: Arc<SearchInner<P>>,
}

impl<P: SearchPayload> Clone for DebouncedSearch<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: SearchPayload> std::fmt::Debug for DebouncedSearch<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebouncedSearch")
            .field("label", &self.inner.label)
            .field("tracker", &self.inner.tracker)
            .field("delay", &self.inner.debouncer.delay())
            .finish_non_exhaustive()
    }
}

impl<P> DebouncedSearch<P>
where
    P: SearchPayload + Send + 'static,
{
    /// Creates a search over `request`, debounced by `delay`.
    ///
    /// # Parameters
    ///
    /// * `label` - Names the search in log output
    /// * `tracker` - Tracks loading for every request this search sends
    /// * `delay` - Quiet period before a debounced search fires
    /// * `request` - Fetches the endpoint's response for a query
    pub fn new<F, Fut>(
        label: impl Into<String>,
        tracker: RequestTracker,
        delay: Duration,
        request: F,
    ) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TransportResult<ApiResponse<P>>> + Send + 'static,
    {
        let request: SearchRequestFn<P> = Arc::new(move |query| request(query).boxed());
        let (suggestions, _) = watch::channel(Suggestions::default());
        Self {
            inner: Arc::new(SearchInner {
                label: label.into(),
                request,
                tracker,
                fence: SequenceFence::new(),
                suggestions,
                debouncer: Debouncer::new(delay),
            }),
        }
    }

    /// Snapshot of results, visibility and loading.
    #[must_use]
    pub fn state(&self) -> SearchState<P::Item> {
        SearchState::from_parts(
            self.inner.suggestions.borrow().clone(),
            self.inner.tracker.is_loading(),
        )
    }

    /// Returns a receiver notified whenever results or visibility change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Suggestions<P::Item>> {
        self.inner.suggestions.subscribe()
    }

    #[must_use]
    pub fn tracker(&self) -> &RequestTracker {
        &self.inner.tracker
    }

    /// Searches for `query` now.
    ///
    /// # Returns
    ///
    /// [`SearchOutcome::Applied`] when the results were replaced,
    /// [`SearchOutcome::Stale`] when a newer search or a reset got there
    /// first, and [`SearchOutcome::Unsuccessful`] for a `FAIL` or `ERROR`
    /// answer. Only an applied response touches the results.
    ///
    /// # Errors
    ///
    /// Returns the request failure; results are left untouched.
    pub async fn search(&self, query: impl Into<String>) -> Result<SearchOutcome, RequestError> {
        self.inner.search(query.into()).await
    }

    /// Searches for `query` once no further call has arrived for the
    /// configured delay. A transport failure on this path clears results.
    ///
    /// Must be called from within a tokio runtime.
    pub fn search_debounced(&self, query: impl Into<String>) {
        let query = query.into();
        let weak: Weak<SearchInner<P>> = Arc::downgrade(&self.inner);
        self.inner.debouncer.schedule(async move {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if let Err(e) = inner.search(query).await {
                if e.is_transport() {
                    tracing::debug!(search = %inner.label, error = %e, "clearing results after failed search");
                    inner.reset_results();
                }
            }
        });
    }

    /// Disarms a pending debounced search. Returns whether one was pending.
    pub fn cancel_pending(&self) -> bool {
        self.inner.debouncer.cancel()
    }

    /// Whether a debounced search is armed and has not fired yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.debouncer.is_pending()
    }

    pub fn show_results(&self) {
        self.inner.set_visible(true);
    }

    pub fn hide_results(&self) {
        self.inner.set_visible(false);
    }

    /// Discards results. A search still in flight will not apply.
    pub fn reset_results(&self) {
        self.inner.reset_results();
    }

    /// Query the current results answer, if any.
    #[must_use]
    pub fn applied_query(&self) -> Option<String> {
        self.inner.suggestions.borrow().query.clone()
    }
}

impl<P> SearchInner<P>
where
    P: SearchPayload + Send + 'static,
{
    async fn search(&self, query: String) -> Result<SearchOutcome, RequestError> {
        let ticket = self.fence.issue();
        tracing::debug!(search = %self.label, query = %query, ticket = ticket.sequence(), "search issued");

        let response = self.tracker.send((self.request)(query.clone())).await?;

        if !self.fence.try_apply(ticket) {
            tracing::debug!(search = %self.label, ticket = ticket.sequence(), "discarding stale search response");
            return Ok(SearchOutcome::Stale);
        }

        let payload = match response {
            ApiResponse::Success(payload) => payload,
            other => {
                tracing::debug!(search = %self.label, status = %other.status(), "search unsuccessful, keeping results");
                return Ok(SearchOutcome::Unsuccessful(other.status()));
            }
        };

        let results = payload.into_items();
        let count = results.len();
        self.suggestions.send_replace(Suggestions {
            results,
            visible: true,
            query: Some(query),
        });
        tracing::debug!(search = %self.label, count, "search results applied");
        Ok(SearchOutcome::Applied { count })
    }

    fn set_visible(&self, visible: bool) {
        self.suggestions.send_if_modified(|s| {
            let changed = s.visible != visible;
            s.visible = visible;
            changed
        });
    }

    fn reset_results(&self) {
        self.fence.invalidate();
        self.suggestions.send_if_modified(|s| {
            let changed = !s.results.is_empty() || s.query.is_some();
            s.results.clear();
            s.query = None;
            changed
        });
    }
}
