//! Cached page navigation over a paginated endpoint.
//!
//! A [`Paginator`] couples a [`PaginationCache`] with a [`RequestTracker`] and a
//! fetch function. Navigating to a cached page is free; navigating to an
//! unseen page fetches it exactly once per generation. Changing the query
//! starts a new generation.
//!
//! Navigation takes `&mut self` for the whole fetch, so a query change can
//! never interleave with an in-flight page fetch of the old query.

use super::cache::{PaginationCache, FIRST_PAGE};
use crate::domain::{ApiResponse, ApiStatus, BizdirError, Result, TransportResult};
use crate::request::RequestTracker;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::future::Future;

type FetchFn<Q, P> =
    Box<dyn FnMut(&Q, u32) -> BoxFuture<'static, TransportResult<ApiResponse<P>>> + Send>;

type HasDataFn<P> = Box<dyn Fn(&P) -> bool + Send + Sync>;

/// How a navigation was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFetch {
    /// The page was already cached; no request was made.
    Cached,
    /// The page was fetched and cached.
    Fetched,
    /// The endpoint answered `FAIL` or `ERROR`; the current page is unchanged.
    Unsuccessful(ApiStatus),
}

pub struct Paginator<Q, P> {
    query: Q,
    cache: PaginationCache<P>,
    tracker: RequestTracker,
    fetch: FetchFn<Q, P>,
    has_data: HasDataFn<P>,
    generation: u64,
}

impl<Q: std::fmt::Debug, P> std::fmt::Debug for Paginator<Q, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("query", &self.query)
            .field("current_page", &self.cache.current_page())
            .field("cached_pages", &self.cache.len())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl<Q, P> Paginator<Q, P>
where
    P: Send + 'static,
{
    /// Creates a paginator for `query` whose page 1 is `initial`.
    ///
    /// # Parameters
    ///
    /// * `query` - Parameters passed to every page fetch
    /// * `initial` - Page 1, typically embedded in the first response
    /// * `tracker` - Tracks loading for page fetches
    /// * `fetch` - Fetches one page for a query
    pub fn new<F, Fut>(query: Q, initial: P, tracker: RequestTracker, mut fetch: F) -> Self
    where
        F: FnMut(&Q, u32) -> Fut + Send + 'static,
        Fut: Future<Output = TransportResult<ApiResponse<P>>> + Send + 'static,
    {
        Self {
            query,
            cache: PaginationCache::new(initial),
            tracker,
            fetch: Box::new(move |query: &Q, page: u32| fetch(query, page).boxed()),
            has_data: Box::new(|_| true),
            generation: 0,
        }
    }

    /// Sets the predicate a cached payload must satisfy to be served without
    /// a fetch, e.g. "has a non-empty items list".
    #[must_use]
    pub fn with_has_data<F>(mut self, has_data: F) -> Self
    where
        F: Fn(&P) -> bool + Send + Sync + 'static,
    {
        self.has_data = Box::new(has_data);
        self
    }

    /// Navigates to `page`, fetching it if it is not cached.
    ///
    /// # Errors
    ///
    /// Returns [`BizdirError::InvalidPage`] for page 0 and
    /// [`BizdirError::Request`] if the fetch fails. On error the current page
    /// is unchanged.
    pub async fn go_to(&mut self, page: u32) -> Result<PageFetch> {
        if page < FIRST_PAGE {
            return Err(BizdirError::InvalidPage(page));
        }

        if self.cache.page_has_data_where(page, |payload| (self.has_data)(payload)) {
            tracing::debug!(page, generation = self.generation, "serving cached page");
            self.cache.set_current_page(page);
            return Ok(PageFetch::Cached);
        }

        tracing::debug!(page, generation = self.generation, "fetching page");
        let request = (self.fetch)(&self.query, page);
        let response = self.tracker.send(request).await?;

        match response {
            ApiResponse::Success(payload) => {
                self.cache.set_page_data(page, payload);
                self.cache.set_current_page(page);
                Ok(PageFetch::Fetched)
            }
            other => {
                tracing::debug!(page, status = %other.status(), "page fetch unsuccessful");
                Ok(PageFetch::Unsuccessful(other.status()))
            }
        }
    }

    /// Moves to the page after the current one.
    ///
    /// # Errors
    ///
    /// See [`go_to`](Self::go_to).
    pub async fn next_page(&mut self) -> Result<PageFetch> {
        let next = self.cache.current_page().saturating_add(1);
        self.go_to(next).await
    }

    /// Moves to the page before the current one, staying on page 1.
    ///
    /// # Errors
    ///
    /// See [`go_to`](Self::go_to).
    pub async fn previous_page(&mut self) -> Result<PageFetch> {
        let previous = self.cache.current_page().saturating_sub(1).max(FIRST_PAGE);
        self.go_to(previous).await
    }

    /// Replaces the query parameters and starts a new generation seeded with
    /// `initial` as page 1.
    ///
    /// Every cached page of the old query is dropped and the current page
    /// returns to 1.
    pub fn set_query(&mut self, query: Q, initial: P) {
        self.query = query;
        self.cache.reset_with(initial);
        self.generation += 1;
        tracing::debug!(generation = self.generation, "query changed, page cache reset");
    }

    #[must_use]
    pub const fn query(&self) -> &Q {
        &self.query
    }

    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.cache.current_page()
    }

    /// Payload of the current page, if cached.
    #[must_use]
    pub fn current_data(&self) -> Option<&P> {
        self.cache.current_data()
    }

    #[must_use]
    pub const fn cache(&self) -> &PaginationCache<P> {
        &self.cache
    }

    #[must_use]
    pub const fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    /// Number of query changes so far. Starts at 0.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Failure, ResultPage, TransportError};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Filter {
        category: String,
    }

    fn filter(category: &str) -> Filter {
        Filter {
            category: category.to_string(),
        }
    }

    type Calls = Arc<Mutex<Vec<(String, u32)>>>;

    /// Serves `<category>-<page>` as the only item; page 9 answers FAIL,
    /// page 13 fails the transport.
    fn business_pages() -> (Paginator<Filter, ResultPage<String>>, Calls) {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&calls);
        let paginator = Paginator::new(
            filter("coffee"),
            ResultPage::new(vec!["coffee-1".to_string()]),
            RequestTracker::new("businesses"),
            move |query: &Filter, page| {
                log.lock().unwrap().push((query.category.clone(), page));
                let category = query.category.clone();
                async move {
                    match page {
                        9 => Ok(ApiResponse::Fail(Failure::default())),
                        13 => Err(TransportError::new("gateway closed")),
                        _ => Ok(ApiResponse::Success(ResultPage::new(vec![format!(
                            "{category}-{page}"
                        )]))),
                    }
                }
            },
        )
        .with_has_data(ResultPage::has_items);
        (paginator, calls)
    }

    #[tokio::test]
    async fn first_page_is_served_from_initial_data() {
        let (mut pages, calls) = business_pages();
        assert_eq!(pages.go_to(1).await.unwrap(), PageFetch::Cached);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unseen_page_is_fetched_once() {
        let (mut pages, calls) = business_pages();

        assert_eq!(pages.next_page().await.unwrap(), PageFetch::Fetched);
        assert_eq!(pages.previous_page().await.unwrap(), PageFetch::Cached);
        assert_eq!(pages.go_to(2).await.unwrap(), PageFetch::Cached);

        assert_eq!(*calls.lock().unwrap(), vec![("coffee".to_string(), 2)]);
        assert_eq!(pages.current_data().unwrap().items, vec!["coffee-2".to_string()]);
    }

    #[tokio::test]
    async fn query_change_starts_a_new_generation() {
        let (mut pages, calls) = business_pages();
        pages.go_to(2).await.unwrap();

        pages.set_query(filter("tacos"), ResultPage::new(vec!["tacos-1".to_string()]));
        assert_eq!(pages.generation(), 1);
        assert_eq!(pages.current_page(), 1);
        assert!(!pages.cache().page_has_data(2));

        assert_eq!(pages.go_to(2).await.unwrap(), PageFetch::Fetched);
        assert_eq!(pages.current_data().unwrap().items, vec!["tacos-2".to_string()]);
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn empty_cached_page_is_refetched() {
        let (mut pages, calls) = business_pages();
        pages.set_query(filter("bakery"), ResultPage::default());

        assert_eq!(pages.go_to(1).await.unwrap(), PageFetch::Fetched);
        assert_eq!(*calls.lock().unwrap(), vec![("bakery".to_string(), 1)]);
    }

    #[tokio::test]
    async fn failures_keep_the_current_page() {
        let (mut pages, _) = business_pages();

        assert_eq!(
            pages.go_to(9).await.unwrap(),
            PageFetch::Unsuccessful(ApiStatus::Fail)
        );
        assert!(matches!(pages.go_to(13).await, Err(BizdirError::Request(_))));
        assert_eq!(pages.current_page(), 1);
        assert!(!pages.tracker().is_loading());
    }

    #[tokio::test]
    async fn page_zero_is_rejected() {
        let (mut pages, calls) = business_pages();
        assert!(matches!(pages.go_to(0).await, Err(BizdirError::InvalidPage(0))));
        assert!(calls.lock().unwrap().is_empty());
    }
}
