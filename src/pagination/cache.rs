//! Page cache for one query generation.
//!
//! Pages are keyed by 1-based page number. The cache has no versioning of its
//! own: whoever changes the query parameters must reset it in the same step,
//! or stale pages would be served for the new query. [`Paginator`] does this
//! for you.
//!
//! [`Paginator`]: super::Paginator

use std::collections::BTreeMap;

/// First page number.
pub const FIRST_PAGE: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationCache<P> {
    pages: BTreeMap<u32, P>,
    current: u32,
}

impl<P> Default for PaginationCache<P> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<P> PaginationCache<P> {
    /// Creates a cache seeded with page 1, so the first render needs no fetch.
    #[must_use]
    pub fn new(initial: P) -> Self {
        let mut cache = Self::empty();
        cache.set_page_data(FIRST_PAGE, initial);
        cache
    }

    /// Creates a cache with no pages, pointing at page 1.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            pages: BTreeMap::new(),
            current: FIRST_PAGE,
        }
    }

    /// Stores `payload` for `page`, overwriting any previous value.
    ///
    /// Returns the payload that was replaced, if any.
    pub fn set_page_data(&mut self, page: u32, payload: P) -> Option<P> {
        self.pages.insert(page, payload)
    }

    /// Whether anything is stored for `page`, even an empty payload.
    #[must_use]
    pub fn page_has_data(&self, page: u32) -> bool {
        self.pages.contains_key(&page)
    }

    /// Like [`page_has_data`](Self::page_has_data), but also requires
    /// `predicate` to hold for the stored payload.
    #[must_use]
    pub fn page_has_data_where<F>(&self, page: u32, predicate: F) -> bool
    where
        F: FnOnce(&P) -> bool,
    {
        self.pages.get(&page).is_some_and(predicate)
    }

    #[must_use]
    pub fn page(&self, page: u32) -> Option<&P> {
        self.pages.get(&page)
    }

    /// Moves the pointer to `page`. Neither fetches nor checks the cache.
    pub fn set_current_page(&mut self, page: u32) {
        self.current = page;
    }

    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current
    }

    /// Payload of the current page, if cached.
    #[must_use]
    pub fn current_data(&self) -> Option<&P> {
        self.pages.get(&self.current)
    }

    /// Drops every cached page and points back at page 1.
    pub fn reset_all_pages(&mut self) {
        self.pages.clear();
        self.current = FIRST_PAGE;
    }

    /// Starts a new generation seeded with `initial` as page 1.
    pub fn reset_with(&mut self, initial: P) {
        self.reset_all_pages();
        self.set_page_data(FIRST_PAGE, initial);
    }

    /// Cached page numbers in ascending order.
    pub fn cached_pages(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_first_page() {
        let cache = PaginationCache::new(vec!["Blue Bottle"]);
        assert_eq!(cache.current_page(), 1);
        assert_eq!(cache.current_data(), Some(&vec!["Blue Bottle"]));
        assert!(!cache.page_has_data(2));
    }

    #[test]
    fn set_page_data_overwrites() {
        let mut cache = PaginationCache::new(vec!["a"]);
        assert_eq!(cache.set_page_data(2, vec!["first"]), None);
        assert!(cache.page_has_data(2));

        assert_eq!(cache.set_page_data(2, vec!["second"]), Some(vec!["first"]));
        assert!(cache.page_has_data(2));
        assert_eq!(cache.page(2), Some(&vec!["second"]));
        assert!(!cache.page_has_data(3));
    }

    #[test]
    fn predicate_must_hold_for_stored_payload() {
        let mut cache: PaginationCache<Vec<&str>> = PaginationCache::empty();
        cache.set_page_data(4, Vec::new());
        assert!(cache.page_has_data(4));
        assert!(!cache.page_has_data_where(4, |items| !items.is_empty()));
        assert!(!cache.page_has_data_where(5, |_| true));
    }

    #[test]
    fn reset_drops_pages_from_previous_generation() {
        let mut cache = PaginationCache::new(vec!["old-1"]);
        cache.set_page_data(2, vec!["old-2"]);
        cache.set_current_page(2);

        cache.reset_all_pages();
        cache.set_page_data(1, vec!["new-1"]);

        assert!(!cache.page_has_data(2));
        assert_eq!(cache.current_page(), 1);
        assert_eq!(cache.cached_pages().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn set_current_page_does_not_require_cached_page() {
        let mut cache = PaginationCache::new(1);
        cache.set_current_page(7);
        assert_eq!(cache.current_page(), 7);
        assert_eq!(cache.current_data(), None);
    }
}
