//! Search result state for one search field.

/// Suggestions and their visibility, as published to subscribers.
///
/// `results` is replaced wholesale by each applied search, never merged.
/// Visibility is independent of content: results can be hidden on blur and
/// shown again on refocus without a new request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestions<I> {
    pub results: Vec<I>,
    pub visible: bool,
    /// Query the current `results` answer. `None` once results are reset.
    pub query: Option<String>,
}

impl<I> Default for Suggestions<I> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            visible: false,
            query: None,
        }
    }
}

/// Snapshot of a search field's state, including the request loading flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState<I> {
    pub results: Vec<I>,
    pub results_visible: bool,
    pub loading: bool,
}

impl<I> SearchState<I> {
    pub(crate) fn from_parts(suggestions: Suggestions<I>, loading: bool) -> Self {
        Self {
            results: suggestions.results,
            results_visible: suggestions.visible,
            loading,
        }
    }

    /// Whether there is something to render in the suggestion list.
    #[must_use]
    pub fn shows_results(&self) -> bool {
        self.results_visible && !self.results.is_empty()
    }
}

impl<I> Default for SearchState<I> {
    fn default() -> Self {
        Self::from_parts(Suggestions::default(), false)
    }
}
