//! Side effects requested by the field handler.
//!
//! [`handle_event`](super::handle_event) is pure: it mutates a
//! [`FieldState`](super::FieldState) and returns the effects to perform.
//! [`SearchField`](super::SearchField) executes them, in order, against its
//! [`DebouncedSearch`](crate::search::DebouncedSearch).

/// Effect on the search behind a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Arms a debounced search for the given query.
    ///
    /// Re-arming replaces any search still waiting out its delay.
    ScheduleSearch(String),

    /// Disarms a search still waiting out its delay.
    CancelPending,

    /// Shows the current results without searching.
    ShowResults,

    /// Hides results but keeps them.
    HideResults,

    /// Discards the current results.
    ResetResults,
}
