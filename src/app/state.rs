//! Per-field input state.
//!
//! [`FieldState`] is the pure half of a search field: it holds what the user
//! typed and the bookkeeping that decides whether a keystroke should search.
//! It never touches the network; the handler turns its transitions into
//! [`Action`](super::Action)s.
//!
//! # Example
//!
//! ```rust
//! use bizdir::app::{FieldKind, FieldState};
//!
//! let mut state = FieldState::new(FieldKind::City);
//! state.set_value("Po");
//! assert!(state.meets_threshold());
//! ```

use super::modes::FieldKind;

/// Input state of one search field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldState {
    kind: FieldKind,

    /// Current input value.
    value: String,

    /// Characters required before searching.
    min_chars: usize,

    /// Set when a suggestion was picked.
    ///
    /// Picking a suggestion writes it into the input, which arrives as an
    /// ordinary input change. This flag swallows exactly that one change so
    /// the selection does not search for itself.
    just_selected: bool,

    /// Query whose results the search currently holds.
    ///
    /// Mirrored from the search before every event, so it only changes when
    /// a response is actually applied. Lets a refocus with an unchanged value
    /// re-show existing results instead of searching again.
    applied_query: Option<String>,

    focused: bool,
}

impl FieldState {
    /// Creates an empty, unfocused field using the kind's default threshold.
    #[must_use]
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            value: String::new(),
            min_chars: kind.default_min_chars(),
            just_selected: false,
            applied_query: None,
            focused: false,
        }
    }

    /// Overrides the minimum character threshold.
    #[must_use]
    pub const fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    #[must_use]
    pub const fn min_chars(&self) -> usize {
        self.min_chars
    }

    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    #[must_use]
    pub const fn just_selected(&self) -> bool {
        self.just_selected
    }

    /// Records that a suggestion was picked and written into the input.
    pub fn mark_selected(&mut self, selection: impl Into<String>) {
        self.value = selection.into();
        self.just_selected = true;
    }

    /// Clears the selection flag, returning whether it was set.
    pub fn take_just_selected(&mut self) -> bool {
        std::mem::take(&mut self.just_selected)
    }

    #[must_use]
    pub fn applied_query(&self) -> Option<&str> {
        self.applied_query.as_deref()
    }

    /// Records which query the search's current results answer.
    ///
    /// # Parameters
    ///
    /// * `query` - Query of the last applied response, `None` after a reset
    pub fn set_applied_query(&mut self, query: Option<String>) {
        self.applied_query = query;
    }

    /// Whether the current value is long enough to search for.
    ///
    /// Counts characters, not bytes, and ignores surrounding whitespace.
    #[must_use]
    pub fn meets_threshold(&self) -> bool {
        self.value.trim().chars().count() >= self.min_chars
    }

    /// Whether the held results were fetched for the current value.
    #[must_use]
    pub fn has_results_for_value(&self) -> bool {
        self.applied_query.as_deref() == Some(self.value.as_str())
    }

    /// Empties the field and forgets search history. Focus is kept.
    pub fn clear(&mut self) {
        self.value.clear();
        self.just_selected = false;
        self.applied_query = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_counts_trimmed_characters() {
        let mut state = FieldState::new(FieldKind::Category);
        state.set_value(" ho ");
        assert!(!state.meets_threshold());

        state.set_value("café");
        assert!(state.meets_threshold());

        let mut city = FieldState::new(FieldKind::City);
        city.set_value("Zü");
        assert!(city.meets_threshold());
    }

    #[test]
    fn custom_threshold_overrides_kind_default() {
        let mut state = FieldState::new(FieldKind::Category).with_min_chars(1);
        state.set_value("h");
        assert!(state.meets_threshold());
    }

    #[test]
    fn selection_flag_is_taken_once() {
        let mut state = FieldState::new(FieldKind::Category);
        state.mark_selected("Hotels");
        assert_eq!(state.value(), "Hotels");
        assert!(state.take_just_selected());
        assert!(!state.take_just_selected());
    }

    #[test]
    fn clear_forgets_history() {
        let mut state = FieldState::new(FieldKind::City);
        state.set_value("Portland");
        state.set_applied_query(Some("Portland".to_string()));
        assert!(state.has_results_for_value());

        state.set_value("Portlan");
        assert!(!state.has_results_for_value());

        state.clear();
        assert_eq!(state.value(), "");
        assert_eq!(state.applied_query(), None);
    }
}
