//! Event handling for search fields.
//!
//! # Architecture
//!
//! Input flows one way:
//! 1. The UI reports an [`Event`] for a field
//! 2. [`handle_event`] updates the [`FieldState`]
//! 3. The returned [`Action`]s are executed against the field's search
//!
//! Keeping step 2 free of I/O makes every field rule testable without a
//! runtime.
//!
//! # Example
//!
//! ```rust
//! use bizdir::app::{handle_event, Action, Event, FieldKind, FieldState};
//!
//! let mut state = FieldState::new(FieldKind::Category);
//! let actions = handle_event(&mut state, &Event::Input("hot".into()));
//! assert_eq!(actions, vec![Action::ScheduleSearch("hot".into())]);
//! ```

use super::actions::Action;
use super::state::FieldState;

/// Something the user did to a search field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The input value changed, by typing or programmatically.
    Input(String),

    /// The field gained focus.
    Focus,

    /// The field lost focus.
    Blur,

    /// A suggestion was picked. Its text becomes the input value.
    Select(String),

    /// The input was emptied with the clear control.
    Clear,
}

/// Applies `event` to `state` and returns the effects to perform, in order.
///
/// # Rules
///
/// - Input below the field's threshold cancels any armed search and drops
///   results.
/// - The first input after a selection is the selection echoing back into
///   the input; it updates the value and nothing else.
/// - Refocusing re-shows results without a new request only when the held
///   results were applied for the current value. A search that was
///   cancelled before it applied does not count.
/// - Selecting hides results but keeps them.
pub fn handle_event(state: &mut FieldState, event: &Event) -> Vec<Action> {
    let _span = tracing::debug_span!("handle_event", field = %state.kind(), event = ?event).entered();

    match event {
        Event::Input(value) => {
            state.set_value(value.as_str());

            if state.take_just_selected() {
                tracing::debug!("suppressing search for selected value");
                return vec![];
            }

            if state.meets_threshold() {
                vec![Action::ScheduleSearch(value.clone())]
            } else {
                vec![Action::CancelPending, Action::ResetResults, Action::HideResults]
            }
        }
        Event::Focus => {
            state.set_focused(true);

            if !state.meets_threshold() {
                return vec![];
            }
            if state.has_results_for_value() {
                tracing::debug!("results match current value, re-showing");
                return vec![Action::ShowResults];
            }
            vec![Action::ScheduleSearch(state.value().to_string())]
        }
        Event::Blur => {
            state.set_focused(false);
            vec![Action::CancelPending, Action::HideResults]
        }
        Event::Select(selection) => {
            state.mark_selected(selection.as_str());
            vec![Action::CancelPending, Action::HideResults]
        }
        Event::Clear => {
            state.clear();
            vec![Action::CancelPending, Action::ResetResults, Action::HideResults]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FieldKind;

    fn input(value: &str) -> Event {
        Event::Input(value.to_string())
    }

    #[test]
    fn short_input_does_not_search() {
        let mut state = FieldState::new(FieldKind::Category);
        assert_eq!(
            handle_event(&mut state, &input("ho")),
            vec![Action::CancelPending, Action::ResetResults, Action::HideResults]
        );
        assert_eq!(
            handle_event(&mut state, &input("hot")),
            vec![Action::ScheduleSearch("hot".to_string())]
        );
    }

    #[test]
    fn city_threshold_is_two() {
        let mut state = FieldState::new(FieldKind::City);
        assert_eq!(
            handle_event(&mut state, &input("Po")),
            vec![Action::ScheduleSearch("Po".to_string())]
        );
    }

    #[test]
    fn selection_suppresses_exactly_one_input() {
        let mut state = FieldState::new(FieldKind::Category);
        handle_event(&mut state, &input("hot"));

        assert_eq!(
            handle_event(&mut state, &Event::Select("Hotels".to_string())),
            vec![Action::CancelPending, Action::HideResults]
        );
        assert!(handle_event(&mut state, &input("Hotels")).is_empty());
        assert_eq!(state.value(), "Hotels");

        assert_eq!(
            handle_event(&mut state, &input("Hotel")),
            vec![Action::ScheduleSearch("Hotel".to_string())]
        );
    }

    #[test]
    fn refocus_with_same_value_reshows_results() {
        let mut state = FieldState::new(FieldKind::Category);
        handle_event(&mut state, &Event::Focus);
        handle_event(&mut state, &input("spa"));
        state.set_applied_query(Some("spa".to_string()));
        handle_event(&mut state, &Event::Blur);
        assert!(!state.is_focused());

        assert_eq!(handle_event(&mut state, &Event::Focus), vec![Action::ShowResults]);
    }

    #[test]
    fn refocus_before_results_applied_searches_again() {
        let mut state = FieldState::new(FieldKind::City);
        handle_event(&mut state, &Event::Focus);
        handle_event(&mut state, &input("Port"));
        handle_event(&mut state, &Event::Blur);

        assert_eq!(
            handle_event(&mut state, &Event::Focus),
            vec![Action::ScheduleSearch("Port".to_string())]
        );
    }

    #[test]
    fn refocus_after_editing_searches_for_new_value() {
        let mut state = FieldState::new(FieldKind::Category);
        handle_event(&mut state, &input("spa"));
        state.set_applied_query(Some("spa".to_string()));
        handle_event(&mut state, &input("spas"));
        handle_event(&mut state, &Event::Blur);

        assert_eq!(
            handle_event(&mut state, &Event::Focus),
            vec![Action::ScheduleSearch("spas".to_string())]
        );
    }

    #[test]
    fn focus_with_unsearched_value_searches() {
        let mut state = FieldState::new(FieldKind::Category);
        state.set_value("bakery");
        assert_eq!(
            handle_event(&mut state, &Event::Focus),
            vec![Action::ScheduleSearch("bakery".to_string())]
        );
        assert!(!state.has_results_for_value());
    }

    #[test]
    fn clear_resets_everything() {
        let mut state = FieldState::new(FieldKind::Category);
        handle_event(&mut state, &input("hot"));
        assert_eq!(
            handle_event(&mut state, &Event::Clear),
            vec![Action::CancelPending, Action::ResetResults, Action::HideResults]
        );
        assert_eq!(state.value(), "");
        assert!(handle_event(&mut state, &Event::Focus).is_empty());
    }
}
