//! Search field controller.
//!
//! Pairs a [`FieldState`] with the [`DebouncedSearch`] behind it and executes
//! the actions [`handle_event`] produces.

use super::actions::Action;
use super::handler::{handle_event, Event};
use super::modes::FieldKind;
use super::state::FieldState;
use crate::domain::SearchPayload;
use crate::search::{DebouncedSearch, SearchState};

#[derive(Debug)]
pub struct SearchField<P: SearchPayload> {
    state: FieldState,
    search: DebouncedSearch<P>,
}

impl<P> SearchField<P>
where
    P: SearchPayload + Send + 'static,
{
    #[must_use]
    pub fn new(kind: FieldKind, search: DebouncedSearch<P>) -> Self {
        Self::with_state(FieldState::new(kind), search)
    }

    #[must_use]
    pub const fn with_state(state: FieldState, search: DebouncedSearch<P>) -> Self {
        Self { state, search }
    }

    /// Feeds `event` through the handler and executes the resulting actions.
    ///
    /// The field first learns which query the search's results currently
    /// answer, so a search that was scheduled but cancelled before applying
    /// never counts as done.
    ///
    /// # Returns
    ///
    /// The executed actions, in order.
    ///
    /// Must be called from within a tokio runtime, since searches are
    /// scheduled as tasks.
    pub fn handle(&mut self, event: &Event) -> Vec<Action> {
        self.state.set_applied_query(self.search.applied_query());
        let actions = handle_event(&mut self.state, event);
        for action in &actions {
            self.apply(action);
        }
        actions
    }

    pub fn input(&mut self, value: impl Into<String>) -> Vec<Action> {
        self.handle(&Event::Input(value.into()))
    }

    pub fn focus(&mut self) -> Vec<Action> {
        self.handle(&Event::Focus)
    }

    pub fn blur(&mut self) -> Vec<Action> {
        self.handle(&Event::Blur)
    }

    pub fn select(&mut self, selection: impl Into<String>) -> Vec<Action> {
        self.handle(&Event::Select(selection.into()))
    }

    pub fn clear(&mut self) -> Vec<Action> {
        self.handle(&Event::Clear)
    }

    fn apply(&self, action: &Action) {
        match action {
            Action::ScheduleSearch(query) => self.search.search_debounced(query.as_str()),
            Action::CancelPending => {
                self.search.cancel_pending();
            }
            Action::ShowResults => self.search.show_results(),
            Action::HideResults => self.search.hide_results(),
            Action::ResetResults => self.search.reset_results(),
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        self.state.value()
    }

    #[must_use]
    pub const fn field_state(&self) -> &FieldState {
        &self.state
    }

    /// Snapshot of the search behind this field.
    #[must_use]
    pub fn search_state(&self) -> SearchState<P::Item> {
        self.search.state()
    }

    #[must_use]
    pub const fn search(&self) -> &DebouncedSearch<P> {
        &self.search
    }
}
