//! Confirmation gate: hold an action until the user confirms it.

use super::deferred::{Gate, GateCondition};

/// Satisfied only during [`ConfirmationGate::confirm`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Confirmation {
    confirmed: bool,
}

impl GateCondition for Confirmation {
    type Token = ();

    fn satisfied(&self) -> Option<()> {
        self.confirmed.then_some(())
    }
}

pub type ConfirmationGate = Gate<Confirmation>;

impl Default for Gate<Confirmation> {
    fn default() -> Self {
        Self::new()
    }
}

impl Gate<Confirmation> {
    /// Creates an idle gate with nothing awaiting confirmation.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_condition("confirmation", Confirmation { confirmed: false })
    }

    /// Captures `next` and raises the confirmation prompt.
    ///
    /// Always prompts, even if an earlier action was confirmed. An action
    /// still awaiting an answer is replaced.
    ///
    /// # Parameters
    ///
    /// * `next` - Action to run once the user confirms
    pub fn with_confirmation<F>(&mut self, next: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.condition_mut().confirmed = false;
        self.run(move |()| next());
    }

    /// Runs the pending action once. Returns whether one ran.
    pub fn confirm(&mut self) -> bool {
        self.condition_mut().confirmed = true;
        let ran = self.resume();
        self.condition_mut().confirmed = false;
        ran
    }

    /// The user declined. Returns whether an action was discarded.
    pub fn relent(&mut self) -> bool {
        self.abandon()
    }

    /// The prompt was closed without an answer.
    pub fn close_confirmation(&mut self) -> bool {
        self.abandon()
    }
}
