//! Deferred-action gate.
//!
//! A [`Gate`] captures an action while some condition is unmet, raises a
//! prompt, and fires the action exactly once when the condition becomes
//! satisfied. At most one action is pending; triggering again while
//! prompting replaces it.

use std::fmt;

/// Condition guarding a [`Gate`].
///
/// `satisfied` returns the token handed to the deferred action, or `None`
/// while the condition is unmet.
pub trait GateCondition {
    type Token;

    fn satisfied(&self) -> Option<Self::Token>;
}

/// Action waiting behind a gate.
pub type PendingAction<T> = Box<dyn FnOnce(T) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Idle,
    /// An action is captured and the prompt is up.
    Prompting,
}

/// How [`Gate::run`] handled an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The condition held; the action already ran.
    Immediate,
    /// The action was captured and the prompt raised.
    Deferred,
}

pub struct Gate<C: GateCondition> {
    kind: &'static str,
    condition: C,
    pending: Option<PendingAction<C::Token>>,
    prompt_shown: bool,
}

impl<C: GateCondition + fmt::Debug> fmt::Debug for Gate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate")
            .field("kind", &self.kind)
            .field("condition", &self.condition)
            .field("pending", &self.pending.is_some())
            .field("prompt_shown", &self.prompt_shown)
            .finish()
    }
}

impl<C: GateCondition> Gate<C> {
    /// Creates an idle gate.
    ///
    /// # Parameters
    ///
    /// * `kind` - Names the gate in log output
    /// * `condition` - Decides when deferred actions may run
    pub const fn with_condition(kind: &'static str, condition: C) -> Self {
        Self {
            kind,
            condition,
            pending: None,
            prompt_shown: false,
        }
    }

    /// Runs `next` now if the condition holds, otherwise captures it and
    /// raises the prompt.
    ///
    /// # Returns
    ///
    /// How the action was admitted. A deferred action replaces any action
    /// already pending.
    pub fn run<F>(&mut self, next: F) -> Admission
    where
        F: FnOnce(C::Token) + Send + 'static,
    {
        if let Some(token) = self.condition.satisfied() {
            tracing::debug!(gate = self.kind, "condition met, running action");
            next(token);
            return Admission::Immediate;
        }

        if self.pending.replace(Box::new(next)).is_some() {
            tracing::debug!(gate = self.kind, "replacing pending action");
        }
        self.prompt_shown = true;
        tracing::debug!(gate = self.kind, "action deferred, prompting");
        Admission::Deferred
    }

    /// Fires the pending action if the condition now holds.
    ///
    /// Returns whether an action ran. The gate is idle afterwards, so an
    /// action never runs twice.
    pub fn resume(&mut self) -> bool {
        if self.pending.is_none() {
            return false;
        }
        let Some(token) = self.condition.satisfied() else {
            return false;
        };
        let Some(action) = self.pending.take() else {
            return false;
        };
        self.prompt_shown = false;
        tracing::debug!(gate = self.kind, "condition met, resuming action");
        action(token);
        true
    }

    /// Dismisses the prompt and drops the pending action unexecuted.
    ///
    /// Returns whether an action was discarded.
    pub fn abandon(&mut self) -> bool {
        self.prompt_shown = false;
        let discarded = self.pending.take().is_some();
        if discarded {
            tracing::debug!(gate = self.kind, "pending action abandoned");
        }
        discarded
    }

    /// [`GateState::Prompting`] while an action is pending.
    #[must_use]
    pub const fn state(&self) -> GateState {
        if self.pending.is_some() {
            GateState::Prompting
        } else {
            GateState::Idle
        }
    }

    /// Whether the modal layer should show this gate's prompt.
    #[must_use]
    pub const fn prompt_shown(&self) -> bool {
        self.prompt_shown
    }

    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub const fn condition(&self) -> &C {
        &self.condition
    }

    /// Mutable access to the condition.
    ///
    /// Changing it does not resume anything by itself; call
    /// [`resume`](Self::resume) afterwards.
    pub fn condition_mut(&mut self) -> &mut C {
        &mut self.condition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default)]
    struct Unlocked(Option<u32>);

    impl GateCondition for Unlocked {
        type Token = u32;

        fn satisfied(&self) -> Option<u32> {
            self.0
        }
    }

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(&'static str) -> PendingAction<u32>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let make = move |_: &'static str| -> PendingAction<u32> {
            let sink = Arc::clone(&sink);
            Box::new(move |token| sink.lock().unwrap().push(token))
        };
        (log, make)
    }

    #[test]
    fn runs_immediately_when_condition_holds() {
        let (log, action) = recorder();
        let mut gate = Gate::with_condition("test", Unlocked(Some(7)));

        assert_eq!(gate.run(action("a")), Admission::Immediate);
        assert_eq!(*log.lock().unwrap(), vec![7]);
        assert_eq!(gate.state(), GateState::Idle);
        assert!(!gate.prompt_shown());
    }

    #[test]
    fn deferred_action_fires_once() {
        let (log, action) = recorder();
        let mut gate = Gate::with_condition("test", Unlocked::default());

        assert_eq!(gate.run(action("a")), Admission::Deferred);
        assert_eq!(gate.state(), GateState::Prompting);
        assert!(!gate.resume());

        gate.condition_mut().0 = Some(3);
        assert!(gate.resume());
        assert!(!gate.resume());
        assert_eq!(*log.lock().unwrap(), vec![3]);
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[test]
    fn retrigger_replaces_pending_action() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut gate = Gate::with_condition("test", Unlocked::default());

        let first = Arc::clone(&log);
        gate.run(move |_| first.lock().unwrap().push("first"));
        let second = Arc::clone(&log);
        gate.run(move |_| second.lock().unwrap().push("second"));

        gate.condition_mut().0 = Some(1);
        gate.resume();
        assert_eq!(*log.lock().unwrap(), vec!["second"]);
    }

    #[test]
    fn abandon_drops_action() {
        let (log, action) = recorder();
        let mut gate = Gate::with_condition("test", Unlocked::default());
        gate.run(action("a"));

        assert!(gate.abandon());
        assert!(!gate.prompt_shown());
        gate.condition_mut().0 = Some(1);
        assert!(!gate.resume());
        assert!(log.lock().unwrap().is_empty());
    }
}
