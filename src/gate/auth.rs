//! Authentication gate.
//!
//! Defers an action until the session is authenticated, then resumes it with
//! the access token. The gate never starts a sign-in itself; it raises the
//! login prompt and waits for the session store to publish a session.

use super::deferred::{Admission, Gate, GateCondition};
use crate::domain::SessionHandle;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;

/// Satisfied while a session with an access token is present.
#[derive(Debug, Clone)]
pub struct SessionCondition {
    session: SessionHandle,
}

impl GateCondition for SessionCondition {
    type Token = String;

    fn satisfied(&self) -> Option<String> {
        self.session.access_token()
    }
}

pub type AuthGate = Gate<SessionCondition>;

impl Gate<SessionCondition> {
    /// Creates an idle gate reading the session through `session`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bizdir::domain::SessionStore;
    /// use bizdir::gate::{Admission, AuthGate};
    ///
    /// let store = SessionStore::new();
    /// let mut gate = AuthGate::new(store.handle());
    /// assert_eq!(gate.with_auth(|_token| {}), Admission::Deferred);
    /// assert!(gate.prompt_shown());
    /// ```
    #[must_use]
    pub const fn new(session: SessionHandle) -> Self {
        Self::with_condition("auth", SessionCondition { session })
    }

    /// Runs `next(access_token)` now if signed in, otherwise defers it and
    /// raises the login prompt.
    ///
    /// # Parameters
    ///
    /// * `next` - Action to run with the access token
    ///
    /// # Returns
    ///
    /// [`Admission::Immediate`] if `next` already ran, [`Admission::Deferred`]
    /// if it is waiting for a sign-in.
    pub fn with_auth<F>(&mut self, next: F) -> Admission
    where
        F: FnOnce(String) + Send + 'static,
    {
        self.run(next)
    }

    /// Resumes the pending action if the session is now authenticated.
    ///
    /// Returns whether an action ran.
    pub fn on_session_changed(&mut self) -> bool {
        self.resume()
    }

    /// The login prompt was dismissed.
    ///
    /// If the session is already authenticated the pending action resumes,
    /// since the prompt may close before the session change is observed.
    /// Otherwise the pending action is dropped.
    ///
    /// # Returns
    ///
    /// Whether an action was discarded.
    pub fn close_login(&mut self) -> bool {
        if self.resume() {
            return false;
        }
        self.abandon()
    }

    #[must_use]
    pub const fn session(&self) -> &SessionHandle {
        &self.condition().session
    }
}

/// Spawns a task calling [`AuthGate::on_session_changed`] on every session
/// change. The task ends when the session store is dropped.
///
/// Resumed actions run while the gate lock is held and must not lock the
/// gate themselves.
pub fn spawn_resume_watcher(gate: Arc<Mutex<AuthGate>>, mut session: SessionHandle) -> JoinHandle<()> {
    tokio::spawn(async move {
        while session.changed().await {
            let resumed = gate
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .on_session_changed();
            if resumed {
                tracing::debug!("session change resumed deferred action");
            }
        }
        tracing::debug!("session store closed, resume watcher exiting");
    })
}
