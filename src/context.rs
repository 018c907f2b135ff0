//! Wiring of configuration and session into components.
//!
//! A [`Context`] is created once per application (see
//! [`initialize`](crate::initialize)) and hands out trackers, searches,
//! fields, gates and paginators configured from the same [`Config`]. The
//! session store lives here rather than in a global.

use crate::app::{FieldKind, FieldState, SearchField};
use crate::domain::{ApiResponse, SearchPayload, SessionHandle, SessionStore, TransportResult};
use crate::gate::{spawn_resume_watcher, AuthGate, ConfirmationGate};
use crate::pagination::Paginator;
use crate::request::RequestTracker;
use crate::search::DebouncedSearch;
use crate::Config;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct Context {
    config: Config,
    sessions: Arc<SessionStore>,
}

impl Context {
    /// Creates a context with its own, signed-out session store.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_sessions(config, Arc::new(SessionStore::new()))
    }

    /// Uses an existing session store, e.g. one shared with the auth provider.
    #[must_use]
    pub const fn with_sessions(config: Config, sessions: Arc<SessionStore>) -> Self {
        Self { config, sessions }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The writable session store, for the authentication collaborator.
    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    #[must_use]
    pub fn session(&self) -> SessionHandle {
        self.sessions.handle()
    }

    /// A tracker with the configured fetch timeout and retry settings.
    #[must_use]
    pub fn tracker(&self, label: impl Into<String>) -> RequestTracker {
        RequestTracker::builder(label)
            .timeout(self.config.fetch_timeout())
            .retry_settings(self.config.retry_settings())
            .build()
    }

    /// A debounced search using the delay configured for `kind`.
    pub fn search<P, F, Fut>(&self, kind: FieldKind, request: F) -> DebouncedSearch<P>
    where
        P: SearchPayload + Send + 'static,
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TransportResult<ApiResponse<P>>> + Send + 'static,
    {
        DebouncedSearch::new(
            kind.as_str(),
            self.tracker(kind.as_str()),
            self.config.debounce_for(kind),
            request,
        )
    }

    /// A search field with the configured threshold and delay for `kind`.
    pub fn field<P, F, Fut>(&self, kind: FieldKind, request: F) -> SearchField<P>
    where
        P: SearchPayload + Send + 'static,
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TransportResult<ApiResponse<P>>> + Send + 'static,
    {
        let state = FieldState::new(kind).with_min_chars(self.config.min_chars_for(kind));
        SearchField::with_state(state, self.search(kind, request))
    }

    /// An auth gate over this context's session. Resuming is up to the
    /// caller; see [`watched_auth_gate`](Self::watched_auth_gate).
    #[must_use]
    pub fn auth_gate(&self) -> AuthGate {
        AuthGate::new(self.session())
    }

    /// An auth gate that resumes by itself when a session is published.
    ///
    /// Must be called from within a tokio runtime. The watcher ends when the
    /// session store is dropped; abort the handle to stop it earlier.
    #[must_use]
    pub fn watched_auth_gate(&self) -> (Arc<Mutex<AuthGate>>, JoinHandle<()>) {
        let gate = Arc::new(Mutex::new(self.auth_gate()));
        let watcher = spawn_resume_watcher(Arc::clone(&gate), self.session());
        (gate, watcher)
    }

    #[must_use]
    pub fn confirmation_gate(&self) -> ConfirmationGate {
        ConfirmationGate::new()
    }

    /// A paginator whose fetches go through a configured tracker.
    pub fn paginator<Q, P, F, Fut>(
        &self,
        label: impl Into<String>,
        query: Q,
        initial: P,
        fetch: F,
    ) -> Paginator<Q, P>
    where
        P: Send + 'static,
        F: FnMut(&Q, u32) -> Fut + Send + 'static,
        Fut: Future<Output = TransportResult<ApiResponse<P>>> + Send + 'static,
    {
        Paginator::new(query, initial, self.tracker(label), fetch)
    }
}
