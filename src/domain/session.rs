//! Authentication session shared between the auth collaborator and its readers.
//!
//! The session is the only piece of state shared across components. It has a
//! single writer, [`SessionStore`], owned by the authentication subsystem, and
//! any number of read-only [`SessionHandle`]s handed to gates and request call
//! sites. Changes are published through a `tokio::sync::watch` channel so
//! readers can await them.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Role attached to a signed-in user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Owner,
    Admin,
}

/// An authenticated user as reported by the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user_id: String,
    pub display_name: String,
    pub access_token: String,
    #[serde(default)]
    pub role: Role,
}

impl AuthSession {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        display_name: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            access_token: access_token.into(),
            role: Role::User,
        }
    }

    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

/// The single writer of session state.
#[derive(Debug)]
pub struct SessionStore {
    sender: watch::Sender<Option<AuthSession>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Creates a store with no signed-in user.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }

    /// Returns a read-only handle observing this store.
    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn sign_in(&self, session: AuthSession) {
        tracing::debug!(user_id = %session.user_id, role = ?session.role, "session signed in");
        self.sender.send_replace(Some(session));
    }

    pub fn sign_out(&self) {
        let previous = self.sender.send_replace(None);
        if let Some(session) = previous {
            tracing::debug!(user_id = %session.user_id, "session signed out");
        }
    }

    /// Replaces the access token of the current session.
    ///
    /// Returns `false` (and publishes nothing) when nobody is signed in.
    pub fn refresh_access_token(&self, access_token: impl Into<String>) -> bool {
        let access_token = access_token.into();
        self.sender.send_if_modified(|current| match current {
            Some(session) => {
                session.access_token = access_token;
                true
            }
            None => false,
        })
    }
}

/// Read-only view of the session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    receiver: watch::Receiver<Option<AuthSession>>,
}

impl SessionHandle {
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.receiver.borrow().is_some()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.receiver
            .borrow()
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    #[must_use]
    pub fn current(&self) -> Option<AuthSession> {
        self.receiver.borrow().clone()
    }

    /// Waits for the next published change.
    ///
    /// Returns `false` once the store has been dropped and no further changes
    /// can arrive.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }

    /// Waits until the session becomes unauthenticated.
    ///
    /// Resolves immediately if nobody is signed in. Returns `false` if the
    /// store is dropped first.
    pub async fn signed_out(&mut self) -> bool {
        self.receiver
            .wait_for(Option::is_none)
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_reads_current_session() {
        let store = SessionStore::new();
        let handle = store.handle();
        assert!(!handle.is_signed_in());
        assert_eq!(handle.access_token(), None);

        store.sign_in(AuthSession::new("u1", "Ada", "tok-1").with_role(Role::Owner));
        assert!(handle.is_signed_in());
        assert_eq!(handle.access_token().as_deref(), Some("tok-1"));
        assert_eq!(handle.current().map(|s| s.role), Some(Role::Owner));
    }

    #[test]
    fn refresh_requires_a_session() {
        let store = SessionStore::new();
        let handle = store.handle();
        assert!(!store.refresh_access_token("tok-2"));

        store.sign_in(AuthSession::new("u1", "Ada", "tok-1"));
        assert!(store.refresh_access_token("tok-2"));
        assert_eq!(handle.access_token().as_deref(), Some("tok-2"));
    }

    #[tokio::test]
    async fn changed_fires_on_sign_in() {
        let store = SessionStore::new();
        let mut handle = store.handle();
        store.sign_in(AuthSession::new("u1", "Ada", "tok-1"));
        assert!(handle.changed().await);
        assert!(handle.is_signed_in());
    }

    #[tokio::test]
    async fn signed_out_resolves_after_sign_out() {
        let store = SessionStore::new();
        store.sign_in(AuthSession::new("u1", "Ada", "tok-1"));
        let mut handle = store.handle();

        let waiter = tokio::spawn(async move { handle.signed_out().await });
        tokio::task::yield_now().await;
        store.sign_out();
        assert!(waiter.await.unwrap());
    }

    #[test]
    fn role_defaults_to_user_when_absent() {
        let session: AuthSession = serde_json::from_str(
            r#"{"user_id":"u1","display_name":"Ada","access_token":"t"}"#,
        )
        .unwrap();
        assert_eq!(session.role, Role::User);
    }
}
