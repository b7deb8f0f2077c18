//! Observable session context
//!
//! The signed-in user lives in a [`SessionContext`] that is passed explicitly to the pages and
//! to the HTTP client. It is populated on login, cleared on logout or when the backend answers
//! 401, and observers can await changes through [`SessionContext::subscribe`].

use crate::types::UserProfile;
use std::sync::Arc;
use tokio::sync::watch;

/// Shared handle to the current session; clones observe the same session
#[derive(Debug, Clone)]
pub struct SessionContext {
    tx: Arc<watch::Sender<Option<UserProfile>>>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    /// Create a signed-out session
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Current user, if signed in
    pub fn user(&self) -> Option<UserProfile> {
        self.tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Record a successful login
    pub fn sign_in(&self, user: UserProfile) {
        tracing::info!("Signed in as {}", user.username);
        self.tx.send_replace(Some(user));
    }

    /// Clear the session after an explicit logout
    pub fn sign_out(&self) {
        if self.tx.send_replace(None).is_some() {
            tracing::info!("Signed out");
        }
    }

    /// Clear the session because the backend rejected it
    pub fn invalidate(&self) {
        if self.tx.send_replace(None).is_some() {
            tracing::warn!("Session invalidated by the backend");
        }
    }

    /// Receiver notified on every sign-in and sign-out
    pub fn subscribe(&self) -> watch::Receiver<Option<UserProfile>> {
        self.tx.subscribe()
    }
}
