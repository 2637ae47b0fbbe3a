//! Client-held authentication state.
//!
//! A [`SessionHandle`] is an explicit, cheaply cloneable reference to the
//! current session. The gateway reads the bearer token from it; consumers
//! observe transitions through [`SessionHandle::subscribe`].

pub mod store;
pub mod subscriber;

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::error::Result;
use crate::types::{EntityId, ADMIN_ROLE};

pub use store::{FileStore, MemoryStore, SessionStore};
pub use subscriber::SessionSubscription;

/// An authenticated session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    /// Identifier the user logged in with (phone number or username).
    pub identity: String,
    #[serde(default)]
    pub user_id: Option<EntityId>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == ADMIN_ROLE)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("identity", &self.identity)
            .field("user_id", &self.user_id)
            .field("roles", &self.roles)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutReason {
    /// Explicit logout.
    Logout,
    /// A protected call was answered with 401.
    Expired,
}

/// Session state transition, delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { identity: String },
    SignedOut { reason: SignOutReason },
}

const EVENT_CAPACITY: usize = 64;

struct Inner {
    current: RwLock<Option<Session>>,
    store: Box<dyn SessionStore>,
    events: broadcast::Sender<SessionEvent>,
}

/// Shared handle to the session. Clones refer to the same session.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Inner>,
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::build(Box::new(MemoryStore::default()), None)
    }
}

impl SessionHandle {
    /// Anonymous session kept in memory only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session backed by `store`, restoring whatever it holds.
    ///
    /// Store writes run synchronously under the session lock, so a slow store
    /// (such as [`FileStore`], which syncs to disk) briefly blocks the calling
    /// worker during login, logout and expiry.
    pub fn with_store(store: impl SessionStore + 'static) -> Result<Self> {
        let restored = store.load()?;
        if let Some(session) = &restored {
            info!(identity = %session.identity, "restored session");
        }
        Ok(Self::build(Box::new(store), restored))
    }

    fn build(store: Box<dyn SessionStore>, current: Option<Session>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                current: RwLock::new(current),
                store,
                events,
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        if self.read().is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Option<Session> {
        self.read().clone()
    }

    /// Bearer token of the current session.
    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    /// Subscribe to session transitions from now on.
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription::new(self.inner.events.subscribe())
    }

    /// Replace the current session with `session`.
    ///
    /// The session is persisted first; if the store fails the previous state
    /// is kept and the error returned.
    pub fn sign_in(&self, session: Session) -> Result<()> {
        let identity = session.identity.clone();
        let mut current = self.write();
        self.inner.store.save(&session)?;
        *current = Some(session);
        // emitted under the lock so events follow state changes in order
        self.emit(SessionEvent::SignedIn { identity });
        Ok(())
    }

    /// Clear the session. Returns whether a session was active.
    pub fn sign_out(&self) -> bool {
        let mut current = self.write();
        if current.take().is_none() {
            return false;
        }
        self.clear_store();
        self.emit(SessionEvent::SignedOut {
            reason: SignOutReason::Logout,
        });
        true
    }

    /// Clear the session after a 401, but only if `token` is still the
    /// current token. Concurrent 401s for the same token clear it once; a 401
    /// for a token already replaced by a newer login is ignored.
    ///
    /// Returns whether this call performed the transition.
    pub fn expire(&self, token: &str) -> bool {
        let mut current = self.write();
        match current.as_ref() {
            Some(session) if session.token == token => {}
            _ => return false,
        }
        *current = None;
        self.clear_store();
        warn!("session expired");
        self.emit(SessionEvent::SignedOut {
            reason: SignOutReason::Expired,
        });
        true
    }

    fn clear_store(&self) {
        if let Err(e) = self.inner.store.clear() {
            warn!(error = %e, "failed to clear persisted session");
        }
    }

    fn emit(&self, event: SessionEvent) {
        // no subscribers is fine
        let _ = self.inner.events.send(event);
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.inner
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(token: &str) -> Session {
        Session {
            token: token.into(),
            identity: "+1-5551234567".into(),
            user_id: Some(EntityId::Number(42)),
            roles: vec![],
        }
    }

    #[test]
    fn test_sign_in_and_out() {
        let handle = SessionHandle::new();
        assert_eq!(handle.state(), SessionState::Anonymous);

        handle.sign_in(session("abc")).unwrap();
        assert_eq!(handle.state(), SessionState::Authenticated);
        assert_eq!(handle.token().as_deref(), Some("abc"));

        assert!(handle.sign_out());
        assert_eq!(handle.state(), SessionState::Anonymous);
        assert!(!handle.sign_out());
    }

    #[test]
    fn test_expire_only_matching_token() {
        let handle = SessionHandle::new();
        handle.sign_in(session("new-token")).unwrap();

        assert!(!handle.expire("old-token"));
        assert!(handle.is_authenticated());

        assert!(handle.expire("new-token"));
        assert!(!handle.is_authenticated());
        assert!(!handle.expire("new-token"));
    }

    #[test]
    fn test_clones_share_state() {
        let handle = SessionHandle::new();
        let other = handle.clone();
        handle.sign_in(session("abc")).unwrap();
        assert!(other.is_authenticated());
    }

    #[test]
    fn test_events_are_delivered_in_order() {
        let handle = SessionHandle::new();
        let mut sub = handle.subscribe();

        handle.sign_in(session("abc")).unwrap();
        handle.expire("abc");
        handle.sign_out();

        assert_eq!(
            sub.try_next(),
            Some(SessionEvent::SignedIn {
                identity: "+1-5551234567".into()
            })
        );
        assert_eq!(
            sub.try_next(),
            Some(SessionEvent::SignedOut {
                reason: SignOutReason::Expired
            })
        );
        // sign_out on an anonymous session emits nothing
        assert_eq!(sub.try_next(), None);
    }

    #[test]
    fn test_events_follow_racing_sign_in_and_sign_out() {
        for _ in 0..200 {
            let handle = SessionHandle::new();
            handle.sign_in(session("old")).unwrap();
            let mut sub = handle.subscribe();

            let signer = handle.clone();
            let leaver = handle.clone();
            let a = std::thread::spawn(move || signer.sign_in(session("new")).unwrap());
            let b = std::thread::spawn(move || leaver.sign_out());
            a.join().unwrap();
            b.join().unwrap();

            let mut last = None;
            while let Some(event) = sub.try_next() {
                last = Some(event);
            }
            let signed_in = matches!(last, Some(SessionEvent::SignedIn { .. }));
            assert_eq!(signed_in, handle.is_authenticated());
        }
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", session("super-secret"));
        assert!(!debug.contains("super-secret"));
    }
}
