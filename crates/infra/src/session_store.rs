//! Session port: opaque session identifiers bound to account ids.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use connectcargo_core::{AccountId, SessionId};

/// Session store abstraction. No concurrent-session limit: an account may
/// hold any number of open sessions.
pub trait SessionStore: Send + Sync {
    /// Open a session and return its opaque identifier.
    fn open(&self, account_id: AccountId) -> SessionId;

    /// The account bound to a session, if the session is live.
    fn resolve(&self, session: SessionId) -> Option<AccountId>;

    /// Invalidate a session. Returns whether it was live.
    fn revoke(&self, session: SessionId) -> bool;
}

/// In-memory session store for dev/tests.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, AccountId>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl SessionStore for InMemorySessionStore {
    fn open(&self, account_id: AccountId) -> SessionId {
        let session = SessionId::new();
        self.sessions.write().unwrap().insert(session, account_id);
        session
    }

    fn resolve(&self, session: SessionId) -> Option<AccountId> {
        self.sessions.read().unwrap().get(&session).copied()
    }

    fn revoke(&self, session: SessionId) -> bool {
        self.sessions.write().unwrap().remove(&session).is_some()
    }
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn open(&self, account_id: AccountId) -> SessionId {
        (**self).open(account_id)
    }

    fn resolve(&self, session: SessionId) -> Option<AccountId> {
        (**self).resolve(session)
    }

    fn revoke(&self, session: SessionId) -> bool {
        (**self).revoke(session)
    }
}
