use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

/// The single capability check the HTTP layer needs.
pub trait Authenticator: Send + Sync {
    /// Whether the caller presenting `token` (the session cookie value) may
    /// use the lookup routes.
    fn is_authorized(&self, token: Option<&str>) -> bool;
}

/// Lets every caller through; used when the login gate is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAccess;

impl Authenticator for OpenAccess {
    fn is_authorized(&self, _token: Option<&str>) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
struct Session {
    username: String,
    expires_at: DateTime<Utc>,
}

/// In-memory session table keyed by random token. Sessions do not survive a
/// restart.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Open a session for `username` and return its token.
    pub fn create(&self, username: &str) -> String {
        self.create_at(username, Utc::now())
    }

    fn create_at(&self, username: &str, now: DateTime<Utc>) -> String {
        let token = Uuid::new_v4().to_string();
        let session = Session {
            username: username.to_string(),
            expires_at: now + self.ttl,
        };
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.clone(), session);
        token
    }

    /// Username for a live session.
    pub fn username(&self, token: &str) -> Option<String> {
        self.username_at(token, Utc::now())
    }

    fn username_at(&self, token: &str, now: DateTime<Utc>) -> Option<String> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions
            .get(token)
            .filter(|s| s.expires_at > now)
            .map(|s| s.username.clone())
    }

    pub fn remove(&self, token: &str) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token)
            .is_some()
    }

    /// Drop expired sessions, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        before - sessions.len()
    }
}

impl Authenticator for SessionStore {
    fn is_authorized(&self, token: Option<&str>) -> bool {
        token.is_some_and(|t| self.username(t).is_some())
    }
}
