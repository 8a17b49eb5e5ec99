//! In-memory session management.
//!
//! DESIGN
//! ======
//! Sessions are process-local by design: a `HashMap` behind an `RwLock`,
//! keyed by a random hex token carried in an HttpOnly cookie. Nothing is
//! written to disk and nothing survives a restart. Logout removes the map
//! entry outright, which is the full reset of the login state machine —
//! a token either resolves to a complete session or to nothing.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use rand::Rng;
use tokio::sync::RwLock;

use super::access::Role;
use super::subscription::SubscriptionRecord;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// State attached to one logged-in user.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Session {
    /// Login username.
    pub user: String,
    /// Role the evaluator granted.
    pub role: Role,
    /// Matched subscription record; `None` for admins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<SubscriptionRecord>,
}

/// Token-keyed in-memory session store.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a session under a freshly generated token and return the token.
    pub async fn create(&self, session: Session) -> String {
        let token = generate_token();
        self.inner.write().await.insert(token.clone(), session);
        token
    }

    /// Resolve a token to its session, if one exists.
    pub async fn get(&self, token: &str) -> Option<Session> {
        self.inner.read().await.get(token).cloned()
    }

    /// Remove a session. Returns `true` if a session existed for the token.
    pub async fn remove(&self, token: &str) -> bool {
        self.inner.write().await.remove(token).is_some()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
