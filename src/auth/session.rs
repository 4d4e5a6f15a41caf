//! Opaque bearer tokens mapped to user ids.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::RngCore;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Random bytes per token (hex-encoded on the wire).
pub const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub expires_at: Instant,
}

impl Session {
    fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Issued sessions, each valid for `ttl` after issue.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Issues a new token for `user_id`.
    pub async fn issue(&self, user_id: Uuid) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        let session = Session {
            user_id,
            expires_at: Instant::now() + self.ttl,
        };
        self.sessions.write().await.insert(token.clone(), session);
        debug!("Issued session for user {}", user_id);
        token
    }

    /// Returns the user behind `token`, dropping it if it has expired.
    pub async fn resolve(&self, token: &str) -> Option<Uuid> {
        let now = Instant::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                None => return None,
                Some(session) if !session.is_expired_at(now) => return Some(session.user_id),
                Some(_) => {}
            }
        }

        self.sessions.write().await.remove(token);
        None
    }

    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Drops expired sessions; returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
