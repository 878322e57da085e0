//! Opaque bearer-token sessions.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rand::RngCore;

use crate::{
    config,
    db::models::{Session, UserId},
};

/// 256 bits from the thread-local CSPRNG, hex encoded. Carries no user data.
pub fn new_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
}

pub enum Lookup {
    Valid(UserId),
    Expired,
    Missing,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, user_id: UserId, ttl_secs: u64, now: DateTime<Utc>) -> Session {
        let session = Session {
            token: new_token(),
            user_id,
            issued_at: now,
            expires_at: now + config::ttl(ttl_secs),
        };
        self.sessions.insert(session.token.clone(), session.clone());
        session
    }

    /// Expired sessions are dropped on sight.
    pub fn lookup(&self, token: &str, now: DateTime<Utc>) -> Lookup {
        let user_id = match self.sessions.get(token) {
            None => return Lookup::Missing,
            Some(s) if s.expires_at > now => return Lookup::Valid(s.user_id),
            Some(s) => s.user_id,
        };
        self.sessions.remove(token);
        log::debug!("session for user {user_id} expired");
        Lookup::Expired
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    pub fn has_live_session(&self, user_id: UserId, now: DateTime<Utc>) -> bool {
        self.sessions
            .iter()
            .any(|s| s.user_id == user_id && s.expires_at > now)
    }

    /// Returns how many sessions were removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.expires_at > now);
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn oversized_ttl_still_yields_a_live_session() {
        let store = SessionStore::new();
        let now = Utc::now();
        let s = store.issue(3, u64::MAX, now);
        assert!(s.expires_at > now);
        assert!(matches!(store.lookup(&s.token, now), Lookup::Valid(3)));
    }

    #[test]
    fn tokens_are_long_and_unique() {
        let a = new_token();
        let b = new_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }

    #[test]
    fn expired_session_is_reported_then_forgotten() {
        let store = SessionStore::new();
        let now = Utc::now();
        let s = store.issue(9, 10, now);

        assert!(matches!(store.lookup(&s.token, now), Lookup::Valid(9)));
        let later = now + Duration::seconds(11);
        assert!(matches!(store.lookup(&s.token, later), Lookup::Expired));
        assert!(matches!(store.lookup(&s.token, later), Lookup::Missing));
    }
}
