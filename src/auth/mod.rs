//! Registration, login and bearer-token validation.

pub mod password;
pub mod sessions;

use chrono::{DateTime, Utc};

use crate::{
    db::{
        models::{Session, User, UserId},
        user_repo::UserStore,
    },
    error::{CoreError, CoreResult},
    metrics,
};
use sessions::{Lookup, SessionStore};

pub struct AuthManager {
    pub sessions: SessionStore,
    session_ttl: u64,
    min_password_len: usize,
}

impl AuthManager {
    pub fn new(session_ttl: u64, min_password_len: usize) -> Self {
        AuthManager {
            sessions: SessionStore::new(),
            session_ttl,
            min_password_len,
        }
    }

    pub async fn register(&self, users: &UserStore, username: &str, pw: &str) -> CoreResult<User> {
        password::validate_username(username).map_err(CoreError::InvalidInput)?;
        password::validate_password_strength(pw, self.min_password_len)
            .map_err(CoreError::InvalidInput)?;

        // cheap pre-check so a taken name does not pay for a hash
        if users.find_by_username(username).await.is_some() {
            return Err(CoreError::DuplicateUsername);
        }

        let hash = hash_blocking(pw.to_owned()).await?;
        let user = users.insert(username, hash, Utc::now()).await?;
        log::info!("registered user {} ({})", user.id, user.username);
        Ok(user)
    }

    pub async fn login(&self, users: &UserStore, username: &str, pw: &str) -> CoreResult<Session> {
        let Some(user) = users.find_by_username(username).await else {
            log::debug!("login for unknown username {username:?}");
            // same argon2 cost as a wrong password
            if let Some(hash) = password::dummy_hash() {
                let _ = verify_blocking(pw.to_owned(), hash.to_owned()).await;
            }
            return Err(CoreError::InvalidCredentials);
        };

        if !verify_blocking(pw.to_owned(), user.password_hash.clone()).await? {
            log::debug!("wrong password for user {}", user.id);
            return Err(CoreError::InvalidCredentials);
        }

        let now = Utc::now();
        users.touch_login(user.id, now).await;
        let session = self.sessions.issue(user.id, self.session_ttl, now);
        metrics::SESSIONS_ISSUED.inc();
        log::info!("user {} logged in", user.id);
        Ok(session)
    }

    pub fn validate(&self, token: &str) -> CoreResult<UserId> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> CoreResult<UserId> {
        match self.sessions.lookup(token, now) {
            Lookup::Valid(id) => Ok(id),
            Lookup::Expired => Err(CoreError::Expired),
            Lookup::Missing => Err(CoreError::InvalidToken),
        }
    }

    /// Unknown tokens are not an error.
    pub fn logout(&self, token: &str) {
        if self.sessions.revoke(token) {
            log::debug!("session revoked");
        }
    }

    pub fn is_online(&self, user_id: UserId) -> bool {
        self.sessions.has_live_session(user_id, Utc::now())
    }
}

async fn hash_blocking(pw: String) -> CoreResult<String> {
    tokio::task::spawn_blocking(move || password::hash_password(&pw))
        .await
        .map_err(|e| CoreError::Internal(format!("hash task: {e}")))?
        .map_err(|e| CoreError::Internal(format!("hash: {e}")))
}

async fn verify_blocking(pw: String, hash: String) -> CoreResult<bool> {
    tokio::task::spawn_blocking(move || password::verify_password(&pw, &hash))
        .await
        .map_err(|e| CoreError::Internal(format!("verify task: {e}")))?
        .map_err(|e| CoreError::Internal(format!("stored hash unreadable: {e}")))
}
