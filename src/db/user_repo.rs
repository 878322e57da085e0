//! In-memory user table.
//!
//! Both indices live behind a single `RwLock` so a registration is visible
//! in both at once and a rating update touching two players commits as one
//! unit for readers.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    db::models::{User, UserId, UserSummary},
    error::{CoreError, CoreResult},
};

#[derive(Default)]
pub(crate) struct UserTable {
    pub(crate) by_id: HashMap<UserId, User>,
    /// Lower-cased username → id.
    pub(crate) by_name: HashMap<String, UserId>,
}

pub struct UserStore {
    pub(crate) table: RwLock<UserTable>,
    next_id: AtomicU64,
    /// Bumped on every mutation; lets read caches detect staleness.
    pub(crate) generation: AtomicU64,
    initial_elo: i32,
}

pub(crate) fn name_key(username: &str) -> String {
    username.trim().to_lowercase()
}

impl UserStore {
    pub fn new(initial_elo: i32) -> Self {
        UserStore {
            table: RwLock::new(UserTable::default()),
            next_id: AtomicU64::new(1),
            generation: AtomicU64::new(0),
            initial_elo,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub(crate) fn bump(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Create a user; fails if the (case-insensitive) name is taken.
    pub async fn insert(
        &self,
        username: &str,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> CoreResult<User> {
        let key = name_key(username);
        let mut table = self.table.write().await;
        if table.by_name.contains_key(&key) {
            return Err(CoreError::DuplicateUsername);
        }

        let id = self.next_id.fetch_add(1, Ordering::AcqRel);
        let user = User {
            id,
            username: username.trim().to_string(),
            password_hash,
            elo: self.initial_elo,
            matches_played: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            created_at: now,
            last_login: None,
        };
        table.by_name.insert(key, id);
        table.by_id.insert(id, user.clone());
        drop(table);

        self.bump();
        Ok(user)
    }

    pub async fn get(&self, id: UserId) -> Option<User> {
        self.table.read().await.by_id.get(&id).cloned()
    }

    pub async fn exists(&self, id: UserId) -> bool {
        self.table.read().await.by_id.contains_key(&id)
    }

    pub async fn find_by_username(&self, username: &str) -> Option<User> {
        let table = self.table.read().await;
        table
            .by_name
            .get(&name_key(username))
            .and_then(|id| table.by_id.get(id))
            .cloned()
    }

    pub async fn username_of(&self, id: UserId) -> Option<String> {
        self.table
            .read()
            .await
            .by_id
            .get(&id)
            .map(|u| u.username.clone())
    }

    pub async fn touch_login(&self, id: UserId, now: DateTime<Utc>) {
        if let Some(u) = self.table.write().await.by_id.get_mut(&id) {
            u.last_login = Some(now);
        }
    }

    /// Consistent copy of every user.
    pub async fn all(&self) -> Vec<User> {
        self.table.read().await.by_id.values().cloned().collect()
    }

    /// Summaries for `ids`, silently skipping ids that no longer resolve.
    pub async fn summaries(&self, ids: &[UserId]) -> Vec<UserSummary> {
        let table = self.table.read().await;
        ids.iter()
            .filter_map(|id| table.by_id.get(id))
            .map(UserSummary::from)
            .collect()
    }

    pub fn next_id(&self) -> UserId {
        self.next_id.load(Ordering::Acquire)
    }

    /// Replace the table wholesale (snapshot restore).
    pub async fn restore(&self, users: Vec<User>, next_id: UserId) {
        let mut table = self.table.write().await;
        table.by_id.clear();
        table.by_name.clear();
        let mut max_id = 0;
        for u in users {
            max_id = max_id.max(u.id);
            table.by_name.insert(name_key(&u.username), u.id);
            table.by_id.insert(u.id, u);
        }
        self.next_id
            .store(next_id.max(max_id + 1), Ordering::Release);
        drop(table);
        self.bump();
    }
}
