//! Ranked view of the user table with a short-lived cache.
//!
//! A cached ranking is reused only while the user table's generation is
//! unchanged and it is younger than `leaderboard_cache_ttl`, so a committed
//! rating change is visible on the very next read.

use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::Mutex;

use crate::db::{models::UserId, user_repo::UserStore};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: UserId,
    pub username: String,
    pub elo: i32,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

struct Cached {
    generation: u64,
    built_at: Instant,
    entries: Vec<LeaderboardEntry>,
}

pub struct Leaderboard {
    cache: Mutex<Option<Cached>>,
    ttl: Duration,
}

impl Leaderboard {
    pub fn new(ttl_secs: u64) -> Self {
        Leaderboard {
            cache: Mutex::new(None),
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    /// Top `limit` users by Elo descending; ties go to the earlier
    /// registration. Ranks are 1-based positions.
    pub async fn top(&self, users: &UserStore, limit: usize) -> Vec<LeaderboardEntry> {
        let mut cache = self.cache.lock().await;
        let generation = users.generation();
        let fresh = cache
            .as_ref()
            .is_some_and(|c| c.generation == generation && c.built_at.elapsed() < self.ttl);

        if !fresh {
            *cache = Some(Cached {
                generation,
                built_at: Instant::now(),
                entries: rank_all(users).await,
            });
        }

        cache
            .as_ref()
            .map(|c| c.entries.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }
}

async fn rank_all(users: &UserStore) -> Vec<LeaderboardEntry> {
    let mut all = users.all().await;
    all.sort_by(|a, b| {
        b.elo
            .cmp(&a.elo)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });
    all.into_iter()
        .enumerate()
        .map(|(i, u)| LeaderboardEntry {
            rank: i + 1,
            user_id: u.id,
            username: u.username,
            elo: u.elo,
            matches: u.matches_played,
            wins: u.wins,
            losses: u.losses,
            draws: u.draws,
        })
        .collect()
}
