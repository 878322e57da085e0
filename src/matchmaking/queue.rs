//! Waiting-room for rated games.
//!
//! Per user: idle → queued → matched → idle. Pairing happens inside
//! `find_match` under the queue lock, so two concurrent polls can never hand
//! the same player to two opponents. The partner of a pairing gets the
//! assignment on their own next poll.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::{
    config,
    db::{
        models::{MatchId, QueueEntry, UserId},
        user_repo::UserStore,
    },
    error::{CoreError, CoreResult},
    metrics,
    rating::MatchLedger,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub match_id: MatchId,
    pub opponent_id: UserId,
    pub opponent_username: String,
    pub opponent_elo: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindOutcome {
    Matched(Assignment),
    Pending,
}

#[derive(Default)]
struct QueueState {
    /// Oldest first.
    entries: VecDeque<QueueEntry>,
    /// Assignments waiting for the partner's next poll.
    notices: HashMap<UserId, Assignment>,
}

pub struct MatchQueue {
    state: Mutex<QueueState>,
    window_base: i32,
    window_growth: i32,
    timeout_secs: u64,
}

impl MatchQueue {
    pub fn new(window_base: i32, window_growth: i32, timeout_secs: u64) -> Self {
        MatchQueue {
            state: Mutex::new(QueueState::default()),
            window_base,
            window_growth,
            timeout_secs,
        }
    }

    /// Acceptable rating gap after `waited` seconds.
    pub fn window(&self, waited: i64) -> i64 {
        let waited = waited.max(0);
        (self.window_base as i64).saturating_add((self.window_growth as i64).saturating_mul(waited))
    }

    fn expired(&self, e: &QueueEntry, now: DateTime<Utc>) -> bool {
        e.enqueued_at + config::ttl(self.timeout_secs) <= now
    }

    pub async fn enqueue(&self, users: &UserStore, ledger: &MatchLedger, user_id: UserId) -> CoreResult<()> {
        self.enqueue_at(users, ledger, user_id, Utc::now()).await
    }

    pub async fn enqueue_at(
        &self,
        users: &UserStore,
        ledger: &MatchLedger,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> CoreResult<()> {
        let user = users.get(user_id).await.ok_or(CoreError::UnknownUser(user_id))?;

        let mut st = self.state.lock().await;
        if st.entries.iter().any(|e| e.user_id == user_id) {
            return Err(CoreError::AlreadyQueued);
        }
        if ledger.active_match(user_id).await.is_some() {
            return Err(CoreError::InMatch);
        }
        // an assignment for a match that was already settled is moot
        st.notices.remove(&user_id);
        st.entries.push_back(QueueEntry {
            user_id,
            elo: user.elo,
            enqueued_at: now,
        });
        metrics::QUEUE_DEPTH.set(st.entries.len() as i64);
        log::debug!("user {user_id} queued at elo {}", user.elo);
        Ok(())
    }

    /// Removes the caller's entry if present. Always succeeds.
    pub async fn dequeue(&self, user_id: UserId) -> bool {
        let mut st = self.state.lock().await;
        let before = st.entries.len();
        st.entries.retain(|e| e.user_id != user_id);
        metrics::QUEUE_DEPTH.set(st.entries.len() as i64);
        before != st.entries.len()
    }

    pub async fn find_match(
        &self,
        users: &UserStore,
        ledger: &MatchLedger,
        user_id: UserId,
    ) -> CoreResult<FindOutcome> {
        self.find_match_at(users, ledger, user_id, Utc::now()).await
    }

    /// Non-blocking poll. Pairs the caller with the longest-waiting eligible
    /// opponent or reports `Pending` and leaves the entry in place.
    pub async fn find_match_at(
        &self,
        users: &UserStore,
        ledger: &MatchLedger,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> CoreResult<FindOutcome> {
        let mut st = self.state.lock().await;

        if let Some(assignment) = st.notices.remove(&user_id) {
            return Ok(FindOutcome::Matched(assignment));
        }

        let Some(pos) = st.entries.iter().position(|e| e.user_id == user_id) else {
            return Err(CoreError::NotQueued);
        };
        let me = st.entries[pos].clone();
        if self.expired(&me, now) {
            st.entries.remove(pos);
            metrics::QUEUE_DEPTH.set(st.entries.len() as i64);
            log::debug!("queue entry for {user_id} timed out");
            return Err(CoreError::NotQueued);
        }

        let my_wait = (now - me.enqueued_at).num_seconds();
        let opponent = st
            .entries
            .iter()
            .filter(|e| e.user_id != user_id && !self.expired(e, now))
            .find(|e| {
                let waited = my_wait.max((now - e.enqueued_at).num_seconds());
                ((e.elo - me.elo).abs() as i64) <= self.window(waited)
            })
            .cloned();

        let Some(opponent) = opponent else {
            return Ok(FindOutcome::Pending);
        };

        // the longer waiter is player 1
        let (p1, p2) = if opponent.enqueued_at <= me.enqueued_at {
            (opponent.user_id, user_id)
        } else {
            (user_id, opponent.user_id)
        };
        let open = ledger.open(p1, p2, now).await?;

        st.entries
            .retain(|e| e.user_id != user_id && e.user_id != opponent.user_id);
        metrics::QUEUE_DEPTH.set(st.entries.len() as i64);

        let my_name = users.username_of(user_id).await.unwrap_or_default();
        let their_name = users.username_of(opponent.user_id).await.unwrap_or_default();

        st.notices.insert(
            opponent.user_id,
            Assignment {
                match_id: open.match_id,
                opponent_id: user_id,
                opponent_username: my_name,
                opponent_elo: me.elo,
            },
        );
        drop(st);

        metrics::PAIRINGS.inc();
        log::info!(
            "paired {user_id} ({}) with {} ({}) as match {}",
            me.elo,
            opponent.user_id,
            opponent.elo,
            open.match_id
        );

        Ok(FindOutcome::Matched(Assignment {
            match_id: open.match_id,
            opponent_id: opponent.user_id,
            opponent_username: their_name,
            opponent_elo: opponent.elo,
        }))
    }

    pub async fn is_queued(&self, user_id: UserId) -> bool {
        self.state
            .lock()
            .await
            .entries
            .iter()
            .any(|e| e.user_id == user_id)
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop timed-out entries; returns the affected users.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Vec<UserId> {
        let mut st = self.state.lock().await;
        let mut dropped = Vec::new();
        st.entries.retain(|e| {
            let keep = !self.expired(e, now);
            if !keep {
                dropped.push(e.user_id);
            }
            keep
        });
        metrics::QUEUE_DEPTH.set(st.entries.len() as i64);
        dropped
    }

    /// Forget undelivered assignments for matches the ledger closed.
    pub async fn drop_notices(&self, match_ids: &[MatchId]) {
        if match_ids.is_empty() {
            return;
        }
        self.state
            .lock()
            .await
            .notices
            .retain(|_, a| !match_ids.contains(&a.match_id));
    }
}
