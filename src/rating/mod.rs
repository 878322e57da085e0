//! Match ledger: open pairings, exactly-once result recording and history.
//!
//! Lock order across components is queue → ledger → users. The ledger never
//! calls back into the queue.

pub mod scoring;

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::{
    config,
    db::{
        models::{MatchId, MatchRecord, Outcome, User, UserId},
        user_repo::UserStore,
    },
    error::{CoreError, CoreResult},
    metrics,
};

/// A pairing handed out by the queue and not yet reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenMatch {
    pub match_id: MatchId,
    pub player1_id: UserId,
    pub player2_id: UserId,
    pub opened_at: DateTime<Utc>,
}

impl OpenMatch {
    pub fn opponent_of(&self, user_id: UserId) -> UserId {
        if self.player1_id == user_id {
            self.player2_id
        } else {
            self.player1_id
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOutcome {
    pub match_id: MatchId,
    /// Change applied to the reporter.
    pub elo_delta: i32,
    pub new_elo: i32,
    pub opponent_new_elo: i32,
}

/// Point-in-time copy of the durable tables, see [`MatchLedger::consistent_view`].
#[derive(Debug, Clone)]
pub struct LedgerView {
    pub records: Vec<MatchRecord>,
    pub users: Vec<User>,
    pub next_user_id: UserId,
    pub next_match_id: MatchId,
}

#[derive(Default)]
struct LedgerState {
    open: HashMap<MatchId, OpenMatch>,
    active: HashMap<UserId, MatchId>,
    /// Most recent settled match per user and who it was against.
    settled: HashMap<UserId, (MatchId, UserId)>,
    records: Vec<MatchRecord>,
}

pub struct MatchLedger {
    state: Mutex<LedgerState>,
    next_match_id: AtomicU64,
    k_factor: f64,
}

impl MatchLedger {
    pub fn new(k_factor: f64) -> Self {
        MatchLedger {
            state: Mutex::new(LedgerState::default()),
            next_match_id: AtomicU64::new(1),
            k_factor,
        }
    }

    pub async fn active_match(&self, user_id: UserId) -> Option<OpenMatch> {
        let st = self.state.lock().await;
        st.active
            .get(&user_id)
            .and_then(|mid| st.open.get(mid))
            .cloned()
    }

    /// Register a fresh pairing. Fails with `InMatch` if either player
    /// already has one open.
    pub async fn open(&self, p1: UserId, p2: UserId, now: DateTime<Utc>) -> CoreResult<OpenMatch> {
        if p1 == p2 {
            return Err(CoreError::InvalidInput("cannot pair a user with themselves".into()));
        }
        let mut st = self.state.lock().await;
        if st.active.contains_key(&p1) || st.active.contains_key(&p2) {
            return Err(CoreError::InMatch);
        }
        let m = OpenMatch {
            match_id: self.next_match_id.fetch_add(1, Ordering::AcqRel),
            player1_id: p1,
            player2_id: p2,
            opened_at: now,
        };
        st.active.insert(p1, m.match_id);
        st.active.insert(p2, m.match_id);
        st.open.insert(m.match_id, m.clone());
        Ok(m)
    }

    /// Record the outcome of the reporter's open match against `opponent_id`.
    /// The first report settles the match; later reports by either side get
    /// `AlreadyRecorded`.
    pub async fn record_result(
        &self,
        users: &UserStore,
        reporter_id: UserId,
        opponent_id: UserId,
        outcome: Outcome,
    ) -> CoreResult<RecordOutcome> {
        if reporter_id == opponent_id {
            return Err(CoreError::InvalidInput("opponent must be another user".into()));
        }
        for id in [reporter_id, opponent_id] {
            if !users.exists(id).await {
                return Err(CoreError::UnknownUser(id));
            }
        }
        if let Outcome::Winner(w) = outcome {
            if w != reporter_id && w != opponent_id {
                return Err(CoreError::InvalidInput(format!(
                    "winner {w} is not a participant"
                )));
            }
        }

        let mut st = self.state.lock().await;
        let open = match st.active.get(&reporter_id).and_then(|mid| st.open.get(mid)) {
            Some(m) if m.opponent_of(reporter_id) == opponent_id => m.clone(),
            Some(_) => return Err(CoreError::NotPaired),
            None => {
                return match st.settled.get(&reporter_id) {
                    Some(&(mid, against)) if against == opponent_id => {
                        Err(CoreError::AlreadyRecorded(mid))
                    }
                    _ => Err(CoreError::NotPaired),
                }
            }
        };

        let applied = users
            .apply_result(open.player1_id, open.player2_id, outcome, self.k_factor)
            .await?;

        let record = MatchRecord {
            match_id: open.match_id,
            player1_id: open.player1_id,
            player2_id: open.player2_id,
            winner_id: outcome.winner(),
            elo_delta_applied: applied.delta,
            created_at: Utc::now(),
        };
        st.open.remove(&open.match_id);
        st.active.remove(&open.player1_id);
        st.active.remove(&open.player2_id);
        st.settled
            .insert(open.player1_id, (open.match_id, open.player2_id));
        st.settled
            .insert(open.player2_id, (open.match_id, open.player1_id));
        st.records.push(record.clone());
        drop(st);

        metrics::RESULTS_RECORDED.inc();
        log::info!(
            "match {} recorded: {} vs {}, winner {:?}, delta {}",
            record.match_id,
            record.player1_id,
            record.player2_id,
            record.winner_id,
            record.elo_delta_applied
        );

        let reporter_is_p1 = open.player1_id == reporter_id;
        Ok(RecordOutcome {
            match_id: open.match_id,
            elo_delta: record.delta_for(reporter_id),
            new_elo: if reporter_is_p1 { applied.new_elo_p1 } else { applied.new_elo_p2 },
            opponent_new_elo: if reporter_is_p1 { applied.new_elo_p2 } else { applied.new_elo_p1 },
        })
    }

    /// Newest first.
    pub async fn history(&self, user_id: UserId, limit: usize) -> Vec<MatchRecord> {
        let st = self.state.lock().await;
        st.records
            .iter()
            .rev()
            .filter(|r| r.involves(user_id))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Close pairings nobody reported within `ttl_secs`.
    pub async fn expire(&self, now: DateTime<Utc>, ttl_secs: u64) -> Vec<OpenMatch> {
        let cutoff = now - config::ttl(ttl_secs);
        let mut st = self.state.lock().await;
        let stale: Vec<MatchId> = st
            .open
            .values()
            .filter(|m| m.opened_at <= cutoff)
            .map(|m| m.match_id)
            .collect();

        let mut closed = Vec::with_capacity(stale.len());
        for mid in stale {
            if let Some(m) = st.open.remove(&mid) {
                st.active.remove(&m.player1_id);
                st.active.remove(&m.player2_id);
                closed.push(m);
            }
        }
        closed
    }

    pub async fn records(&self) -> Vec<MatchRecord> {
        self.state.lock().await.records.clone()
    }

    /// Settled records and the user table, read under one ledger lock.
    /// `record_result` applies ratings while holding that lock, so every
    /// record in the result is reflected in the users and vice versa.
    pub async fn consistent_view(&self, users: &UserStore) -> LedgerView {
        let st = self.state.lock().await;
        let mut table = users.all().await;
        table.sort_by_key(|u| u.id);
        LedgerView {
            records: st.records.clone(),
            users: table,
            next_user_id: users.next_id(),
            next_match_id: self.next_match_id(),
        }
    }

    pub fn next_match_id(&self) -> MatchId {
        self.next_match_id.load(Ordering::Acquire)
    }

    pub async fn restore(&self, records: Vec<MatchRecord>, next_match_id: MatchId) {
        let mut st = self.state.lock().await;
        *st = LedgerState::default();
        let mut max_id = 0;
        for r in &records {
            max_id = max_id.max(r.match_id);
            st.settled.insert(r.player1_id, (r.match_id, r.player2_id));
            st.settled.insert(r.player2_id, (r.match_id, r.player1_id));
        }
        st.records = records;
        self.next_match_id
            .store(next_match_id.max(max_id + 1), Ordering::Release);
    }
}
