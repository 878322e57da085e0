//! Matchmaking queue plus the background housekeeping loop.
//
//  Every `sweep_interval` seconds the loop:
//    - drops queue entries older than `queue_timeout`
//    - closes pairings nobody reported within `match_ttl`
//    - purges expired sessions
//    - writes `state.json` when a data directory is configured

pub mod queue;

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::time::sleep;

use crate::{db::snapshot, state::AppState};

/// Spawn the infinite housekeeping loop as a Tokio task.
pub fn start(state: Arc<AppState>) {
    let every = Duration::from_secs(state.settings.sweep_interval);
    tokio::spawn(async move {
        loop {
            sleep(every).await;
            if let Err(e) = tick(&state, Utc::now()).await {
                log::error!("housekeeping tick failed: {e:?}");
            }
        }
    });
}

/// What one tick removed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub queue_entries: usize,
    pub matches: usize,
    pub sessions: usize,
}

/// One housekeeping pass.
pub async fn tick(state: &AppState, now: DateTime<Utc>) -> anyhow::Result<SweepReport> {
    let timed_out = state.queue.purge_expired(now).await;
    for uid in &timed_out {
        log::info!("queue entry for user {uid} timed out");
    }

    let closed = state.ledger.expire(now, state.settings.match_ttl).await;
    let closed_ids: Vec<_> = closed.iter().map(|m| m.match_id).collect();
    state.queue.drop_notices(&closed_ids).await;
    for m in &closed {
        log::warn!(
            "match {} ({} vs {}) expired without a result",
            m.match_id,
            m.player1_id,
            m.player2_id
        );
    }

    let sessions = state.auth.sessions.purge_expired(now);

    if let Some(dir) = &state.settings.data_dir {
        snapshot::save(&state.snapshot().await, dir).await?;
    }

    Ok(SweepReport {
        queue_entries: timed_out.len(),
        matches: closed.len(),
        sessions,
    })
}
