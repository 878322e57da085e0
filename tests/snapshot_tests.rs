mod common;

use std::path::PathBuf;

use chess_ladder_server::{
    db::{models::Outcome, snapshot},
    matchmaking,
};
use chrono::Utc;

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "ladder-snapshot-{tag}-{}-{}",
        std::process::id(),
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[tokio::test]
async fn missing_snapshot_loads_as_none() {
    let dir = scratch_dir("missing");
    assert!(snapshot::load(&dir).await.expect("load").is_none());
}

#[tokio::test]
async fn durable_tables_survive_a_restart() {
    let dir = scratch_dir("restart");
    let state = common::state_with(|s| s.data_dir = Some(dir.clone()));
    let alice = common::user(&state, "alice").await;
    let bob = common::user(&state, "bob").await;
    let mid = common::pair(&state, alice, bob).await;
    state
        .ledger
        .record_result(&state.users, alice, bob, Outcome::Winner(alice))
        .await
        .expect("record");
    state.social.send_request(&state.users, bob, alice).await.expect("request");

    // the sweeper writes the snapshot when a data dir is configured
    matchmaking::tick(&state, Utc::now()).await.expect("tick");

    let restarted = common::state();
    let snap = snapshot::load(&dir).await.expect("load").expect("present");
    restarted.restore(snap).await;

    let a = restarted.users.get(alice).await.expect("alice");
    assert_eq!(a.elo, 1608);
    assert_eq!(restarted.social.pending_for(alice), vec![bob]);

    // old credentials still work, ids keep counting upward
    restarted
        .auth
        .login(&restarted.users, "alice", common::PASSWORD)
        .await
        .expect("login after restore");
    let carol = common::user(&restarted, "carol").await;
    assert!(carol > bob);

    // the settled match stays settled
    let again = restarted
        .ledger
        .record_result(&restarted.users, bob, alice, Outcome::Winner(bob))
        .await;
    assert!(matches!(
        again,
        Err(chess_ladder_server::error::CoreError::AlreadyRecorded(m)) if m == mid
    ));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn snapshots_taken_during_recording_are_never_torn() {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };

    let state = Arc::new(common::state());
    let alice = common::user(&state, "alice").await;
    let bob = common::user(&state, "bob").await;
    let done = Arc::new(AtomicBool::new(false));

    let reader = {
        let state = state.clone();
        let done = done.clone();
        tokio::spawn(async move {
            let mut taken = 0;
            while !done.load(Ordering::Acquire) {
                let snap = state.snapshot().await;
                for u in &snap.users {
                    let played = snap.matches.iter().filter(|m| m.involves(u.id)).count();
                    assert_eq!(u.matches_played as usize, played, "user {}", u.id);
                    assert_eq!(u.wins + u.losses + u.draws, u.matches_played);
                }
                taken += 1;
                tokio::task::yield_now().await;
            }
            taken
        })
    };

    for i in 0..500 {
        common::pair(&state, alice, bob).await;
        let winner = if i % 3 == 0 { Outcome::Draw } else { Outcome::Winner(alice) };
        state
            .ledger
            .record_result(&state.users, bob, alice, winner)
            .await
            .expect("record");
    }
    done.store(true, Ordering::Release);

    let taken = reader.await.expect("reader panicked");
    assert!(taken > 0);
}
