mod common;

use std::sync::Arc;

use chess_ladder_server::{db::models::Outcome, error::CoreError};

#[tokio::test]
async fn alice_beats_bob_with_k16() {
    let state = common::state();
    let alice = common::user(&state, "alice").await;
    let bob = common::user(&state, "bob").await;
    common::pair(&state, alice, bob).await;

    let res = state
        .ledger
        .record_result(&state.users, alice, bob, Outcome::Winner(alice))
        .await
        .expect("record");
    assert_eq!(res.elo_delta, 8);
    assert_eq!(res.new_elo, 1608);
    assert_eq!(res.opponent_new_elo, 1592);

    let a = state.users.get(alice).await.expect("alice");
    let b = state.users.get(bob).await.expect("bob");
    assert_eq!((a.elo, a.matches_played, a.wins, a.losses), (1608, 1, 1, 0));
    assert_eq!((b.elo, b.matches_played, b.wins, b.losses), (1592, 1, 0, 1));
}

#[tokio::test]
async fn second_report_of_the_same_match_is_rejected() {
    let state = common::state();
    let alice = common::user(&state, "alice").await;
    let bob = common::user(&state, "bob").await;
    let mid = common::pair(&state, alice, bob).await;

    state
        .ledger
        .record_result(&state.users, alice, bob, Outcome::Winner(alice))
        .await
        .expect("record");

    // repeat from the same side and a contradicting report from the other
    let again = state
        .ledger
        .record_result(&state.users, alice, bob, Outcome::Winner(alice))
        .await;
    assert!(matches!(again, Err(CoreError::AlreadyRecorded(m)) if m == mid));
    let other = state
        .ledger
        .record_result(&state.users, bob, alice, Outcome::Winner(bob))
        .await;
    assert!(matches!(other, Err(CoreError::AlreadyRecorded(m)) if m == mid));

    assert_eq!(state.users.get(alice).await.expect("u").elo, 1608);
    assert_eq!(state.users.get(bob).await.expect("u").elo, 1592);
    assert_eq!(state.ledger.history(alice, 10).await.len(), 1);
}

#[tokio::test]
async fn concurrent_reports_apply_exactly_once() {
    let state = Arc::new(common::state());
    let alice = common::user(&state, "alice").await;
    let bob = common::user(&state, "bob").await;
    common::pair(&state, alice, bob).await;

    let mut handles = Vec::new();
    for (reporter, opponent) in [(alice, bob), (bob, alice), (alice, bob), (bob, alice)] {
        let st = state.clone();
        handles.push(tokio::spawn(async move {
            st.ledger
                .record_result(&st.users, reporter, opponent, Outcome::Draw)
                .await
        }));
    }
    let mut ok = 0;
    for h in handles {
        match h.await.expect("join") {
            Ok(_) => ok += 1,
            Err(CoreError::AlreadyRecorded(_)) => {}
            Err(e) => panic!("unexpected {e}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(state.users.get(alice).await.expect("u").matches_played, 1);
}

#[tokio::test]
async fn unrelated_pairs_and_unknown_users_are_rejected() {
    let state = common::state();
    let alice = common::user(&state, "alice").await;
    let bob = common::user(&state, "bob").await;
    let carol = common::user(&state, "carol").await;

    let r = state
        .ledger
        .record_result(&state.users, alice, bob, Outcome::Winner(alice))
        .await;
    assert!(matches!(r, Err(CoreError::NotPaired)));

    common::pair(&state, alice, bob).await;
    let r = state
        .ledger
        .record_result(&state.users, alice, carol, Outcome::Winner(alice))
        .await;
    assert!(matches!(r, Err(CoreError::NotPaired)));

    let r = state
        .ledger
        .record_result(&state.users, alice, 4242, Outcome::Draw)
        .await;
    assert!(matches!(r, Err(CoreError::UnknownUser(4242))));

    let r = state
        .ledger
        .record_result(&state.users, alice, bob, Outcome::Winner(carol))
        .await;
    assert!(matches!(r, Err(CoreError::InvalidInput(_))));
}

#[tokio::test]
async fn draw_between_equals_changes_nothing_but_counters() {
    let state = common::state();
    let alice = common::user(&state, "alice").await;
    let bob = common::user(&state, "bob").await;
    common::pair(&state, alice, bob).await;

    let res = state
        .ledger
        .record_result(&state.users, bob, alice, Outcome::Draw)
        .await
        .expect("record");
    assert_eq!(res.elo_delta, 0);

    for id in [alice, bob] {
        let u = state.users.get(id).await.expect("u");
        assert_eq!(u.elo, 1600);
        assert_eq!((u.matches_played, u.wins, u.losses, u.draws), (1, 0, 0, 1));
        assert!(u.wins + u.losses <= u.matches_played);
    }
}

#[tokio::test]
async fn history_is_newest_first_from_each_perspective() {
    let state = common::state();
    let alice = common::user(&state, "alice").await;
    let bob = common::user(&state, "bob").await;

    let m1 = common::pair(&state, alice, bob).await;
    state
        .ledger
        .record_result(&state.users, alice, bob, Outcome::Winner(alice))
        .await
        .expect("record 1");
    // bob never polled for m1; the settled assignment must not block him
    let m2 = common::pair(&state, alice, bob).await;
    state
        .ledger
        .record_result(&state.users, bob, alice, Outcome::Winner(bob))
        .await
        .expect("record 2");

    let hist = state.ledger.history(bob, 10).await;
    assert_eq!(hist.iter().map(|r| r.match_id).collect::<Vec<_>>(), vec![m2, m1]);
    assert!(m2 > m1);
    assert!(hist[0].delta_for(bob) > 0);
    assert!(hist[1].delta_for(bob) < 0);
    assert_eq!(hist[1].delta_for(alice), -hist[1].delta_for(bob));
}
