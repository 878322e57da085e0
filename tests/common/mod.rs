#![allow(dead_code)]

use chess_ladder_server::{config::Settings, state::AppState};

pub const PASSWORD: &str = "pw123456";

pub fn state() -> AppState {
    AppState::new(Settings::default())
}

pub fn state_with(f: impl FnOnce(&mut Settings)) -> AppState {
    let mut s = Settings::default();
    f(&mut s);
    AppState::new(s)
}

/// Register `name` with the shared test password and return its id.
pub async fn user(state: &AppState, name: &str) -> u64 {
    state
        .auth
        .register(&state.users, name, PASSWORD)
        .await
        .expect("register")
        .id
}

/// Queue both players and pair them; returns the match id.
pub async fn pair(state: &AppState, a: u64, b: u64) -> u64 {
    use chess_ladder_server::matchmaking::queue::FindOutcome;

    state.queue.enqueue(&state.users, &state.ledger, a).await.expect("enqueue a");
    state.queue.enqueue(&state.users, &state.ledger, b).await.expect("enqueue b");
    match state
        .queue
        .find_match(&state.users, &state.ledger, a)
        .await
        .expect("find")
    {
        FindOutcome::Matched(m) => {
            assert_eq!(m.opponent_id, b);
            m.match_id
        }
        FindOutcome::Pending => panic!("expected {a} and {b} to pair"),
    }
}
