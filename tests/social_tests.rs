mod common;

use chess_ladder_server::{db::models::FriendState, error::CoreError};

#[tokio::test]
async fn request_accept_lifecycle() {
    let state = common::state();
    let alice = common::user(&state, "alice").await;
    let bob = common::user(&state, "bob").await;

    state
        .social
        .send_request(&state.users, alice, bob)
        .await
        .expect("request");
    assert_eq!(state.social.pending_for(bob), vec![alice]);
    assert!(state.social.pending_for(alice).is_empty());

    // only the addressee may accept
    assert!(matches!(
        state.social.accept_request(alice, bob),
        Err(CoreError::NoSuchRequest)
    ));
    state.social.accept_request(bob, alice).expect("accept");

    assert_eq!(state.social.friends_of(alice), vec![bob]);
    assert_eq!(state.social.friends_of(bob), vec![alice]);
    assert_eq!(
        state.social.edge_between(bob, alice).map(|e| e.state),
        Some(FriendState::Accepted)
    );
}

#[tokio::test]
async fn duplicate_and_self_requests_fail() {
    let state = common::state();
    let alice = common::user(&state, "alice").await;
    let bob = common::user(&state, "bob").await;

    assert!(matches!(
        state.social.send_request(&state.users, alice, alice).await,
        Err(CoreError::SelfFriend)
    ));
    assert!(matches!(
        state.social.send_request(&state.users, alice, 777).await,
        Err(CoreError::UnknownUser(777))
    ));

    state.social.send_request(&state.users, alice, bob).await.expect("request");
    for (from, to) in [(alice, bob), (bob, alice)] {
        assert!(matches!(
            state.social.send_request(&state.users, from, to).await,
            Err(CoreError::AlreadyPending)
        ));
    }

    state.social.accept_request(bob, alice).expect("accept");
    assert!(matches!(
        state.social.send_request(&state.users, bob, alice).await,
        Err(CoreError::AlreadyFriends)
    ));
}

#[tokio::test]
async fn reject_deletes_pending_and_is_idempotent() {
    let state = common::state();
    let alice = common::user(&state, "alice").await;
    let bob = common::user(&state, "bob").await;

    state.social.send_request(&state.users, alice, bob).await.expect("request");
    assert!(state.social.reject_request(bob, alice));
    assert!(!state.social.reject_request(bob, alice));
    assert!(state.social.edge_between(alice, bob).is_none());

    // a new request is possible afterwards
    state.social.send_request(&state.users, alice, bob).await.expect("request again");

    // reject never removes an accepted friendship
    state.social.accept_request(bob, alice).expect("accept");
    assert!(!state.social.reject_request(bob, alice));
    assert_eq!(state.social.friends_of(bob), vec![alice]);
}

#[tokio::test]
async fn search_is_case_insensitive_bounded_and_excludes_self() {
    let state = common::state_with(|s| s.search_limit = 2);
    let alice = common::user(&state, "Alice").await;
    common::user(&state, "malice").await;
    common::user(&state, "ALICIA").await;
    common::user(&state, "bob").await;

    let hits = state
        .social
        .search_users(&state.users, alice, "ali", 2)
        .await
        .expect("search");
    let names: Vec<&str> = hits.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["ALICIA", "malice"]);

    assert!(matches!(
        state.social.search_users(&state.users, alice, "  ", 2).await,
        Err(CoreError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn recommendations_prefer_mutual_friends() {
    let state = common::state();
    let me = common::user(&state, "self").await;
    let f1 = common::user(&state, "friend1").await;
    let f2 = common::user(&state, "friend2").await;
    let both = common::user(&state, "knowsboth").await;
    let one = common::user(&state, "knowsone").await;
    let stranger = common::user(&state, "stranger").await;
    let asked = common::user(&state, "asked").await;

    let befriend = |a: u64, b: u64| {
        let state = &state;
        async move {
            state.social.send_request(&state.users, a, b).await.expect("request");
            state.social.accept_request(b, a).expect("accept");
        }
    };
    befriend(me, f1).await;
    befriend(me, f2).await;
    befriend(f1, both).await;
    befriend(f2, both).await;
    befriend(f1, one).await;
    state.social.send_request(&state.users, me, asked).await.expect("pending");

    let recs = state
        .social
        .recommendations(&state.users, me, 10)
        .await
        .expect("recs");
    let ids: Vec<u64> = recs.iter().map(|r| r.user_id).collect();

    assert_eq!(ids[0], both);
    assert_eq!(recs[0].mutual_friends, 2);
    assert_eq!(ids[1], one);
    assert!(ids.contains(&stranger));
    for excluded in [me, f1, f2, asked] {
        assert!(!ids.contains(&excluded));
    }
}
