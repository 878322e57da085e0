//! The process-wide store: every component, created at startup and shared
//! with handlers through `web::Data`.

use crate::{
    auth::AuthManager,
    config::Settings,
    db::{snapshot::Snapshot, user_repo::UserStore},
    leaderboard::Leaderboard,
    matchmaking::queue::MatchQueue,
    rating::MatchLedger,
    social::SocialGraph,
};

pub struct AppState {
    pub settings: Settings,
    pub users: UserStore,
    pub auth: AuthManager,
    pub queue: MatchQueue,
    pub ledger: MatchLedger,
    pub social: SocialGraph,
    pub leaderboard: Leaderboard,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        AppState {
            users: UserStore::new(settings.initial_elo),
            auth: AuthManager::new(settings.session_ttl, settings.min_password_len),
            queue: MatchQueue::new(
                settings.elo_window_base,
                settings.elo_window_growth,
                settings.queue_timeout,
            ),
            ledger: MatchLedger::new(settings.k_factor),
            social: SocialGraph::new(),
            leaderboard: Leaderboard::new(settings.leaderboard_cache_ttl),
            settings,
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        let view = self.ledger.consistent_view(&self.users).await;
        Snapshot::new(
            view.next_user_id,
            view.next_match_id,
            view.users,
            view.records,
            self.social.edges(),
        )
    }

    pub async fn restore(&self, snap: Snapshot) {
        log::info!(
            "restoring {} users, {} matches, {} friend edges",
            snap.users.len(),
            snap.matches.len(),
            snap.friendships.len()
        );
        self.users.restore(snap.users, snap.next_user_id).await;
        self.ledger.restore(snap.matches, snap.next_match_id).await;
        self.social.restore(snap.friendships);
    }
}
