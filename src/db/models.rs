use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = u64;
pub type MatchId = u64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// PHC-formatted Argon2id hash; never leaves the store except in snapshots.
    pub password_hash: String,
    pub elo: i32,
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    #[serde(default)]
    pub draws: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub user_id: UserId,
    /// Rating at enqueue time. Ratings only move when a result is recorded,
    /// which cannot happen while the user is queued.
    pub elo: i32,
    pub enqueued_at: DateTime<Utc>,
}

/// Reported outcome of a match, from the ledger's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(UserId),
    Draw,
}

impl Outcome {
    /// Wire encoding: `None` or `0` means draw.
    pub fn from_wire(winner_id: Option<UserId>) -> Self {
        match winner_id {
            None | Some(0) => Outcome::Draw,
            Some(id) => Outcome::Winner(id),
        }
    }

    pub fn winner(&self) -> Option<UserId> {
        match self {
            Outcome::Winner(id) => Some(*id),
            Outcome::Draw => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: MatchId,
    pub player1_id: UserId,
    pub player2_id: UserId,
    pub winner_id: Option<UserId>,
    /// Delta applied to player 1; player 2 received the negation.
    pub elo_delta_applied: i32,
    pub created_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn involves(&self, user_id: UserId) -> bool {
        self.player1_id == user_id || self.player2_id == user_id
    }

    pub fn opponent_of(&self, user_id: UserId) -> UserId {
        if self.player1_id == user_id {
            self.player2_id
        } else {
            self.player1_id
        }
    }

    /// Rating change seen by `user_id`.
    pub fn delta_for(&self, user_id: UserId) -> i32 {
        if self.player1_id == user_id {
            self.elo_delta_applied
        } else {
            -self.elo_delta_applied
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendState {
    Pending,
    Accepted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendEdge {
    pub requester_id: UserId,
    pub target_id: UserId,
    pub state: FriendState,
}

impl FriendEdge {
    pub fn other(&self, user_id: UserId) -> UserId {
        if self.requester_id == user_id {
            self.target_id
        } else {
            self.requester_id
        }
    }
}

/// Public projection of a user used by list endpoints.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserSummary {
    pub user_id: UserId,
    pub username: String,
    pub elo: i32,
}

impl From<&User> for UserSummary {
    fn from(u: &User) -> Self {
        UserSummary {
            user_id: u.id,
            username: u.username.clone(),
            elo: u.elo,
        }
    }
}
