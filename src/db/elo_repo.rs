use crate::{
    db::{
        models::{Outcome, UserId},
        user_repo::UserStore,
    },
    error::{CoreError, CoreResult},
    rating::scoring::{elo_delta, GameResult},
};

/// Ratings and counters after a result was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedResult {
    /// Delta for player 1; player 2 received the negation.
    pub delta: i32,
    pub new_elo_p1: i32,
    pub new_elo_p2: i32,
}

impl UserStore {
    /// Apply an Elo update and bump counters for both players under one
    /// write lock, so readers see either both changes or neither.
    pub async fn apply_result(
        &self,
        p1: UserId,
        p2: UserId,
        outcome: Outcome,
        k: f64,
    ) -> CoreResult<AppliedResult> {
        let result = match outcome {
            Outcome::Draw => GameResult::Draw,
            Outcome::Winner(id) if id == p1 => GameResult::FirstWins,
            Outcome::Winner(id) if id == p2 => GameResult::SecondWins,
            Outcome::Winner(id) => {
                return Err(CoreError::InvalidInput(format!(
                    "winner {id} did not play this match"
                )))
            }
        };

        let mut table = self.table.write().await;
        let r1 = table.by_id.get(&p1).ok_or(CoreError::UnknownUser(p1))?.elo;
        let r2 = table.by_id.get(&p2).ok_or(CoreError::UnknownUser(p2))?.elo;
        let (d1, d2) = elo_delta(r1, r2, result, k);

        let mut new_elo = [0; 2];
        for (slot, (id, d, won, lost)) in [
            (p1, d1, result == GameResult::FirstWins, result == GameResult::SecondWins),
            (p2, d2, result == GameResult::SecondWins, result == GameResult::FirstWins),
        ]
        .into_iter()
        .enumerate()
        {
            // both ids were resolved above under the same lock
            if let Some(u) = table.by_id.get_mut(&id) {
                u.elo += d;
                u.matches_played += 1;
                if won {
                    u.wins += 1;
                } else if lost {
                    u.losses += 1;
                } else {
                    u.draws += 1;
                }
                new_elo[slot] = u.elo;
            }
        }
        drop(table);
        self.bump();

        Ok(AppliedResult {
            delta: d1,
            new_elo_p1: new_elo[0],
            new_elo_p2: new_elo[1],
        })
    }
}
