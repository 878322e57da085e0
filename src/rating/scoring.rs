//! Elo helper using the logistic expected-score curve.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    FirstWins,
    SecondWins,
    Draw,
}

/// Expected score of a player rated `r1` against one rated `r2`.
pub fn expected_score(r1: i32, r2: i32) -> f64 {
    1.0 / (1.0 + 10f64.powf((r2 - r1) as f64 / 400.0))
}

/// Returns (delta_p1, delta_p2) given current ratings and result.
/// The deltas always cancel out.
pub fn elo_delta(r1: i32, r2: i32, result: GameResult, k: f64) -> (i32, i32) {
    let e1 = expected_score(r1, r2);
    let s1 = match result {
        GameResult::FirstWins => 1.0,
        GameResult::SecondWins => 0.0,
        GameResult::Draw => 0.5,
    };
    let d1 = (k * (s1 - e1)).round() as i32;
    (d1, -d1)
}
