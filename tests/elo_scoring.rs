//! Verifies basic properties of the Elo helper.

use chess_ladder_server::rating::scoring::{elo_delta, GameResult};

#[test]
fn equal_ratings_draw_gives_zero_delta() {
    let (d1, d2) = elo_delta(1600, 1600, GameResult::Draw, 16.0);
    assert_eq!((d1, d2), (0, 0));
}

#[test]
fn even_game_with_k16_moves_eight_points() {
    let (d1, d2) = elo_delta(1600, 1600, GameResult::FirstWins, 16.0);
    assert_eq!((d1, d2), (8, -8));
}

#[test]
fn winner_gains_and_loser_loses_same_amount() {
    for (r1, r2) in [(1400, 1600), (1600, 1400), (1523, 1987), (2100, 900)] {
        for result in [GameResult::FirstWins, GameResult::SecondWins, GameResult::Draw] {
            let (d1, d2) = elo_delta(r1, r2, result, 16.0);
            assert_eq!(d1, -d2, "{r1} vs {r2} {result:?}");
        }
    }
}

#[test]
fn lower_rated_player_gains_more_on_upset() {
    let (upset, _) = elo_delta(1400, 1600, GameResult::FirstWins, 16.0);
    let (expected, _) = elo_delta(1600, 1400, GameResult::FirstWins, 16.0);
    assert!(upset > expected);
    assert!(expected > 0);
}

#[test]
fn draw_between_unequal_players_favours_the_underdog() {
    let (d1, d2) = elo_delta(1400, 1600, GameResult::Draw, 16.0);
    assert!(d1 > 0 && d2 < 0);
}
