//! Scalar return signals used as training labels.
//!
//! All three functions score a finished game from one player's perspective.
//! Only the terminal outcome carries reward, so the return of a game of `T`
//! actions is the terminal reward discounted `T` times:
//!
//! ```text
//! G = d^T * r_T
//! ```

use crate::data::game::{is_winner, GameRecord, PlayerRecord};

/// Default discount factor for [`discounted_return`] and [`tournament_return`].
pub const DISCOUNT_FACTOR: f64 = 0.99;

/// Fixed discount used by [`victory_points_return`].
pub const VICTORY_POINTS_DISCOUNT: f64 = 0.9999;

/// Victory points needed to win; point totals are capped here.
pub const VICTORY_POINTS_CAP: u32 = 10;

/// Offset added for a win in [`tournament_return`].
pub const TOURNAMENT_WIN_BONUS: f64 = 1000.0;

/// Longest game (in actions) for which [`victory_points_return`] still ranks
/// any 10-point finish above an undiscounted 9-point finish.
///
/// `10 * 0.9999^T > 9` holds while `T < ln(0.9) / ln(0.9999) ≈ 1053.6`.
/// Games are assumed to be capped below this length.
pub const VICTORY_POINTS_ORDERING_BOUND: usize = 1053;

/// `d^T` with a correctly rounded power, so labels match `d ** T` bit for bit.
fn discount(discount_factor: f64, num_actions: usize) -> f64 {
    discount_factor.powf(num_actions as f64)
}

/// Win indicator discounted by game length: `d^T` for a win, `0` otherwise.
///
/// # Panics
/// Panics if `discount_factor > 1`.
pub fn discounted_return<G, P>(game: &G, player: &P, discount_factor: f64) -> f64
where
    G: GameRecord,
    P: PlayerRecord<G::Color>,
{
    assert!(
        discount_factor <= 1.0,
        "discount factor {} must be <= 1",
        discount_factor
    );
    let win = if is_winner(game, player) { 1.0 } else { 0.0 };
    win * discount(discount_factor, game.num_actions())
}

/// Winning dominates, victory points break ties.
///
/// `(1000 * win + min(vp, 10)) * d^T`
pub fn tournament_return<G, P>(game: &G, player: &P, discount_factor: f64) -> f64
where
    G: GameRecord,
    P: PlayerRecord<G::Color>,
{
    let win = if is_winner(game, player) { 1.0 } else { 0.0 };
    let base = win * TOURNAMENT_WIN_BONUS + capped_points(player.actual_victory_points());
    base * discount(discount_factor, game.num_actions())
}

/// Capped victory points, discounted just enough that shorter games win ties.
///
/// `min(vp, 10) * 0.9999^T`. See [`VICTORY_POINTS_ORDERING_BOUND`].
pub fn victory_points_return<G, P>(game: &G, player: &P) -> f64
where
    G: GameRecord,
    P: PlayerRecord<G::Color>,
{
    let points = capped_points(player.actual_victory_points());
    points * discount(VICTORY_POINTS_DISCOUNT, game.num_actions())
}

fn capped_points(victory_points: u32) -> f64 {
    victory_points.min(VICTORY_POINTS_CAP) as f64
}
