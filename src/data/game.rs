//! Traits describing a finished game, as seen by the return functions.
//!
//! The simulation engine that plays games lives outside this crate. Anything
//! that can answer these few questions about a completed game can be turned
//! into training labels.

/// A completed game trajectory.
pub trait GameRecord {
    /// Type identifying a seat at the table.
    type Color: PartialEq;

    /// The winning color, or `None` if the game ended without a winner
    /// (for example when it hit a turn limit).
    fn winning_color(&self) -> Option<Self::Color>;

    /// Number of actions taken over the whole game.
    fn num_actions(&self) -> usize;
}

/// The player whose perspective a label is computed from.
pub trait PlayerRecord<C> {
    /// This player's color.
    fn color(&self) -> C;

    /// Victory points actually held at the end of the game, hidden cards included.
    fn actual_victory_points(&self) -> u32;
}

/// Whether `player` won `game`.
pub fn is_winner<G, P>(game: &G, player: &P) -> bool
where
    G: GameRecord,
    P: PlayerRecord<G::Color>,
{
    game.winning_color()
        .map_or(false, |winner| winner == player.color())
}
