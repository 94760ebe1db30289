//! Randomly played resource-race games.
//!
//! A small, seeded stand-in for the full board-game engine. Four colors
//! collect resources from a 19-tile board and spend them on buildings until
//! somebody reaches 10 victory points. Every move is chosen uniformly at
//! random among the legal ones, which is what fills the `random_games`
//! directory used to bootstrap learning.
//!
//! ## Turn Structure
//!
//! ```text
//! Roll ──▶ production for every color with buildings on matching tiles
//!   │
//!   └──▶ repeat: random legal move
//!          ├── BuildSettlement  (wood, brick, sheep, wheat)  +1 VP
//!          ├── BuildCity        (2 wheat, 3 ore)             +1 VP
//!          ├── BuyDevelopmentCard (sheep, wheat, ore)        maybe +1 hidden VP
//!          └── EndTurn → next color
//! ```
//!
//! Games that reach [`MAX_ACTIONS`] end without a winner.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::data::error::DataError;
use crate::data::game::{is_winner, GameRecord, PlayerRecord};
use crate::data::returns::{discounted_return, tournament_return, victory_points_return};
use crate::data::writer::{populate_matrices, Frame};

/// Number of tiles on the board.
pub const NUM_TILES: usize = 19;

/// Number of resource types.
pub const NUM_RESOURCES: usize = 5;

/// Victory points needed to win.
pub const POINTS_TO_WIN: u32 = 10;

/// Action cap; kept below
/// [`VICTORY_POINTS_ORDERING_BOUND`](crate::data::VICTORY_POINTS_ORDERING_BOUND).
pub const MAX_ACTIONS: usize = 1000;

/// Width of a samples row.
pub const SAMPLE_WIDTH: usize = 11;

/// Width of a board-tensor row (tile × color occupancy).
pub const BOARD_TENSOR_WIDTH: usize = NUM_TILES * Color::ALL.len();

/// Width of an actions row (one-hot move).
pub const ACTION_WIDTH: usize = Move::ALL.len();

const MAX_SETTLEMENTS: u32 = 5;
const MAX_CITIES: u32 = 4;
const VICTORY_CARD_PROBABILITY: f64 = 0.2;

const SAMPLE_COLUMNS: [&str; SAMPLE_WIDTH] = [
    "WOOD",
    "BRICK",
    "SHEEP",
    "WHEAT",
    "ORE",
    "VICTORY_POINTS",
    "HIDDEN_VICTORY_POINTS",
    "NEXT_VICTORY_POINTS",
    "SECOND_NEXT_VICTORY_POINTS",
    "THIRD_NEXT_VICTORY_POINTS",
    "NUM_ACTIONS",
];

/// Reward columns written for every step.
pub const REWARD_COLUMNS: [&str; 4] = [
    "RETURN",
    "DISCOUNTED_RETURN",
    "TOURNAMENT_RETURN",
    "VICTORY_POINTS_RETURN",
];

/// Seat colors, in turn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// First seat.
    Red,
    /// Second seat.
    Blue,
    /// Third seat.
    Orange,
    /// Fourth seat.
    White,
}

impl Color {
    /// All colors in turn order.
    pub const ALL: [Color; 4] = [Color::Red, Color::Blue, Color::Orange, Color::White];

    /// Seat index.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Moves a player can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Roll the dice; always the first move of a turn.
    Roll,
    /// Pass to the next color.
    EndTurn,
    /// Place a settlement on a random tile.
    BuildSettlement,
    /// Upgrade one of the player's settlements.
    BuildCity,
    /// Draw a development card.
    BuyDevelopmentCard,
}

impl Move {
    /// All moves, in one-hot order.
    pub const ALL: [Move; 5] = [
        Move::Roll,
        Move::EndTurn,
        Move::BuildSettlement,
        Move::BuildCity,
        Move::BuyDevelopmentCard,
    ];

    /// Column name in the actions file.
    pub fn column(self) -> &'static str {
        match self {
            Move::Roll => "ROLL",
            Move::EndTurn => "END_TURN",
            Move::BuildSettlement => "BUILD_SETTLEMENT",
            Move::BuildCity => "BUILD_CITY",
            Move::BuyDevelopmentCard => "BUY_DEVELOPMENT_CARD",
        }
    }

    /// One-hot encoding.
    pub fn one_hot(self) -> Vec<f64> {
        let mut v = vec![0.0; ACTION_WIDTH];
        v[self as usize] = 1.0;
        v
    }

    /// Resources spent, indexed wood, brick, sheep, wheat, ore.
    fn cost(self) -> [u32; NUM_RESOURCES] {
        match self {
            Move::BuildSettlement => [1, 1, 1, 1, 0],
            Move::BuildCity => [0, 0, 0, 2, 3],
            Move::BuyDevelopmentCard => [0, 0, 1, 1, 1],
            Move::Roll | Move::EndTurn => [0; NUM_RESOURCES],
        }
    }
}

/// One color's holdings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    /// Seat color.
    pub color: Color,
    /// Resource cards: wood, brick, sheep, wheat, ore.
    pub resources: [u32; NUM_RESOURCES],
    /// Points visible to everyone.
    pub victory_points: u32,
    /// Points from development cards, hidden until the end.
    pub hidden_victory_points: u32,
    /// Settlements on the board.
    pub settlements: u32,
    /// Cities on the board.
    pub cities: u32,
}

impl PlayerState {
    fn new(color: Color) -> Self {
        Self {
            color,
            resources: [0; NUM_RESOURCES],
            victory_points: 0,
            hidden_victory_points: 0,
            settlements: 0,
            cities: 0,
        }
    }

    fn can_afford(&self, m: Move) -> bool {
        self.resources.iter().zip(m.cost()).all(|(&have, need)| have >= need)
    }

    fn pay(&mut self, m: Move) {
        for (have, need) in self.resources.iter_mut().zip(m.cost()) {
            *have -= need;
        }
    }
}

impl PlayerRecord<Color> for PlayerState {
    fn color(&self) -> Color {
        self.color
    }

    fn actual_victory_points(&self) -> u32 {
        self.victory_points + self.hidden_victory_points
    }
}

/// A board tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Resource produced, or `None` for the desert.
    pub resource: Option<usize>,
    /// Dice number that activates the tile (0 for the desert).
    pub number: u8,
}

/// One recorded decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Color that acted.
    pub color: Color,
    /// Features seen by the acting color before the move.
    pub features: Vec<f64>,
    /// Flattened board occupancy before the move.
    pub board: Vec<f64>,
    /// Move taken.
    pub action: Move,
}

/// A finished game.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomGame {
    /// Final player states, indexed by seat.
    pub players: Vec<PlayerState>,
    /// Every decision, in order.
    pub steps: Vec<Step>,
    /// Winner, if somebody reached [`POINTS_TO_WIN`].
    pub winner: Option<Color>,
    /// Board used for the game.
    pub tiles: [Tile; NUM_TILES],
}

impl RandomGame {
    /// Final state of `color`.
    pub fn player(&self, color: Color) -> &PlayerState {
        &self.players[color.index()]
    }
}

impl GameRecord for RandomGame {
    type Color = Color;

    fn winning_color(&self) -> Option<Color> {
        self.winner
    }

    fn num_actions(&self) -> usize {
        self.steps.len()
    }
}

fn random_board(rng: &mut StdRng) -> [Tile; NUM_TILES] {
    let mut resources: Vec<Option<usize>> = [4, 3, 4, 4, 3]
        .iter()
        .enumerate()
        .flat_map(|(r, &count)| std::iter::repeat(Some(r)).take(count))
        .chain(std::iter::once(None))
        .collect();
    resources.shuffle(rng);

    let mut numbers: Vec<u8> = vec![2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12];
    numbers.shuffle(rng);
    let mut numbers = numbers.into_iter();

    let mut tiles = [Tile {
        resource: None,
        number: 0,
    }; NUM_TILES];
    for (tile, resource) in tiles.iter_mut().zip(resources) {
        tile.resource = resource;
        if resource.is_some() {
            tile.number = numbers.next().unwrap_or(0);
        }
    }
    tiles
}

struct Table {
    rng: StdRng,
    tiles: [Tile; NUM_TILES],
    /// Production weight per tile and seat (settlement 1, city 2).
    occupancy: [[u32; 4]; NUM_TILES],
    players: Vec<PlayerState>,
    steps: Vec<Step>,
}

impl Table {
    fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let tiles = random_board(&mut rng);
        let mut table = Self {
            rng,
            tiles,
            occupancy: [[0; 4]; NUM_TILES],
            players: Color::ALL.iter().map(|&c| PlayerState::new(c)).collect(),
            steps: Vec::new(),
        };
        for color in Color::ALL {
            for _ in 0..2 {
                table.place_settlement(color);
            }
        }
        table
    }

    fn features(&self, color: Color) -> Vec<f64> {
        let me = &self.players[color.index()];
        let mut f: Vec<f64> = me.resources.iter().map(|&r| r as f64).collect();
        f.push(me.victory_points as f64);
        f.push(me.hidden_victory_points as f64);
        for offset in 1..Color::ALL.len() {
            let other = &self.players[(color.index() + offset) % Color::ALL.len()];
            f.push(other.victory_points as f64);
        }
        f.push(self.steps.len() as f64);
        f
    }

    fn board(&self) -> Vec<f64> {
        self.occupancy
            .iter()
            .flat_map(|seats| seats.iter().map(|&w| w as f64))
            .collect()
    }

    fn record(&mut self, color: Color, action: Move) {
        let step = Step {
            color,
            features: self.features(color),
            board: self.board(),
            action,
        };
        self.steps.push(step);
    }

    fn place_settlement(&mut self, color: Color) {
        let tile = self.rng.gen_range(0..NUM_TILES);
        self.occupancy[tile][color.index()] += 1;
        let player = &mut self.players[color.index()];
        player.settlements += 1;
        player.victory_points += 1;
    }

    fn upgrade_settlement(&mut self, color: Color) {
        let seat = color.index();
        let owned: Vec<usize> = (0..NUM_TILES)
            .filter(|&t| self.occupancy[t][seat] > 0)
            .collect();
        if let Some(&tile) = owned.choose(&mut self.rng) {
            self.occupancy[tile][seat] += 1;
        }
        let player = &mut self.players[seat];
        player.settlements -= 1;
        player.cities += 1;
        player.victory_points += 1;
    }

    fn roll(&mut self) {
        let roll = self.rng.gen_range(1..=6u8) + self.rng.gen_range(1..=6u8);
        for (tile, seats) in self.tiles.iter().zip(self.occupancy.iter()) {
            if tile.number != roll {
                continue;
            }
            if let Some(resource) = tile.resource {
                for (player, &weight) in self.players.iter_mut().zip(seats.iter()) {
                    player.resources[resource] += weight;
                }
            }
        }
    }

    fn legal_moves(&self, color: Color) -> Vec<Move> {
        let player = &self.players[color.index()];
        let mut moves = vec![Move::EndTurn];
        if player.settlements < MAX_SETTLEMENTS && player.can_afford(Move::BuildSettlement) {
            moves.push(Move::BuildSettlement);
        }
        if player.settlements > 0 && player.cities < MAX_CITIES && player.can_afford(Move::BuildCity)
        {
            moves.push(Move::BuildCity);
        }
        if player.can_afford(Move::BuyDevelopmentCard) {
            moves.push(Move::BuyDevelopmentCard);
        }
        moves
    }

    fn apply(&mut self, color: Color, m: Move) {
        self.players[color.index()].pay(m);
        match m {
            Move::BuildSettlement => self.place_settlement(color),
            Move::BuildCity => self.upgrade_settlement(color),
            Move::BuyDevelopmentCard => {
                if self.rng.gen_bool(VICTORY_CARD_PROBABILITY) {
                    self.players[color.index()].hidden_victory_points += 1;
                }
            }
            Move::Roll => self.roll(),
            Move::EndTurn => {}
        }
    }

    fn winner(&self) -> Option<Color> {
        self.players
            .iter()
            .find(|p| p.actual_victory_points() >= POINTS_TO_WIN)
            .map(|p| p.color)
    }

    fn play(mut self) -> RandomGame {
        let mut seat = 0;
        let winner = 'game: loop {
            let color = Color::ALL[seat];

            if self.steps.len() >= MAX_ACTIONS {
                break 'game None;
            }
            self.record(color, Move::Roll);
            self.apply(color, Move::Roll);

            loop {
                if self.steps.len() >= MAX_ACTIONS {
                    break 'game None;
                }
                let moves = self.legal_moves(color);
                let m = *moves.choose(&mut self.rng).unwrap_or(&Move::EndTurn);
                self.record(color, m);
                self.apply(color, m);

                if let Some(w) = self.winner() {
                    break 'game Some(w);
                }
                if m == Move::EndTurn {
                    break;
                }
            }

            seat = (seat + 1) % Color::ALL.len();
        };

        RandomGame {
            players: self.players,
            steps: self.steps,
            winner,
            tiles: self.tiles,
        }
    }
}

/// Play one game with uniformly random moves.
///
/// The same seed always produces the same game.
pub fn simulate(seed: u64) -> RandomGame {
    Table::new(seed).play()
}

/// Play `num_games` games in parallel. Game `i` uses seed `seed + i`.
pub fn simulate_many(num_games: usize, seed: u64) -> Vec<RandomGame> {
    (0..num_games)
        .into_par_iter()
        .map(|i| simulate(seed.wrapping_add(i as u64)))
        .collect()
}

/// The four frames of a batch of recorded games.
#[derive(Debug, Clone, PartialEq)]
pub struct GameFrames {
    /// Per-step features.
    pub samples: Frame,
    /// Per-step board occupancy.
    pub board_tensors: Frame,
    /// Per-step one-hot moves.
    pub actions: Frame,
    /// Per-step return labels, see [`REWARD_COLUMNS`].
    pub rewards: Frame,
}

impl GameFrames {
    /// Append the frames to the run in `dir`.
    pub fn write(&self, dir: &std::path::Path) -> Result<(), DataError> {
        populate_matrices(
            &self.samples,
            &self.board_tensors,
            &self.actions,
            &self.rewards,
            dir,
        )
    }

    /// Number of rows in each frame.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no steps were recorded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Turn games into frames, labelling each step from the acting color's side.
pub fn record_games(games: &[RandomGame], discount_factor: f64) -> GameFrames {
    let mut samples = Frame::new(SAMPLE_COLUMNS);
    let mut board_tensors = Frame::numbered("TILE_OCCUPANCY", BOARD_TENSOR_WIDTH);
    let mut actions = Frame::new(Move::ALL.iter().map(|m| m.column()));
    let mut rewards = Frame::new(REWARD_COLUMNS);

    for game in games {
        // Labels depend only on the final outcome, so compute one row per seat.
        let labels: Vec<Vec<f64>> = Color::ALL
            .iter()
            .map(|&color| {
                let player = game.player(color);
                vec![
                    if is_winner(game, player) { 1.0 } else { 0.0 },
                    discounted_return(game, player, discount_factor),
                    tournament_return(game, player, discount_factor),
                    victory_points_return(game, player),
                ]
            })
            .collect();

        for step in &game.steps {
            samples.push_row(step.features.clone());
            board_tensors.push_row(step.board.clone());
            actions.push_row(step.action.one_hot());
            rewards.push_row(labels[step.color.index()].clone());
        }
    }

    GameFrames {
        samples,
        board_tensors,
        actions,
        rewards,
    }
}
