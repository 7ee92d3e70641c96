use std::fmt::Debug;
use std::hash::Hash;
use rand::Rng;
use crate::error::Result;

// ---------- Tune-ables ---------- //
pub const LOSS_SCORE: Reward = -100.0;  // What scoring() reports once the side to move has lost
pub const SKIP_PROBABILITY: Probability = 0.2;  // Chance a distracted agent passes its turn (probabilistic games only)

// ---------- Basic types (renamed for pretty) ---------- //
pub type Reward = f64;
pub type Probability = f64;

/// We only look at two player alternating games.
/// Chance is not a seat at the table: the search models it with its own node kind
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Player { P1, P2 }

impl Player {
    #[inline] pub fn other(self) -> Player {
        match self { Player::P1 => Player::P2, Player::P2 => Player::P1 }
    }
    /// Seat index into per-player containers (P1 -> 0, P2 -> 1)
    #[inline] pub fn index(self) -> usize {
        match self { Player::P1 => 0, Player::P2 => 1 }
    }
    /// Uniform coin flip between the two seats
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Player {
        if rng.random_bool(0.5) { Player::P1 } else { Player::P2 }
    }
}

// ---------- Traits the game must provide ----------
/// Properties we want all game moves to have
pub trait ActionI: Clone + Eq + Hash + Debug {}  // see Game trait for more details
impl<T: Clone + Eq + Hash + Debug> ActionI for T {}

/// A two player, alternating move game that can be searched in place.
///
/// Searches mutate the live position with `make_move` and must put it back with
/// `unmake_move` on every exit path, so the pair has to be an exact inverse.
pub trait Game: Sized + Clone + Debug {
    /// A single legal action
    type Move: ActionI;

    /// Fresh position with `starting_player` to move
    fn new(starting_player: Player) -> Self;
    /// The player whose turn it is according to the board
    fn current_player(&self) -> Player;
    /// Hand the turn to the other player (the only way the turn field changes)
    fn switch_player(&mut self);
    /// Every legal move in a fixed, deterministic order
    fn possible_moves(&self) -> Vec<Self::Move>;
    /// Mark the move for `current_player` without passing the turn
    fn make_move(&mut self, action: &Self::Move) -> Result<()>;
    /// Exact inverse of `make_move`
    fn unmake_move(&mut self, action: &Self::Move);
    /// Has the opponent of `current_player` completed a win
    fn lose(&self) -> bool;
    /// Check if the game is over
    fn is_over(&self) -> bool {
        self.possible_moves().is_empty() || self.lose()
    }
    /// Terminal-only evaluation from the point of view of `current_player`
    fn scoring(&self) -> Reward;
}

/// Anything that can pick a move for the side to move.
/// The position may be explored in place but must be handed back unchanged
pub trait Strategy<G: Game> {
    fn choose_move(&mut self, game: &mut G) -> Result<Option<G::Move>>;
    /// Short label used in logs
    fn name(&self) -> &'static str;
}
