//! # Hive Rules Engine
//!
//! Placement and movement rules for the Hive tile game on a bounded hex grid,
//! including the Ladybug, Mosquito and Pillbug expansion pieces.
//!
//! ## Layers
//! - [`board`]: stacks of pieces on axial coordinates
//! - [`connectivity`]: the one-hive check
//! - [`rules`]: per-kind destination sets
//! - [`validator`] and [`engine`]: staged validation, then commit
//! - [`game`]: turn order, passing and win detection
//!
//! ```
//! use hive::{Action, EngineConfig, Game, GameStatus};
//!
//! let mut game = Game::new(EngineConfig::default(), "White", "Black").unwrap();
//! game.apply("place queen 4 4".parse().unwrap()).unwrap();
//! game.apply("place queen 5 4".parse().unwrap()).unwrap();
//! assert!(game.legal_actions().contains(&Action::Move {
//!     kind: hive::Bug::Queen,
//!     from: hive::Cell::new(4, 4),
//!     to: hive::Cell::new(5, 3),
//! }));
//! assert_eq!(game.status(), GameStatus::InProgress);
//! ```

pub mod board;
pub mod config;
pub mod connectivity;
pub mod engine;
pub mod error;
pub mod game;
pub mod piece;
pub mod player;
pub mod rules;
pub mod validator;

pub use board::{Board, Cell};
pub use config::{EngineConfig, MimicryPolicy, PieceSet};
pub use engine::Engine;
pub use error::{ConfigError, RuleError, RuleResult, SetupError};
pub use game::{Action, Game, GameError, GameStatus, ParseActionError};
pub use piece::{Bug, Color, Piece, PieceId};
pub use player::Player;

use rand_xoshiro::rand_core::RngCore;

/// A turn-based game state. Cloneable so that playouts can run on copies,
/// `Send + Sync` so that they can run on worker threads.
pub trait GameState: Clone + Send + Sync {
    /// The type of a move in the game.
    type Move: Clone + Eq + std::hash::Hash + std::fmt::Debug + Send + Sync;
    /// Why a move was refused.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns a vector of all possible moves from the current state.
    fn get_possible_moves(&self) -> Vec<Self::Move>;
    /// Applies a move to the state, modifying it. A refused move leaves the
    /// state unchanged.
    fn make_move(&mut self, mv: &Self::Move) -> Result<(), Self::Error>;
    /// Returns true if the game is over.
    fn is_terminal(&self) -> bool;
    /// Returns the winner of the game, if any. `None` for a draw or if the
    /// game is not over.
    fn get_winner(&self) -> Option<Color>;
    /// Returns the player whose turn it is to move.
    fn get_current_player(&self) -> Color;
}

/// Result of [`random_playout`]
#[derive(Debug, Clone)]
pub struct Playout<S: GameState> {
    /// Final state
    pub state: S,
    /// Moves made during the playout
    pub moves: Vec<S::Move>,
}

impl<S: GameState> Playout<S> {
    pub fn finished(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Plays uniformly random moves until the game ends, no move is available,
/// or `max_moves` moves have been made.
pub fn random_playout<S, R>(mut state: S, rng: &mut R, max_moves: usize) -> Result<Playout<S>, S::Error>
where
    S: GameState,
    R: RngCore,
{
    let mut moves = Vec::new();
    while !state.is_terminal() && moves.len() < max_moves {
        let candidates = state.get_possible_moves();
        if candidates.is_empty() {
            break;
        }
        let mv = candidates[(rng.next_u64() % candidates.len() as u64) as usize].clone();
        state.make_move(&mv)?;
        moves.push(mv);
    }
    Ok(Playout { state, moves })
}
