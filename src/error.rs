//! Error types for the rules engine.
//!
//! Every rejection is recoverable: the engine reports it and leaves the board
//! untouched, and the caller decides whether to re-prompt.

use crate::board::Cell;
use crate::piece::{Bug, Color};

/// Reasons a placement, move or Pillbug relocation is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// Coordinate outside the configured grid
    #[error("cell {0} is outside the board")]
    OutOfBounds(Cell),

    /// Target occupied and the piece cannot climb onto it
    #[error("cell {0} is occupied")]
    OccupiedIllegally(Cell),

    /// The visible piece at the cell belongs to the other player
    #[error("the piece at {cell} belongs to {owner}")]
    NotOwner { cell: Cell, owner: Color },

    /// No visible piece of the requested kind at the cell
    #[error("no {kind} at {cell}")]
    NoSuchPiece { kind: Bug, cell: Cell },

    /// Nothing to lift from the cell
    #[error("cell {0} is empty")]
    EmptyCell(Cell),

    /// A player's opening placement does not join the hive
    #[error("opening placement at {0} must touch the piece already on the board")]
    OpeningRuleViolation(Cell),

    /// Placement would float free of the hive
    #[error("placement at {0} does not touch the hive")]
    NotAdjacentToHive(Cell),

    /// Placement touches a visible opposing piece
    #[error("placement at {0} touches an opposing piece")]
    AdjacentToOpponent(Cell),

    /// Pieces cannot move before their owner's queen is on the board
    #[error("{0} must place the queen before moving")]
    QueenNotYetPlaced(Color),

    /// The queen has to be placed now
    #[error("{0} must place the queen by placement {1}")]
    QueenRequired(Color, u8),

    /// The hand has no pieces of this kind left
    #[error("{owner} has no {kind} left to place")]
    InventoryExhausted { owner: Color, kind: Bug },

    /// Lifting the piece would split the hive
    #[error("moving the piece at {0} would split the hive")]
    WouldDisconnectHive(Cell),

    /// Destination not reachable under the piece's rule
    #[error("{kind} cannot move from {from} to {to}")]
    GeometryInvalid { kind: Bug, from: Cell, to: Cell },

    /// Mosquito with no neighbour to borrow a rule from
    #[error("the mosquito at {0} has no neighbour to mimic")]
    NoAdjacentPieceToMimic(Cell),

    /// The piece was moved or relocated by the preceding action
    #[error("the piece at {0} was moved on the previous turn")]
    JustMoved(Cell),

    /// The Pillbug cannot lift a piece out of a stack
    #[error("the piece at {0} is part of a stack")]
    StackedTarget(Cell),
}

/// Result alias for engine operations
pub type RuleResult<T> = Result<T, RuleError>;

/// Invalid engine configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("board size must be between {min} and {max}, got {got}")]
    BoardSize { min: i32, max: i32, got: i32 },

    #[error("queen deadline must be 0 (disabled) or between 1 and {max}, got {got}")]
    QueenDeadline { max: u8, got: u8 },
}

/// A hand-built position the engine refuses to start from
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error("the pieces do not form a single hive")]
    Disconnected,
}
