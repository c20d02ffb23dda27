//! # Rules Engine
//!
//! Owns the board, both players and the record of the last action. Requests
//! are validated against an immutable borrow (see [`crate::validator`]) and
//! only then committed, so a rejected request never changes the engine.
//!
//! Legal-action enumeration reads a shared `&Engine` and fans out over
//! `rayon` worker threads.

use crate::board::{Board, Cell};
use crate::config::EngineConfig;
use crate::connectivity::is_hive_connected;
use crate::error::{ConfigError, RuleError, RuleResult, SetupError};
use crate::piece::{Bug, Color, Piece, PieceId};
use crate::player::Player;
use crate::rules;
use crate::validator::{self, LastAction, Plan, Stage};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

/// Board, players and last action, changed only through the request methods.
///
/// A validated plan can only be committed from inside the crate:
///
/// ```compile_fail
/// use hive::validator::validate_placement;
/// use hive::{Bug, Cell, Color, Engine};
///
/// let mut engine = Engine::default();
/// let plan = validate_placement(&engine, Color::White, Bug::Queen, Cell::new(4, 4)).unwrap();
/// engine.commit(plan).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engine {
    config: EngineConfig,
    board: Board,
    /// Indexed by `Color::index`
    players: [Player; 2],
    last_action: Option<LastAction>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_names(config, "White", "Black")
    }

    pub fn with_names(
        config: EngineConfig,
        white: impl Into<String>,
        black: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, white.into(), black.into()))
    }

    fn build(config: EngineConfig, white: String, black: String) -> Self {
        Self {
            board: Board::new(config.board_size),
            players: [
                Player::new(white, Color::White, config.piece_set),
                Player::new(black, Color::Black, config.piece_set),
            ],
            last_action: None,
            config,
        }
    }

    /// Starts from a given position instead of an empty board.
    ///
    /// Pieces are put down in order, so a Beetle listed after another piece on
    /// the same cell ends up on top. Hands and queen positions are updated as
    /// for placements, but the placement adjacency rules are not applied; the
    /// finished position only has to be a single hive.
    pub fn from_position(config: EngineConfig, pieces: &[(Color, Bug, Cell)]) -> Result<Self, SetupError> {
        let mut engine = Self::new(config)?;
        for &(owner, kind, cell) in pieces {
            if engine.player(owner).remaining(kind) == 0 {
                return Err(RuleError::InventoryExhausted { owner, kind }.into());
            }
            engine.board.place(cell, owner, kind)?;
            engine.players[owner.index()].record_placement(kind, cell);
        }
        if !is_hive_connected(&engine.board) {
            return Err(SetupError::Disconnected);
        }
        debug!(pieces = pieces.len(), "position set up");
        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self, color: Color) -> &Player {
        &self.players[color.index()]
    }

    pub fn last_action(&self) -> Option<LastAction> {
        self.last_action
    }

    /// Places a new piece from `owner`'s hand.
    #[instrument(level = "debug", skip(self))]
    pub fn request_placement(&mut self, owner: Color, kind: Bug, cell: Cell) -> RuleResult<PieceId> {
        let plan = validator::validate_placement(self, owner, kind, cell)?;
        self.commit(plan)
    }

    /// Moves the visible `kind` at `origin` to `destination`.
    #[instrument(level = "debug", skip(self))]
    pub fn request_move(
        &mut self,
        owner: Color,
        kind: Bug,
        origin: Cell,
        destination: Cell,
    ) -> RuleResult<()> {
        let plan = validator::validate_move(self, owner, kind, origin, destination)?;
        self.commit(plan).map(|_| ())
    }

    /// Has the Pillbug (or Pillbug-borrowing Mosquito) at `pillbug_cell` carry
    /// the piece at `target_cell` over itself to `destination`.
    #[instrument(level = "debug", skip(self))]
    pub fn request_pillbug_special(
        &mut self,
        owner: Color,
        pillbug_cell: Cell,
        target_cell: Cell,
        destination: Cell,
    ) -> RuleResult<()> {
        let plan = validator::validate_throw(self, owner, pillbug_cell, target_cell, destination)?;
        self.commit(plan).map(|_| ())
    }

    /// Cells the visible piece at `cell` could move to right now.
    ///
    /// Empty when the cell is empty or the piece may not move at all; only an
    /// out-of-bounds cell is an error.
    pub fn query_legal_destinations(&self, cell: Cell) -> RuleResult<BTreeSet<Cell>> {
        self.board.check_bounds(cell)?;
        Ok(validator::reachable_from(self, cell).unwrap_or_default())
    }

    /// Applies a validated plan and returns the piece it placed or moved.
    pub(crate) fn commit(&mut self, plan: Plan) -> RuleResult<PieceId> {
        let id = match plan {
            Plan::Place { owner, kind, to } => {
                let id = self.board.place(to, owner, kind)?;
                self.players[owner.index()].record_placement(kind, to);
                self.last_action = None;
                id
            }
            Plan::Move { piece, from, to, becomes } => {
                let id = self.board.move_top(from, to)?;
                if let Some(kind) = becomes {
                    self.board.piece_mut(piece).kind = kind;
                }
                self.follow_queen(id, to);
                self.last_action = Some(LastAction { piece, thrown: false });
                id
            }
            Plan::Throw { piece, from, to, .. } => {
                let id = self.board.move_top(from, to)?;
                self.follow_queen(id, to);
                self.last_action = Some(LastAction { piece, thrown: true });
                id
            }
        };
        debug!(stage = %Stage::Committed, ?plan, "committed");
        Ok(id)
    }

    fn follow_queen(&mut self, id: PieceId, to: Cell) {
        let piece = self.board.piece(id);
        if piece.born_as == Bug::Queen {
            let owner = piece.owner;
            self.players[owner.index()].record_queen_move(to);
        }
    }

    /// Forgets the last action, as a passed turn does.
    pub fn record_pass(&mut self) {
        debug!("pass");
        self.last_action = None;
    }

    /// Every `(kind, cell)` placement `color` could make.
    pub fn legal_placements(&self, color: Color) -> Vec<(Bug, Cell)> {
        let candidates: BTreeSet<Cell> = if self.board.is_empty() {
            (0..self.board.size())
                .flat_map(|y| (0..self.board.size()).map(move |x| Cell::new(x, y)))
                .collect()
        } else {
            let occupied = self.board.occupied_cells();
            let mut cells: BTreeSet<Cell> = occupied
                .iter()
                .flat_map(|c| self.board.neighbors_in_bounds(*c))
                .filter(|c| !self.board.is_occupied(*c))
                .collect();
            if self.config.beetle_drop {
                cells.extend(occupied);
            }
            cells
        };

        let player = self.player(color);
        player
            .available()
            .flat_map(|kind| candidates.iter().map(move |cell| (kind, *cell)))
            .filter(|(kind, cell)| validator::validate_placement(self, color, *kind, *cell).is_ok())
            .collect()
    }

    /// Every `(kind, from, to)` move `color` could make.
    pub fn legal_moves(&self, color: Color) -> Vec<(Bug, Cell, Cell)> {
        let movers: Vec<(Bug, Cell)> = self
            .board
            .occupied_cells()
            .into_iter()
            .filter_map(|c| self.board.top(c).map(|p| (p, c)))
            .filter(|(p, _)| p.owner == color)
            .map(|(p, c)| (p.kind, c))
            .collect();

        let mut moves: Vec<(Bug, Cell, Cell)> = movers
            .par_iter()
            .flat_map_iter(|&(kind, from)| {
                self.query_legal_destinations(from)
                    .unwrap_or_default()
                    .into_iter()
                    .map(move |to| (kind, from, to))
            })
            .collect();
        moves.sort();
        moves
    }

    /// Every `(actor, target, to)` Pillbug relocation `color` could make.
    pub fn legal_throws(&self, color: Color) -> Vec<(Cell, Cell, Cell)> {
        self.board
            .occupied_cells()
            .into_iter()
            .filter(|c| self.board.top(*c).map(|p| p.owner) == Some(color))
            .filter(|c| rules::has_pillbug_power(&self.board, *c))
            .flat_map(|actor| {
                rules::carry_options(&self.board, actor)
                    .into_iter()
                    .map(move |(target, to)| (actor, target, to))
            })
            .filter(|&(actor, target, to)| {
                validator::validate_throw(self, color, actor, target, to).is_ok()
            })
            .collect()
    }

    /// Visible occupant per occupied cell
    pub fn snapshot(&self) -> BTreeMap<Cell, Piece> {
        self.board.snapshot()
    }

    /// Whether `color`'s queen is on the board with every neighbour occupied
    pub fn queen_surrounded(&self, color: Color) -> bool {
        self.player(color)
            .queen_position()
            .map(|cell| {
                self.board
                    .is_fully_surrounded(cell, self.config.edge_counts_as_occupied)
            })
            .unwrap_or(false)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::build(EngineConfig::default(), "White".into(), "Black".into())
    }
}
