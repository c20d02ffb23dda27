//! # Request Validation
//!
//! Every request walks a fixed sequence of stages and is rejected at the first
//! one that fails. Validation only reads the engine; a successful run yields a
//! [`Plan`] which the engine's request methods then commit, reaching
//! [`Stage::Committed`].
//!
//! Moves and Pillbug relocations:
//! `Received -> BoundsChecked -> OwnershipChecked -> ConnectivityChecked -> GeometryChecked`
//!
//! Placements:
//! `Received -> BoundsChecked -> OwnershipChecked -> OccupancyChecked -> OpeningAdjacencyChecked -> NoEnemyAdjacencyChecked`

use crate::board::Cell;
use crate::config::MimicryPolicy;
use crate::connectivity::stays_connected_if_removed;
use crate::engine::Engine;
use crate::error::{RuleError, RuleResult};
use crate::piece::{Bug, Color, Piece, PieceId};
use crate::rules::{self, LiftedView};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, trace};

/// Validation progress of a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Received,
    BoundsChecked,
    OwnershipChecked,
    OccupancyChecked,
    OpeningAdjacencyChecked,
    NoEnemyAdjacencyChecked,
    ConnectivityChecked,
    GeometryChecked,
    Committed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The piece touched by the last committed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastAction {
    pub piece: PieceId,
    /// Relocated by a Pillbug rather than moved by its owner
    pub thrown: bool,
}

/// A validated request, ready to commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    Place {
        owner: Color,
        kind: Bug,
        to: Cell,
    },
    Move {
        piece: PieceId,
        from: Cell,
        to: Cell,
        /// New kind for a Mosquito under persistent mimicry
        becomes: Option<Bug>,
    },
    Throw {
        piece: PieceId,
        actor: Cell,
        from: Cell,
        to: Cell,
    },
}

/// Tracks the stage reached and logs transitions and rejections.
struct Progress {
    request: &'static str,
    stage: Stage,
}

impl Progress {
    fn start(request: &'static str) -> Self {
        trace!(request, stage = %Stage::Received);
        Self { request, stage: Stage::Received }
    }

    fn advance(&mut self, stage: Stage) {
        trace!(request = self.request, from = %self.stage, to = %stage, "stage passed");
        self.stage = stage;
    }

    fn check<T>(&self, result: RuleResult<T>) -> RuleResult<T> {
        result.map_err(|err| {
            debug!(request = self.request, stage = %self.stage, error = %err, "rejected");
            err
        })
    }

    fn reject<T>(&self, err: RuleError) -> RuleResult<T> {
        self.check(Err(err))
    }
}

pub fn validate_placement(engine: &Engine, owner: Color, kind: Bug, to: Cell) -> RuleResult<Plan> {
    let board = engine.board();
    let config = engine.config();
    let player = engine.player(owner);
    let mut progress = Progress::start("place");

    progress.check(board.check_bounds(to))?;
    progress.advance(Stage::BoundsChecked);

    if player.remaining(kind) == 0 {
        return progress.reject(RuleError::InventoryExhausted { owner, kind });
    }
    if kind != Bug::Queen && player.must_place_queen(config.queen_deadline) {
        return progress.reject(RuleError::QueenRequired(owner, config.queen_deadline));
    }
    progress.advance(Stage::OwnershipChecked);

    let dropping = board.is_occupied(to);
    if dropping && !(config.beetle_drop && kind.climbs()) {
        return progress.reject(RuleError::OccupiedIllegally(to));
    }
    progress.advance(Stage::OccupancyChecked);

    // The very first piece of the game may go anywhere
    if board.is_empty() {
        return Ok(Plan::Place { owner, kind, to });
    }

    if !dropping && !board.has_adjacent_piece(to) {
        let err = if player.placements() == 0 {
            RuleError::OpeningRuleViolation(to)
        } else {
            RuleError::NotAdjacentToHive(to)
        };
        return progress.reject(err);
    }
    progress.advance(Stage::OpeningAdjacencyChecked);

    if player.placements() > 0 {
        // A dropped Beetle also touches the piece it lands on
        let covered = board.top(to).map(|p| p.id);
        let touches_opponent = board
            .adjacent_occupants(to)
            .into_iter()
            .chain(covered)
            .any(|id| board.piece(id).owner != owner);
        if touches_opponent {
            return progress.reject(RuleError::AdjacentToOpponent(to));
        }
    }
    progress.advance(Stage::NoEnemyAdjacencyChecked);
    Ok(Plan::Place { owner, kind, to })
}

/// Checks shared by moving a piece and asking where it could go: the owner's
/// queen is down, the piece was not just thrown, and lifting it keeps the
/// hive whole.
fn check_mover(engine: &Engine, progress: &mut Progress, piece: &Piece, from: Cell) -> RuleResult<()> {
    if !engine.player(piece.owner).is_queen_placed() {
        return progress.reject(RuleError::QueenNotYetPlaced(piece.owner));
    }
    if engine.last_action() == Some(LastAction { piece: piece.id, thrown: true }) {
        return progress.reject(RuleError::JustMoved(from));
    }
    progress.advance(Stage::OwnershipChecked);

    if !stays_connected_if_removed(engine.board(), from) {
        return progress.reject(RuleError::WouldDisconnectHive(from));
    }
    progress.advance(Stage::ConnectivityChecked);
    Ok(())
}

pub fn validate_move(engine: &Engine, owner: Color, kind: Bug, from: Cell, to: Cell) -> RuleResult<Plan> {
    let board = engine.board();
    let mut progress = Progress::start("move");

    progress.check(board.check_bounds(from))?;
    progress.check(board.check_bounds(to))?;
    progress.advance(Stage::BoundsChecked);

    let piece = match board.top(from) {
        Some(piece) if piece.kind == kind => piece,
        _ => return progress.reject(RuleError::NoSuchPiece { kind, cell: from }),
    };
    if piece.owner != owner {
        return progress.reject(RuleError::NotOwner { cell: from, owner: piece.owner });
    }
    check_mover(engine, &mut progress, piece, from)?;

    let view = LiftedView::new(board, from);
    if board.is_occupied(to) && to != from && !rules::can_climb(&view, kind) {
        return progress.reject(RuleError::OccupiedIllegally(to));
    }
    let reachable = progress.check(rules::destinations(&view, kind))?;
    if to == from || !reachable.contains(&to) {
        return progress.reject(RuleError::GeometryInvalid { kind, from, to });
    }
    let becomes = match (kind, engine.config().mimicry) {
        (Bug::Mosquito, MimicryPolicy::Persistent) if view.height(from) == 0 => {
            rules::mimic_source(&view, to)
        }
        _ => None,
    };
    progress.advance(Stage::GeometryChecked);
    Ok(Plan::Move { piece: piece.id, from, to, becomes })
}

pub fn validate_throw(engine: &Engine, owner: Color, actor: Cell, target: Cell, to: Cell) -> RuleResult<Plan> {
    let board = engine.board();
    let mut progress = Progress::start("throw");

    for cell in [actor, target, to] {
        progress.check(board.check_bounds(cell))?;
    }
    progress.advance(Stage::BoundsChecked);

    let actor_piece = match board.top(actor) {
        Some(piece) if rules::has_pillbug_power(board, actor) => piece,
        _ => {
            return progress.reject(RuleError::NoSuchPiece { kind: Bug::Pillbug, cell: actor });
        }
    };
    if actor_piece.owner != owner {
        return progress.reject(RuleError::NotOwner { cell: actor, owner: actor_piece.owner });
    }
    if !engine.player(owner).is_queen_placed() {
        return progress.reject(RuleError::QueenNotYetPlaced(owner));
    }
    if engine.last_action() == Some(LastAction { piece: actor_piece.id, thrown: true }) {
        return progress.reject(RuleError::JustMoved(actor));
    }

    let target_piece = match board.top(target) {
        Some(piece) => piece,
        None => return progress.reject(RuleError::EmptyCell(target)),
    };
    if board.height(target) > 1 {
        return progress.reject(RuleError::StackedTarget(target));
    }
    if engine.last_action().map(|last| last.piece) == Some(target_piece.id) {
        return progress.reject(RuleError::JustMoved(target));
    }
    progress.advance(Stage::OwnershipChecked);

    if !stays_connected_if_removed(board, target) {
        return progress.reject(RuleError::WouldDisconnectHive(target));
    }
    progress.advance(Stage::ConnectivityChecked);

    if !rules::can_carry(board, actor, target, to) {
        return progress.reject(RuleError::GeometryInvalid {
            kind: target_piece.kind,
            from: target,
            to,
        });
    }
    progress.advance(Stage::GeometryChecked);
    Ok(Plan::Throw { piece: target_piece.id, actor, from: target, to })
}

/// Where the visible piece at `from` may go, or the reason it may not move.
pub fn reachable_from(engine: &Engine, from: Cell) -> RuleResult<BTreeSet<Cell>> {
    let board = engine.board();
    let mut progress = Progress::start("query");

    progress.check(board.check_bounds(from))?;
    progress.advance(Stage::BoundsChecked);

    let piece = match board.top(from) {
        Some(piece) => piece,
        None => return progress.reject(RuleError::EmptyCell(from)),
    };
    check_mover(engine, &mut progress, piece, from)?;

    let view = LiftedView::new(board, from);
    progress.check(rules::destinations(&view, piece.kind))
}
