//! # Movement Rules
//!
//! One traversal per piece kind. Every rule works on a [`LiftedView`]: the board
//! as it looks with the moving piece picked up off its origin, so the mover can
//! neither crawl around itself nor count itself as hive contact.
//!
//! ## Steps
//! - **Slide** (ground level): the target is empty and exactly one of the two
//!   cells flanking the shared edge is occupied. Both occupied means the gap is
//!   too narrow (freedom to move); neither occupied means the mover would lose
//!   touch with the hive halfway through the step.
//! - **Elevated step** (on top of the hive, climbing up or down): the mover
//!   travels at the height of the taller of the two stacks it moves between. It
//!   is blocked only by a gate, i.e. both flanking stacks taller than that.
//!
//! Legality of a specific destination is set membership in [`destinations`], so
//! the engine's query and request paths can never disagree.

use crate::board::{Board, Cell};
use crate::error::{RuleError, RuleResult};
use crate::piece::{Bug, Piece};
use std::collections::{BTreeSet, HashSet, VecDeque};

/// The board with the top piece of `origin` picked up.
#[derive(Debug, Clone, Copy)]
pub struct LiftedView<'a> {
    board: &'a Board,
    origin: Cell,
}

impl<'a> LiftedView<'a> {
    pub fn new(board: &'a Board, origin: Cell) -> Self {
        Self { board, origin }
    }

    pub fn board(&self) -> &'a Board {
        self.board
    }

    pub fn origin(&self) -> Cell {
        self.origin
    }

    /// Stack height with the lifted piece removed
    pub fn height(&self, cell: Cell) -> usize {
        let height = self.board.height(cell);
        if cell == self.origin {
            height.saturating_sub(1)
        } else {
            height
        }
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.height(cell) > 0
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        self.board.in_bounds(cell)
    }

    /// Visible piece at `cell` once the mover is gone
    pub fn top(&self, cell: Cell) -> Option<&'a Piece> {
        let stack = self.board.stack(cell);
        let visible = self.height(cell);
        visible
            .checked_sub(1)
            .map(|i| self.board.piece(stack[i]))
    }
}

/// Ground-level slide between adjacent cells.
pub fn can_slide(view: &LiftedView<'_>, from: Cell, to: Cell) -> bool {
    let dir = match from.direction_to(to) {
        Some(dir) => dir,
        None => return false,
    };
    if !view.in_bounds(to) || view.is_occupied(to) {
        return false;
    }
    let [left, right] = from.flanks(dir);
    view.is_occupied(left) != view.is_occupied(right)
}

/// Step between adjacent cells made above ground level.
pub fn can_step_elevated(view: &LiftedView<'_>, from: Cell, to: Cell) -> bool {
    let dir = match from.direction_to(to) {
        Some(dir) => dir,
        None => return false,
    };
    if !view.in_bounds(to) {
        return false;
    }
    let level = view.height(from).max(view.height(to));
    let [left, right] = from.flanks(dir);
    !(view.height(left) > level && view.height(right) > level)
}

/// A climber's single step: slide on the ground, elevated step otherwise.
pub fn can_crawl(view: &LiftedView<'_>, from: Cell, to: Cell) -> bool {
    if view.height(from) == 0 && view.height(to) == 0 {
        can_slide(view, from, to)
    } else {
        can_step_elevated(view, from, to)
    }
}

fn slides_from<'a>(view: LiftedView<'a>, from: Cell) -> impl Iterator<Item = Cell> + 'a {
    from.neighbors()
        .into_iter()
        .filter(move |to| can_slide(&view, from, *to))
}

/// Legal destinations for a piece of `kind` lifted from the view's origin.
///
/// Only the Mosquito can fail, when it has nothing to mimic.
pub fn destinations(view: &LiftedView<'_>, kind: Bug) -> RuleResult<BTreeSet<Cell>> {
    let set = match kind {
        Bug::Queen | Bug::Pillbug => walk_one(view),
        Bug::Beetle => beetle_steps(view),
        Bug::Grasshopper => jumps(view),
        Bug::Spider => walk_three(view),
        Bug::Ant => walk_any(view),
        Bug::Ladybug => ladybug_paths(view),
        Bug::Mosquito => return mosquito(view),
    };
    Ok(set)
}

/// Queen, Pillbug: one slide.
fn walk_one(view: &LiftedView<'_>) -> BTreeSet<Cell> {
    slides_from(*view, view.origin()).collect()
}

/// Beetle: one step that may climb onto, across, or off the hive.
fn beetle_steps(view: &LiftedView<'_>) -> BTreeSet<Cell> {
    let origin = view.origin();
    origin
        .neighbors()
        .into_iter()
        .filter(|to| can_crawl(view, origin, *to))
        .collect()
}

/// Grasshopper: straight over at least one occupied cell to the first gap.
fn jumps(view: &LiftedView<'_>) -> BTreeSet<Cell> {
    let origin = view.origin();
    let mut moves = BTreeSet::new();

    for dir in 0..6 {
        let mut current = origin.neighbor(dir);
        if !view.is_occupied(current) {
            continue;
        }
        while view.is_occupied(current) {
            current = current.neighbor(dir);
        }
        // The grid ran out before a landing cell turned up
        if view.in_bounds(current) {
            moves.insert(current);
        }
    }
    moves
}

/// Spider: endpoints of simple paths of exactly three slides.
fn walk_three(view: &LiftedView<'_>) -> BTreeSet<Cell> {
    fn dfs(view: &LiftedView<'_>, here: Cell, path: &mut Vec<Cell>, out: &mut BTreeSet<Cell>) {
        if path.len() == 4 {
            out.insert(here);
            return;
        }
        for next in slides_from(*view, here) {
            if path.contains(&next) {
                continue;
            }
            path.push(next);
            dfs(view, next, path, out);
            path.pop();
        }
    }

    let origin = view.origin();
    let mut out = BTreeSet::new();
    let mut path = Vec::with_capacity(4);
    path.push(origin);
    dfs(view, origin, &mut path, &mut out);
    out
}

/// Ant: flood fill over the slide graph.
fn walk_any(view: &LiftedView<'_>) -> BTreeSet<Cell> {
    let origin = view.origin();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(origin);
    queue.push_back(origin);

    while let Some(current) = queue.pop_front() {
        for next in slides_from(*view, current) {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    visited.remove(&origin);
    visited.into_iter().collect()
}

/// Ladybug: two steps on top of the hive, then one step down into a gap.
fn ladybug_paths(view: &LiftedView<'_>) -> BTreeSet<Cell> {
    let origin = view.origin();
    let mut moves = BTreeSet::new();

    for first in origin.neighbors() {
        if !view.is_occupied(first) || !can_step_elevated(view, origin, first) {
            continue;
        }
        for second in first.neighbors() {
            if second == origin
                || !view.is_occupied(second)
                || !can_step_elevated(view, first, second)
            {
                continue;
            }
            for third in second.neighbors() {
                if third == origin || view.is_occupied(third) {
                    continue;
                }
                if can_step_elevated(view, second, third) {
                    moves.insert(third);
                }
            }
        }
    }
    moves
}

/// Whether a piece of `kind` lifted from the origin may finish on top of the
/// hive: a Beetle, or a Mosquito already up there or next to a Beetle.
pub fn can_climb(view: &LiftedView<'_>, kind: Bug) -> bool {
    match kind {
        Bug::Beetle => true,
        Bug::Mosquito => {
            view.height(view.origin()) > 0 || mimic_kinds(view).contains(&Bug::Beetle)
        }
        _ => false,
    }
}

/// Distinct visible kinds next to the origin, Mosquitoes excluded.
pub fn mimic_kinds(view: &LiftedView<'_>) -> BTreeSet<Bug> {
    view.origin()
        .neighbors()
        .into_iter()
        .filter_map(|c| view.top(c))
        .map(|p| p.kind)
        .filter(|k| *k != Bug::Mosquito)
        .collect()
}

/// Mosquito: a Beetle while on top of the hive, otherwise the union of the
/// rules of its neighbours' kinds.
fn mosquito(view: &LiftedView<'_>) -> RuleResult<BTreeSet<Cell>> {
    let origin = view.origin();
    if view.height(origin) > 0 {
        return Ok(beetle_steps(view));
    }
    if !origin.neighbors().iter().any(|c| view.is_occupied(*c)) {
        return Err(RuleError::NoAdjacentPieceToMimic(origin));
    }

    let mut moves = BTreeSet::new();
    for kind in mimic_kinds(view) {
        moves.extend(destinations(view, kind)?);
    }
    Ok(moves)
}

/// The kind a Mosquito borrows to reach `to`: the first kind in [`Bug::ALL`]
/// whose rule gets there.
pub fn mimic_source(view: &LiftedView<'_>, to: Cell) -> Option<Bug> {
    if view.height(view.origin()) > 0 {
        return beetle_steps(view).contains(&to).then_some(Bug::Beetle);
    }
    let kinds = mimic_kinds(view);
    Bug::ALL
        .iter()
        .copied()
        .filter(|k| kinds.contains(k))
        .find(|k| {
            destinations(view, *k)
                .map(|set| set.contains(&to))
                .unwrap_or(false)
        })
}

/// Whether the visible piece at `cell` may use the Pillbug's relocation.
///
/// A Pillbug always can; a Mosquito can while on the ground next to a Pillbug.
pub fn has_pillbug_power(board: &Board, cell: Cell) -> bool {
    match board.top(cell).map(|p| p.kind) {
        Some(Bug::Pillbug) => true,
        Some(Bug::Mosquito) if board.height(cell) == 1 => cell
            .neighbors()
            .iter()
            .any(|n| board.top(*n).map(|p| p.kind) == Some(Bug::Pillbug)),
        _ => false,
    }
}

/// Geometry of a relocation: the target climbs onto the actor, then down onto
/// `to`. Both hops obey the gate rule.
pub fn can_carry(board: &Board, actor: Cell, target: Cell, to: Cell) -> bool {
    if !actor.is_adjacent(target) || !actor.is_adjacent(to) || target == to {
        return false;
    }
    let view = LiftedView::new(board, target);
    !view.is_occupied(to)
        && can_step_elevated(&view, target, actor)
        && can_step_elevated(&view, actor, to)
}

/// Every `(target, destination)` pair the actor at `actor` could carry,
/// before the one-hive and just-moved restrictions are applied.
pub fn carry_options(board: &Board, actor: Cell) -> Vec<(Cell, Cell)> {
    let neighbors: Vec<Cell> = board.neighbors_in_bounds(actor).collect();
    let targets = neighbors.iter().filter(|c| board.height(**c) == 1);
    let landings: Vec<Cell> = neighbors
        .iter()
        .copied()
        .filter(|c| !board.is_occupied(*c))
        .collect();

    let mut options = Vec::new();
    for &target in targets {
        for &to in &landings {
            if can_carry(board, actor, target, to) {
                options.push((target, to));
            }
        }
    }
    options
}
