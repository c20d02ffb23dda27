//! # Hex Board
//!
//! Stores a stack of pieces per cell on a bounded axial-coordinate window and
//! answers the adjacency and occupancy questions the movement rules ask.
//!
//! ## Coordinate System
//! Cells use axial coordinates `(x, y)`. Neighbours, in ring order:
//! - (+1,  0): East
//! - (+1, -1): Northeast
//! - ( 0, -1): Northwest
//! - (-1,  0): West
//! - (-1, +1): Southwest
//! - ( 0, +1): Southeast
//!
//! The playable window is `0 <= x, y < size`. Anything outside it is reported
//! as [`RuleError::OutOfBounds`] rather than silently ignored.
//!
//! ## Stacks
//! Each cell holds its pieces bottom to top. Only the last one is visible, can
//! move, or counts for adjacency. Pieces live in an arena owned by the board and
//! stacks hold [`PieceId`]s, so moving a piece never copies it.

use crate::error::{RuleError, RuleResult};
use crate::piece::{Bug, Color, Piece, PieceId};
use std::collections::BTreeMap;
use std::fmt;

/// Axial hex coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Get all 6 neighbouring cells, in ring order
    pub fn neighbors(&self) -> [Cell; 6] {
        hive_shared::neighbors(self.x, self.y).map(Cell::from)
    }

    /// Get neighbour in a specific direction (0-5)
    pub fn neighbor(&self, direction: usize) -> Cell {
        hive_shared::neighbor(self.x, self.y, direction).into()
    }

    /// Direction index from `self` to `other` if the cells are adjacent
    pub fn direction_to(&self, other: Cell) -> Option<usize> {
        hive_shared::direction_between((self.x, self.y), (other.x, other.y))
    }

    pub fn is_adjacent(&self, other: Cell) -> bool {
        self.direction_to(other).is_some()
    }

    /// The two cells flanking the edge between `self` and its neighbour in `direction`
    pub fn flanks(&self, direction: usize) -> [Cell; 2] {
        hive_shared::flanking_cells(self.x, self.y, direction).map(Cell::from)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Cell::new(x, y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// The stacking hex board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Side length of the square coordinate window
    size: i32,
    /// Stacks in row-major order (`y * size + x`), bottom to top
    stacks: Vec<Vec<PieceId>>,
    /// Every piece ever placed, indexed by `PieceId`
    pieces: Vec<Piece>,
}

impl Board {
    /// Creates an empty `size` x `size` board
    pub fn new(size: i32) -> Self {
        let cells = (size.max(0) * size.max(0)) as usize;
        Self {
            size,
            stacks: vec![Vec::new(); cells],
            pieces: Vec::new(),
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        hive_shared::in_bounds(cell.x, cell.y, self.size)
    }

    /// Errors with `OutOfBounds` for cells outside the window
    pub fn check_bounds(&self, cell: Cell) -> RuleResult<()> {
        if self.in_bounds(cell) {
            Ok(())
        } else {
            Err(RuleError::OutOfBounds(cell))
        }
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| (cell.y * self.size + cell.x) as usize)
    }

    /// The full stack at a cell, bottom to top (empty outside the board)
    pub fn stack(&self, cell: Cell) -> &[PieceId] {
        match self.index(cell) {
            Some(i) => &self.stacks[i],
            None => &[],
        }
    }

    /// Number of pieces stacked on a cell
    pub fn height(&self, cell: Cell) -> usize {
        self.stack(cell).len()
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        !self.stack(cell).is_empty()
    }

    /// True when no piece has been placed yet
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Visible piece at a cell, if any (`None` outside the board)
    pub fn top(&self, cell: Cell) -> Option<&Piece> {
        self.stack(cell).last().map(|id| self.piece(*id))
    }

    /// Returns the top piece of the stack at `cell`, or none.
    pub fn occupant_at(&self, cell: Cell) -> RuleResult<Option<PieceId>> {
        self.check_bounds(cell)?;
        Ok(self.stack(cell).last().copied())
    }

    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.0]
    }

    pub(crate) fn piece_mut(&mut self, id: PieceId) -> &mut Piece {
        &mut self.pieces[id.0]
    }

    /// Every piece placed so far, in placement order
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// The six neighbour cells, unfiltered
    pub fn adjacent_cells(&self, cell: Cell) -> [Cell; 6] {
        cell.neighbors()
    }

    /// Neighbour cells that lie on the board
    pub fn neighbors_in_bounds(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        cell.neighbors().into_iter().filter(move |c| self.in_bounds(*c))
    }

    /// Top pieces of all in-bounds occupied neighbours
    pub fn adjacent_occupants(&self, cell: Cell) -> Vec<PieceId> {
        self.neighbors_in_bounds(cell)
            .filter_map(|c| self.stack(c).last().copied())
            .collect()
    }

    pub fn has_adjacent_piece(&self, cell: Cell) -> bool {
        self.neighbors_in_bounds(cell).any(|c| self.is_occupied(c))
    }

    /// True iff every neighbour is occupied. Neighbours outside the board count
    /// as occupied only when `treat_out_of_bounds_as_occupied` is set.
    pub fn is_fully_surrounded(&self, cell: Cell, treat_out_of_bounds_as_occupied: bool) -> bool {
        cell.neighbors().iter().all(|n| {
            if self.in_bounds(*n) {
                self.is_occupied(*n)
            } else {
                treat_out_of_bounds_as_occupied
            }
        })
    }

    /// Creates a new piece and pushes it onto `cell`.
    ///
    /// The cell must be empty unless the piece is a climber.
    pub fn place(&mut self, cell: Cell, owner: Color, kind: Bug) -> RuleResult<PieceId> {
        let index = self.index(cell).ok_or(RuleError::OutOfBounds(cell))?;
        if !self.stacks[index].is_empty() && !kind.climbs() {
            return Err(RuleError::OccupiedIllegally(cell));
        }

        let id = PieceId(self.pieces.len());
        self.pieces.push(Piece::new(id, owner, kind, cell));
        self.stacks[index].push(id);
        Ok(id)
    }

    /// Pops the top piece off `cell`.
    ///
    /// The piece stays in the arena; the caller is expected to put it back down.
    pub fn remove_top(&mut self, cell: Cell) -> RuleResult<PieceId> {
        let index = self.index(cell).ok_or(RuleError::OutOfBounds(cell))?;
        self.stacks[index].pop().ok_or(RuleError::EmptyCell(cell))
    }

    /// Moves the top piece of `from` onto `to`, keeping its identity.
    ///
    /// Checks bounds and that `from` holds a piece before touching anything, so a
    /// failed call leaves the board unchanged. Climbing legality is the caller's
    /// concern.
    pub fn move_top(&mut self, from: Cell, to: Cell) -> RuleResult<PieceId> {
        let to_index = self.index(to).ok_or(RuleError::OutOfBounds(to))?;
        let id = self.remove_top(from)?;
        self.stacks[to_index].push(id);
        self.pieces[id.0].position = to;
        Ok(id)
    }

    /// All cells holding at least one piece, in row-major order
    pub fn occupied_cells(&self) -> Vec<Cell> {
        self.stacks
            .iter()
            .enumerate()
            .filter(|(_, stack)| !stack.is_empty())
            .map(|(i, _)| Cell::new(i as i32 % self.size, i as i32 / self.size))
            .collect()
    }

    /// Visible occupant per occupied cell
    pub fn snapshot(&self) -> BTreeMap<Cell, Piece> {
        self.occupied_cells()
            .into_iter()
            .filter_map(|c| self.top(c).map(|p| (c, p.clone())))
            .collect()
    }
}

impl Board {
    /// Renders the whole window, two characters per cell, each row shifted half
    /// a cell to the right of the one above so axial neighbours line up.
    ///
    /// `paint` turns a visible piece into its two-character label; a `^`
    /// after the label marks a stack.
    pub fn render_with<F>(&self, f: &mut impl fmt::Write, paint: F) -> fmt::Result
    where
        F: Fn(&Piece) -> String,
    {
        write!(f, "   ")?;
        for x in 0..self.size {
            write!(f, "{:>2} ", x)?;
        }
        writeln!(f)?;

        for y in 0..self.size {
            write!(f, "{:>2} {}", y, " ".repeat(y as usize))?;
            for x in 0..self.size {
                let cell = Cell::new(x, y);
                match self.top(cell) {
                    Some(piece) => {
                        let marker = if self.height(cell) > 1 { '^' } else { ' ' };
                        write!(f, "{}{}", paint(piece), marker)?;
                    }
                    None => write!(f, " . ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render_with(f, Piece::code)
    }
}
