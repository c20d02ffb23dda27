//! Per-player bookkeeping: the hand of unplaced pieces and the queen's cell.

use crate::board::Cell;
use crate::config::PieceSet;
use crate::piece::{Bug, Color};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    name: String,
    color: Color,
    /// Pieces left in hand; only ever decremented
    inventory: BTreeMap<Bug, u8>,
    /// Number of placements made
    placed: u8,
    /// Cached queen cell, `None` until the queen is placed
    queen_position: Option<Cell>,
}

impl Player {
    pub fn new(name: impl Into<String>, color: Color, set: PieceSet) -> Self {
        Self {
            name: name.into(),
            color,
            inventory: set.counts().iter().copied().collect(),
            placed: 0,
            queen_position: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Pieces of `kind` still in hand
    pub fn remaining(&self, kind: Bug) -> u8 {
        self.inventory.get(&kind).copied().unwrap_or(0)
    }

    pub fn inventory(&self) -> &BTreeMap<Bug, u8> {
        &self.inventory
    }

    /// Kinds with at least one piece in hand
    pub fn available(&self) -> impl Iterator<Item = Bug> + '_ {
        self.inventory
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(bug, _)| *bug)
    }

    pub fn placements(&self) -> u8 {
        self.placed
    }

    pub fn is_queen_placed(&self) -> bool {
        self.queen_position.is_some()
    }

    pub fn queen_position(&self) -> Option<Cell> {
        self.queen_position
    }

    /// Whether the next placement has to be the queen under `deadline`
    pub fn must_place_queen(&self, deadline: u8) -> bool {
        deadline > 0 && !self.is_queen_placed() && self.placed + 1 >= deadline
    }

    pub(crate) fn record_placement(&mut self, kind: Bug, cell: Cell) {
        if let Some(count) = self.inventory.get_mut(&kind) {
            *count = count.saturating_sub(1);
        }
        self.placed += 1;
        if kind == Bug::Queen {
            self.queen_position = Some(cell);
        }
    }

    pub(crate) fn record_queen_move(&mut self, to: Cell) {
        self.queen_position = Some(to);
    }
}
