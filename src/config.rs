//! Engine configuration.
//!
//! Built by the `play` binary from its command line; tests usually start from
//! [`EngineConfig::default`] and override single fields.

use crate::error::ConfigError;
use crate::piece::Bug;

/// Which pieces each player starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceSet {
    /// Queen, Beetles, Grasshoppers, Spiders, Ants
    Base,
    /// Base set plus Ladybug, Mosquito and Pillbug
    Expansion,
}

impl PieceSet {
    /// Starting count per kind
    pub fn counts(&self) -> &'static [(Bug, u8)] {
        const BASE: [(Bug, u8); 5] = [
            (Bug::Queen, 1),
            (Bug::Beetle, 2),
            (Bug::Grasshopper, 3),
            (Bug::Spider, 2),
            (Bug::Ant, 3),
        ];
        const EXPANSION: [(Bug, u8); 8] = [
            (Bug::Queen, 1),
            (Bug::Beetle, 2),
            (Bug::Grasshopper, 3),
            (Bug::Spider, 2),
            (Bug::Ant, 3),
            (Bug::Ladybug, 1),
            (Bug::Mosquito, 1),
            (Bug::Pillbug, 1),
        ];
        match self {
            PieceSet::Base => &BASE,
            PieceSet::Expansion => &EXPANSION,
        }
    }

    /// Pieces per player
    pub fn total(&self) -> u8 {
        self.counts().iter().map(|(_, n)| n).sum()
    }
}

/// What a Mosquito's borrowed rule does to its recorded kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimicryPolicy {
    /// The borrowed rule applies to the current move only
    Transient,
    /// The Mosquito becomes the kind it mimicked (legacy behaviour)
    Persistent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Side length of the square coordinate window
    pub board_size: i32,
    pub piece_set: PieceSet,
    /// Whether off-board neighbours count as occupied when checking a queen
    pub edge_counts_as_occupied: bool,
    /// Whether a Beetle may be placed directly on top of the hive
    pub beetle_drop: bool,
    pub mimicry: MimicryPolicy,
    /// Placement by which the queen must be down; 0 disables the rule
    pub queen_deadline: u8,
}

impl EngineConfig {
    pub const MIN_BOARD_SIZE: i32 = 1;
    pub const MAX_BOARD_SIZE: i32 = 64;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(Self::MIN_BOARD_SIZE..=Self::MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(ConfigError::BoardSize {
                min: Self::MIN_BOARD_SIZE,
                max: Self::MAX_BOARD_SIZE,
                got: self.board_size,
            });
        }
        let max = self.piece_set.total();
        if self.queen_deadline > max {
            return Err(ConfigError::QueenDeadline {
                max,
                got: self.queen_deadline,
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_size: 10,
            piece_set: PieceSet::Expansion,
            edge_counts_as_occupied: false,
            beetle_drop: true,
            mimicry: MimicryPolicy::Transient,
            queen_deadline: 4,
        }
    }
}
