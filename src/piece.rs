//! Piece kinds, colours and the per-piece record kept in the board's arena.

use crate::board::Cell;
use std::fmt;
use std::str::FromStr;

/// The eight insect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bug {
    Queen,       // 1 per player - moves 1 space
    Beetle,      // 2 per player - moves 1 space, can climb
    Grasshopper, // 3 per player - jumps in straight line
    Spider,      // 2 per player - moves exactly 3 spaces
    Ant,         // 3 per player - moves any number of spaces
    Ladybug,     // 1 per player - 2 on top, 1 down
    Mosquito,    // 1 per player - borrows neighbours' moves
    Pillbug,     // 1 per player - moves 1 space, relocates neighbours
}

impl Bug {
    /// Every kind, in the order used for mimicry resolution and listings.
    pub const ALL: [Bug; 8] = [
        Bug::Queen,
        Bug::Beetle,
        Bug::Grasshopper,
        Bug::Spider,
        Bug::Ant,
        Bug::Ladybug,
        Bug::Mosquito,
        Bug::Pillbug,
    ];

    /// Display name, matching the names accepted by the text front end
    pub fn name(&self) -> &'static str {
        match self {
            Bug::Queen => "QueenBee",
            Bug::Beetle => "Beetle",
            Bug::Grasshopper => "Grasshopper",
            Bug::Spider => "Spider",
            Bug::Ant => "Ant",
            Bug::Ladybug => "Ladybug",
            Bug::Mosquito => "Mosquito",
            Bug::Pillbug => "Pillbug",
        }
    }

    /// Single-character representation used by the board renderer
    pub fn char(&self) -> char {
        match self {
            Bug::Queen => 'Q',
            Bug::Beetle => 'B',
            Bug::Grasshopper => 'G',
            Bug::Spider => 'S',
            Bug::Ant => 'A',
            Bug::Ladybug => 'L',
            Bug::Mosquito => 'M',
            Bug::Pillbug => 'P',
        }
    }

    /// Kinds that may be stacked onto an occupied cell.
    pub fn climbs(&self) -> bool {
        matches!(self, Bug::Beetle)
    }
}

impl fmt::Display for Bug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Bug {
    type Err = String;

    /// Accepts full names ("QueenBee", "grasshopper"), "queen", or the
    /// single-letter renderer code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let bug = match lower.as_str() {
            "queenbee" | "queen" | "q" => Bug::Queen,
            "beetle" | "b" => Bug::Beetle,
            "grasshopper" | "g" => Bug::Grasshopper,
            "spider" | "s" => Bug::Spider,
            "ant" | "a" => Bug::Ant,
            "ladybug" | "l" => Bug::Ladybug,
            "mosquito" | "m" => Bug::Mosquito,
            "pillbug" | "p" => Bug::Pillbug,
            _ => return Err(format!("unknown piece type '{}'", s.trim())),
        };
        Ok(bug)
    }
}

/// The two sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Index into per-player arrays (White = 0)
    pub fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    pub fn char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => f.write_str("White"),
            Color::Black => f.write_str("Black"),
        }
    }
}

/// Stable handle to a piece in the board's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub(crate) usize);

/// A piece on the board
///
/// Pieces are created once on placement and never destroyed; moves only update
/// `position` (and `kind` for a Mosquito under persistent mimicry).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: PieceId,
    pub owner: Color,
    pub kind: Bug,
    /// Kind the piece was placed as
    pub born_as: Bug,
    pub position: Cell,
}

impl Piece {
    pub fn new(id: PieceId, owner: Color, kind: Bug, position: Cell) -> Self {
        Self { id, owner, kind, born_as: kind, position }
    }

    /// Two-character code: kind letter plus owner letter, e.g. `Qw`.
    pub fn code(&self) -> String {
        format!("{}{}", self.kind.char(), self.owner.char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("QueenBee".parse::<Bug>(), Ok(Bug::Queen));
        assert_eq!("queen".parse::<Bug>(), Ok(Bug::Queen));
        assert_eq!(" grasshopper ".parse::<Bug>(), Ok(Bug::Grasshopper));
        assert_eq!("P".parse::<Bug>(), Ok(Bug::Pillbug));
        assert!("Dragonfly".parse::<Bug>().is_err());
    }

    #[test]
    fn test_names_roundtrip() {
        for bug in Bug::ALL {
            assert_eq!(bug.name().parse::<Bug>(), Ok(bug));
            assert_eq!(bug.char().to_string().parse::<Bug>(), Ok(bug));
        }
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Color::White.opponent(), Color::Black);
        assert_eq!(Color::Black.opponent().index(), 0);
    }

    #[test]
    fn test_only_beetle_climbs() {
        let climbers: Vec<Bug> = Bug::ALL.iter().copied().filter(Bug::climbs).collect();
        assert_eq!(climbers, vec![Bug::Beetle]);
    }
}
