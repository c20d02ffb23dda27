//! One-hive rule: the occupied cells must form a single connected component.

use crate::board::{Board, Cell};
use std::collections::{HashSet, VecDeque};

/// Check whether lifting the top piece at `cell` keeps the hive in one piece.
///
/// A stack taller than one keeps the cell occupied, and an empty cell has
/// nothing to lift, so both pass trivially. A lone piece passes as well.
pub fn stays_connected_if_removed(board: &Board, cell: Cell) -> bool {
    if board.height(cell) != 1 {
        return true;
    }

    let remaining: HashSet<Cell> = board
        .occupied_cells()
        .into_iter()
        .filter(|c| *c != cell)
        .collect();

    is_connected(board, &remaining)
}

/// Whether every occupied cell on the board is reachable from every other.
pub fn is_hive_connected(board: &Board) -> bool {
    let occupied: HashSet<Cell> = board.occupied_cells().into_iter().collect();
    is_connected(board, &occupied)
}

/// Flood fill over hex adjacency restricted to `cells`.
fn is_connected(board: &Board, cells: &HashSet<Cell>) -> bool {
    let start = match cells.iter().next() {
        Some(c) => *c,
        None => return true,
    };

    let mut visited = HashSet::with_capacity(cells.len());
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for neighbor in board.neighbors_in_bounds(current) {
            if cells.contains(&neighbor) && visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    visited.len() == cells.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Bug, Color};

    fn line(board: &mut Board, cells: &[(i32, i32)]) {
        for &(x, y) in cells {
            board.place(Cell::new(x, y), Color::White, Bug::Ant).unwrap();
        }
    }

    #[test]
    fn test_empty_and_single() {
        let mut board = Board::new(10);
        assert!(is_hive_connected(&board));
        line(&mut board, &[(4, 4)]);
        assert!(stays_connected_if_removed(&board, Cell::new(4, 4)));
        assert!(stays_connected_if_removed(&board, Cell::new(0, 0)));
    }

    #[test]
    fn test_middle_of_line_is_pinned() {
        let mut board = Board::new(10);
        line(&mut board, &[(2, 4), (3, 4), (4, 4)]);
        assert!(!stays_connected_if_removed(&board, Cell::new(3, 4)));
        assert!(stays_connected_if_removed(&board, Cell::new(2, 4)));
        assert!(stays_connected_if_removed(&board, Cell::new(4, 4)));
    }

    #[test]
    fn test_ring_has_no_pinned_piece() {
        let mut board = Board::new(10);
        let center = Cell::new(5, 5);
        for n in center.neighbors() {
            board.place(n, Color::Black, Bug::Ant).unwrap();
        }
        assert!(is_hive_connected(&board));
        for n in center.neighbors() {
            assert!(stays_connected_if_removed(&board, n));
        }
    }

    #[test]
    fn test_stacked_piece_never_disconnects() {
        let mut board = Board::new(10);
        line(&mut board, &[(2, 4), (3, 4), (4, 4)]);
        board.place(Cell::new(3, 4), Color::Black, Bug::Beetle).unwrap();
        assert!(stays_connected_if_removed(&board, Cell::new(3, 4)));
    }

    #[test]
    fn test_split_hive_detected() {
        let mut board = Board::new(10);
        line(&mut board, &[(1, 1), (5, 5)]);
        assert!(!is_hive_connected(&board));
    }
}
