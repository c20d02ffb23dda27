#![no_std]

//! Axial hex-grid arithmetic shared by the board, the movement rules and the
//! renderer. Everything here works on plain `(x, y)` pairs so it stays free of
//! the engine's types.

/// Neighbour offsets in ring order: E, NE, NW, W, SW, SE.
///
/// Consecutive entries are adjacent to each other, so the two cells flanking the
/// edge towards direction `d` are the neighbours in directions `d - 1` and `d + 1`.
pub const DIRECTIONS: [(i32, i32); 6] = [
    (1, 0),  // E
    (1, -1), // NE
    (0, -1), // NW
    (-1, 0), // W
    (-1, 1), // SW
    (0, 1),  // SE
];

/// Returns the neighbour of `(x, y)` in direction `dir` (taken modulo 6).
pub fn neighbor(x: i32, y: i32, dir: usize) -> (i32, i32) {
    let (dx, dy) = DIRECTIONS[dir % 6];
    (x + dx, y + dy)
}

/// Returns all six neighbours of `(x, y)` in ring order.
pub fn neighbors(x: i32, y: i32) -> [(i32, i32); 6] {
    let mut out = [(0, 0); 6];
    for (dir, slot) in out.iter_mut().enumerate() {
        *slot = neighbor(x, y, dir);
    }
    out
}

/// Directions of the two cells flanking a step in direction `dir`.
pub fn flank_directions(dir: usize) -> (usize, usize) {
    ((dir + 5) % 6, (dir + 1) % 6)
}

/// Cells flanking the shared edge between `(x, y)` and its neighbour in `dir`.
pub fn flanking_cells(x: i32, y: i32, dir: usize) -> [(i32, i32); 2] {
    let (left, right) = flank_directions(dir);
    [neighbor(x, y, left), neighbor(x, y, right)]
}

/// Returns the direction index leading from `from` to `to` if they are adjacent.
pub fn direction_between(from: (i32, i32), to: (i32, i32)) -> Option<usize> {
    let delta = (to.0 - from.0, to.1 - from.1);
    DIRECTIONS.iter().position(|&d| d == delta)
}

/// Checks a coordinate against a square `size` x `size` window anchored at the origin.
pub fn in_bounds(x: i32, y: i32, size: i32) -> bool {
    x >= 0 && y >= 0 && x < size && y < size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_order_is_contiguous() {
        for dir in 0..6 {
            let here = DIRECTIONS[dir];
            let next = DIRECTIONS[(dir + 1) % 6];
            assert!(direction_between(here, next).is_some(), "directions {} and {} must touch", dir, dir + 1);
        }
    }

    #[test]
    fn flanks_touch_both_ends_of_the_step() {
        for dir in 0..6 {
            let target = neighbor(3, 3, dir);
            for flank in flanking_cells(3, 3, dir) {
                assert!(direction_between((3, 3), flank).is_some());
                assert!(direction_between(target, flank).is_some());
            }
        }
    }

    #[test]
    fn direction_between_roundtrips_neighbors() {
        for (dir, cell) in neighbors(2, 5).iter().enumerate() {
            assert_eq!(direction_between((2, 5), *cell), Some(dir));
        }
        assert_eq!(direction_between((0, 0), (2, 0)), None);
        assert_eq!(direction_between((0, 0), (0, 0)), None);
    }

    #[test]
    fn bounds_window() {
        assert!(in_bounds(0, 0, 10));
        assert!(in_bounds(9, 9, 10));
        assert!(!in_bounds(10, 0, 10));
        assert!(!in_bounds(-1, 3, 10));
    }
}
