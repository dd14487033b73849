//! Board topology: the 19 fixed cells, hex adjacency and mirror pairs.
//!
//! Cell coordinates use an axial (row, col) layout in which vertical
//! neighbors are two rows apart. All derived tables (adjacency, scan
//! starters, mirror pairs) are computed once and shared process-wide.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Number of cells on the board
pub const CELL_COUNT: usize = 19;

/// Index of the pre-filled neutral center cell
pub const CENTER_CELL: usize = 9;

/// Fixed (row, col) coordinates for cells 0..18
pub const CELL_COORDS: [(i8, i8); CELL_COUNT] = [
    (0, 2),
    (1, 1),
    (1, 3),
    (2, 0),
    (2, 2),
    (2, 4),
    (3, 1),
    (3, 3),
    (4, 0),
    (4, 2),
    (4, 4),
    (5, 1),
    (5, 3),
    (6, 0),
    (6, 2),
    (6, 4),
    (7, 1),
    (7, 3),
    (8, 2),
];

/// The six hex direction offsets as (dr, dc)
pub const DIRECTIONS: [(i8, i8); 6] = [
    (-2, 0),  // up
    (-1, 1),  // up-right
    (1, 1),   // down-right
    (2, 0),   // down
    (1, -1),  // down-left
    (-1, -1), // up-left
];

/// The three downward directions used for chain scanning
pub const SCAN_DIRECTIONS: [(i8, i8); 3] = [
    (2, 0),  // down
    (1, 1),  // down-right
    (1, -1), // down-left
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// 0 for player 1, 1 for player 2; used to index per-player tables
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Owner of an occupied cell. The center cell is Neutral; every other
/// occupied cell belongs to the player who placed its tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    Neutral,
    Placed(Player),
}

/// Mutable per-cell state. Value and owner are both `Some` or both `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellState {
    pub value: Option<u8>,
    pub owner: Option<Owner>,
}

impl CellState {
    pub fn is_occupied(&self) -> bool {
        self.value.is_some()
    }
}

/// The board proper: 19 cell slots. Coordinates live in [`Geometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub cells: [CellState; CELL_COUNT],
}

impl Board {
    /// Empty board except the neutral center tile with value 1.
    pub fn starting() -> Board {
        let mut board = Board {
            cells: [CellState::default(); CELL_COUNT],
        };
        board.cells[CENTER_CELL] = CellState {
            value: Some(1),
            owner: Some(Owner::Neutral),
        };
        board
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_occupied()).count()
    }
}

/// Precomputed board topology, derived once from the coordinate table.
pub struct Geometry {
    /// Neighbor indices per cell, in [`DIRECTIONS`] order where present
    pub adjacency: [Vec<usize>; CELL_COUNT],
    /// Successor cell per scan direction, if any
    pub successor: [[Option<usize>; CELL_COUNT]; 3],
    /// Cells with no predecessor, per scan direction
    pub scan_starts: [Vec<usize>; 3],
    /// Vertical mirror of each cell across the center column
    pub mirror: [usize; CELL_COUNT],
    /// Cells lying on the mirror axis itself
    pub on_mirror_axis: [bool; CELL_COUNT],
}

fn cell_at(row: i8, col: i8) -> Option<usize> {
    CELL_COORDS.iter().position(|&(r, c)| r == row && c == col)
}

fn build_geometry() -> Geometry {
    let mut adjacency: [Vec<usize>; CELL_COUNT] = std::array::from_fn(|_| Vec::new());
    for (i, &(row, col)) in CELL_COORDS.iter().enumerate() {
        for &(dr, dc) in &DIRECTIONS {
            if let Some(j) = cell_at(row + dr, col + dc) {
                adjacency[i].push(j);
            }
        }
    }

    let mut successor = [[None; CELL_COUNT]; 3];
    let mut scan_starts: [Vec<usize>; 3] = std::array::from_fn(|_| Vec::new());
    for (d, &(dr, dc)) in SCAN_DIRECTIONS.iter().enumerate() {
        for (i, &(row, col)) in CELL_COORDS.iter().enumerate() {
            successor[d][i] = cell_at(row + dr, col + dc);
            if cell_at(row - dr, col - dc).is_none() {
                scan_starts[d].push(i);
            }
        }
    }

    // Vertical mirror across col 2: (row, col) -> (row, 4 - col)
    let mut mirror = [0usize; CELL_COUNT];
    let mut on_mirror_axis = [false; CELL_COUNT];
    for (i, &(row, col)) in CELL_COORDS.iter().enumerate() {
        mirror[i] = cell_at(row, 4 - col).expect("mirror cell exists for every cell");
        on_mirror_axis[i] = col == 2;
    }

    Geometry {
        adjacency,
        successor,
        scan_starts,
        mirror,
        on_mirror_axis,
    }
}

/// Shared geometry table, built on first use.
pub fn geometry() -> &'static Geometry {
    static GEOMETRY: OnceLock<Geometry> = OnceLock::new();
    GEOMETRY.get_or_init(build_geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_board_center_prefilled() {
        let board = Board::starting();
        assert_eq!(board.cells[CENTER_CELL].value, Some(1));
        assert_eq!(board.cells[CENTER_CELL].owner, Some(Owner::Neutral));
        assert_eq!(board.empty_count(), 18);
    }

    #[test]
    fn test_center_has_six_neighbors() {
        let geo = geometry();
        let mut neighbors = geo.adjacency[CENTER_CELL].clone();
        neighbors.sort_unstable();
        assert_eq!(neighbors, vec![4, 6, 7, 11, 12, 14]);
    }

    #[test]
    fn test_corner_cells_have_three_neighbors() {
        let geo = geometry();
        for &corner in &[0, 3, 5, 13, 15, 18] {
            assert_eq!(geo.adjacency[corner].len(), 3, "corner {corner}");
        }
    }

    #[test]
    fn test_mirror_pairs_match_layout() {
        let geo = geometry();
        let expected = [0, 2, 1, 5, 4, 3, 7, 6, 10, 9, 8, 12, 11, 15, 14, 13, 17, 16, 18];
        assert_eq!(geo.mirror, expected);
        for i in 0..CELL_COUNT {
            assert_eq!(geo.mirror[geo.mirror[i]], i);
        }
    }

    #[test]
    fn test_scan_starts_cover_fifteen_lines() {
        let geo = geometry();
        let total: usize = geo.scan_starts.iter().map(|s| s.len()).sum();
        assert_eq!(total, 15);
        // down-direction starters are the top edge of each column
        assert_eq!(geo.scan_starts[0], vec![0, 1, 2, 3, 5]);
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let geo = geometry();
        for i in 0..CELL_COUNT {
            for &j in &geo.adjacency[i] {
                assert!(geo.adjacency[j].contains(&i));
            }
        }
    }
}
