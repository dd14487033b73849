//! Chain scanning and chain-product scoring.
//!
//! Chains serve two distinct purposes. For legality, a chain is any maximal
//! run of contiguous occupied cells along one of the three downward scan
//! directions, regardless of who owns the cells; the placement rule bounds
//! the gap between the two longest runs. For scoring, each player owns five
//! fixed diagonal index lists whose tile-value products are summed.

use crate::game::board::{geometry, Board, Player};
use serde::{Deserialize, Serialize};

/// Player 1 scoring chains: down-right diagonals.
pub const PLAYER1_CHAINS: [&[usize]; 5] = [
    &[0, 2, 5],
    &[1, 4, 7, 10],
    &[3, 6, 9, 12, 15],
    &[8, 11, 14, 17],
    &[13, 16, 18],
];

/// Player 2 scoring chains: down-left diagonals.
pub const PLAYER2_CHAINS: [&[usize]; 5] = [
    &[0, 1, 3],
    &[2, 4, 6, 8],
    &[5, 7, 9, 11, 13],
    &[10, 12, 14, 16],
    &[15, 17, 18],
];

/// Final scores for both players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub player1: i32,
    pub player2: i32,
}

impl Scores {
    /// Signed differential from player 1's point of view.
    pub fn differential(&self) -> i32 {
        self.player1 - self.player2
    }

    pub fn winner(&self) -> Option<Player> {
        match self.player1.cmp(&self.player2) {
            std::cmp::Ordering::Greater => Some(Player::One),
            std::cmp::Ordering::Less => Some(Player::Two),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Sum of per-chain products for one player. Empty cells are skipped, so a
/// fully empty chain contributes the multiplicative identity.
pub fn player_score(board: &Board, player: Player) -> i32 {
    let chains = match player {
        Player::One => &PLAYER1_CHAINS,
        Player::Two => &PLAYER2_CHAINS,
    };

    chains
        .iter()
        .map(|chain| {
            chain
                .iter()
                .filter_map(|&cell| board.cells[cell].value)
                .map(i32::from)
                .product::<i32>()
        })
        .sum()
}

pub fn scores(board: &Board) -> Scores {
    Scores {
        player1: player_score(board, Player::One),
        player2: player_score(board, Player::Two),
    }
}

/// Lengths of all maximal occupied runs over the three scan directions.
pub fn run_lengths(board: &Board) -> Vec<u8> {
    let geo = geometry();
    let mut lengths = Vec::with_capacity(16);

    for (d, starts) in geo.scan_starts.iter().enumerate() {
        for &start in starts {
            let mut current = Some(start);
            let mut run = 0u8;
            while let Some(cell) = current {
                if board.cells[cell].is_occupied() {
                    run += 1;
                } else if run > 0 {
                    lengths.push(run);
                    run = 0;
                }
                current = geo.successor[d][cell];
            }
            if run > 0 {
                lengths.push(run);
            }
        }
    }

    lengths
}

/// The two largest run lengths on the board, in one pass.
pub fn longest_two(board: &Board) -> (u8, u8) {
    let mut first = 0;
    let mut second = 0;
    for length in run_lengths(board) {
        if length > first {
            second = first;
            first = length;
        } else if length > second {
            second = length;
        }
    }
    (first, second)
}
