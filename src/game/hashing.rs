//! Position identity: Zobrist feature keys and a stable string key.
//!
//! Both encodings are pure functions of (board contents, side to move,
//! racks) and stable across process restarts, so external layers may key
//! persisted statistics on them. The Zobrist keys are expanded from a
//! fixed seed with SplitMix64 rather than drawn from an RNG whose stream
//! could change between library versions.

use crate::game::board::{Owner, Player, CELL_COUNT};
use crate::game::engine::GameEngine;
use crate::game::racks::MAX_TILE;
use std::sync::OnceLock;

const ZOBRIST_SEED: u64 = 0x4845_5855_4b49_2031; // fixed forever

/// 64-bit feature keys for every (cell, tile, owner) plus side to move.
pub struct ZobristKeys {
    cell_tile_owner: [[[u64; 2]; MAX_TILE as usize]; CELL_COUNT],
    side_to_move: u64,
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

fn build_keys() -> ZobristKeys {
    let mut state = ZOBRIST_SEED;
    let mut cell_tile_owner = [[[0u64; 2]; MAX_TILE as usize]; CELL_COUNT];
    for cell in cell_tile_owner.iter_mut() {
        for tile in cell.iter_mut() {
            for key in tile.iter_mut() {
                *key = splitmix64(&mut state);
            }
        }
    }
    ZobristKeys {
        cell_tile_owner,
        side_to_move: splitmix64(&mut state),
    }
}

pub fn zobrist() -> &'static ZobristKeys {
    static KEYS: OnceLock<ZobristKeys> = OnceLock::new();
    KEYS.get_or_init(build_keys)
}

/// XOR-combined hash of occupied player cells and the side to move. The
/// neutral center never varies, so it is left out of the key. Racks are
/// implied by the board in standard games; asymmetric callers that need
/// rack-sensitive identity should use [`position_key`].
pub fn position_hash(game: &GameEngine) -> u64 {
    let keys = zobrist();
    let mut hash = 0u64;

    for (cell, state) in game.board().cells.iter().enumerate() {
        let (Some(value), Some(owner)) = (state.value, state.owner) else {
            continue;
        };
        let Owner::Placed(player) = owner else {
            continue;
        };
        hash ^= keys.cell_tile_owner[cell][(value - 1) as usize][player.index()];
    }

    if game.current_player() == Player::Two {
        hash ^= keys.side_to_move;
    }

    hash
}

/// Human-readable exact position key: turn, per-cell contents and both
/// sorted racks. Collision-free by construction.
pub fn position_key(game: &GameEngine) -> String {
    let mut cells = String::with_capacity(CELL_COUNT * 4);
    for (i, state) in game.board().cells.iter().enumerate() {
        if i > 0 {
            cells.push(',');
        }
        match (state.value, state.owner) {
            (Some(v), Some(Owner::Neutral)) => {
                cells.push_str(&format!("{v}p0"));
            }
            (Some(v), Some(Owner::Placed(p))) => {
                cells.push_str(&format!("{v}p{}", p.number()));
            }
            _ => cells.push('-'),
        }
    }

    let rack_digits = |player: Player| -> String {
        game.rack(player)
            .sorted()
            .iter()
            .map(|t| t.to_string())
            .collect()
    };

    format!(
        "{}|{}|p1:{}|p2:{}",
        game.current_player(),
        cells,
        rack_digits(Player::One),
        rack_digits(Player::Two),
    )
}
