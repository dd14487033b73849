//! Per-player tile racks.
//!
//! Standard games give both players one tile of each value 1-9. The
//! asymmetric variant draws 9 independent random values per player,
//! duplicates allowed.

use rand::{Rng, RngExt};
use serde::{Deserialize, Serialize};

/// Number of tiles each player starts with
pub const RACK_SIZE: usize = 9;

/// Highest tile value
pub const MAX_TILE: u8 = 9;

/// A player's remaining tiles. Duplicates are allowed in the asymmetric
/// variant, so this is a multiset kept as a plain vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rack {
    tiles: Vec<u8>,
}

impl Rack {
    /// One tile of each value 1-9.
    pub fn standard() -> Rack {
        Rack {
            tiles: (1..=MAX_TILE).collect(),
        }
    }

    /// Nine independently drawn random values 1-9, duplicates allowed.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Rack {
        Rack {
            tiles: (0..RACK_SIZE).map(|_| rng.random_range(1..=MAX_TILE)).collect(),
        }
    }

    pub fn from_tiles(tiles: Vec<u8>) -> Rack {
        debug_assert!(tiles.iter().all(|&t| (1..=MAX_TILE).contains(&t)));
        Rack { tiles }
    }

    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, tile: u8) -> bool {
        self.tiles.contains(&tile)
    }

    /// Removes one copy of `tile`, returning the index it occupied so an
    /// undo can reinsert it at the same slot.
    pub fn take(&mut self, tile: u8) -> Option<usize> {
        let index = self.tiles.iter().position(|&t| t == tile)?;
        self.tiles.remove(index);
        Some(index)
    }

    /// Reverses [`Rack::take`]: reinserts `tile` at `index`.
    pub fn put_back(&mut self, index: usize, tile: u8) {
        self.tiles.insert(index, tile);
    }

    /// True when both racks hold the same multiset of values.
    pub fn matches(&self, other: &Rack) -> bool {
        if self.tiles.len() != other.tiles.len() {
            return false;
        }
        let mut a = self.tiles.clone();
        let mut b = other.tiles.clone();
        a.sort_unstable();
        b.sort_unstable();
        a == b
    }

    /// Tile values sorted ascending, for stable position keys.
    pub fn sorted(&self) -> Vec<u8> {
        let mut tiles = self.tiles.clone();
        tiles.sort_unstable();
        tiles
    }
}
