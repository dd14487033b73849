//! Game recording data structures for self-play result collection.

use crate::game::board::Player;
use crate::search::hybrid::MoveSource;
use serde::{Deserialize, Serialize};

/// Strategy driving one of the seats in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerKind {
    Random,
    Mcts,
    Hybrid,
}

impl std::fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerKind::Random => write!(f, "random"),
            PlayerKind::Mcts => write!(f, "mcts"),
            PlayerKind::Hybrid => write!(f, "hybrid"),
        }
    }
}

impl std::str::FromStr for PlayerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(PlayerKind::Random),
            "mcts" => Ok(PlayerKind::Mcts),
            "hybrid" => Ok(PlayerKind::Hybrid),
            other => Err(format!("unknown player kind: {other}")),
        }
    }
}

/// One move as recorded during a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 0-based move number within the game.
    pub turn: u8,
    pub player: Player,
    pub cell: usize,
    pub tile: u8,
    /// Which strategy produced the move, when a search player made it.
    pub source: Option<MoveSource>,
}

/// One finished game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: u64,
    /// RFC 3339 UTC timestamp taken when the game finished.
    pub finished_at: String,
    pub player1: PlayerKind,
    pub player2: PlayerKind,
    pub winner: Option<Player>,
    pub player1_score: i32,
    pub player2_score: i32,
    pub move_count: u8,
    pub moves: Vec<MoveRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_kind_round_trip() {
        for kind in [PlayerKind::Random, PlayerKind::Mcts, PlayerKind::Hybrid] {
            let parsed: PlayerKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("neural".parse::<PlayerKind>().is_err());
    }
}
