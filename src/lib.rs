//! # Hexuki Decision Engine
//!
//! Research harness for Hexuki, a two-player tile placement game on a
//! 19-cell hexagonal grid.
//!
//! ## Features
//!
//! - **Rules Engine**: board state, legality checks, move application and
//!   undo, chain-product scoring
//! - **Minimax Solver**: exact alpha-beta endgame search with transposition
//!   caching, move ordering and killer moves
//! - **MCTS Engine**: UCB1 tree search with random or minimax-terminated
//!   rollouts
//! - **Hybrid Player**: phase-based composition of MCTS and minimax
//! - **Self-Play Driver**: parallel match runner with CSV game records
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hexuki::game::engine::GameEngine;
//! use hexuki::search::hybrid::{HybridConfig, HybridPlayer};
//!
//! let mut game = GameEngine::new();
//! let mut player = HybridPlayer::new(HybridConfig::default());
//! let mut rng = rand::rng();
//! let chosen = player.choose_move(&mut game, &mut rng).unwrap();
//! ```

/// Core game logic and rules
pub mod game;

/// Search strategies: minimax, MCTS and the hybrid selector
pub mod search;

/// Match runner for self-play games
pub mod selfplay;

/// Game recording for later analysis
pub mod recording;

/// Logging setup for binaries
pub mod logging;

use crate::game::engine::MoveError;

/// Main error type for the Hexuki library
#[derive(Debug, thiserror::Error)]
pub enum HexukiError {
    #[error("illegal move: {0}")]
    Move(#[from] MoveError),

    #[error("endgame solver over budget: {empty} empty cells exceeds limit of {limit}")]
    SolverOverBudget { empty: usize, limit: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record error: {0}")]
    Record(#[from] csv::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, HexukiError>;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
