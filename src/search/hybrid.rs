//! Hybrid move selection: MCTS through the opening and midgame, exact
//! minimax once the endgame is small enough to solve outright.

use crate::game::engine::{GameEngine, Move};
use crate::search::mcts::{MctsConfig, MctsEngine, SearchStats};
use crate::search::minimax::{MinimaxSolver, SolverConfig};
use crate::Result;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridConfig {
    /// Delegate to the solver at or below this many empty cells.
    pub minimax_threshold: usize,
    pub solver: SolverConfig,
    pub mcts: MctsConfig,
}

impl Default for HybridConfig {
    fn default() -> Self {
        HybridConfig {
            minimax_threshold: 6,
            solver: SolverConfig::default(),
            mcts: MctsConfig::default(),
        }
    }
}

/// Which strategy produced a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveSource {
    Minimax,
    Mcts,
}

impl std::fmt::Display for MoveSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveSource::Minimax => write!(f, "minimax"),
            MoveSource::Mcts => write!(f, "mcts"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridMove {
    pub mv: Move,
    pub source: MoveSource,
    /// Exact evaluation, present for solver moves.
    pub score: Option<i32>,
    /// Search statistics, present for MCTS moves.
    pub stats: Option<SearchStats>,
}

/// Running totals over a player's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HybridStats {
    pub moves_from_minimax: usize,
    pub moves_from_mcts: usize,
}

pub struct HybridPlayer {
    config: HybridConfig,
    solver: MinimaxSolver,
    mcts: MctsEngine,
    stats: HybridStats,
}

impl HybridPlayer {
    pub fn new(config: HybridConfig) -> HybridPlayer {
        let solver = MinimaxSolver::new(config.solver);
        let mcts = MctsEngine::new(config.mcts);
        HybridPlayer {
            config,
            solver,
            mcts,
            stats: HybridStats::default(),
        }
    }

    pub fn stats(&self) -> HybridStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = HybridStats::default();
    }

    /// Picks a move for the side to play, or `None` on a terminal
    /// position. The engine is restored to its entry state either way.
    pub fn choose_move<R: Rng + ?Sized>(
        &mut self,
        game: &mut GameEngine,
        rng: &mut R,
    ) -> Result<Option<HybridMove>> {
        let empty = game.empty_count();

        if empty <= self.config.minimax_threshold {
            log::debug!("[Hybrid] endgame reached ({empty} empty), using minimax");
            match self.solver.find_best_move(game) {
                Ok(Some(solved)) => {
                    self.stats.moves_from_minimax += 1;
                    return Ok(Some(HybridMove {
                        mv: solved.mv,
                        source: MoveSource::Minimax,
                        score: Some(solved.score),
                        stats: None,
                    }));
                }
                // Solver found nothing; let MCTS have a look before
                // declaring the position dead.
                Ok(None) => {}
                Err(error) => {
                    log::warn!("[Hybrid] solver refused: {error}, falling back to MCTS");
                }
            }
        }

        let Some(decision) = self.mcts.best_move(game, rng)? else {
            return Ok(None);
        };
        self.stats.moves_from_mcts += 1;
        Ok(Some(HybridMove {
            mv: decision.mv,
            source: MoveSource::Mcts,
            score: None,
            stats: Some(decision.stats),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::simulate::random_playout;
    use rand::rngs::StdRng;

    fn quick_player(minimax_threshold: usize) -> HybridPlayer {
        HybridPlayer::new(HybridConfig {
            minimax_threshold,
            solver: SolverConfig { max_depth: 8 },
            mcts: MctsConfig {
                simulations: 100,
                ..MctsConfig::default()
            },
        })
    }

    #[test]
    fn test_opening_uses_mcts() {
        let mut game = GameEngine::new();
        let mut player = quick_player(6);
        let mut rng = StdRng::seed_from_u64(1);
        let chosen = player.choose_move(&mut game, &mut rng).unwrap().unwrap();
        assert_eq!(chosen.source, MoveSource::Mcts);
        assert!(chosen.stats.is_some());
        assert_eq!(player.stats().moves_from_mcts, 1);
    }

    #[test]
    fn test_endgame_uses_minimax() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut game = GameEngine::new();
        random_playout(&mut game, &mut rng, Some(5));
        if game.legal_moves().is_empty() || game.empty_count() > 6 {
            return;
        }

        let mut player = quick_player(6);
        let chosen = player.choose_move(&mut game, &mut rng).unwrap().unwrap();
        assert_eq!(chosen.source, MoveSource::Minimax);
        assert!(chosen.score.is_some());
        assert_eq!(player.stats().moves_from_minimax, 1);
    }

    #[test]
    fn test_state_restored_after_choice() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = GameEngine::new();
        random_playout(&mut game, &mut rng, Some(5));
        let before = game.clone();

        let mut player = quick_player(6);
        player.choose_move(&mut game, &mut rng).unwrap();
        assert_eq!(game, before);
    }

    #[test]
    fn test_terminal_position_yields_none() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut game = GameEngine::new();
        random_playout(&mut game, &mut rng, None);

        let mut player = quick_player(6);
        assert!(player.choose_move(&mut game, &mut rng).unwrap().is_none());
    }

    #[test]
    fn test_plays_full_game() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut game = GameEngine::new();
        let mut player = quick_player(5);

        while let Some(chosen) = player.choose_move(&mut game, &mut rng).unwrap() {
            game.apply_move(chosen.mv).unwrap();
        }
        assert!(game.is_terminal());
        let stats = player.stats();
        assert!(stats.moves_from_minimax + stats.moves_from_mcts > 0);
    }
}
