//! Self-play match runner.
//!
//! Plays complete games between configured players and returns outcomes
//! with full move history, ready for recording. Matches are independent,
//! so callers run them in parallel with per-match seeds.

use crate::game::board::Player;
use crate::game::engine::{GameEngine, Move, RulesConfig, FINAL_MOVE};
use crate::game::racks::Rack;
use crate::recording::game_record::{MoveRecord, PlayerKind};
use crate::search::hybrid::{HybridConfig, HybridPlayer, MoveSource};
use crate::search::mcts::{MctsConfig, MctsEngine};
use crate::Result;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Starting racks for a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RackVariant {
    /// Both players hold 1-9.
    Standard,
    /// Nine random values per player, duplicates allowed.
    Asymmetric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub player1: PlayerKind,
    pub player2: PlayerKind,
    pub rules: RulesConfig,
    pub racks: RackVariant,
    pub hybrid: HybridConfig,
    pub mcts: MctsConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            player1: PlayerKind::Hybrid,
            player2: PlayerKind::Hybrid,
            rules: RulesConfig::default(),
            racks: RackVariant::Standard,
            hybrid: HybridConfig::default(),
            mcts: MctsConfig::default(),
        }
    }
}

/// A finished game from the runner's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub winner: Option<Player>,
    pub player1_score: i32,
    pub player2_score: i32,
    pub moves: Vec<MoveRecord>,
}

enum Seat {
    Random,
    Mcts(MctsEngine),
    Hybrid(HybridPlayer),
}

impl Seat {
    fn new(kind: PlayerKind, config: &MatchConfig) -> Seat {
        match kind {
            PlayerKind::Random => Seat::Random,
            PlayerKind::Mcts => Seat::Mcts(MctsEngine::new(config.mcts)),
            PlayerKind::Hybrid => Seat::Hybrid(HybridPlayer::new(config.hybrid.clone())),
        }
    }

    fn pick<R: Rng + ?Sized>(
        &mut self,
        game: &mut GameEngine,
        rng: &mut R,
    ) -> Result<Option<(Move, Option<MoveSource>)>> {
        match self {
            Seat::Random => {
                let moves = game.legal_moves();
                Ok(moves.choose(rng).map(|&mv| (mv, None)))
            }
            Seat::Mcts(engine) => Ok(engine
                .best_move(game, rng)?
                .map(|decision| (decision.mv, Some(MoveSource::Mcts)))),
            Seat::Hybrid(player) => Ok(player
                .choose_move(game, rng)?
                .map(|chosen| (chosen.mv, Some(chosen.source)))),
        }
    }
}

/// Plays one complete game. The two seats keep their own search state;
/// all randomness flows from `rng`.
pub fn run_match<R: Rng + ?Sized>(config: &MatchConfig, rng: &mut R) -> Result<MatchOutcome> {
    let mut game = match config.racks {
        RackVariant::Standard => GameEngine::with_config(config.rules),
        RackVariant::Asymmetric => {
            let player1 = Rack::random(rng);
            let player2 = Rack::random(rng);
            GameEngine::with_racks(config.rules, player1, player2)
        }
    };

    let mut seats = [
        Seat::new(config.player1, config),
        Seat::new(config.player2, config),
    ];
    let mut moves = Vec::new();

    loop {
        let mover = game.current_player();
        let turn = game.move_count();
        let picked = seats[mover.index()].pick(&mut game, rng)?;
        let Some((mv, source)) = picked else {
            break;
        };

        game.apply_move(mv).map_err(crate::HexukiError::Move)?;
        moves.push(MoveRecord {
            turn,
            player: mover,
            cell: mv.cell,
            tile: mv.tile,
            source,
        });

        if game.move_count() >= FINAL_MOVE {
            break;
        }
    }

    let scores = game.scores();
    log::info!(
        "match finished: {} moves, p1={} p2={}",
        moves.len(),
        scores.player1,
        scores.player2
    );

    Ok(MatchOutcome {
        winner: scores.winner(),
        player1_score: scores.player1,
        player2_score: scores.player2,
        moves,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_match_completes() {
        let config = MatchConfig {
            player1: PlayerKind::Random,
            player2: PlayerKind::Random,
            ..MatchConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = run_match(&config, &mut rng).unwrap();
        assert!(outcome.moves.len() <= 18);
        assert!(outcome.player1_score > 0);
        // Turn numbers are strictly increasing from zero.
        for (i, record) in outcome.moves.iter().enumerate() {
            assert_eq!(record.turn as usize, i);
        }
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let config = MatchConfig {
            player1: PlayerKind::Random,
            player2: PlayerKind::Random,
            ..MatchConfig::default()
        };
        let a = run_match(&config, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = run_match(&config, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_search_match_records_sources() {
        let config = MatchConfig {
            player1: PlayerKind::Hybrid,
            player2: PlayerKind::Random,
            hybrid: HybridConfig {
                minimax_threshold: 5,
                mcts: MctsConfig {
                    simulations: 40,
                    ..MctsConfig::default()
                },
                ..HybridConfig::default()
            },
            ..MatchConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(2);
        let outcome = run_match(&config, &mut rng).unwrap();

        let p1_moves: Vec<_> = outcome
            .moves
            .iter()
            .filter(|m| m.player == Player::One)
            .collect();
        assert!(!p1_moves.is_empty());
        assert!(p1_moves.iter().all(|m| m.source.is_some()));
    }

    #[test]
    fn test_asymmetric_match_completes() {
        let config = MatchConfig {
            player1: PlayerKind::Random,
            player2: PlayerKind::Random,
            racks: RackVariant::Asymmetric,
            ..MatchConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let outcome = run_match(&config, &mut rng).unwrap();
        assert!(outcome.moves.len() <= 18);
    }
}
