//! Integration tests across the search strategies.

use assert_matches::assert_matches;
use hexuki::game::engine::GameEngine;
use hexuki::game::simulate::random_playout;
use hexuki::search::hybrid::{HybridConfig, HybridPlayer, MoveSource};
use hexuki::search::mcts::{MctsConfig, MctsEngine};
use hexuki::search::minimax::{MinimaxSolver, SolverConfig};
use hexuki::HexukiError;
use rand::prelude::*;

fn endgame(seed: u64, empty: usize) -> GameEngine {
    // Retry seeds until the playout actually reaches the target; the move
    // rules can strand a position with no legal continuation earlier.
    for offset in 0.. {
        let mut rng = StdRng::seed_from_u64(seed + offset * 1000);
        let mut game = GameEngine::new();
        random_playout(&mut game, &mut rng, Some(empty));
        if game.empty_count() <= empty {
            return game;
        }
    }
    unreachable!()
}

#[test]
fn test_minimax_exact_on_small_states() {
    // For positions with few empty cells, the reported score must equal
    // the differential obtained by replaying optimal moves to the end.
    for seed in [1, 3, 8, 12] {
        let mut game = endgame(seed, 4);
        let mut solver = MinimaxSolver::new(SolverConfig { max_depth: 6 });
        let Some(best) = solver.find_best_move(&mut game).unwrap() else {
            continue;
        };

        let mut replay = game.clone();
        let mut replay_solver = MinimaxSolver::new(SolverConfig { max_depth: 6 });
        let mut next = Some(best);
        while let Some(solved) = next {
            replay.apply_move(solved.mv).unwrap();
            next = replay_solver.find_best_move(&mut replay).unwrap();
        }

        let differential = replay.scores().differential();
        let expected = match differential {
            d if d > 0 => 10_000 + d,
            d if d < 0 => -10_000 + d,
            _ => 0,
        };
        assert_eq!(best.score, expected, "seed {seed}");
    }
}

#[test]
fn test_solver_refuses_midgame() {
    let mut game = GameEngine::new();
    let mut solver = MinimaxSolver::new(SolverConfig { max_depth: 8 });
    assert_matches!(
        solver.find_best_move(&mut game),
        Err(HexukiError::SolverOverBudget { empty: 18, limit: 8 })
    );
}

#[test]
fn test_mcts_and_minimax_agree_on_trivial_endgame() {
    // With a single legal move both strategies must return it.
    for seed in 0..40 {
        let mut game = endgame(seed, 1);
        let moves = game.legal_moves();
        if moves.len() != 1 {
            continue;
        }

        let mut solver = MinimaxSolver::default();
        let solved = solver.find_best_move(&mut game).unwrap().unwrap();
        assert_eq!(solved.mv, moves[0]);

        let mut mcts = MctsEngine::new(MctsConfig {
            simulations: 20,
            ..MctsConfig::default()
        });
        let mut rng = StdRng::seed_from_u64(seed);
        let decision = mcts.best_move(&game, &mut rng).unwrap().unwrap();
        assert_eq!(decision.mv, moves[0]);
        return;
    }
}

#[test]
fn test_hybrid_switches_at_threshold() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut game = GameEngine::new();
    let mut player = HybridPlayer::new(HybridConfig {
        minimax_threshold: 6,
        solver: SolverConfig { max_depth: 8 },
        mcts: MctsConfig {
            simulations: 60,
            ..MctsConfig::default()
        },
    });

    let mut sources = Vec::new();
    while let Some(chosen) = player.choose_move(&mut game, &mut rng).unwrap() {
        sources.push((game.empty_count(), chosen.source));
        game.apply_move(chosen.mv).unwrap();
    }
    assert!(game.is_terminal());

    for (empty, source) in sources {
        if empty <= 6 {
            assert_eq!(source, MoveSource::Minimax, "{empty} empty cells");
        } else {
            assert_eq!(source, MoveSource::Mcts, "{empty} empty cells");
        }
    }
}

#[test]
fn test_minimax_rollouts_match_plain_contract() {
    // Minimax-terminated rollouts change evaluation quality, not the
    // interface: a legal move and conserved statistics either way.
    let game = endgame(5, 10);
    if game.legal_moves().is_empty() {
        return;
    }

    for minimax_rollouts in [false, true] {
        let mut engine = MctsEngine::new(MctsConfig {
            simulations: 80,
            minimax_rollouts,
            minimax_threshold: 5,
            ..MctsConfig::default()
        });
        let mut rng = StdRng::seed_from_u64(7);
        let decision = engine.best_move(&game, &mut rng).unwrap().unwrap();
        assert!(game.legal_moves().contains(&decision.mv));
        assert_eq!(decision.stats.simulations, 80);
    }
}
