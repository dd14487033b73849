//! Monte Carlo Tree Search with UCB1 selection.
//!
//! The tree lives in an index arena: nodes refer to parents and children
//! by `usize` handles into one `Vec`, never by owning pointers. Each
//! iteration runs the four standard phases — selection, expansion,
//! rollout, backpropagation — and the final move is the root child with
//! the most visits.
//!
//! Rollout outcomes are always reduced to player 1's result
//! (1.0 win / 0.5 draw / 0.0 loss). Each node accumulates the outcome
//! from the perspective of its own player to move, which is why UCB1
//! inverts the child win rate during selection: a child where the
//! opponent is doing well is a bad child to visit.

use crate::game::board::Player;
use crate::game::engine::{GameEngine, Move, FINAL_MOVE};
use crate::game::simulate::random_playout;
use crate::search::minimax::{MinimaxSolver, SolverConfig};
use crate::Result;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Alternatives reported alongside the chosen move.
const TOP_ALTERNATIVES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MctsConfig {
    /// Iteration budget when no time limit is set.
    pub simulations: usize,
    /// Optional wall-clock budget; takes precedence over `simulations`.
    #[serde(default)]
    pub time_limit: Option<Duration>,
    /// UCB1 exploration constant.
    pub exploration: f64,
    /// Hand rollouts to the endgame solver once few cells remain.
    pub minimax_rollouts: bool,
    /// Empty-cell count at which rollouts switch to the solver.
    pub minimax_threshold: usize,
}

impl Default for MctsConfig {
    fn default() -> Self {
        MctsConfig {
            simulations: 10_000,
            time_limit: None,
            exploration: std::f64::consts::SQRT_2,
            minimax_rollouts: false,
            minimax_threshold: 6,
        }
    }
}

/// A root alternative, ranked by visit count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveCandidate {
    pub mv: Move,
    pub visits: u64,
    pub win_rate: f64,
}

/// Search statistics reported with the chosen move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    pub simulations: usize,
    pub elapsed: Duration,
    /// Visits of the chosen root child.
    pub visits: u64,
    /// Win rate of the chosen root child, from that child's perspective.
    pub win_rate: f64,
    pub alternatives: Vec<MoveCandidate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MctsDecision {
    pub mv: Move,
    pub stats: SearchStats,
}

struct Node {
    state: GameEngine,
    parent: Option<usize>,
    mv: Option<Move>,
    children: Vec<usize>,
    untried: Vec<Move>,
    visits: u64,
    wins: f64,
}

impl Node {
    fn new(state: GameEngine, parent: Option<usize>, mv: Option<Move>) -> Node {
        let untried = state.legal_moves();
        Node {
            state,
            parent,
            mv,
            children: Vec::new(),
            untried,
            visits: 0,
            wins: 0.0,
        }
    }

    fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins / self.visits as f64
        }
    }
}

pub struct MctsEngine {
    config: MctsConfig,
    solver: MinimaxSolver,
}

impl MctsEngine {
    pub fn new(config: MctsConfig) -> MctsEngine {
        // The rollout solver never needs to search deeper than the
        // threshold where rollouts hand over.
        let solver = MinimaxSolver::new(SolverConfig {
            max_depth: config.minimax_threshold,
        });
        MctsEngine { config, solver }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Runs a full search and returns the most-visited root move, or
    /// `None` when the position has no legal moves.
    pub fn best_move<R: Rng + ?Sized>(
        &mut self,
        game: &GameEngine,
        rng: &mut R,
    ) -> Result<Option<MctsDecision>> {
        let started = Instant::now();
        // Fresh evaluation per decision.
        self.solver.clear_tables();

        let mut arena = vec![Node::new(game.clone(), None, None)];
        if arena[0].untried.is_empty() {
            return Ok(None);
        }

        let mut simulations = 0;
        loop {
            match self.config.time_limit {
                Some(limit) => {
                    if started.elapsed() >= limit {
                        break;
                    }
                }
                None => {
                    if simulations >= self.config.simulations {
                        break;
                    }
                }
            }

            // 1. Selection: descend while fully expanded and non-leaf.
            let mut index = 0;
            while arena[index].untried.is_empty() && !arena[index].children.is_empty() {
                index = self.select_child(&arena, index);
            }

            // 2. Expansion: materialize one random untried move.
            if !arena[index].untried.is_empty() {
                let pick = rng.random_range(0..arena[index].untried.len());
                let mv = arena[index].untried.swap_remove(pick);
                let mut state = arena[index].state.clone();
                state.apply_move(mv).expect("untried move is legal");
                let child = Node::new(state, Some(index), Some(mv));
                let child_index = arena.len();
                arena.push(child);
                arena[index].children.push(child_index);
                index = child_index;
            }

            // 3. Rollout from the new node's state.
            let outcome = self.rollout(&arena[index].state, rng)?;

            // 4. Backpropagation along parent links.
            let mut cursor = Some(index);
            while let Some(at) = cursor {
                let node = &mut arena[at];
                node.visits += 1;
                node.wins += if node.state.current_player() == Player::One {
                    outcome
                } else {
                    1.0 - outcome
                };
                cursor = node.parent;
            }

            simulations += 1;
        }

        let elapsed = started.elapsed();

        // Visit conservation: every completed iteration passes through the
        // root and exactly one of its children.
        debug_assert_eq!(arena[0].visits, simulations as u64);
        debug_assert_eq!(
            arena[0].children.iter().map(|&c| arena[c].visits).sum::<u64>(),
            simulations as u64
        );

        let mut ranked: Vec<usize> = arena[0].children.clone();
        ranked.sort_by_key(|&c| std::cmp::Reverse(arena[c].visits));
        let Some(&best) = ranked.first() else {
            return Ok(None);
        };

        let alternatives = ranked
            .iter()
            .take(TOP_ALTERNATIVES)
            .map(|&c| MoveCandidate {
                mv: arena[c].mv.expect("child nodes carry their move"),
                visits: arena[c].visits,
                win_rate: arena[c].win_rate(),
            })
            .collect();

        let decision = MctsDecision {
            mv: arena[best].mv.expect("child nodes carry their move"),
            stats: SearchStats {
                simulations,
                elapsed,
                visits: arena[best].visits,
                win_rate: arena[best].win_rate(),
                alternatives,
            },
        };

        if log::log_enabled!(log::Level::Debug) {
            log::debug!(
                "[MCTS] {} visits={} win_rate={:.3} sims={} elapsed={:?}",
                decision.mv,
                decision.stats.visits,
                decision.stats.win_rate,
                simulations,
                elapsed
            );
        }

        Ok(Some(decision))
    }

    /// UCB1 over the children of `parent`, inverting each child's win
    /// rate into the parent's perspective.
    fn select_child(&self, arena: &[Node], parent: usize) -> usize {
        let parent_visits = arena[parent].visits as f64;
        let mut best = arena[parent].children[0];
        let mut best_score = f64::NEG_INFINITY;

        for &child in &arena[parent].children {
            let node = &arena[child];
            let score = if node.visits == 0 {
                f64::INFINITY
            } else {
                let exploit = 1.0 - node.win_rate();
                let explore =
                    self.config.exploration * (parent_visits.ln() / node.visits as f64).sqrt();
                exploit + explore
            };
            if score > best_score {
                best_score = score;
                best = child;
            }
        }

        best
    }

    /// Plays the position out and reduces it to player 1's result.
    fn rollout<R: Rng + ?Sized>(&mut self, state: &GameEngine, rng: &mut R) -> Result<f64> {
        let mut sim = state.clone();
        let stop_at = self
            .config
            .minimax_rollouts
            .then_some(self.config.minimax_threshold);
        random_playout(&mut sim, rng, stop_at);

        let differential = if self.config.minimax_rollouts
            && sim.move_count() < FINAL_MOVE
            && sim.empty_count() <= self.config.minimax_threshold
        {
            // Exact endgame value instead of noisy random finishes. A
            // playout that ran out of moves above the threshold falls
            // through to plain scoring.
            self.solver.evaluate_position(&mut sim)?
        } else {
            sim.scores().differential()
        };

        Ok(match differential.cmp(&0) {
            std::cmp::Ordering::Greater => 1.0,
            std::cmp::Ordering::Less => 0.0,
            std::cmp::Ordering::Equal => 0.5,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    fn quick_config(simulations: usize) -> MctsConfig {
        MctsConfig {
            simulations,
            ..MctsConfig::default()
        }
    }

    #[test]
    fn test_returns_legal_move() {
        let game = GameEngine::new();
        let mut engine = MctsEngine::new(quick_config(200));
        let mut rng = StdRng::seed_from_u64(1);
        let decision = engine.best_move(&game, &mut rng).unwrap().unwrap();
        assert!(game.legal_moves().contains(&decision.mv));
    }

    #[test]
    fn test_visit_conservation() {
        let game = GameEngine::new();
        let mut engine = MctsEngine::new(quick_config(300));
        let mut rng = StdRng::seed_from_u64(2);
        let decision = engine.best_move(&game, &mut rng).unwrap().unwrap();

        assert_eq!(decision.stats.simulations, 300);
        // Root child visits sum to the iterations that expanded below the
        // root; the root absorbs every one.
        let child_visits: u64 = decision
            .stats
            .alternatives
            .iter()
            .map(|c| c.visits)
            .sum();
        assert!(child_visits <= 300);
        assert!(decision.stats.visits >= 1);
    }

    #[test]
    fn test_alternatives_sorted_by_visits() {
        let game = GameEngine::new();
        let mut engine = MctsEngine::new(quick_config(400));
        let mut rng = StdRng::seed_from_u64(3);
        let decision = engine.best_move(&game, &mut rng).unwrap().unwrap();

        let alternatives = &decision.stats.alternatives;
        assert!(!alternatives.is_empty());
        assert!(alternatives.len() <= TOP_ALTERNATIVES);
        assert!(alternatives.windows(2).all(|w| w[0].visits >= w[1].visits));
        assert_eq!(alternatives[0].mv, decision.mv);
    }

    #[test]
    fn test_minimax_rollouts_produce_decision() {
        let config = MctsConfig {
            simulations: 60,
            minimax_rollouts: true,
            minimax_threshold: 4,
            ..MctsConfig::default()
        };
        let game = GameEngine::new();
        let mut engine = MctsEngine::new(config);
        let mut rng = StdRng::seed_from_u64(4);
        let decision = engine.best_move(&game, &mut rng).unwrap();
        assert!(decision.is_some());
    }

    #[test]
    fn test_time_limit_stops_search() {
        let config = MctsConfig {
            simulations: usize::MAX,
            time_limit: Some(Duration::from_millis(50)),
            ..MctsConfig::default()
        };
        let game = GameEngine::new();
        let mut engine = MctsEngine::new(config);
        let mut rng = StdRng::seed_from_u64(5);
        let started = Instant::now();
        let decision = engine.best_move(&game, &mut rng).unwrap();
        assert!(decision.is_some());
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_no_moves_returns_none() {
        use crate::game::simulate::random_playout;
        let mut rng = StdRng::seed_from_u64(6);
        let mut game = GameEngine::new();
        random_playout(&mut game, &mut rng, None);
        assert!(game.is_terminal());

        let mut engine = MctsEngine::new(quick_config(50));
        assert!(engine.best_move(&game, &mut rng).unwrap().is_none());
    }
}
