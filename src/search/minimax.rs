//! Exact minimax endgame solver.
//!
//! Alpha-beta search to the end of the game, exact when the remaining
//! empty-cell count is within the configured budget. Player 1 maximizes
//! the final score differential, player 2 minimizes it. Three measures
//! keep the search fast enough for in-game use:
//!
//! - undo-based traversal: one mutable engine plus a stack of undo
//!   records, never a clone per node
//! - a transposition table keyed by the Zobrist position hash
//! - move ordering with killer moves, higher tile values first, then
//!   center-proximal cells

use crate::game::board::Player;
use crate::game::engine::{GameEngine, Move, FINAL_MOVE};
use crate::game::hashing::position_hash;
use crate::{HexukiError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Score offset marking a decided game; the margin is added on top so the
/// solver prefers bigger wins among winning lines.
const WIN_SCORE: i32 = 10_000;

/// Cells tried first when tile values tie, nearest the center first.
const CENTER_ORDER: [usize; 7] = [9, 10, 11, 4, 14, 8, 12];

/// Killer moves remembered per depth.
const KILLERS_PER_DEPTH: usize = 2;

const EXACT: u8 = 0;
const LOWER_BOUND: u8 = 1;
const UPPER_BOUND: u8 = 2;

/// Cached search result. Searches always run to termination, so the score
/// needs no depth qualifier; the flag records whether a cutoff turned it
/// into a bound instead of an exact value.
#[derive(Debug, Clone, Copy)]
struct TableEntry {
    score: i32,
    flag: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Maximum number of empty cells the solver will search through.
    pub max_depth: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig { max_depth: 10 }
    }
}

/// An exactly-solved move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverMove {
    pub mv: Move,
    /// Signed terminal evaluation: positive means player 1 wins.
    pub score: i32,
}

pub struct MinimaxSolver {
    config: SolverConfig,
    table: HashMap<u64, TableEntry>,
    killers: HashMap<usize, Vec<Move>>,
    nodes_searched: u64,
    cache_hits: u64,
}

impl MinimaxSolver {
    pub fn new(config: SolverConfig) -> MinimaxSolver {
        MinimaxSolver {
            config,
            table: HashMap::new(),
            killers: HashMap::new(),
            nodes_searched: 0,
            cache_hits: 0,
        }
    }

    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    /// Drops cached entries. Required between games, and whenever the
    /// ruleset changes under a reused solver.
    pub fn clear_tables(&mut self) {
        self.table.clear();
        self.killers.clear();
    }

    fn check_budget(&self, game: &GameEngine) -> Result<()> {
        let empty = game.empty_count();
        if empty > self.config.max_depth {
            return Err(HexukiError::SolverOverBudget {
                empty,
                limit: self.config.max_depth,
            });
        }
        Ok(())
    }

    /// Terminal evaluation with the bigger-win refinement: decided games
    /// score the win marker plus the margin.
    fn evaluate_terminal(game: &GameEngine) -> i32 {
        let scores = game.scores();
        match scores.differential() {
            d if d > 0 => WIN_SCORE + d,
            d if d < 0 => -WIN_SCORE + d,
            _ => 0,
        }
    }

    fn note_killer(&mut self, depth: usize, mv: Move) {
        let killers = self.killers.entry(depth).or_default();
        if !killers.contains(&mv) {
            killers.insert(0, mv);
            killers.truncate(KILLERS_PER_DEPTH);
        }
    }

    /// Killers first, then higher tiles, then center-proximal cells.
    /// Ordering only affects pruning, never the result.
    fn order_moves(&self, moves: &mut [Move], depth: usize) {
        let killers = self.killers.get(&depth);
        moves.sort_by_key(|mv| {
            let killer_rank = match killers {
                Some(killers) => killers.iter().position(|k| k == mv).unwrap_or(killers.len()),
                None => KILLERS_PER_DEPTH,
            };
            let center_rank = CENTER_ORDER
                .iter()
                .position(|&c| c == mv.cell)
                .unwrap_or(CENTER_ORDER.len());
            (killer_rank, std::cmp::Reverse(mv.tile), center_rank)
        });
    }

    fn minimax(
        &mut self,
        game: &mut GameEngine,
        depth: usize,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.nodes_searched += 1;

        let hash = position_hash(game);
        if let Some(&entry) = self.table.get(&hash) {
            let usable = match entry.flag {
                EXACT => true,
                LOWER_BOUND => entry.score >= beta,
                _ => entry.score <= alpha,
            };
            if usable {
                self.cache_hits += 1;
                return entry.score;
            }
        }
        let (alpha_in, beta_in) = (alpha, beta);

        if depth == 0 || game.move_count() >= FINAL_MOVE {
            let score = Self::evaluate_terminal(game);
            self.table.insert(hash, TableEntry { score, flag: EXACT });
            return score;
        }

        let mut moves = game.legal_moves();
        if moves.is_empty() {
            // Rules can exhaust moves before the board fills; score as-is.
            let score = Self::evaluate_terminal(game);
            self.table.insert(hash, TableEntry { score, flag: EXACT });
            return score;
        }
        self.order_moves(&mut moves, depth);

        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        for mv in moves {
            let undo = match game.apply_move(mv) {
                Ok(undo) => undo,
                Err(_) => continue,
            };
            let score = self.minimax(game, depth - 1, alpha, beta, !maximizing);
            game.undo_move(undo);

            if maximizing {
                if score > best {
                    best = score;
                    if score >= beta {
                        self.note_killer(depth, mv);
                    }
                }
                alpha = alpha.max(score);
            } else {
                if score < best {
                    best = score;
                    if score <= alpha {
                        self.note_killer(depth, mv);
                    }
                }
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }

        let flag = if best <= alpha_in {
            UPPER_BOUND
        } else if best >= beta_in {
            LOWER_BOUND
        } else {
            EXACT
        };
        self.table.insert(hash, TableEntry { score: best, flag });
        best
    }

    /// Exact value of the position with both sides playing optimally.
    /// Shares the transposition table with [`MinimaxSolver::find_best_move`].
    pub fn evaluate_position(&mut self, game: &mut GameEngine) -> Result<i32> {
        self.check_budget(game)?;
        let depth = game.empty_count();
        let maximizing = game.current_player() == Player::One;
        Ok(self.minimax(game, depth, i32::MIN, i32::MAX, maximizing))
    }

    /// The game-theoretically optimal move, or `None` when the side to
    /// move has no legal move (callers treat the position as terminal).
    pub fn find_best_move(&mut self, game: &mut GameEngine) -> Result<Option<SolverMove>> {
        self.check_budget(game)?;

        self.nodes_searched = 0;
        self.cache_hits = 0;
        self.killers.clear();

        let mut moves = game.legal_moves();
        if moves.is_empty() {
            return Ok(None);
        }

        let maximizing = game.current_player() == Player::One;
        self.order_moves(&mut moves, 0);

        let mut best: Option<SolverMove> = None;
        for mv in moves {
            let undo = match game.apply_move(mv) {
                Ok(undo) => undo,
                Err(_) => continue,
            };
            let depth = game.empty_count();
            let score = self.minimax(game, depth, i32::MIN, i32::MAX, !maximizing);
            game.undo_move(undo);

            let improves = match best {
                None => true,
                Some(current) => {
                    if maximizing {
                        score > current.score
                    } else {
                        score < current.score
                    }
                }
            };
            if improves {
                best = Some(SolverMove { mv, score });
            }
        }

        if log::log_enabled!(log::Level::Trace) {
            if let Some(chosen) = best {
                log::trace!(
                    "[Minimax] {} score={} nodes={} cache_hits={}",
                    chosen.mv,
                    chosen.score,
                    self.nodes_searched,
                    self.cache_hits
                );
            }
        }

        Ok(best)
    }
}

impl Default for MinimaxSolver {
    fn default() -> Self {
        MinimaxSolver::new(SolverConfig::default())
    }
}
