//! Random playouts, shared by MCTS rollouts, the self-play driver and
//! tests.

use crate::game::engine::{GameEngine, FINAL_MOVE};
use rand::prelude::*;

/// Plays uniformly-random legal moves until the game ends, no legal move
/// remains, or (if given) the empty-cell count drops to `stop_at_empty`.
/// Returns the number of moves played.
pub fn random_playout<R: Rng + ?Sized>(
    game: &mut GameEngine,
    rng: &mut R,
    stop_at_empty: Option<usize>,
) -> usize {
    let mut played = 0;
    loop {
        if game.move_count() >= FINAL_MOVE {
            break;
        }
        if let Some(threshold) = stop_at_empty {
            if game.empty_count() <= threshold {
                break;
            }
        }
        let moves = game.legal_moves();
        let Some(&mv) = moves.choose(rng) else {
            break;
        };
        game.apply_move(mv).expect("enumerated move applies");
        played += 1;
    }
    played
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    #[test]
    fn test_playout_reaches_terminal() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut game = GameEngine::new();
        random_playout(&mut game, &mut rng, None);
        assert!(game.is_terminal());
    }

    #[test]
    fn test_playout_respects_stop_threshold() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut game = GameEngine::new();
        random_playout(&mut game, &mut rng, Some(6));
        assert!(game.empty_count() <= 6 || game.is_terminal());
        // Never past the threshold unless moves ran out earlier.
        assert!(game.empty_count() >= 6 || game.legal_moves().is_empty());
    }
}
