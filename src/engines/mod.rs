use rand::prelude::SliceRandom;
use rand::Rng;

use crate::chess_board::Move;

mod random_engine;
pub use random_engine::RandomEngine;

/// Something that can pick the next move for the side to move.
pub trait ChessEngine {
    fn name(&self) -> &str;
    /// `valid_moves` is the latest legal list; `None` only when it is empty.
    fn choose_move(&mut self, valid_moves: &[Move]) -> Option<Move>;
}

/// Uniformly random element of `valid_moves`.
pub fn random_move<R: Rng + ?Sized>(valid_moves: &[Move], rng: &mut R) -> Option<Move> {
    valid_moves.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess_board::GameState;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use std::collections::HashSet;

    #[test]
    fn test_random_move_empty() {
        let mut rng = Pcg64::seed_from_u64(1);
        assert_eq!(random_move(&[], &mut rng), None);
    }

    #[test]
    fn test_random_move_covers_the_list() {
        let mut game = GameState::new();
        let moves = game.get_valid_moves();
        let mut rng = Pcg64::seed_from_u64(42);
        let seen: HashSet<Move> = (0..2000).filter_map(|_| random_move(&moves, &mut rng)).collect();
        assert_eq!(seen.len(), moves.len());
    }
}
