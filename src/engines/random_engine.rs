use rand::SeedableRng;
use rand_pcg::Pcg64;

use super::{random_move, ChessEngine};
use crate::chess_board::Move;

/// Picks uniformly among the legal moves. Seeded engines replay the same game.
pub struct RandomEngine {
    rng: Pcg64,
}

impl RandomEngine {
    pub fn new() -> Self {
        Self { rng: Pcg64::from_entropy() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: Pcg64::seed_from_u64(seed) }
    }
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessEngine for RandomEngine {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_move(&mut self, valid_moves: &[Move]) -> Option<Move> {
        random_move(valid_moves, &mut self.rng)
    }
}
