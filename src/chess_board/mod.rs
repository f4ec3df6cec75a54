pub mod model;
pub use model::{Board, CastlingRights, ChessField, Color, Move, Piece, PieceType, Square, BOARD_SIZE};

mod game_state;
mod move_generation;
#[cfg(test)]
pub mod test_utils;
pub use game_state::GameState;
