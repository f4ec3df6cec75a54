//! Chess rules: board state with make/unmake, legal move generation,
//! check, checkmate and stalemate detection, castling, en passant and
//! auto-queen promotion. `session` wraps a game for a front end and
//! `engines` supplies the random computer player.

pub mod chess_board;
pub mod engines;
pub mod error;
pub mod perft;
pub mod session;

pub use chess_board::{CastlingRights, ChessField, Color, GameState, Move, Piece, PieceType, Square};
pub use error::ChessError;
