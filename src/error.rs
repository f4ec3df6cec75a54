use thiserror::Error;

/// Errors raised where text or clicks enter the engine. The rules core itself
/// has no recoverable failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("invalid square notation: {0}")]
    InvalidSquare(String),

    #[error("invalid move notation: {0}")]
    InvalidMove(String),

    #[error("illegal move in this position: {0}")]
    IllegalMove(String),

    #[error("the game is over")]
    GameOver,

    #[error("it is not a human player's turn")]
    NotHumanTurn,
}
