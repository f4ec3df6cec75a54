use std::fmt;

use crate::chess_board::{ChessField, Color, GameState, Move};
use crate::engines::ChessEngine;
use crate::error::ChessError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerKind {
    Human,
    Computer,
}

/// What a click on the board did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The field is now the first click of a move.
    Selected(ChessField),
    /// The same field was clicked twice.
    Cleared,
    /// Second click completed a legal move, which has been played.
    Moved(Move),
    /// Game over, or not a human's turn.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Checkmate { winner } => write!(f, "{} wins by checkmate", winner),
            Outcome::Stalemate => write!(f, "Stalemate"),
        }
    }
}

/// A game between two players, each human or computer, fed by clicks or
/// coordinate text. Keeps the legal move list for the position current.
pub struct GameSession {
    game: GameState,
    valid_moves: Vec<Move>,
    white: PlayerKind,
    black: PlayerKind,
    engine: Box<dyn ChessEngine>,
    selected: Option<ChessField>,
    game_over: bool,
}

impl GameSession {
    pub fn new(white: PlayerKind, black: PlayerKind, engine: Box<dyn ChessEngine>) -> Self {
        let mut session = Self {
            game: GameState::new(),
            valid_moves: Vec::new(),
            white,
            black,
            engine,
            selected: None,
            game_over: false,
        };
        session.refresh();
        session
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn valid_moves(&self) -> &[Move] {
        &self.valid_moves
    }

    pub fn selected(&self) -> Option<ChessField> {
        self.selected
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    pub fn player(&self, color: Color) -> PlayerKind {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    pub fn is_human_turn(&self) -> bool {
        self.player(self.game.active_color()) == PlayerKind::Human
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn outcome(&self) -> Option<Outcome> {
        if self.game.check_mate() {
            Some(Outcome::Checkmate { winner: self.game.active_color().opposite() })
        } else if self.game.stale_mate() {
            Some(Outcome::Stalemate)
        } else {
            None
        }
    }

    /// Handles one click. The second of two distinct clicks is matched against
    /// the legal moves by its start and end field.
    pub fn select(&mut self, field: ChessField) -> Selection {
        if self.game_over || !self.is_human_turn() {
            return Selection::Ignored;
        }

        match self.selected {
            Some(first) if first == field => {
                self.selected = None;
                Selection::Cleared
            }
            Some(first) => {
                let candidate = Move::new(first, field, self.game.board());
                match self.resolve(&candidate) {
                    Some(mv) => {
                        self.play(mv);
                        Selection::Moved(mv)
                    }
                    None => {
                        self.selected = Some(field);
                        Selection::Selected(field)
                    }
                }
            }
            None => {
                self.selected = Some(field);
                Selection::Selected(field)
            }
        }
    }

    /// Plays a human move given as coordinates, e.g. `e2e4`.
    pub fn submit(&mut self, notation: &str) -> Result<Move, ChessError> {
        if self.game_over {
            return Err(ChessError::GameOver);
        }
        if !self.is_human_turn() {
            return Err(ChessError::NotHumanTurn);
        }
        let candidate = Move::from_algebraic(notation, self.game.board())?;
        let mv = self
            .resolve(&candidate)
            .ok_or_else(|| ChessError::IllegalMove(candidate.get_chess_notation()))?;
        self.play(mv);
        Ok(mv)
    }

    /// Lets the engine move when the side to move is a computer.
    pub fn play_computer_move(&mut self) -> Option<Move> {
        if self.game_over || self.is_human_turn() {
            return None;
        }
        let mv = self.engine.choose_move(&self.valid_moves)?;
        let mv = self.resolve(&mv)?;
        self.play(mv);
        Some(mv)
    }

    /// Takes back one move and resumes a finished game.
    pub fn undo(&mut self) {
        self.game.undo_move();
        self.selected = None;
        self.refresh();
    }

    pub fn reset(&mut self) {
        self.game = GameState::new();
        self.selected = None;
        self.refresh();
    }

    // the flagged move from the legal list, never the caller's classification
    fn resolve(&self, candidate: &Move) -> Option<Move> {
        self.valid_moves.iter().find(|mv| *mv == candidate).copied()
    }

    fn play(&mut self, mv: Move) {
        self.game.make_move(mv);
        self.selected = None;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.valid_moves = self.game.get_valid_moves();
        self.game_over = self.game.check_mate() || self.game.stale_mate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::RandomEngine;
    use pretty_assertions::assert_eq;

    fn field(s: &str) -> ChessField {
        ChessField::from_algebraic(s).unwrap()
    }

    fn human_game() -> GameSession {
        GameSession::new(PlayerKind::Human, PlayerKind::Human, Box::new(RandomEngine::seeded(3)))
    }

    #[test]
    fn test_two_clicks_play_a_move() {
        let mut session = human_game();
        assert_eq!(session.select(field("e2")), Selection::Selected(field("e2")));
        let Selection::Moved(mv) = session.select(field("e4")) else {
            panic!("expected a move");
        };
        assert_eq!(mv.get_chess_notation(), "e2e4");
        assert_eq!(session.selected(), None);
        assert_eq!(session.game().white_to_move(), false);
        assert_eq!(session.game().move_log().len(), 1);
        assert_eq!(session.valid_moves().len(), 20);
    }

    #[test]
    fn test_same_square_twice_clears() {
        let mut session = human_game();
        session.select(field("g1"));
        assert_eq!(session.select(field("g1")), Selection::Cleared);
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn test_illegal_second_click_becomes_first_click() {
        let mut session = human_game();
        session.select(field("e2"));
        assert_eq!(session.select(field("e5")), Selection::Selected(field("e5")));
        session.select(field("g1"));
        assert!(matches!(session.select(field("f3")), Selection::Moved(_)));
    }

    #[test]
    fn test_clicked_en_passant_uses_flagged_move() {
        let mut session = human_game();
        for mv in ["e2e4", "a7a6", "e4e5", "d7d5"] {
            session.submit(mv).unwrap();
        }
        session.select(field("e5"));
        let Selection::Moved(mv) = session.select(field("d6")) else {
            panic!("expected en passant");
        };
        assert!(mv.is_en_passant_move);
        assert!(session.game().square(field("d5")).is_empty());
    }

    #[test]
    fn test_submit_errors() {
        let mut session = human_game();
        assert_eq!(session.submit("e2"), Err(ChessError::InvalidMove("e2".to_string())));
        assert_eq!(session.submit("e2x4"), Err(ChessError::InvalidSquare("x4".to_string())));
        assert_eq!(session.submit("e2e5"), Err(ChessError::IllegalMove("e2e5".to_string())));
        assert_eq!(session.game().move_log().len(), 0);
    }

    #[test]
    fn test_fools_mate_outcome() {
        let mut session = human_game();
        for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            session.submit(mv).unwrap();
        }
        assert!(session.is_game_over());
        assert_eq!(session.outcome(), Some(Outcome::Checkmate { winner: Color::Black }));
        assert_eq!(session.outcome().unwrap().to_string(), "Black wins by checkmate");
        assert_eq!(session.select(field("a2")), Selection::Ignored);
        assert_eq!(session.submit("a2a3"), Err(ChessError::GameOver));

        session.undo();
        assert!(!session.is_game_over());
        assert_eq!(session.outcome(), None);
        assert_eq!(session.game().move_log().len(), 3);
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(Outcome::Checkmate { winner: Color::White }.to_string(), "White wins by checkmate");
        assert_eq!(Outcome::Stalemate.to_string(), "Stalemate");
    }

    #[test]
    fn test_computer_turns() {
        let mut session = GameSession::new(PlayerKind::Human, PlayerKind::Computer, Box::new(RandomEngine::seeded(9)));
        assert_eq!(session.play_computer_move(), None);
        session.submit("d2d4").unwrap();

        assert_eq!(session.is_human_turn(), false);
        assert_eq!(session.select(field("d7")), Selection::Ignored);
        assert_eq!(session.submit("d7d5"), Err(ChessError::NotHumanTurn));

        let reply = session.play_computer_move().unwrap();
        assert_eq!(reply.piece_moved.color(), Some(Color::Black));
        assert_eq!(session.game().move_log().len(), 2);
        assert_eq!(session.is_human_turn(), true);
    }

    #[test]
    fn test_reset_and_undo_on_empty_history() {
        let mut session = human_game();
        session.undo();
        assert_eq!(session.game().move_log().len(), 0);

        session.submit("e2e4").unwrap();
        session.select(field("e7"));
        session.reset();
        assert_eq!(session.game(), &GameState::new());
        assert_eq!(session.selected(), None);
        assert_eq!(session.valid_moves().len(), 20);
    }

    #[test]
    fn test_computer_selfplay_terminates_with_outcome_or_limit() {
        let mut session =
            GameSession::new(PlayerKind::Computer, PlayerKind::Computer, Box::new(RandomEngine::seeded(2024)));
        let mut plies = 0;
        while !session.is_game_over() && plies < 300 {
            session.play_computer_move().unwrap();
            plies += 1;
        }
        assert_eq!(session.game().move_log().len(), plies);
        assert_eq!(session.is_game_over(), session.outcome().is_some());
    }
}
