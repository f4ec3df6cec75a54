use super::{Board, CastlingRights, ChessField, Color, GameState, Move, Piece, Square, BOARD_SIZE};

pub fn assert_moves<I: Iterator<Item = Move>>(generated: I, mut expected: Vec<&str>) {
    let mut generated_converted: Vec<_> = generated.map(|m| m.get_chess_notation()).collect();
    generated_converted.sort();
    expected.sort();

    assert_eq!(generated_converted, expected);
}

/// Builds a position from eight rank strings, rank 8 first. `.` is an empty
/// square, letters are pieces as in a board diagram.
pub fn board_from_rows(rows: [&str; 8], active_color: Color, castling_rights: CastlingRights) -> GameState {
    let mut board: Board = [[Square::Empty; BOARD_SIZE]; BOARD_SIZE];
    for (row, line) in rows.iter().enumerate() {
        assert_eq!(line.len(), BOARD_SIZE, "row {} has the wrong width: {:?}", row, line);
        for (col, c) in line.chars().enumerate() {
            if c != '.' {
                let piece = Piece::from_char(c).unwrap_or_else(|| panic!("unknown piece {:?}", c));
                board[row][col] = Square::Occupied(piece);
            }
        }
    }
    GameState::with_board(board, active_color, castling_rights)
}

impl GameState {
    pub fn pseudo_moves_from(&self, square: &str) -> Vec<Move> {
        let field = ChessField::from_algebraic(square).unwrap();
        self.generate_pseudo_moves_from_position(field.row, field.col)
    }

    /// Plays a legal move given in coordinate notation, panics if it is not legal.
    pub fn play(&mut self, notation: &str) {
        let mv = self.find_valid(notation).unwrap_or_else(|| panic!("{} is not a legal move", notation));
        self.make_move(mv);
    }

    pub fn find_valid(&mut self, notation: &str) -> Option<Move> {
        self.get_valid_moves().into_iter().find(|m| m.get_chess_notation() == notation)
    }
}
