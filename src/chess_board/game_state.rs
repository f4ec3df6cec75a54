use super::{Board, CastlingRights, ChessField, Color, Move, Piece, PieceType, Square, BOARD_SIZE};

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// Board, side to move and the histories needed to take moves back.
///
/// Only [`GameState::make_move`] and [`GameState::undo_move`] mutate a game.
/// `check_mate` and `stale_mate` are recomputed by
/// [`GameState::get_valid_moves`] and are stale until it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub(super) board: Board,
    active_color: Color,
    white_king_location: ChessField,
    black_king_location: ChessField,
    check_mate: bool,
    stale_mate: bool,
    pub(super) en_passant_possible: Option<ChessField>,
    en_passant_log: Vec<Option<ChessField>>,
    current_castling_rights: CastlingRights,
    castle_rights_log: Vec<CastlingRights>,
    move_log: Vec<Move>,
}

impl GameState {
    /// Standard initial position, white to move, all castling rights.
    pub fn new() -> Self {
        let mut board = [[Square::Empty; BOARD_SIZE]; BOARD_SIZE];
        for col in 0..BOARD_SIZE {
            board[0][col] = Square::Occupied(Piece::new(Color::Black, BACK_RANK[col]));
            board[1][col] = Square::Occupied(Piece::new(Color::Black, PieceType::Pawn));
            board[6][col] = Square::Occupied(Piece::new(Color::White, PieceType::Pawn));
            board[7][col] = Square::Occupied(Piece::new(Color::White, BACK_RANK[col]));
        }
        Self::with_board(board, Color::White, CastlingRights::ALL)
    }

    /// Arbitrary setup; every color needs exactly one king.
    pub(crate) fn with_board(board: Board, active_color: Color, castling_rights: CastlingRights) -> Self {
        let white_king_location = find_king(&board, Color::White);
        let black_king_location = find_king(&board, Color::Black);
        Self {
            board,
            active_color,
            white_king_location,
            black_king_location,
            check_mate: false,
            stale_mate: false,
            en_passant_possible: None,
            en_passant_log: vec![None],
            current_castling_rights: castling_rights,
            castle_rights_log: vec![castling_rights],
            move_log: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn square(&self, field: ChessField) -> Square {
        self.board[field.row as usize][field.col as usize]
    }

    pub fn active_color(&self) -> Color {
        self.active_color
    }

    pub fn white_to_move(&self) -> bool {
        self.active_color == Color::White
    }

    pub fn check_mate(&self) -> bool {
        self.check_mate
    }

    pub fn stale_mate(&self) -> bool {
        self.stale_mate
    }

    pub(crate) fn mate_flags(&self) -> (bool, bool) {
        (self.check_mate, self.stale_mate)
    }

    pub(crate) fn restore_mate_flags(&mut self, (check_mate, stale_mate): (bool, bool)) {
        self.check_mate = check_mate;
        self.stale_mate = stale_mate;
    }

    pub fn king_location(&self, color: Color) -> ChessField {
        match color {
            Color::White => self.white_king_location,
            Color::Black => self.black_king_location,
        }
    }

    pub fn en_passant_possible(&self) -> Option<ChessField> {
        self.en_passant_possible
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.current_castling_rights
    }

    pub fn castle_rights_log(&self) -> &[CastlingRights] {
        &self.castle_rights_log
    }

    pub fn move_log(&self) -> &[Move] {
        &self.move_log
    }

    fn set(&mut self, field: ChessField, square: Square) {
        self.board[field.row as usize][field.col as usize] = square;
    }

    /// Plays `mv`, which must come from the latest [`GameState::get_valid_moves`].
    pub fn make_move(&mut self, mv: Move) {
        let Square::Occupied(piece) = mv.piece_moved else {
            panic!("make_move: no piece to move on {}", mv.start);
        };

        self.set(mv.start, Square::Empty);
        self.set(mv.end, mv.piece_moved);
        self.move_log.push(mv);
        self.active_color = self.active_color.opposite();

        if piece.kind == PieceType::King {
            self.set_king_location(piece.color, mv.end);
        }

        // Auto-queen
        if mv.is_pawn_promotion {
            self.set(mv.end, Square::Occupied(Piece::new(piece.color, PieceType::Queen)));
        }

        if mv.is_en_passant_move {
            self.set(ChessField::new(mv.start.row, mv.end.col), Square::Empty);
        }

        self.en_passant_possible = if piece.kind == PieceType::Pawn && mv.start.row.abs_diff(mv.end.row) == 2 {
            Some(ChessField::new((mv.start.row + mv.end.row) / 2, mv.start.col))
        } else {
            None
        };
        self.en_passant_log.push(self.en_passant_possible);

        if mv.is_castle_move {
            let (rook_from, rook_to) = castle_rook_fields(&mv);
            self.set(rook_to, self.square(rook_from));
            self.set(rook_from, Square::Empty);
        }

        self.update_castle_rights(&mv, piece);
        self.castle_rights_log.push(self.current_castling_rights);

        self.debug_assert_kings();
    }

    /// Takes back the last move. Does nothing on an empty history.
    pub fn undo_move(&mut self) {
        let Some(mv) = self.move_log.pop() else {
            return;
        };

        self.set(mv.start, mv.piece_moved);
        self.set(mv.end, mv.piece_captured);
        self.active_color = self.active_color.opposite();

        if let Square::Occupied(Piece { color, kind: PieceType::King }) = mv.piece_moved {
            self.set_king_location(color, mv.start);
        }

        if mv.is_en_passant_move {
            self.set(mv.end, Square::Empty);
            self.set(ChessField::new(mv.start.row, mv.end.col), mv.piece_captured);
        }

        self.en_passant_log.pop();
        self.en_passant_possible = self.en_passant_log.last().copied().flatten();

        self.castle_rights_log.pop();
        if let Some(rights) = self.castle_rights_log.last() {
            self.current_castling_rights = *rights;
        }

        if mv.is_castle_move {
            let (rook_from, rook_to) = castle_rook_fields(&mv);
            self.set(rook_from, self.square(rook_to));
            self.set(rook_to, Square::Empty);
        }

        self.debug_assert_kings();
    }

    fn set_king_location(&mut self, color: Color, field: ChessField) {
        match color {
            Color::White => self.white_king_location = field,
            Color::Black => self.black_king_location = field,
        }
    }

    fn update_castle_rights(&mut self, mv: &Move, piece: Piece) {
        match piece.kind {
            PieceType::King => self.current_castling_rights.clear(piece.color),
            PieceType::Rook => self.current_castling_rights.clear_rook_home(piece.color, mv.start),
            _ => {}
        }
        // capture of the rooks
        if let Square::Occupied(Piece { color, kind: PieceType::Rook }) = mv.piece_captured {
            self.current_castling_rights.clear_rook_home(color, mv.end);
        }
    }

    /// Legal moves for the side to move; also refreshes the mate flags.
    pub fn get_valid_moves(&mut self) -> Vec<Move> {
        let temp_en_passant_possible = self.en_passant_possible;
        let temp_castle_rights = self.current_castling_rights;

        let mover = self.active_color;
        let mut moves = self.get_all_possible_moves();
        self.get_castle_moves(self.king_location(mover), &mut moves);

        moves.retain(|&mv| {
            self.make_move(mv);
            let leaves_king_in_check = self.is_square_attacked_by(self.king_location(mover), mover.opposite());
            self.undo_move();
            !leaves_king_in_check
        });

        if moves.is_empty() {
            let in_check = self.in_check();
            self.check_mate = in_check;
            self.stale_mate = !in_check;
        } else {
            self.check_mate = false;
            self.stale_mate = false;
        }

        self.en_passant_possible = temp_en_passant_possible;
        self.current_castling_rights = temp_castle_rights;
        moves
    }

    pub fn in_check(&self) -> bool {
        let king = self.king_location(self.active_color);
        self.square_under_attack(king.row, king.col)
    }

    /// Whether the opponent of the side to move attacks `(row, col)`.
    ///
    /// This is an attack test, not "some opponent move lands there": a square
    /// only reachable by a pawn push is not attacked, and an empty square
    /// diagonally in front of an opponent pawn is.
    pub fn square_under_attack(&self, row: u8, col: u8) -> bool {
        self.is_square_attacked_by(ChessField::new(row, col), self.active_color.opposite())
    }

    /// Whether `attacker` could land on `field` if it were its turn.
    ///
    /// Reuses pseudo-legal generation for every piece but pawns: a pawn push
    /// never attacks, and a pawn covers its diagonals even when they are empty,
    /// which matters for the squares a castling king crosses.
    pub fn is_square_attacked_by(&self, field: ChessField, attacker: Color) -> bool {
        for dc in [-1, 1] {
            if let Some(from) = field.offset(-attacker.forward(), dc) {
                if self.square(from).is(attacker, PieceType::Pawn) {
                    return true;
                }
            }
        }

        self.generate_pseudo_moves(attacker)
            .iter()
            .filter(|mv| !mv.piece_moved.is(attacker, PieceType::Pawn))
            .any(|mv| mv.end == field)
    }

    fn get_castle_moves(&self, king: ChessField, moves: &mut Vec<Move>) {
        let color = self.active_color;
        if king != ChessField::new(color.back_row(), 4) || self.square_under_attack(king.row, king.col) {
            return;
        }
        let rights = self.current_castling_rights;
        if rights.king_side(color) {
            self.get_king_side_castle_moves(king, color, moves);
        }
        if rights.queen_side(color) {
            self.get_queen_side_castle_moves(king, color, moves);
        }
    }

    fn get_king_side_castle_moves(&self, king: ChessField, color: Color, moves: &mut Vec<Move>) {
        let row = king.row;
        if !self.board[row as usize][7].is(color, PieceType::Rook) {
            return;
        }
        let path = [ChessField::new(row, king.col + 1), ChessField::new(row, king.col + 2)];
        if path.iter().all(|&f| self.square(f).is_empty())
            && path.iter().all(|&f| !self.square_under_attack(f.row, f.col))
        {
            moves.push(Move::castle(king, path[1], &self.board));
        }
    }

    fn get_queen_side_castle_moves(&self, king: ChessField, color: Color, moves: &mut Vec<Move>) {
        let row = king.row;
        if !self.board[row as usize][0].is(color, PieceType::Rook) {
            return;
        }
        let between = [
            ChessField::new(row, king.col - 1),
            ChessField::new(row, king.col - 2),
            ChessField::new(row, king.col - 3),
        ];
        // the b-file square only has to be empty
        if between.iter().all(|&f| self.square(f).is_empty())
            && between[..2].iter().all(|&f| !self.square_under_attack(f.row, f.col))
        {
            moves.push(Move::castle(king, between[1], &self.board));
        }
    }

    fn debug_assert_kings(&self) {
        debug_assert!(
            self.square(self.white_king_location).is(Color::White, PieceType::King),
            "white king cache out of sync at {}",
            self.white_king_location
        );
        debug_assert!(
            self.square(self.black_king_location).is(Color::Black, PieceType::King),
            "black king cache out of sync at {}",
            self.black_king_location
        );
    }

    pub fn render_to_string(&self) -> String {
        let mut board_representation = String::new();
        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");
        board_representation.push_str("  ┌───┬───┬───┬───┬───┬───┬───┬───┐\n");

        for row in 0..BOARD_SIZE {
            let rank = BOARD_SIZE - row;
            board_representation.push_str(&format!("{} │", rank));
            for col in 0..BOARD_SIZE {
                let square = match self.board[row][col] {
                    Square::Empty => ' ',
                    Square::Occupied(piece) => piece.to_char(),
                };
                board_representation.push_str(&format!(" {} │", square));
            }
            board_representation.push_str(&format!(" {}\n", rank));

            if row < BOARD_SIZE - 1 {
                board_representation.push_str("  ├───┼───┼───┼───┼───┼───┼───┼───┤\n");
            }
        }

        board_representation.push_str("  └───┴───┴───┴───┴───┴───┴───┴───┘\n");
        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");

        board_representation
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Rook start and end field for a castle, keyed off the king's column delta.
fn castle_rook_fields(mv: &Move) -> (ChessField, ChessField) {
    let row = mv.end.row;
    if mv.end.col > mv.start.col {
        (ChessField::new(row, mv.end.col + 1), ChessField::new(row, mv.end.col - 1))
    } else {
        (ChessField::new(row, mv.end.col - 2), ChessField::new(row, mv.end.col + 1))
    }
}

fn find_king(board: &Board, color: Color) -> ChessField {
    let mut kings = (0..BOARD_SIZE)
        .flat_map(|row| (0..BOARD_SIZE).map(move |col| (row, col)))
        .filter(|&(row, col)| board[row][col].is(color, PieceType::King));
    match (kings.next(), kings.next()) {
        (Some((row, col)), None) => ChessField::new(row as u8, col as u8),
        _ => panic!("a position needs exactly one {} king", color),
    }
}
