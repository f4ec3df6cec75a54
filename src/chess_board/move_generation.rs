use super::{ChessField, Color, GameState, Move, PieceType, Square};

const KNIGHT_MOVES: [(i8, i8); 8] = [(-2, -1), (-1, -2), (1, -2), (2, -1), (2, 1), (1, 2), (-1, 2), (-2, 1)];
const KING_MOVES: [(i8, i8); 8] = [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

// Pseudo-legal generation. Nothing in here asks whether the mover's own king
// ends up in check; `get_valid_moves` filters that by make/unmake.
impl GameState {
    /// All pseudo-legal moves for the side to move, castling excluded.
    pub fn get_all_possible_moves(&self) -> Vec<Move> {
        self.generate_pseudo_moves(self.active_color())
    }

    /// All pseudo-legal moves `color` could make if it were its turn.
    pub fn generate_pseudo_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        for row in 0..8 {
            for col in 0..8 {
                if self.board[row][col].color() == Some(color) {
                    self.generate_piece_moves(ChessField::new(row as u8, col as u8), &mut moves);
                }
            }
        }
        moves
    }

    /// Pseudo-legal moves of whatever piece stands on `(row, col)`, for the
    /// color of that piece.
    pub fn generate_pseudo_moves_from_position(&self, row: u8, col: u8) -> Vec<Move> {
        let mut moves = Vec::new();
        self.generate_piece_moves(ChessField::new(row, col), &mut moves);
        moves
    }

    fn generate_piece_moves(&self, from: ChessField, moves: &mut Vec<Move>) {
        if let Square::Occupied(piece) = self.square(from) {
            match piece.kind {
                PieceType::Pawn => self.generate_pawn_moves(from, piece.color, moves),
                PieceType::Knight => self.generate_moves_from_directions(from, piece.color, &KNIGHT_MOVES, moves),
                PieceType::Bishop => self.generate_sliding_moves(from, piece.color, &BISHOP_DIRECTIONS, moves),
                PieceType::Rook => self.generate_sliding_moves(from, piece.color, &ROOK_DIRECTIONS, moves),
                PieceType::Queen => {
                    self.generate_sliding_moves(from, piece.color, &ROOK_DIRECTIONS, moves);
                    self.generate_sliding_moves(from, piece.color, &BISHOP_DIRECTIONS, moves);
                }
                PieceType::King => self.generate_moves_from_directions(from, piece.color, &KING_MOVES, moves),
            }
        }
    }

    fn generate_pawn_moves(&self, from: ChessField, color: Color, moves: &mut Vec<Move>) {
        let forward = color.forward();

        if let Some(one_step) = from.offset(forward, 0) {
            if self.square(one_step).is_empty() {
                moves.push(Move::new(from, one_step, &self.board));

                // Double move from start position
                if from.row == color.pawn_start_row() {
                    if let Some(two_step) = from.offset(2 * forward, 0) {
                        if self.square(two_step).is_empty() {
                            moves.push(Move::new(from, two_step, &self.board));
                        }
                    }
                }
            }
        }

        for dc in [-1, 1] {
            let Some(target) = from.offset(forward, dc) else {
                continue;
            };
            match self.square(target) {
                Square::Occupied(other) if other.color != color => moves.push(Move::new(from, target, &self.board)),
                Square::Empty if self.is_en_passant_target_for(target, color) => {
                    moves.push(Move::en_passant(from, target, &self.board))
                }
                _ => {}
            }
        }
    }

    // The target always sits behind a pawn of the other color, on the third
    // rank from that pawn's side.
    fn is_en_passant_target_for(&self, target: ChessField, color: Color) -> bool {
        let capture_row = (color.opposite().pawn_start_row() as i8 + color.opposite().forward()) as u8;
        self.en_passant_possible == Some(target) && target.row == capture_row
    }

    /// Walk each direction until the board edge, one capture, or an own piece.
    fn generate_sliding_moves(
        &self,
        from: ChessField,
        color: Color,
        directions: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(dr, dc) in directions {
            let mut current = from;
            while let Some(next) = current.offset(dr, dc) {
                match self.square(next) {
                    Square::Empty => moves.push(Move::new(from, next, &self.board)),
                    Square::Occupied(p) => {
                        if p.color != color {
                            moves.push(Move::new(from, next, &self.board));
                        }
                        break; // Block sliding
                    }
                }
                current = next;
            }
        }
    }

    /// Knight and king: fixed offsets, own pieces skipped.
    fn generate_moves_from_directions(
        &self,
        from: ChessField,
        color: Color,
        directions: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(dr, dc) in directions {
            if let Some(target) = from.offset(dr, dc) {
                if self.square(target).color() != Some(color) {
                    moves.push(Move::new(from, target, &self.board));
                }
            }
        }
    }
}
