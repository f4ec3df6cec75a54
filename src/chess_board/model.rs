use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::ChessError;

pub const BOARD_SIZE: usize = 8;

/// Row-major 8x8 grid, row 0 is rank 8 (black's back rank), col 0 is file a.
pub type Board = [[Square; BOARD_SIZE]; BOARD_SIZE];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a single pawn step.
    pub fn forward(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    pub fn back_row(&self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    pub fn pawn_start_row(&self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    pub fn promotion_row(&self) -> u8 {
        self.opposite().back_row()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "P"),
            PieceType::Knight => write!(f, "N"),
            PieceType::Bishop => write!(f, "B"),
            PieceType::Rook => write!(f, "R"),
            PieceType::Queen => write!(f, "Q"),
            PieceType::King => write!(f, "K"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceType) -> Self {
        Self { color, kind }
    }

    /// Uppercase for white, lowercase for black.
    pub fn to_char(&self) -> char {
        let c = match self.kind {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceType::Pawn,
            'n' => PieceType::Knight,
            'b' => PieceType::Bishop,
            'r' => PieceType::Rook,
            'q' => PieceType::Queen,
            'k' => PieceType::King,
            _ => return None,
        };
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Self { color, kind })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Square {
    Occupied(Piece),
    Empty,
}

impl Square {
    pub fn piece(&self) -> Option<Piece> {
        match self {
            Square::Occupied(piece) => Some(*piece),
            Square::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Square::Empty)
    }

    pub fn color(&self) -> Option<Color> {
        self.piece().map(|p| p.color)
    }

    pub fn is(&self, color: Color, kind: PieceType) -> bool {
        *self == Square::Occupied(Piece::new(color, kind))
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct ChessField {
    pub row: u8,
    pub col: u8,
}

impl ChessField {
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!((row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE);
        Self { row, col }
    }

    /// The field `(dr, dc)` away, or `None` when that leaves the board.
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (0..BOARD_SIZE as i8).contains(&row) && (0..BOARD_SIZE as i8).contains(&col) {
            Some(Self::new(row as u8, col as u8))
        } else {
            None
        }
    }

    pub fn from_algebraic(algebraic: &str) -> Result<Self, ChessError> {
        let mut chars = algebraic.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file @ 'a'..='h'), Some(rank @ '1'..='8'), None) => {
                let col = file as u8 - b'a';
                let row = BOARD_SIZE as u8 - (rank as u8 - b'0');
                Ok(Self::new(row, col))
            }
            _ => Err(ChessError::InvalidSquare(algebraic.to_string())),
        }
    }

    pub fn as_algebraic(&self) -> String {
        to_algebraic_square(self.row, self.col)
    }

    /// Maps a pointer position on a board drawn with `square_size` pixel
    /// squares (origin top-left, white at the bottom) to a field.
    pub fn from_pixel(x: f32, y: f32, square_size: f32) -> Option<Self> {
        if square_size <= 0.0 || x < 0.0 || y < 0.0 {
            return None;
        }
        let col = (x / square_size) as usize;
        let row = (y / square_size) as usize;
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self::new(row as u8, col as u8))
        } else {
            None
        }
    }
}

impl fmt::Display for ChessField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_algebraic())
    }
}

pub fn to_algebraic_square(row: u8, col: u8) -> String {
    let file = (b'a' + col) as char;
    let rank = BOARD_SIZE as u8 - row; // row 0 is rank 8
    format!("{}{}", file, rank)
}

/// One transition on the board. Built against the board *before* the move.
///
/// Equality and hashing only look at the start and end fields, so a move built
/// from two clicked squares matches the flagged move in the legal list. Use
/// [`Move::same_as`] to compare every field.
#[derive(Debug, Clone, Copy)]
pub struct Move {
    pub start: ChessField,
    pub end: ChessField,
    pub piece_moved: Square,
    pub piece_captured: Square,
    pub is_pawn_promotion: bool,
    pub is_en_passant_move: bool,
    pub is_castle_move: bool,
}

impl Move {
    pub fn new(start: ChessField, end: ChessField, board: &Board) -> Self {
        let piece_moved = board[start.row as usize][start.col as usize];
        let piece_captured = board[end.row as usize][end.col as usize];
        let is_pawn_promotion = match piece_moved {
            Square::Occupied(Piece { color, kind: PieceType::Pawn }) => end.row == color.promotion_row(),
            _ => false,
        };
        Self {
            start,
            end,
            piece_moved,
            piece_captured,
            is_pawn_promotion,
            is_en_passant_move: false,
            is_castle_move: false,
        }
    }

    /// En passant capture; the captured pawn is not on `end`, so it is synthesized.
    pub fn en_passant(start: ChessField, end: ChessField, board: &Board) -> Self {
        let mut mv = Self::new(start, end, board);
        mv.is_en_passant_move = true;
        let victim = match mv.piece_moved.color() {
            Some(Color::Black) => Color::White,
            _ => Color::Black,
        };
        mv.piece_captured = Square::Occupied(Piece::new(victim, PieceType::Pawn));
        mv
    }

    pub fn castle(start: ChessField, end: ChessField, board: &Board) -> Self {
        let mut mv = Self::new(start, end, board);
        mv.is_castle_move = true;
        mv
    }

    /// Parses coordinate notation such as `e2e4` against `board`.
    pub fn from_algebraic(algebraic: &str, board: &Board) -> Result<Self, ChessError> {
        let algebraic = algebraic.trim();
        if algebraic.len() != 4 || !algebraic.is_ascii() {
            return Err(ChessError::InvalidMove(algebraic.to_string()));
        }
        let start = ChessField::from_algebraic(&algebraic[0..2])?;
        let end = ChessField::from_algebraic(&algebraic[2..4])?;
        Ok(Self::new(start, end, board))
    }

    pub fn move_id(&self) -> u32 {
        self.start.row as u32 * 1000 + self.start.col as u32 * 100 + self.end.row as u32 * 10 + self.end.col as u32
    }

    pub fn get_chess_notation(&self) -> String {
        format!("{}{}", self.start.as_algebraic(), self.end.as_algebraic())
    }

    pub fn is_capture(&self) -> bool {
        !self.piece_captured.is_empty()
    }

    /// Strict comparison including pieces and special-move flags.
    pub fn same_as(&self, other: &Move) -> bool {
        self.start == other.start
            && self.end == other.end
            && self.piece_moved == other.piece_moved
            && self.piece_captured == other.piece_captured
            && self.is_pawn_promotion == other.is_pawn_promotion
            && self.is_en_passant_move == other.is_en_passant_move
            && self.is_castle_move == other.is_castle_move
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.move_id() == other.move_id()
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.move_id().hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get_chess_notation())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    pub white_king_side: bool,
    pub white_queen_side: bool,
    pub black_king_side: bool,
    pub black_queen_side: bool,
}

impl CastlingRights {
    pub const ALL: Self = Self {
        white_king_side: true,
        white_queen_side: true,
        black_king_side: true,
        black_queen_side: true,
    };

    pub const NONE: Self = Self {
        white_king_side: false,
        white_queen_side: false,
        black_king_side: false,
        black_queen_side: false,
    };

    pub fn king_side(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_king_side,
            Color::Black => self.black_king_side,
        }
    }

    pub fn queen_side(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queen_side,
            Color::Black => self.black_queen_side,
        }
    }

    pub fn clear(&mut self, color: Color) {
        match color {
            Color::White => {
                self.white_king_side = false;
                self.white_queen_side = false;
            }
            Color::Black => {
                self.black_king_side = false;
                self.black_queen_side = false;
            }
        }
    }

    /// Drops the right tied to the rook that starts on `field`, if any.
    pub fn clear_rook_home(&mut self, color: Color, field: ChessField) {
        if field.row != color.back_row() {
            return;
        }
        match (color, field.col) {
            (Color::White, 0) => self.white_queen_side = false,
            (Color::White, 7) => self.white_king_side = false,
            (Color::Black, 0) => self.black_queen_side = false,
            (Color::Black, 7) => self.black_king_side = false,
            _ => {}
        }
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::ALL
    }
}
