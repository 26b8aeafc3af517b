//! # Core Rules Types
//!
//! Value types shared by the board, the move generator and the game engine.
//!
//! ## Coordinates
//!
//! A [`Position`] is a `(row, column)` pair where both coordinates run from 1 to 8.
//! Row 1 is White's back rank, row 8 is Black's. Column 1 is the a-file, so
//! `Position::new(2, 5)` is `e2`.
//!
//! Coordinates are stored as `i8` so that direction offsets can be added without
//! casting; [`Position::offset`] is the only way the move generator walks the
//! board, and it refuses to produce anything outside 1..=8.
//!
//! ## Sides
//!
//! [`Side::White`] is the first side to move and [`Side::Black`] the second. Both
//! serialize in upper case (`"WHITE"`, `"BLACK"`) so that they read the same on
//! the wire as in notification text.
//!
//! ## Moves
//!
//! A [`Move`] is compared by value. The promotion kind is part of the identity:
//! `e7e8=Q` and `e7e8=N` are different moves, and `e7e8` without a promotion is
//! not legal at all.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest coordinate value on either axis
pub const MIN_COORD: i8 = 1;
/// Highest coordinate value on either axis
pub const MAX_COORD: i8 = 8;

/// A square on the board, `(row, column)` with both in 1..=8
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i8,
    pub column: i8,
}

impl Position {
    pub const fn new(row: i8, column: i8) -> Self {
        Self { row, column }
    }

    /// Check if both coordinates lie within 1..=8
    #[inline]
    pub fn is_on_board(&self) -> bool {
        (MIN_COORD..=MAX_COORD).contains(&self.row)
            && (MIN_COORD..=MAX_COORD).contains(&self.column)
    }

    /// Shift by a row/column delta, `None` if the result leaves the board
    #[inline]
    pub fn offset(self, d_row: i8, d_column: i8) -> Option<Position> {
        let next = Position::new(self.row + d_row, self.column + d_column);
        next.is_on_board().then_some(next)
    }

    /// Iterate over all 64 squares, rank 1 first
    pub fn all() -> impl Iterator<Item = Position> {
        (MIN_COORD..=MAX_COORD)
            .flat_map(|row| (MIN_COORD..=MAX_COORD).map(move |column| Position::new(row, column)))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_on_board() {
            let file = (b'a' + (self.column - 1) as u8) as char;
            write!(f, "{}{}", file, self.row)
        } else {
            write!(f, "({}, {})", self.row, self.column)
        }
    }
}

/// One of the two competing players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// First to move
    White,
    /// Second to move
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Row delta of a pawn advance
    pub fn pawn_direction(self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    /// Row the side's pawns start on (eligible for a double advance)
    pub fn pawn_start_row(self) -> i8 {
        match self {
            Side::White => 2,
            Side::Black => 7,
        }
    }

    /// Far rank, where the side's pawns promote
    pub fn promotion_row(self) -> i8 {
        match self {
            Side::White => MAX_COORD,
            Side::Black => MIN_COORD,
        }
    }

    /// Row holding the side's major pieces at the start
    pub fn back_row(self) -> i8 {
        match self {
            Side::White => MIN_COORD,
            Side::Black => MAX_COORD,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => f.write_str("WHITE"),
            Side::Black => f.write_str("BLACK"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PieceKind {
    King,
    Queen,
    Bishop,
    Knight,
    Rook,
    Pawn,
}

impl PieceKind {
    /// Upper-case letter used in text boards and move notation
    pub fn symbol(self) -> char {
        match self {
            PieceKind::King => 'K',
            PieceKind::Queen => 'Q',
            PieceKind::Bishop => 'B',
            PieceKind::Knight => 'N',
            PieceKind::Rook => 'R',
            PieceKind::Pawn => 'P',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<PieceKind> {
        match symbol.to_ascii_uppercase() {
            'K' => Some(PieceKind::King),
            'Q' => Some(PieceKind::Queen),
            'B' => Some(PieceKind::Bishop),
            'N' => Some(PieceKind::Knight),
            'R' => Some(PieceKind::Rook),
            'P' => Some(PieceKind::Pawn),
            _ => None,
        }
    }
}

/// A piece on the board: which side owns it and what it is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub side: Side,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(side: Side, kind: PieceKind) -> Self {
        Self { side, kind }
    }

    /// Text-board symbol: upper case for White, lower case for Black
    pub fn symbol(self) -> char {
        match self.side {
            Side::White => self.kind.symbol(),
            Side::Black => self.kind.symbol().to_ascii_lowercase(),
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Piece> {
        let kind = PieceKind::from_symbol(symbol)?;
        let side = if symbol.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };
        Some(Piece::new(side, kind))
    }
}

/// A move from `start` to `end`, optionally promoting the moved pawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub start: Position,
    pub end: Position,
    #[serde(default)]
    pub promotion: Option<PieceKind>,
}

impl Move {
    pub const fn new(start: Position, end: Position) -> Self {
        Self {
            start,
            end,
            promotion: None,
        }
    }

    pub const fn with_promotion(start: Position, end: Position, kind: PieceKind) -> Self {
        Self {
            start,
            end,
            promotion: Some(kind),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.start, self.end)?;
        if let Some(kind) = self.promotion {
            write!(f, "={}", kind.symbol())?;
        }
        Ok(())
    }
}
