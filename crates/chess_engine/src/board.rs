//! Board representation and reversible move application
//!
//! Provides the 8x8 grid used throughout the engine:
//! - Piece placement and lookup
//! - Trial moves (`apply`) and their exact inverse (`revert`)
//! - Standard starting arrangement
//! - Text rendering and parsing of the `|r|n|b|...|` layout
//!
//! No bounds checking happens here. Callers hand in positions with both
//! coordinates in 1..=8; the move generator guarantees this for everything it
//! produces.

use crate::constants::BACK_RANK;
use crate::error::{ChessEngineError, ChessEngineResult};
use crate::types::{Move, Piece, PieceKind, Position, Side, MAX_COORD, MIN_COORD};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 8x8 grid of optional pieces. Row index 0 is rank 1.
///
/// Two boards are equal iff all 64 squares hold equal (or absent) pieces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

#[inline]
fn index(position: Position) -> (usize, usize) {
    ((position.row - 1) as usize, (position.column - 1) as usize)
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a board in the standard starting arrangement
    pub fn standard() -> Self {
        let mut board = Self::new();
        board.reset_to_standard_start();
        board
    }

    /// Put a piece on a square, replacing whatever was there
    pub fn place(&mut self, position: Position, piece: Piece) {
        let (row, column) = index(position);
        self.squares[row][column] = Some(piece);
    }

    /// Clear a square, returning its previous occupant
    pub fn remove(&mut self, position: Position) -> Option<Piece> {
        let (row, column) = index(position);
        self.squares[row][column].take()
    }

    /// Get the piece on a square
    #[inline]
    pub fn at(&self, position: Position) -> Option<Piece> {
        let (row, column) = index(position);
        self.squares[row][column]
    }

    /// Check if a square is empty
    #[inline]
    pub fn is_empty(&self, position: Position) -> bool {
        self.at(position).is_none()
    }

    /// Move `mover` from `mv.start` to `mv.end`, returning the captured piece
    ///
    /// When the move carries a promotion, the piece written to the end square
    /// takes the promotion kind and keeps the mover's side.
    pub fn apply(&mut self, mv: &Move, mover: Piece) -> Option<Piece> {
        let placed = match mv.promotion {
            Some(kind) => Piece::new(mover.side, kind),
            None => mover,
        };
        let (start_row, start_column) = index(mv.start);
        let (end_row, end_column) = index(mv.end);
        self.squares[start_row][start_column] = None;
        self.squares[end_row][end_column].replace(placed)
    }

    /// Undo an [`apply`](Self::apply) given the same move, mover and captured piece
    pub fn revert(&mut self, mv: &Move, mover: Piece, captured: Option<Piece>) {
        let (start_row, start_column) = index(mv.start);
        let (end_row, end_column) = index(mv.end);
        self.squares[end_row][end_column] = captured;
        self.squares[start_row][start_column] = Some(mover);
    }

    /// Clear the board and set up the standard starting arrangement
    pub fn reset_to_standard_start(&mut self) {
        self.squares = Default::default();
        for side in [Side::White, Side::Black] {
            for (file, kind) in BACK_RANK.iter().enumerate() {
                let column = file as i8 + 1;
                self.place(Position::new(side.back_row(), column), Piece::new(side, *kind));
                self.place(
                    Position::new(side.pawn_start_row(), column),
                    Piece::new(side, PieceKind::Pawn),
                );
            }
        }
    }

    /// Iterate over occupied squares, rank 1 first
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |position| self.at(position).map(|piece| (position, piece)))
    }

    /// Locate the first king of `side`, scanning the whole board
    pub fn find_king(&self, side: Side) -> Option<Position> {
        self.pieces()
            .find(|(_, piece)| piece.side == side && piece.kind == PieceKind::King)
            .map(|(position, _)| position)
    }

    /// Parse the layout produced by `Display`: eight `|x|x|..|` lines, rank 8 first
    ///
    /// Blank lines are ignored and a space marks an empty square.
    pub fn from_text(text: &str) -> ChessEngineResult<Board> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() != 8 {
            return Err(ChessEngineError::MalformedBoard {
                reason: format!("expected 8 ranks, found {}", lines.len()),
            });
        }

        let mut board = Board::new();
        for (offset, line) in lines.iter().enumerate() {
            let row = MAX_COORD - offset as i8;
            let cells: Vec<&str> = line
                .strip_prefix('|')
                .and_then(|rest| rest.strip_suffix('|'))
                .map(|inner| inner.split('|').collect())
                .unwrap_or_default();
            if cells.len() != 8 {
                return Err(ChessEngineError::MalformedBoard {
                    reason: format!("rank {} does not have 8 squares", row),
                });
            }
            for (file, cell) in cells.iter().enumerate() {
                let position = Position::new(row, file as i8 + MIN_COORD);
                match cell.chars().next() {
                    None | Some(' ') => {}
                    Some(symbol) => {
                        let piece = Piece::from_symbol(symbol).ok_or_else(|| {
                            ChessEngineError::MalformedBoard {
                                reason: format!("unknown piece '{}' at {}", symbol, position),
                            }
                        })?;
                        board.place(position, piece);
                    }
                }
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (MIN_COORD..=MAX_COORD).rev() {
            f.write_str("|")?;
            for column in MIN_COORD..=MAX_COORD {
                let symbol = self
                    .at(Position::new(row, column))
                    .map_or(' ', Piece::symbol);
                write!(f, "{}|", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
