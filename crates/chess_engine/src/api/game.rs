//! Game lifecycle management
//!
//! Construction, board installation and the cached king squares.
//!
//! `inCheck` runs once per candidate move while filtering legal moves, so both
//! king squares are tracked incrementally instead of scanning all 64 squares
//! each time. The cache is rebuilt by a full scan only when a board is
//! installed wholesale: construction, [`ChessGame::set_board`] and
//! deserialization of a stored game.

use crate::board::Board;
use crate::types::{Move, Piece, PieceKind, Position, Side};
use serde::{Deserialize, Serialize};

/// Cached location of each side's king
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct KingSquares {
    white: Option<Position>,
    black: Option<Position>,
}

impl KingSquares {
    pub(crate) fn locate(board: &Board) -> Self {
        Self {
            white: board.find_king(Side::White),
            black: board.find_king(Side::Black),
        }
    }

    pub(crate) fn get(&self, side: Side) -> Option<Position> {
        match side {
            Side::White => self.white,
            Side::Black => self.black,
        }
    }

    fn set(&mut self, side: Side, square: Option<Position>) {
        match side {
            Side::White => self.white = square,
            Side::Black => self.black = square,
        }
    }

    /// Account for `mover` having gone from `mv.start` to `mv.end`, capturing `captured`
    pub(crate) fn track(&mut self, mv: &Move, mover: Piece, captured: Option<Piece>) {
        if let Some(victim) = captured.filter(|piece| piece.kind == PieceKind::King) {
            self.set(victim.side, None);
        }
        if mv.promotion.unwrap_or(mover.kind) == PieceKind::King {
            self.set(mover.side, Some(mv.end));
        } else if mover.kind == PieceKind::King {
            self.set(mover.side, None);
        }
    }
}

/// A chess game: board, side to move and the terminal flag
///
/// Serializes as `{"board": .., "turn": "WHITE", "over": false}`; the king
/// cache is not part of the wire form and is rebuilt on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "GameSnapshot", into = "GameSnapshot")]
pub struct ChessGame {
    pub(crate) board: Board,
    pub(crate) turn: Side,
    pub(crate) over: bool,
    pub(crate) kings: KingSquares,
}

#[derive(Serialize, Deserialize)]
struct GameSnapshot {
    board: Board,
    turn: Side,
    #[serde(default)]
    over: bool,
}

impl From<GameSnapshot> for ChessGame {
    fn from(snapshot: GameSnapshot) -> Self {
        let mut game = ChessGame::with_board(snapshot.board, snapshot.turn);
        game.over = snapshot.over;
        game
    }
}

impl From<ChessGame> for GameSnapshot {
    fn from(game: ChessGame) -> Self {
        Self {
            board: game.board,
            turn: game.turn,
            over: game.over,
        }
    }
}

impl Default for ChessGame {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessGame {
    /// Create a new game in the standard starting position, White to move
    pub fn new() -> Self {
        Self::with_board(Board::standard(), Side::White)
    }

    /// Create a game from an arbitrary position
    pub fn with_board(board: Board, turn: Side) -> Self {
        let kings = KingSquares::locate(&board);
        Self {
            board,
            turn,
            over: false,
            kings,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Install a new board wholesale, rescanning for kings
    pub fn set_board(&mut self, board: Board) {
        self.kings = KingSquares::locate(&board);
        self.board = board;
    }

    /// Side whose turn it is
    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn set_turn(&mut self, side: Side) {
        self.turn = side;
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Mark the game finished (checkmate, stalemate or resignation)
    pub fn set_over(&mut self, over: bool) {
        self.over = over;
    }

    /// Cached king square for `side`
    pub fn king_square(&self, side: Side) -> Option<Position> {
        self.kings.get(side)
    }

    /// Run `check` with `mv` provisionally applied, then undo it
    ///
    /// Board revert and king-cache restore always happen together, whatever
    /// the check returns.
    pub(crate) fn with_trial<R>(
        &mut self,
        mv: &Move,
        mover: Piece,
        check: impl FnOnce(&ChessGame) -> R,
    ) -> R {
        let saved_kings = self.kings;
        let captured = self.board.apply(mv, mover);
        self.kings.track(mv, mover, captured);

        let verdict = check(self);

        self.board.revert(mv, mover, captured);
        self.kings = saved_kings;
        verdict
    }
}
