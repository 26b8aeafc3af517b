//! Move execution and validation
//!
//! Legal moves are the pseudo-legal moves that survive a trial: each candidate
//! is applied to the board, the mover's king is tested for check, and the
//! trial is undone.

use super::game::ChessGame;
use crate::error::{ChessEngineError, ChessEngineResult};
use crate::move_gen::pseudo_legal_moves;
use crate::types::{Move, Position};
use tracing::trace;

impl ChessGame {
    /// Legal moves for the piece on `position`, `None` if the square is empty
    ///
    /// Turn order is not considered: this answers for whichever side owns the
    /// piece.
    pub fn legal_moves(&mut self, position: Position) -> Option<Vec<Move>> {
        if !position.is_on_board() {
            return None;
        }
        let mover = self.board.at(position)?;
        let candidates = pseudo_legal_moves(&self.board, mover, position);

        let legal = candidates
            .into_iter()
            .filter(|mv| !self.with_trial(mv, mover, |trial| trial.in_check(mover.side)))
            .collect();
        Some(legal)
    }

    /// Check if `mv` is in the legal set for its start square
    pub fn is_legal_move(&mut self, mv: &Move) -> bool {
        self.legal_moves(mv.start)
            .is_some_and(|legal| legal.contains(mv))
    }

    /// Execute a move for the side on turn and pass the turn
    ///
    /// # Errors
    ///
    /// - [`ChessEngineError::GameOver`] once the game has been marked over
    /// - [`ChessEngineError::IllegalMove`] if either square lies off the board
    /// - [`ChessEngineError::NoPieceAtStart`] if the start square is empty
    /// - [`ChessEngineError::WrongTurn`] if the piece belongs to the side not on move
    /// - [`ChessEngineError::IllegalMove`] if the move is not legal for that piece
    ///
    /// Detecting checkmate or stalemate afterwards, and setting the over flag,
    /// is left to the caller.
    pub fn apply_move(&mut self, mv: &Move) -> ChessEngineResult<()> {
        if self.over {
            return Err(ChessEngineError::GameOver);
        }
        if !mv.start.is_on_board() || !mv.end.is_on_board() {
            return Err(ChessEngineError::IllegalMove { mv: *mv });
        }
        let mover = self
            .board
            .at(mv.start)
            .ok_or(ChessEngineError::NoPieceAtStart { position: mv.start })?;
        if mover.side != self.turn {
            return Err(ChessEngineError::WrongTurn {
                expected: self.turn,
                found: mover.side,
            });
        }
        if !self.is_legal_move(mv) {
            return Err(ChessEngineError::IllegalMove { mv: *mv });
        }

        let captured = self.board.apply(mv, mover);
        self.kings.track(mv, mover, captured);
        self.turn = self.turn.opponent();
        trace!(%mv, ?captured, turn = %self.turn, "move applied");
        Ok(())
    }
}
