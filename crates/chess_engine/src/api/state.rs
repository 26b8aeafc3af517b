//! Game state queries
//!
//! Check, checkmate and stalemate detection for either side.

use super::game::ChessGame;
use crate::move_gen::is_square_attacked;
use crate::types::{Position, Side};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Situation of one side after a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    InProgress,
    Check,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    /// Checkmate and stalemate both end the game
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

impl ChessGame {
    /// Check if `side`'s king is attacked by any enemy piece
    ///
    /// Returns `false` when the side has no king on the board.
    pub fn in_check(&self, side: Side) -> bool {
        match self.kings.get(side) {
            Some(king) => is_square_attacked(&self.board, king, side.opponent()),
            None => false,
        }
    }

    /// Check if any piece of `side` has at least one legal move
    pub fn has_any_legal_move(&mut self, side: Side) -> bool {
        let own: Vec<Position> = self
            .board
            .pieces()
            .filter(|(_, piece)| piece.side == side)
            .map(|(position, _)| position)
            .collect();

        own.into_iter().any(|position| {
            self.legal_moves(position)
                .is_some_and(|moves| !moves.is_empty())
        })
    }

    pub fn is_checkmate(&mut self, side: Side) -> bool {
        self.in_check(side) && !self.has_any_legal_move(side)
    }

    pub fn is_stalemate(&mut self, side: Side) -> bool {
        !self.in_check(side) && !self.has_any_legal_move(side)
    }

    /// Classify `side`'s situation in one pass
    pub fn status(&mut self, side: Side) -> GameStatus {
        let in_check = self.in_check(side);
        let can_move = self.has_any_legal_move(side);

        let status = match (in_check, can_move) {
            (true, false) => GameStatus::Checkmate,
            (false, false) => GameStatus::Stalemate,
            (true, true) => GameStatus::Check,
            (false, true) => GameStatus::InProgress,
        };
        if status.is_terminal() {
            debug!(%side, ?status, "game reached a terminal position");
        }
        status
    }
}
