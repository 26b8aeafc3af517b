//! Error types for chess engine
//!
//! Every variant is a reason a submitted move was refused. The display strings
//! are user-facing: the session layer forwards them verbatim to the caller.

use crate::types::{Move, Position, Side};
use thiserror::Error;

/// Errors that can occur in the chess engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessEngineError {
    /// No piece at the move's start square
    #[error("No piece at {position} to move")]
    NoPieceAtStart { position: Position },

    /// Piece belongs to the side that is not on move
    #[error("It is {expected}'s turn, not {found}'s")]
    WrongTurn { expected: Side, found: Side },

    /// Move is not in the legal set for its start square
    #[error("Illegal move: {mv}")]
    IllegalMove { mv: Move },

    /// Game already reached a terminal state
    #[error("The game is already over")]
    GameOver,

    /// Text board layout could not be parsed
    #[error("Malformed board text: {reason}")]
    MalformedBoard { reason: String },
}

/// Result type alias for chess engine operations
pub type ChessEngineResult<T> = Result<T, ChessEngineError>;
