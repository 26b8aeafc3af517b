//! Rules engine for live two-player chess sessions
//!
//! Pure game logic with no networking or storage coupling:
//!
//! - `types` - positions, sides, pieces and moves
//! - `board` - the 8x8 grid with reversible trial moves
//! - `move_gen` - pseudo-legal destinations per piece kind
//! - `api` - the [`ChessGame`] state machine (legality, check, mate, stalemate)
//!
//! The rule set is deliberately reduced: no castling, no en passant, no
//! repetition or fifty-move draws.

pub mod api;
pub mod board;
pub mod constants;
pub mod error;
pub mod move_gen;
pub mod types;

#[cfg(test)]
mod tests;

pub use api::{ChessGame, GameStatus};
pub use board::Board;
pub use error::{ChessEngineError, ChessEngineResult};
pub use types::{Move, Piece, PieceKind, Position, Side};
