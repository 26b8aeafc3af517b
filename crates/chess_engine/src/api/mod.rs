//! Public API for the chess engine
//!
//! [`ChessGame`] owns a board, the side to move and the game-over flag.
//!
//! ## Module Organization
//!
//! - `game` - Game lifecycle, king tracking, serialization
//! - `moves` - Legal move filtering and move execution
//! - `state` - Check, checkmate and stalemate queries

mod game;
mod moves;
mod state;

pub use game::ChessGame;
pub use state::GameStatus;
