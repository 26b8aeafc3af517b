//! Session command failures
//!
//! Every variant ends up as the `errorMessage` of an `ERROR` frame sent to the
//! command's initiator, so the display strings are written for players.

use crate::store::StoreError;
use chess_engine::ChessEngineError;
use shared::GameId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Error: unauthorized")]
    Unauthorized,

    #[error("Error: game {game_id} does not exist")]
    InvalidGame { game_id: GameId },

    #[error("Error: it is not your turn")]
    NotYourTurn,

    /// Engine refused the move; carries the engine's reason
    #[error("Error: {0}")]
    IllegalMove(#[from] ChessEngineError),

    #[error("Error: the game is over, no more moves can be made")]
    GameOver,

    #[error("Error: the game is already over")]
    GameAlreadyOver,

    #[error("Error: only players can resign")]
    MustBePlayer,

    #[error("Error: MAKE_MOVE requires a move")]
    MissingMove,

    #[error("Error: malformed command: {0}")]
    MalformedCommand(String),

    #[error("Error: storage failure: {0}")]
    Store(#[from] StoreError),
}

pub type SessionResult<T> = Result<T, SessionError>;
