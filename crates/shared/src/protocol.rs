//! Live session message envelopes
//!
//! Clients send one [`UserGameCommand`] per WebSocket text frame; the server
//! answers with [`ServerMessage`]s. Both travel as JSON:
//!
//! ```json
//! {"commandType":"MAKE_MOVE","authToken":"..","gameID":3,
//!  "move":{"start":{"row":2,"column":5},"end":{"row":4,"column":5}}}
//! {"serverMessageType":"NOTIFICATION","message":"alice made the following move: e2e4"}
//! ```

use chess_engine::{ChessGame, Move};
use serde::{Deserialize, Serialize};

/// Identifier of a game record
pub type GameId = i64;

/// Client → Server command kinds
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandType {
    Connect,
    MakeMove,
    Leave,
    Resign,
}

/// Client → Server envelope
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserGameCommand {
    pub command_type: CommandType,
    pub auth_token: String,
    #[serde(rename = "gameID")]
    pub game_id: GameId,
    /// Only present for `MAKE_MOVE`
    #[serde(rename = "move", default, skip_serializing_if = "Option::is_none")]
    pub mv: Option<Move>,
}

impl UserGameCommand {
    fn new(command_type: CommandType, auth_token: impl Into<String>, game_id: GameId) -> Self {
        Self {
            command_type,
            auth_token: auth_token.into(),
            game_id,
            mv: None,
        }
    }

    pub fn connect(auth_token: impl Into<String>, game_id: GameId) -> Self {
        Self::new(CommandType::Connect, auth_token, game_id)
    }

    pub fn make_move(auth_token: impl Into<String>, game_id: GameId, mv: Move) -> Self {
        Self {
            mv: Some(mv),
            ..Self::new(CommandType::MakeMove, auth_token, game_id)
        }
    }

    pub fn leave(auth_token: impl Into<String>, game_id: GameId) -> Self {
        Self::new(CommandType::Leave, auth_token, game_id)
    }

    pub fn resign(auth_token: impl Into<String>, game_id: GameId) -> Self {
        Self::new(CommandType::Resign, auth_token, game_id)
    }
}

/// Server → Client envelope
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "serverMessageType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// Full current game state
    LoadGame { game: ChessGame },
    /// Narrative text for humans
    Notification { message: String },
    /// A command failed; sent only to its initiator
    Error {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

impl ServerMessage {
    pub fn load_game(game: ChessGame) -> Self {
        ServerMessage::LoadGame { game }
    }

    pub fn notification(message: impl Into<String>) -> Self {
        ServerMessage::Notification {
            message: message.into(),
        }
    }

    pub fn error(error_message: impl Into<String>) -> Self {
        ServerMessage::Error {
            error_message: error_message.into(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
