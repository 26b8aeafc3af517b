//! Wire protocol shared by the live session server and its clients

pub mod protocol;

pub use protocol::{CommandType, GameId, ServerMessage, UserGameCommand};
