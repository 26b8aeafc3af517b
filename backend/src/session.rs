//! Live session command handling
//!
//! Each inbound [`UserGameCommand`] is resolved against the auth and game
//! stores, run through the engine, persisted, and fanned out through the
//! [`ConnectionRegistry`]. A failing command never reaches anyone but its
//! initiator: the error is turned into an `ERROR` frame for the caller and
//! nothing is broadcast.
//!
//! Commands on one connection are handled in order by that connection's task.
//! Commands on different connections run concurrently; two `MAKE_MOVE`s on the
//! same game may both read the record before either writes it back, in which
//! case the later write wins.

use crate::error::{SessionError, SessionResult};
use crate::registry::ConnectionRegistry;
use crate::store::{AuthStore, GameRecord, GameStore, Stores};
use crate::transport::Transport;
use chess_engine::{GameStatus, Side};
use shared::{CommandType, GameId, ServerMessage, UserGameCommand};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct SessionHandler {
    registry: Arc<ConnectionRegistry>,
    auth: Arc<dyn AuthStore>,
    games: Arc<dyn GameStore>,
}

impl SessionHandler {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        auth: Arc<dyn AuthStore>,
        games: Arc<dyn GameStore>,
    ) -> Self {
        Self {
            registry,
            auth,
            games,
        }
    }

    /// Handler over `stores` with a fresh, empty registry
    pub fn from_stores(stores: &Stores) -> Self {
        Self::new(
            Arc::new(ConnectionRegistry::new()),
            Arc::clone(&stores.auth),
            Arc::clone(&stores.games),
        )
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Parse one text frame into a command
    pub fn decode(text: &str) -> SessionResult<UserGameCommand> {
        serde_json::from_str(text).map_err(|e| SessionError::MalformedCommand(e.to_string()))
    }

    /// Decode and handle one text frame, returning the command it carried
    ///
    /// Undecodable frames are answered on `transport`.
    pub async fn handle_text(&self, text: &str, transport: &Arc<dyn Transport>) -> SessionResult<UserGameCommand> {
        let command = Self::decode(text).inspect_err(|e| reply_direct(transport, e))?;
        self.handle(command.clone(), transport).await?;
        Ok(command)
    }

    /// Handle one command arriving on `transport`
    ///
    /// On failure the error has already been reported to the caller; it is
    /// returned for logging only.
    pub async fn handle(&self, command: UserGameCommand, transport: &Arc<dyn Transport>) -> SessionResult<()> {
        let game_id = command.game_id;
        let token = command.auth_token.as_str();
        debug!(game_id, command = ?command.command_type, "[SESSION] command received");

        // CONNECT registers before validation so a failure can be routed back
        let displaced = (command.command_type == CommandType::Connect)
            .then(|| self.registry.add(game_id, token, Arc::clone(transport)));

        let result = match command.command_type {
            CommandType::Connect => self.connect(game_id, token).await,
            CommandType::MakeMove => self.make_move(&command).await,
            CommandType::Leave => self.leave(game_id, token).await,
            CommandType::Resign => self.resign(game_id, token).await,
        };

        if let Err(e) = &result {
            self.report(&command, transport, e);
            if let Some(previous) = displaced {
                self.registry.restore(game_id, token, transport, previous);
            }
        }
        result
    }

    async fn connect(&self, game_id: GameId, token: &str) -> SessionResult<()> {
        let username = self.resolve(token).await?;
        let record = self.load(game_id).await?;

        let role = match record.side_of(&username) {
            Some(side) => side.to_string(),
            None => "an observer".to_string(),
        };
        info!("[SESSION] {} joined game {} as {}", username, game_id, role);

        self.registry
            .inform_caller(game_id, token, &ServerMessage::load_game(record.game));
        self.registry.broadcast_except_caller(
            game_id,
            token,
            &ServerMessage::notification(format!("{} has joined the game as {}.", username, role)),
        );
        Ok(())
    }

    async fn make_move(&self, command: &UserGameCommand) -> SessionResult<()> {
        let game_id = command.game_id;
        let username = self.resolve(&command.auth_token).await?;
        let mut record = self.load(game_id).await?;

        if record.game.is_over() {
            return Err(SessionError::GameOver);
        }
        let mv = command.mv.ok_or(SessionError::MissingMove)?;
        let mover = record.game.turn();
        if !record.plays(&username, mover) {
            return Err(SessionError::NotYourTurn);
        }

        record.game.apply_move(&mv)?;
        self.games.update_game(&record).await?;

        let opponent = mover.opponent();
        let status = record.game.status(opponent);
        if status.is_terminal() {
            record.game.set_over(true);
            self.games.update_game(&record).await?;
        }
        info!("[SESSION] {} played {} in game {} ({:?})", username, mv, game_id, status);

        let opponent_name = seat_name(&record, opponent);
        self.registry
            .broadcast_all(game_id, &ServerMessage::load_game(record.game));
        self.registry.broadcast_all(
            game_id,
            &ServerMessage::notification(format!("{} made the following move: {}", username, mv)),
        );

        let follow_up = match status {
            GameStatus::Checkmate => Some(format!("{} is in checkmate! Good game!", opponent_name)),
            GameStatus::Stalemate => Some("Stalemate! The game is over!".to_string()),
            GameStatus::Check => Some(format!("{} is in check!", opponent_name)),
            GameStatus::InProgress => None,
        };
        if let Some(message) = follow_up {
            self.registry
                .broadcast_all(game_id, &ServerMessage::notification(message));
        }
        Ok(())
    }

    async fn leave(&self, game_id: GameId, token: &str) -> SessionResult<()> {
        let username = self.resolve(token).await?;
        let mut record = self.load(game_id).await?;

        if record.vacate(&username) {
            self.games.update_game(&record).await?;
        }
        self.registry.remove(game_id, token);
        info!("[SESSION] {} left game {}", username, game_id);

        self.registry.broadcast_except_caller(
            game_id,
            token,
            &ServerMessage::notification(format!("{} has left the game.", username)),
        );
        Ok(())
    }

    async fn resign(&self, game_id: GameId, token: &str) -> SessionResult<()> {
        let username = self.resolve(token).await?;
        let mut record = self.load(game_id).await?;

        if record.game.is_over() {
            return Err(SessionError::GameAlreadyOver);
        }
        if record.side_of(&username).is_none() {
            return Err(SessionError::MustBePlayer);
        }

        record.game.set_over(true);
        self.games.update_game(&record).await?;
        info!("[SESSION] {} resigned game {}", username, game_id);

        self.registry.broadcast_all(
            game_id,
            &ServerMessage::notification(format!("{} has resigned!", username)),
        );
        Ok(())
    }

    async fn resolve(&self, token: &str) -> SessionResult<String> {
        self.auth
            .resolve_token(token)
            .await?
            .ok_or(SessionError::Unauthorized)
    }

    async fn load(&self, game_id: GameId) -> SessionResult<GameRecord> {
        self.games
            .get_game(game_id)
            .await?
            .ok_or(SessionError::InvalidGame { game_id })
    }

    /// Send `error` to the command's initiator and nobody else
    fn report(&self, command: &UserGameCommand, transport: &Arc<dyn Transport>, error: &SessionError) {
        match error {
            SessionError::Store(e) => warn!("[SESSION] store failure on game {}: {}", command.game_id, e),
            _ => debug!("[SESSION] command rejected: {}", error),
        }

        let message = ServerMessage::error(error.to_string());
        if !self
            .registry
            .inform_caller(command.game_id, &command.auth_token, &message)
        {
            reply_direct(transport, error);
        }
    }
}

/// Username in `side`'s seat, or the side's name while the seat is open
fn seat_name(record: &GameRecord, side: Side) -> String {
    record
        .seat(side)
        .map_or_else(|| side.to_string(), str::to_string)
}

/// Answer on the transport itself, bypassing the registry
fn reply_direct(transport: &Arc<dyn Transport>, error: &SessionError) {
    let frame = ServerMessage::error(error.to_string()).to_json();
    match frame {
        Ok(frame) => {
            if transport.send(&frame).is_err() {
                debug!("[SESSION] caller transport closed before error reply");
            }
        }
        Err(e) => warn!("[SESSION] could not encode error reply: {}", e),
    }
}
