use crate::auth::{self, authenticate};
use crate::session::SessionHandler;
use crate::store::{GameStore, StoreError, Stores};
use crate::ws::ws_handler;
use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use chess_engine::Side;
use serde::{Deserialize, Serialize};
use shared::GameId;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub sessions: SessionHandler,
}

impl AppState {
    pub fn new(stores: Stores) -> Self {
        let sessions = SessionHandler::from_stores(&stores);
        Self { stores, sessions }
    }
}

/// HTTP-facing failure, rendered as `{"message": "Error: .."}`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Error: bad request")]
    BadRequest,

    #[error("Error: unauthorized")]
    Unauthorized,

    #[error("Error: already taken")]
    AlreadyTaken,

    #[error("Error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::AlreadyTaken => StatusCode::FORBIDDEN,
            ApiError::Internal(reason) => {
                warn!("[API] internal error: {}", reason);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorBody {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    #[serde(rename = "gameID")]
    pub game_id: GameId,
    pub white_username: Option<String>,
    pub black_username: Option<String>,
    pub game_name: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ListGamesResponse {
    pub games: Vec<GameSummary>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub game_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateGameResponse {
    #[serde(rename = "gameID")]
    pub game_id: GameId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGameRequest {
    pub player_color: Option<Side>,
    #[serde(rename = "gameID")]
    pub game_id: Option<GameId>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/db", delete(clear))
        .route("/user", post(auth::register))
        .route("/session", post(auth::login).delete(auth::logout))
        .route("/game", get(list_games).post(create_game).put(join_game))
        .route("/ws", get(ws_handler))
        .with_state(state)
}

async fn clear(State(state): State<AppState>) -> Result<(), ApiError> {
    state.stores.clear().await?;
    info!("[API] all stores cleared");
    Ok(())
}

async fn list_games(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ListGamesResponse>, ApiError> {
    authenticate(&state, &headers).await?;
    let games = state
        .stores
        .games
        .list_games()
        .await?
        .into_iter()
        .map(|record| GameSummary {
            game_id: record.game_id,
            white_username: record.white_username,
            black_username: record.black_username,
            game_name: record.game_name,
        })
        .collect();
    Ok(Json(ListGamesResponse { games }))
}

async fn create_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateGameRequest>,
) -> Result<Json<CreateGameResponse>, ApiError> {
    authenticate(&state, &headers).await?;
    let game_name = payload
        .game_name
        .filter(|name| !name.is_empty())
        .ok_or(ApiError::BadRequest)?;

    let game_id = state.stores.games.create_game(&game_name).await?;
    info!("[API] created game {} ({})", game_id, game_name);
    Ok(Json(CreateGameResponse { game_id }))
}

async fn join_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<JoinGameRequest>,
) -> Result<(), ApiError> {
    let username = authenticate(&state, &headers).await?;
    let (Some(side), Some(game_id)) = (payload.player_color, payload.game_id) else {
        return Err(ApiError::BadRequest);
    };

    let mut record = state
        .stores
        .games
        .get_game(game_id)
        .await?
        .ok_or(ApiError::BadRequest)?;
    if record.seat(side).is_some() {
        return Err(ApiError::AlreadyTaken);
    }

    *record.seat_mut(side) = Some(username.clone());
    state.stores.games.update_game(&record).await?;
    info!("[API] {} took the {} seat in game {}", username, side, game_id);
    Ok(())
}
