use crate::api::{ApiError, AppState};
use crate::store::{AuthStore, StoreError, UserRecord, UserStore};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Json, State},
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub username: String,
    pub auth_token: String,
}

/// Resolve the `authorization` header to a username
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<String, ApiError> {
    let token = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;
    state
        .stores
        .auth
        .resolve_token(token)
        .await?
        .ok_or(ApiError::Unauthorized)
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|_| ApiError::Internal("password hashing failed".to_string()))
}

fn verify_password(password: &str, stored_hash: &str) -> Result<bool, ApiError> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|_| ApiError::Internal("stored hash is unreadable".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (Some(username), Some(password)) = (payload.username, payload.password) else {
        return Err(ApiError::BadRequest);
    };

    let user = UserRecord {
        username: username.clone(),
        password_hash: hash_password(&password)?,
        email: payload.email.unwrap_or_default(),
    };
    match state.stores.users.create_user(user).await {
        Ok(()) => {}
        Err(StoreError::Conflict) => return Err(ApiError::AlreadyTaken),
        Err(e) => return Err(e.into()),
    }

    let auth_token = state.stores.auth.create_auth(&username).await?;
    info!("[API] registered {}", username);
    Ok(Json(AuthResponse {
        username,
        auth_token,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (Some(username), Some(password)) = (payload.username, payload.password) else {
        return Err(ApiError::BadRequest);
    };

    let user = state
        .stores
        .users
        .get_user(&username)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    if !verify_password(&password, &user.password_hash)? {
        return Err(ApiError::Unauthorized);
    }

    let auth_token = state.stores.auth.create_auth(&username).await?;
    info!("[API] {} logged in", username);
    Ok(Json(AuthResponse {
        username,
        auth_token,
    }))
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<(), ApiError> {
    let token = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;
    if !state.stores.auth.delete_auth(token).await? {
        return Err(ApiError::Unauthorized);
    }
    Ok(())
}
