//! Account endpoints: register, login, profile.

use crate::error::AppError;
use crate::extractors::AuthUser;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use station_core::auth::{
    Session, generate_token, hash_password, validate_credentials, verify_password,
};
use station_core::ids::UserId;

/// Body of a registration or login request.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    /// Login name.
    pub username: String,
    /// Plaintext password; hashed before it is stored.
    pub password: String,
}

/// Public shape of an account; never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// Identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Elevated role flag.
    pub is_staff: bool,
}

/// Body of a successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Opaque bearer token for the `Authorization` header.
    pub token: String,
}

/// POST `/user/register`
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    validate_credentials(&request.username, &request.password)?;
    let user = state
        .users
        .create(&request.username, &hash_password(&request.password), false)
        .await?;
    tracing::info!(user_id = %user.id, "account registered");
    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: user.id,
            username: user.username,
            is_staff: user.is_staff,
        }),
    ))
}

/// POST `/user/login`
///
/// An unknown username and a wrong password produce the same response.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = state.users.find_by_username(&request.username).await?;
    let verified = user
        .as_ref()
        .is_some_and(|u| verify_password(&request.password, &u.password_hash));
    let Some(user) = user.filter(|_| verified) else {
        return Err(AppError::unauthorized("Invalid username or password"));
    };

    let session = Session {
        token: generate_token(),
        user_id: user.id,
        created_at: Utc::now(),
    };
    state.sessions.insert(&session).await?;
    tracing::info!(user_id = %user.id, "login");
    Ok(Json(TokenResponse {
        token: session.token,
    }))
}

/// GET `/user/me`
pub async fn me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.users.get(identity.user_id).await?;
    Ok(Json(UserResponse {
        id: user.id,
        username: user.username,
        is_staff: user.is_staff,
    }))
}
