//! Request extractors for authentication.
//!
//! Handlers declare their access requirement through the extractor they
//! take: [`AuthUser`] for any logged-in account, [`StaffUser`] for staff
//! only. Both resolve the bearer token to an [`Identity`] against the
//! session and user stores.

use crate::error::AppError;
use crate::state::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use station_core::auth::Identity;

/// The raw bearer token from the `Authorization` header.
#[derive(Clone, Debug)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Authorization header must be a bearer token"))?;
        if token.is_empty() {
            return Err(AppError::unauthorized("Empty bearer token"));
        }
        Ok(Self(token.to_string()))
    }
}

/// The authenticated requester.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let session = state
            .sessions
            .find(&token)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid or expired token"))?;
        let user = state.users.get(session.user_id).await?;
        Ok(Self(Identity::from(&user)))
    }
}

/// An authenticated requester that must hold the staff flag.
#[derive(Clone, Debug)]
pub struct StaffUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for StaffUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(identity) = AuthUser::from_request_parts(parts, state).await?;
        if !identity.is_staff {
            return Err(AppError::forbidden("Staff access required"));
        }
        Ok(Self(identity))
    }
}
