//! PostgreSQL-backed user and session repositories.

use crate::{storage_err, violated_constraint};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use station_core::auth::{Session, SessionRepository, User, UserRepository};
use station_core::error::{Result, StationError};
use station_core::ids::UserId;
use uuid::Uuid;

/// CRUD over the `app_user` table.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Creates a repository over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: (Uuid, String, String, bool)) -> User {
    User {
        id: UserId::from_uuid(row.0),
        username: row.1,
        password_hash: row.2,
        is_staff: row.3,
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[tracing::instrument(skip(self, password_hash))]
    async fn create(&self, username: &str, password_hash: &str, is_staff: bool) -> Result<User> {
        let id = UserId::new();
        sqlx::query(
            "INSERT INTO app_user (id, username, password_hash, is_staff) VALUES ($1, $2, $3, $4)",
        )
        .bind(id.as_uuid())
        .bind(username)
        .bind(password_hash)
        .bind(is_staff)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if violated_constraint(&e).is_some_and(|c| c == "app_user_username_key") {
                StationError::validation("username already taken")
            } else {
                storage_err("failed to insert user", e)
            }
        })?;
        Ok(User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            is_staff,
        })
    }

    async fn get(&self, id: UserId) -> Result<User> {
        let row: Option<(Uuid, String, String, bool)> = sqlx::query_as(
            "SELECT id, username, password_hash, is_staff FROM app_user WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_err("failed to query user", e))?;
        row.map(user_from_row)
            .ok_or_else(|| StationError::not_found("User", id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row: Option<(Uuid, String, String, bool)> = sqlx::query_as(
            "SELECT id, username, password_hash, is_staff FROM app_user WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_err("failed to query user by username", e))?;
        Ok(row.map(user_from_row))
    }
}

/// CRUD over the `session` table.
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Creates a repository over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn insert(&self, session: &Session) -> Result<()> {
        sqlx::query("INSERT INTO session (token, user_id, created_at) VALUES ($1, $2, $3)")
            .bind(&session.token)
            .bind(session.user_id.as_uuid())
            .bind(session.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_err("failed to insert session", e))?;
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<Session>> {
        let row: Option<(String, Uuid, DateTime<Utc>)> =
            sqlx::query_as("SELECT token, user_id, created_at FROM session WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| storage_err("failed to query session", e))?;
        Ok(row.map(|(token, user_id, created_at)| Session {
            token,
            user_id: UserId::from_uuid(user_id),
            created_at,
        }))
    }
}
