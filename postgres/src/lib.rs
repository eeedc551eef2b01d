//! PostgreSQL repositories for the train station booking backend.
//!
//! Each repository trait from `station-core` gets a `Pg*` implementation
//! over a shared [`sqlx::PgPool`]. Queries are explicit and parameterized,
//! and every listing returns a fully-materialized, insertion-ordered
//! sequence.
//!
//! Seat uniqueness is not left to the engine's pre-check: the
//! `ticket_journey_seat_unique` constraint in the schema serializes
//! concurrent inserts, and [`booking::PgTicketRepository`] maps that
//! violation back to `StationError::DuplicateSeat`.

pub mod auth;
pub mod booking;
pub mod catalog;
pub mod journey;

pub use auth::{PgSessionRepository, PgUserRepository};
pub use booking::{PgOrderRepository, PgTicketRepository};
pub use catalog::PgCatalogRepository;
pub use journey::PgJourneyRepository;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use station_core::error::{Result, StationError};
use std::time::Duration;

/// Embedded migrations for the booking schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Connects a pool and applies pending migrations.
///
/// # Errors
///
/// Returns `StationError::Storage` if the connection or a migration fails.
pub async fn connect(url: &str, max_connections: u32, connect_timeout: Duration) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(connect_timeout)
        .connect(url)
        .await
        .map_err(|e| StationError::storage(format!("failed to connect to postgres: {e}")))?;
    MIGRATOR
        .run(&pool)
        .await
        .map_err(|e| StationError::storage(format!("failed to apply migrations: {e}")))?;
    Ok(pool)
}

/// Wraps an sqlx error with query context.
pub(crate) fn storage_err(context: &str, err: sqlx::Error) -> StationError {
    StationError::storage(format!("{context}: {err}"))
}

/// Name of the violated constraint, when `err` is a database error.
pub(crate) fn violated_constraint(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.constraint().map(str::to_string),
        _ => None,
    }
}

/// Converts a domain count to the `INTEGER` column representation.
pub(crate) fn to_db_int(value: u32, field: &str) -> Result<i32> {
    i32::try_from(value).map_err(|_| StationError::validation(format!("{field} is out of range")))
}

/// Converts an `INTEGER` column back to the domain count.
///
/// The schema's CHECK constraints keep these non-negative, so a failure
/// here means the row was tampered with outside the application.
pub(crate) fn from_db_int(value: i32, field: &str) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| StationError::storage(format!("{field} column holds a negative value")))
}
