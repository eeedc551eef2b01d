//! PostgreSQL-backed order and ticket repositories.

use crate::{from_db_int, storage_err, to_db_int, violated_constraint};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use station_core::booking::{Order, OrderRepository, Ticket, TicketDraft, TicketRepository};
use station_core::error::{Result, StationError};
use station_core::ids::{JourneyId, OrderId, TicketId, UserId};
use uuid::Uuid;

const SEAT_UNIQUE_CONSTRAINT: &str = "ticket_journey_seat_unique";

type TicketRow = (Uuid, i32, i32, Uuid, Uuid);

fn order_from_row(row: (Uuid, Uuid, DateTime<Utc>)) -> Order {
    Order {
        id: OrderId::from_uuid(row.0),
        user_id: UserId::from_uuid(row.1),
        created_at: row.2,
    }
}

fn ticket_from_row(row: TicketRow) -> Result<Ticket> {
    Ok(Ticket {
        id: TicketId::from_uuid(row.0),
        cargo: from_db_int(row.1, "cargo")?,
        seats: from_db_int(row.2, "seats")?,
        journey_id: JourneyId::from_uuid(row.3),
        order_id: OrderId::from_uuid(row.4),
    })
}

/// CRUD over the `orders` table.
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Creates a repository over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, user_id: UserId) -> Result<Order> {
        let id = OrderId::new();
        let (created_at,): (DateTime<Utc>,) = sqlx::query_as(
            "INSERT INTO orders (id, user_id) VALUES ($1, $2) RETURNING created_at",
        )
        .bind(id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage_err("failed to insert order", e))?;
        Ok(Order {
            id,
            user_id,
            created_at,
        })
    }

    async fn get(&self, id: OrderId) -> Result<Order> {
        let row: Option<(Uuid, Uuid, DateTime<Utc>)> =
            sqlx::query_as("SELECT id, user_id, created_at FROM orders WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| storage_err("failed to query order", e))?;
        row.map(order_from_row)
            .ok_or_else(|| StationError::not_found("Order", id))
    }

    async fn latest_for_user(&self, user_id: UserId) -> Result<Option<Order>> {
        let row: Option<(Uuid, Uuid, DateTime<Utc>)> = sqlx::query_as(
            "SELECT id, user_id, created_at FROM orders
             WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_err("failed to query latest order", e))?;
        Ok(row.map(order_from_row))
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        let rows: Vec<(Uuid, Uuid, DateTime<Utc>)> = sqlx::query_as(
            "SELECT id, user_id, created_at FROM orders
             WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_err("failed to list orders", e))?;
        Ok(rows.into_iter().map(order_from_row).collect())
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        let rows: Vec<(Uuid, Uuid, DateTime<Utc>)> =
            sqlx::query_as("SELECT id, user_id, created_at FROM orders ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| storage_err("failed to list orders", e))?;
        Ok(rows.into_iter().map(order_from_row).collect())
    }
}

/// CRUD over the `ticket` table.
///
/// The insert relies on the `ticket_journey_seat_unique` constraint to
/// serialize concurrent reservations of the same seat.
#[derive(Clone)]
pub struct PgTicketRepository {
    pool: PgPool,
}

impl PgTicketRepository {
    /// Creates a repository over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketRepository for PgTicketRepository {
    #[tracing::instrument(skip(self, draft), fields(journey_id = %draft.journey_id, seats = draft.seats))]
    async fn insert(&self, draft: &TicketDraft) -> Result<Ticket> {
        let id = TicketId::new();
        sqlx::query(
            "INSERT INTO ticket (id, cargo, seats, journey_id, order_id)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id.as_uuid())
        .bind(to_db_int(draft.cargo, "cargo")?)
        .bind(to_db_int(draft.seats, "seats")?)
        .bind(draft.journey_id.as_uuid())
        .bind(draft.order_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if violated_constraint(&e).is_some_and(|c| c == SEAT_UNIQUE_CONSTRAINT) {
                StationError::DuplicateSeat {
                    journey_id: draft.journey_id,
                    seats: draft.seats,
                }
            } else {
                storage_err("failed to insert ticket", e)
            }
        })?;
        Ok(Ticket {
            id,
            cargo: draft.cargo,
            seats: draft.seats,
            journey_id: draft.journey_id,
            order_id: draft.order_id,
        })
    }

    async fn get(&self, id: TicketId) -> Result<Ticket> {
        let row: Option<TicketRow> = sqlx::query_as(
            "SELECT id, cargo, seats, journey_id, order_id FROM ticket WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_err("failed to query ticket", e))?;
        row.map(ticket_from_row)
            .transpose()?
            .ok_or_else(|| StationError::not_found("Ticket", id))
    }

    async fn seat_taken(&self, journey_id: JourneyId, seats: u32) -> Result<bool> {
        let (taken,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM ticket WHERE journey_id = $1 AND seats = $2)",
        )
        .bind(journey_id.as_uuid())
        .bind(to_db_int(seats, "seats")?)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage_err("failed to check seat", e))?;
        Ok(taken)
    }

    async fn order_has_journey(&self, order_id: OrderId, journey_id: JourneyId) -> Result<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM ticket WHERE order_id = $1 AND journey_id = $2)",
        )
        .bind(order_id.as_uuid())
        .bind(journey_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage_err("failed to check order journeys", e))?;
        Ok(exists)
    }

    async fn list_for_order(&self, order_id: OrderId) -> Result<Vec<Ticket>> {
        let rows: Vec<TicketRow> = sqlx::query_as(
            "SELECT id, cargo, seats, journey_id, order_id FROM ticket
             WHERE order_id = $1 ORDER BY created_at",
        )
        .bind(order_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_err("failed to list order tickets", e))?;
        rows.into_iter().map(ticket_from_row).collect()
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Ticket>> {
        let rows: Vec<TicketRow> = sqlx::query_as(
            "SELECT t.id, t.cargo, t.seats, t.journey_id, t.order_id
             FROM ticket t JOIN orders o ON o.id = t.order_id
             WHERE o.user_id = $1 ORDER BY t.created_at",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_err("failed to list user tickets", e))?;
        rows.into_iter().map(ticket_from_row).collect()
    }

    async fn list_all(&self) -> Result<Vec<Ticket>> {
        let rows: Vec<TicketRow> = sqlx::query_as(
            "SELECT id, cargo, seats, journey_id, order_id FROM ticket ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_err("failed to list tickets", e))?;
        rows.into_iter().map(ticket_from_row).collect()
    }
}
