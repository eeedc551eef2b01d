//! PostgreSQL-backed journey repository.

use crate::storage_err;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use station_core::error::{Result, StationError};
use station_core::ids::{CrewId, JourneyId, RouteId, TrainId};
use station_core::journey::{Journey, JourneyFilter, JourneyRepository, NewJourney};
use uuid::Uuid;

type JourneyRow = (Uuid, Uuid, Uuid, DateTime<Utc>, DateTime<Utc>);

/// CRUD over the `journey` and `journey_crew` tables.
#[derive(Clone)]
pub struct PgJourneyRepository {
    pool: PgPool,
}

impl PgJourneyRepository {
    /// Creates a repository over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn crew_for(&self, journey_id: JourneyId) -> Result<Vec<CrewId>> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT crew_id FROM journey_crew WHERE journey_id = $1 ORDER BY crew_id",
        )
        .bind(journey_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_err("failed to query journey crew", e))?;
        Ok(rows.into_iter().map(|(id,)| CrewId::from_uuid(id)).collect())
    }
}

fn journey_from_row(row: JourneyRow, crew: Vec<CrewId>) -> Journey {
    Journey {
        id: JourneyId::from_uuid(row.0),
        route_id: RouteId::from_uuid(row.1),
        train_id: TrainId::from_uuid(row.2),
        departure_time: row.3,
        arrival_time: row.4,
        crew,
    }
}

#[async_trait]
impl JourneyRepository for PgJourneyRepository {
    #[tracing::instrument(skip(self, input), fields(route_id = %input.route_id))]
    async fn create(&self, input: &NewJourney) -> Result<Journey> {
        let id = JourneyId::new();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_err("failed to begin transaction", e))?;
        sqlx::query(
            "INSERT INTO journey (id, route_id, train_id, departure_time, arrival_time)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id.as_uuid())
        .bind(input.route_id.as_uuid())
        .bind(input.train_id.as_uuid())
        .bind(input.departure_time)
        .bind(input.arrival_time)
        .execute(&mut *tx)
        .await
        .map_err(|e| storage_err("failed to insert journey", e))?;
        for crew_id in &input.crew {
            sqlx::query("INSERT INTO journey_crew (journey_id, crew_id) VALUES ($1, $2)")
                .bind(id.as_uuid())
                .bind(crew_id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(|e| storage_err("failed to assign crew", e))?;
        }
        tx.commit()
            .await
            .map_err(|e| storage_err("failed to commit journey", e))?;
        Ok(Journey {
            id,
            route_id: input.route_id,
            train_id: input.train_id,
            departure_time: input.departure_time,
            arrival_time: input.arrival_time,
            crew: input.crew.clone(),
        })
    }

    async fn get(&self, id: JourneyId) -> Result<Journey> {
        let row: Option<JourneyRow> = sqlx::query_as(
            "SELECT id, route_id, train_id, departure_time, arrival_time
             FROM journey WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_err("failed to query journey", e))?;
        let Some(row) = row else {
            return Err(StationError::not_found("Journey", id));
        };
        let crew = self.crew_for(id).await?;
        Ok(journey_from_row(row, crew))
    }

    async fn list(&self, filter: &JourneyFilter) -> Result<Vec<Journey>> {
        let rows: Vec<JourneyRow> = sqlx::query_as(
            "SELECT id, route_id, train_id, departure_time, arrival_time
             FROM journey
             WHERE ($1::uuid IS NULL OR route_id = $1)
               AND ($2::uuid IS NULL OR train_id = $2)
             ORDER BY created_at",
        )
        .bind(filter.route_id.map(|id| *id.as_uuid()))
        .bind(filter.train_id.map(|id| *id.as_uuid()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_err("failed to list journeys", e))?;

        let mut journeys = Vec::with_capacity(rows.len());
        for row in rows {
            let crew = self.crew_for(JourneyId::from_uuid(row.0)).await?;
            journeys.push(journey_from_row(row, crew));
        }
        Ok(journeys)
    }

    #[tracing::instrument(skip(self, input), fields(journey_id = %id))]
    async fn update(&self, id: JourneyId, input: &NewJourney) -> Result<Journey> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_err("failed to begin transaction", e))?;
        let row: Option<(Uuid,)> = sqlx::query_as(
            "UPDATE journey
             SET route_id = $2, train_id = $3, departure_time = $4, arrival_time = $5
             WHERE id = $1 RETURNING id",
        )
        .bind(id.as_uuid())
        .bind(input.route_id.as_uuid())
        .bind(input.train_id.as_uuid())
        .bind(input.departure_time)
        .bind(input.arrival_time)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| storage_err("failed to update journey", e))?;
        row.ok_or_else(|| StationError::not_found("Journey", id))?;

        sqlx::query("DELETE FROM journey_crew WHERE journey_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_err("failed to clear crew", e))?;
        for crew_id in &input.crew {
            sqlx::query("INSERT INTO journey_crew (journey_id, crew_id) VALUES ($1, $2)")
                .bind(id.as_uuid())
                .bind(crew_id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(|e| storage_err("failed to assign crew", e))?;
        }
        tx.commit()
            .await
            .map_err(|e| storage_err("failed to commit journey update", e))?;
        Ok(Journey {
            id,
            route_id: input.route_id,
            train_id: input.train_id,
            departure_time: input.departure_time,
            arrival_time: input.arrival_time,
            crew: input.crew.clone(),
        })
    }

    async fn delete(&self, id: JourneyId) -> Result<()> {
        let result = sqlx::query("DELETE FROM journey WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_err("failed to delete journey", e))?;
        if result.rows_affected() == 0 {
            return Err(StationError::not_found("Journey", id));
        }
        Ok(())
    }
}
