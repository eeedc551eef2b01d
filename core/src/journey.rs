//! Scheduled journeys and the registry that guards their time window.

use crate::catalog::CatalogRepository;
use crate::error::{Result, StationError};
use crate::ids::{CrewId, JourneyId, RouteId, TrainId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A scheduled run of a train over a route within a time window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journey {
    /// Identifier.
    pub id: JourneyId,
    /// Route being driven.
    pub route_id: RouteId,
    /// Train assigned to the run.
    pub train_id: TrainId,
    /// Departure instant.
    pub departure_time: DateTime<Utc>,
    /// Arrival instant, strictly after departure.
    pub arrival_time: DateTime<Utc>,
    /// Crew members assigned to the run.
    pub crew: Vec<CrewId>,
}

/// Input for creating or updating a journey.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewJourney {
    /// Route being driven.
    pub route_id: RouteId,
    /// Train assigned to the run.
    pub train_id: TrainId,
    /// Departure instant.
    pub departure_time: DateTime<Utc>,
    /// Arrival instant, strictly after departure.
    pub arrival_time: DateTime<Utc>,
    /// Crew members assigned to the run.
    pub crew: Vec<CrewId>,
}

impl NewJourney {
    /// Checks that the time window is well-formed.
    ///
    /// # Errors
    ///
    /// Returns [`StationError::InvalidTimeRange`] when departure is not
    /// strictly earlier than arrival.
    pub fn validate(&self) -> Result<()> {
        if self.departure_time >= self.arrival_time {
            return Err(StationError::InvalidTimeRange);
        }
        Ok(())
    }
}

/// Optional filters for journey listings.
#[derive(Clone, Copy, Debug, Default)]
pub struct JourneyFilter {
    /// Only journeys on this route.
    pub route_id: Option<RouteId>,
    /// Only journeys driven by this train.
    pub train_id: Option<TrainId>,
}

/// Storage access for journeys.
#[async_trait]
pub trait JourneyRepository: Send + Sync {
    /// Persists a new journey and its crew assignments.
    async fn create(&self, input: &NewJourney) -> Result<Journey>;
    /// Fetches a journey by id.
    async fn get(&self, id: JourneyId) -> Result<Journey>;
    /// Lists journeys matching `filter`, ordered by insertion.
    async fn list(&self, filter: &JourneyFilter) -> Result<Vec<Journey>>;
    /// Replaces a journey's fields and crew assignments.
    async fn update(&self, id: JourneyId, input: &NewJourney) -> Result<Journey>;
    /// Deletes a journey.
    async fn delete(&self, id: JourneyId) -> Result<()>;
}

/// Write-side guard over [`JourneyRepository`].
///
/// Enforces the `departure < arrival` invariant and checks that the
/// referenced route, train, and crew exist before any write reaches the
/// store. Reads pass straight through.
#[derive(Clone)]
pub struct JourneyRegistry {
    journeys: Arc<dyn JourneyRepository>,
    catalog: Arc<dyn CatalogRepository>,
}

impl JourneyRegistry {
    /// Creates a registry over the given stores.
    #[must_use]
    pub fn new(journeys: Arc<dyn JourneyRepository>, catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { journeys, catalog }
    }

    /// Validates and persists a new journey.
    ///
    /// # Errors
    ///
    /// `InvalidTimeRange` for a malformed window, `NotFound` when the
    /// route, train, or any crew member is absent, or a storage error.
    #[tracing::instrument(skip(self, input), fields(route_id = %input.route_id, train_id = %input.train_id))]
    pub async fn create(&self, input: &NewJourney) -> Result<Journey> {
        input.validate()?;
        self.check_references(input).await?;
        let journey = self.journeys.create(input).await?;
        tracing::info!(journey_id = %journey.id, "journey created");
        Ok(journey)
    }

    /// Fetches a journey by id.
    ///
    /// # Errors
    ///
    /// `NotFound` when the journey is absent, or a storage error.
    pub async fn get(&self, id: JourneyId) -> Result<Journey> {
        self.journeys.get(id).await
    }

    /// Lists journeys matching `filter`, ordered by insertion.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    pub async fn list(&self, filter: &JourneyFilter) -> Result<Vec<Journey>> {
        self.journeys.list(filter).await
    }

    /// Validates and replaces an existing journey.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`JourneyRegistry::create`], plus `NotFound`
    /// when `id` itself is absent.
    #[tracing::instrument(skip(self, input), fields(journey_id = %id))]
    pub async fn update(&self, id: JourneyId, input: &NewJourney) -> Result<Journey> {
        input.validate()?;
        self.check_references(input).await?;
        self.journeys.update(id, input).await
    }

    /// Deletes a journey.
    ///
    /// # Errors
    ///
    /// `NotFound` when the journey is absent, or a storage error.
    pub async fn delete(&self, id: JourneyId) -> Result<()> {
        self.journeys.delete(id).await
    }

    async fn check_references(&self, input: &NewJourney) -> Result<()> {
        self.catalog.get_route(input.route_id).await?;
        self.catalog.get_train(input.train_id).await?;
        for crew_id in &input.crew {
            self.catalog.get_crew(*crew_id).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window(dep_hour: u32, arr_hour: u32) -> (DateTime<Utc>, DateTime<Utc>) {
        let dep = Utc.with_ymd_and_hms(2024, 10, 8, dep_hour, 0, 0).single();
        let arr = Utc.with_ymd_and_hms(2024, 10, 8, arr_hour, 0, 0).single();
        match (dep, arr) {
            (Some(d), Some(a)) => (d, a),
            _ => unreachable!("fixed timestamps are valid"),
        }
    }

    fn journey_input(departure: DateTime<Utc>, arrival: DateTime<Utc>) -> NewJourney {
        NewJourney {
            route_id: RouteId::new(),
            train_id: TrainId::new(),
            departure_time: departure,
            arrival_time: arrival,
            crew: vec![],
        }
    }

    #[test]
    fn rejects_departure_after_arrival() {
        let (dep, arr) = window(10, 8);
        assert!(matches!(
            journey_input(dep, arr).validate(),
            Err(StationError::InvalidTimeRange)
        ));
    }

    #[test]
    fn rejects_departure_equal_to_arrival() {
        let (dep, _) = window(10, 12);
        assert!(matches!(
            journey_input(dep, dep).validate(),
            Err(StationError::InvalidTimeRange)
        ));
    }

    #[test]
    fn accepts_ordered_window() {
        let (dep, arr) = window(8, 10);
        assert!(journey_input(dep, arr).validate().is_ok());
    }
}
