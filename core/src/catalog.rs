//! Catalog reference entities: train types, trains, stations, routes, crew.
//!
//! These are pure data with CRUD access through [`CatalogRepository`];
//! the only derived logic lives on [`Train::available_cargo`] and the
//! route endpoint check on [`NewRoute::validate`].

use crate::error::{Result, StationError};
use crate::ids::{CrewId, RouteId, StationId, TrainId, TrainTypeId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A class of train (e.g. "Intercity", "Night express").
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainType {
    /// Identifier.
    pub id: TrainTypeId,
    /// Unique human-readable name.
    pub name: String,
}

/// Input for creating or updating a train type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewTrainType {
    /// Unique human-readable name.
    pub name: String,
}

/// A physical train with a fixed cargo layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Train {
    /// Identifier.
    pub id: TrainId,
    /// Display name.
    pub name: String,
    /// Count of cargo sections.
    pub cargo_num: u32,
    /// Seats per cargo section.
    pub places_in_cargo: u32,
    /// The train's type.
    pub train_type_id: TrainTypeId,
}

impl Train {
    /// Capacity ceiling used by ticket validation.
    ///
    /// Equal to the number of cargo sections: a ticket's cargo index may
    /// not exceed this value.
    #[must_use]
    pub const fn available_cargo(&self) -> u32 {
        self.cargo_num
    }
}

/// Input for creating or updating a train.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewTrain {
    /// Display name.
    pub name: String,
    /// Count of cargo sections.
    pub cargo_num: u32,
    /// Seats per cargo section.
    pub places_in_cargo: u32,
    /// The train's type.
    pub train_type_id: TrainTypeId,
}

/// A station with geographic coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Identifier.
    pub id: StationId,
    /// Unique station name.
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// Input for creating or updating a station.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewStation {
    /// Unique station name.
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// A directed connection between two distinct stations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Identifier.
    pub id: RouteId,
    /// Origin station.
    pub source_id: StationId,
    /// Destination station.
    pub destination_id: StationId,
    /// Distance in kilometres, strictly positive.
    pub distance: u32,
}

/// Input for creating or updating a route.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewRoute {
    /// Origin station.
    pub source_id: StationId,
    /// Destination station.
    pub destination_id: StationId,
    /// Distance in kilometres, strictly positive.
    pub distance: u32,
}

impl NewRoute {
    /// Checks the route endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`StationError::SameSourceDestination`] when both endpoints
    /// are the same station, and [`StationError::Validation`] for a zero
    /// distance.
    pub fn validate(&self) -> Result<()> {
        if self.source_id == self.destination_id {
            return Err(StationError::SameSourceDestination);
        }
        if self.distance == 0 {
            return Err(StationError::validation("distance must be positive"));
        }
        Ok(())
    }
}

/// A crew member that can be assigned to journeys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crew {
    /// Identifier.
    pub id: CrewId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl Crew {
    /// "First Last" display form.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Input for creating or updating a crew member.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewCrew {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

/// CRUD access to the catalog reference entities.
///
/// Implementations return fully-materialized sequences ordered by
/// insertion, and `NotFound` for absent identifiers.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Persists a new train type.
    async fn create_train_type(&self, input: &NewTrainType) -> Result<TrainType>;
    /// Fetches a train type by id.
    async fn get_train_type(&self, id: TrainTypeId) -> Result<TrainType>;
    /// Lists all train types.
    async fn list_train_types(&self) -> Result<Vec<TrainType>>;
    /// Replaces a train type's fields.
    async fn update_train_type(&self, id: TrainTypeId, input: &NewTrainType) -> Result<TrainType>;
    /// Deletes a train type.
    async fn delete_train_type(&self, id: TrainTypeId) -> Result<()>;

    /// Persists a new train.
    async fn create_train(&self, input: &NewTrain) -> Result<Train>;
    /// Fetches a train by id.
    async fn get_train(&self, id: TrainId) -> Result<Train>;
    /// Lists all trains.
    async fn list_trains(&self) -> Result<Vec<Train>>;
    /// Replaces a train's fields.
    async fn update_train(&self, id: TrainId, input: &NewTrain) -> Result<Train>;
    /// Deletes a train.
    async fn delete_train(&self, id: TrainId) -> Result<()>;

    /// Persists a new station.
    async fn create_station(&self, input: &NewStation) -> Result<Station>;
    /// Fetches a station by id.
    async fn get_station(&self, id: StationId) -> Result<Station>;
    /// Lists all stations.
    async fn list_stations(&self) -> Result<Vec<Station>>;
    /// Replaces a station's fields.
    async fn update_station(&self, id: StationId, input: &NewStation) -> Result<Station>;
    /// Deletes a station.
    async fn delete_station(&self, id: StationId) -> Result<()>;

    /// Persists a new route.
    async fn create_route(&self, input: &NewRoute) -> Result<Route>;
    /// Fetches a route by id.
    async fn get_route(&self, id: RouteId) -> Result<Route>;
    /// Lists all routes.
    async fn list_routes(&self) -> Result<Vec<Route>>;
    /// Replaces a route's fields.
    async fn update_route(&self, id: RouteId, input: &NewRoute) -> Result<Route>;
    /// Deletes a route.
    async fn delete_route(&self, id: RouteId) -> Result<()>;

    /// Persists a new crew member.
    async fn create_crew(&self, input: &NewCrew) -> Result<Crew>;
    /// Fetches a crew member by id.
    async fn get_crew(&self, id: CrewId) -> Result<Crew>;
    /// Lists all crew members.
    async fn list_crews(&self) -> Result<Vec<Crew>>;
    /// Replaces a crew member's fields.
    async fn update_crew(&self, id: CrewId, input: &NewCrew) -> Result<Crew>;
    /// Deletes a crew member.
    async fn delete_crew(&self, id: CrewId) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_cargo_equals_cargo_num() {
        let train = Train {
            id: TrainId::new(),
            name: "Test train".to_string(),
            cargo_num: 150,
            places_in_cargo: 10,
            train_type_id: TrainTypeId::new(),
        };
        assert_eq!(train.available_cargo(), 150);
    }

    #[test]
    fn route_rejects_same_endpoints() {
        let station = StationId::new();
        let route = NewRoute {
            source_id: station,
            destination_id: station,
            distance: 100,
        };
        assert!(matches!(
            route.validate(),
            Err(StationError::SameSourceDestination)
        ));
    }

    #[test]
    fn route_rejects_zero_distance() {
        let route = NewRoute {
            source_id: StationId::new(),
            destination_id: StationId::new(),
            distance: 0,
        };
        assert!(matches!(route.validate(), Err(StationError::Validation(_))));
    }

    #[test]
    fn route_accepts_distinct_endpoints() {
        let route = NewRoute {
            source_id: StationId::new(),
            destination_id: StationId::new(),
            distance: 1000,
        };
        assert!(route.validate().is_ok());
    }

    #[test]
    fn crew_full_name() {
        let crew = Crew {
            id: CrewId::new(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
        };
        assert_eq!(crew.full_name(), "John Doe");
    }
}
