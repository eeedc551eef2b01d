//! PostgreSQL-backed catalog repository.

use crate::{from_db_int, storage_err, to_db_int, violated_constraint};
use async_trait::async_trait;
use sqlx::PgPool;
use station_core::catalog::{
    CatalogRepository, Crew, NewCrew, NewRoute, NewStation, NewTrain, NewTrainType, Route, Station,
    Train, TrainType,
};
use station_core::error::{Result, StationError};
use station_core::ids::{CrewId, RouteId, StationId, TrainId, TrainTypeId};
use uuid::Uuid;

/// CRUD over the catalog tables (`train_type`, `train`, `station`,
/// `route`, `crew`).
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    /// Creates a repository over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn station_exists(&self, id: StationId) -> Result<()> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM station WHERE id = $1)")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_err("failed to check station", e))?;
        if exists {
            Ok(())
        } else {
            Err(StationError::not_found("Station", id))
        }
    }

    async fn train_type_exists(&self, id: TrainTypeId) -> Result<()> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM train_type WHERE id = $1)")
                .bind(id.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| storage_err("failed to check train type", e))?;
        if exists {
            Ok(())
        } else {
            Err(StationError::not_found("TrainType", id))
        }
    }
}

fn train_from_row(row: (Uuid, String, i32, i32, Uuid)) -> Result<Train> {
    Ok(Train {
        id: TrainId::from_uuid(row.0),
        name: row.1,
        cargo_num: from_db_int(row.2, "cargo_num")?,
        places_in_cargo: from_db_int(row.3, "places_in_cargo")?,
        train_type_id: TrainTypeId::from_uuid(row.4),
    })
}

fn route_from_row(row: (Uuid, Uuid, Uuid, i32)) -> Result<Route> {
    Ok(Route {
        id: RouteId::from_uuid(row.0),
        source_id: StationId::from_uuid(row.1),
        destination_id: StationId::from_uuid(row.2),
        distance: from_db_int(row.3, "distance")?,
    })
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn create_train_type(&self, input: &NewTrainType) -> Result<TrainType> {
        let id = TrainTypeId::new();
        sqlx::query("INSERT INTO train_type (id, name) VALUES ($1, $2)")
            .bind(id.as_uuid())
            .bind(&input.name)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if violated_constraint(&e).is_some_and(|c| c == "train_type_name_key") {
                    StationError::validation("train type name already exists")
                } else {
                    storage_err("failed to insert train type", e)
                }
            })?;
        Ok(TrainType {
            id,
            name: input.name.clone(),
        })
    }

    async fn get_train_type(&self, id: TrainTypeId) -> Result<TrainType> {
        let row: Option<(Uuid, String)> =
            sqlx::query_as("SELECT id, name FROM train_type WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| storage_err("failed to query train type", e))?;
        row.map(|(id, name)| TrainType {
            id: TrainTypeId::from_uuid(id),
            name,
        })
        .ok_or_else(|| StationError::not_found("TrainType", id))
    }

    async fn list_train_types(&self) -> Result<Vec<TrainType>> {
        let rows: Vec<(Uuid, String)> =
            sqlx::query_as("SELECT id, name FROM train_type ORDER BY created_at")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| storage_err("failed to list train types", e))?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| TrainType {
                id: TrainTypeId::from_uuid(id),
                name,
            })
            .collect())
    }

    async fn update_train_type(&self, id: TrainTypeId, input: &NewTrainType) -> Result<TrainType> {
        let row: Option<(Uuid,)> =
            sqlx::query_as("UPDATE train_type SET name = $2 WHERE id = $1 RETURNING id")
                .bind(id.as_uuid())
                .bind(&input.name)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| storage_err("failed to update train type", e))?;
        row.ok_or_else(|| StationError::not_found("TrainType", id))?;
        Ok(TrainType {
            id,
            name: input.name.clone(),
        })
    }

    async fn delete_train_type(&self, id: TrainTypeId) -> Result<()> {
        let result = sqlx::query("DELETE FROM train_type WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_err("failed to delete train type", e))?;
        if result.rows_affected() == 0 {
            return Err(StationError::not_found("TrainType", id));
        }
        Ok(())
    }

    async fn create_train(&self, input: &NewTrain) -> Result<Train> {
        self.train_type_exists(input.train_type_id).await?;
        let id = TrainId::new();
        sqlx::query(
            "INSERT INTO train (id, name, cargo_num, places_in_cargo, train_type_id)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id.as_uuid())
        .bind(&input.name)
        .bind(to_db_int(input.cargo_num, "cargo_num")?)
        .bind(to_db_int(input.places_in_cargo, "places_in_cargo")?)
        .bind(input.train_type_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| storage_err("failed to insert train", e))?;
        Ok(Train {
            id,
            name: input.name.clone(),
            cargo_num: input.cargo_num,
            places_in_cargo: input.places_in_cargo,
            train_type_id: input.train_type_id,
        })
    }

    async fn get_train(&self, id: TrainId) -> Result<Train> {
        let row: Option<(Uuid, String, i32, i32, Uuid)> = sqlx::query_as(
            "SELECT id, name, cargo_num, places_in_cargo, train_type_id
             FROM train WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_err("failed to query train", e))?;
        row.map(train_from_row)
            .transpose()?
            .ok_or_else(|| StationError::not_found("Train", id))
    }

    async fn list_trains(&self) -> Result<Vec<Train>> {
        let rows: Vec<(Uuid, String, i32, i32, Uuid)> = sqlx::query_as(
            "SELECT id, name, cargo_num, places_in_cargo, train_type_id
             FROM train ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_err("failed to list trains", e))?;
        rows.into_iter().map(train_from_row).collect()
    }

    async fn update_train(&self, id: TrainId, input: &NewTrain) -> Result<Train> {
        self.train_type_exists(input.train_type_id).await?;
        let row: Option<(Uuid,)> = sqlx::query_as(
            "UPDATE train
             SET name = $2, cargo_num = $3, places_in_cargo = $4, train_type_id = $5
             WHERE id = $1 RETURNING id",
        )
        .bind(id.as_uuid())
        .bind(&input.name)
        .bind(to_db_int(input.cargo_num, "cargo_num")?)
        .bind(to_db_int(input.places_in_cargo, "places_in_cargo")?)
        .bind(input.train_type_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_err("failed to update train", e))?;
        row.ok_or_else(|| StationError::not_found("Train", id))?;
        Ok(Train {
            id,
            name: input.name.clone(),
            cargo_num: input.cargo_num,
            places_in_cargo: input.places_in_cargo,
            train_type_id: input.train_type_id,
        })
    }

    async fn delete_train(&self, id: TrainId) -> Result<()> {
        let result = sqlx::query("DELETE FROM train WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_err("failed to delete train", e))?;
        if result.rows_affected() == 0 {
            return Err(StationError::not_found("Train", id));
        }
        Ok(())
    }

    async fn create_station(&self, input: &NewStation) -> Result<Station> {
        let id = StationId::new();
        sqlx::query("INSERT INTO station (id, name, latitude, longitude) VALUES ($1, $2, $3, $4)")
            .bind(id.as_uuid())
            .bind(&input.name)
            .bind(input.latitude)
            .bind(input.longitude)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if violated_constraint(&e).is_some_and(|c| c == "station_name_key") {
                    StationError::validation("station name already exists")
                } else {
                    storage_err("failed to insert station", e)
                }
            })?;
        Ok(Station {
            id,
            name: input.name.clone(),
            latitude: input.latitude,
            longitude: input.longitude,
        })
    }

    async fn get_station(&self, id: StationId) -> Result<Station> {
        let row: Option<(Uuid, String, f64, f64)> =
            sqlx::query_as("SELECT id, name, latitude, longitude FROM station WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| storage_err("failed to query station", e))?;
        row.map(|(id, name, latitude, longitude)| Station {
            id: StationId::from_uuid(id),
            name,
            latitude,
            longitude,
        })
        .ok_or_else(|| StationError::not_found("Station", id))
    }

    async fn list_stations(&self) -> Result<Vec<Station>> {
        let rows: Vec<(Uuid, String, f64, f64)> =
            sqlx::query_as("SELECT id, name, latitude, longitude FROM station ORDER BY created_at")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| storage_err("failed to list stations", e))?;
        Ok(rows
            .into_iter()
            .map(|(id, name, latitude, longitude)| Station {
                id: StationId::from_uuid(id),
                name,
                latitude,
                longitude,
            })
            .collect())
    }

    async fn update_station(&self, id: StationId, input: &NewStation) -> Result<Station> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            "UPDATE station SET name = $2, latitude = $3, longitude = $4
             WHERE id = $1 RETURNING id",
        )
        .bind(id.as_uuid())
        .bind(&input.name)
        .bind(input.latitude)
        .bind(input.longitude)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_err("failed to update station", e))?;
        row.ok_or_else(|| StationError::not_found("Station", id))?;
        Ok(Station {
            id,
            name: input.name.clone(),
            latitude: input.latitude,
            longitude: input.longitude,
        })
    }

    async fn delete_station(&self, id: StationId) -> Result<()> {
        let result = sqlx::query("DELETE FROM station WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_err("failed to delete station", e))?;
        if result.rows_affected() == 0 {
            return Err(StationError::not_found("Station", id));
        }
        Ok(())
    }

    async fn create_route(&self, input: &NewRoute) -> Result<Route> {
        input.validate()?;
        self.station_exists(input.source_id).await?;
        self.station_exists(input.destination_id).await?;
        let id = RouteId::new();
        sqlx::query(
            "INSERT INTO route (id, source_id, destination_id, distance) VALUES ($1, $2, $3, $4)",
        )
        .bind(id.as_uuid())
        .bind(input.source_id.as_uuid())
        .bind(input.destination_id.as_uuid())
        .bind(to_db_int(input.distance, "distance")?)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_err("failed to insert route", e))?;
        Ok(Route {
            id,
            source_id: input.source_id,
            destination_id: input.destination_id,
            distance: input.distance,
        })
    }

    async fn get_route(&self, id: RouteId) -> Result<Route> {
        let row: Option<(Uuid, Uuid, Uuid, i32)> =
            sqlx::query_as("SELECT id, source_id, destination_id, distance FROM route WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| storage_err("failed to query route", e))?;
        row.map(route_from_row)
            .transpose()?
            .ok_or_else(|| StationError::not_found("Route", id))
    }

    async fn list_routes(&self) -> Result<Vec<Route>> {
        let rows: Vec<(Uuid, Uuid, Uuid, i32)> = sqlx::query_as(
            "SELECT id, source_id, destination_id, distance FROM route ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_err("failed to list routes", e))?;
        rows.into_iter().map(route_from_row).collect()
    }

    async fn update_route(&self, id: RouteId, input: &NewRoute) -> Result<Route> {
        input.validate()?;
        self.station_exists(input.source_id).await?;
        self.station_exists(input.destination_id).await?;
        let row: Option<(Uuid,)> = sqlx::query_as(
            "UPDATE route SET source_id = $2, destination_id = $3, distance = $4
             WHERE id = $1 RETURNING id",
        )
        .bind(id.as_uuid())
        .bind(input.source_id.as_uuid())
        .bind(input.destination_id.as_uuid())
        .bind(to_db_int(input.distance, "distance")?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_err("failed to update route", e))?;
        row.ok_or_else(|| StationError::not_found("Route", id))?;
        Ok(Route {
            id,
            source_id: input.source_id,
            destination_id: input.destination_id,
            distance: input.distance,
        })
    }

    async fn delete_route(&self, id: RouteId) -> Result<()> {
        let result = sqlx::query("DELETE FROM route WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_err("failed to delete route", e))?;
        if result.rows_affected() == 0 {
            return Err(StationError::not_found("Route", id));
        }
        Ok(())
    }

    async fn create_crew(&self, input: &NewCrew) -> Result<Crew> {
        let id = CrewId::new();
        sqlx::query("INSERT INTO crew (id, first_name, last_name) VALUES ($1, $2, $3)")
            .bind(id.as_uuid())
            .bind(&input.first_name)
            .bind(&input.last_name)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_err("failed to insert crew", e))?;
        Ok(Crew {
            id,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
        })
    }

    async fn get_crew(&self, id: CrewId) -> Result<Crew> {
        let row: Option<(Uuid, String, String)> =
            sqlx::query_as("SELECT id, first_name, last_name FROM crew WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| storage_err("failed to query crew", e))?;
        row.map(|(id, first_name, last_name)| Crew {
            id: CrewId::from_uuid(id),
            first_name,
            last_name,
        })
        .ok_or_else(|| StationError::not_found("Crew", id))
    }

    async fn list_crews(&self) -> Result<Vec<Crew>> {
        let rows: Vec<(Uuid, String, String)> =
            sqlx::query_as("SELECT id, first_name, last_name FROM crew ORDER BY created_at")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| storage_err("failed to list crews", e))?;
        Ok(rows
            .into_iter()
            .map(|(id, first_name, last_name)| Crew {
                id: CrewId::from_uuid(id),
                first_name,
                last_name,
            })
            .collect())
    }

    async fn update_crew(&self, id: CrewId, input: &NewCrew) -> Result<Crew> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            "UPDATE crew SET first_name = $2, last_name = $3 WHERE id = $1 RETURNING id",
        )
        .bind(id.as_uuid())
        .bind(&input.first_name)
        .bind(&input.last_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_err("failed to update crew", e))?;
        row.ok_or_else(|| StationError::not_found("Crew", id))?;
        Ok(Crew {
            id,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
        })
    }

    async fn delete_crew(&self, id: CrewId) -> Result<()> {
        let result = sqlx::query("DELETE FROM crew WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_err("failed to delete crew", e))?;
        if result.rows_affected() == 0 {
            return Err(StationError::not_found("Crew", id));
        }
        Ok(())
    }
}
