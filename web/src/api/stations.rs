//! Station catalog endpoints.

use crate::error::AppError;
use crate::extractors::{AuthUser, StaffUser};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use station_core::catalog::NewStation;
use station_core::ids::StationId;
use station_core::view::StationView;
use uuid::Uuid;

/// GET `/stations`
pub async fn list(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<Json<Vec<StationView>>, AppError> {
    let stations = state.catalog.list_stations().await?;
    Ok(Json(stations.into_iter().map(StationView::from).collect()))
}

/// POST `/stations`
pub async fn create(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Json(input): Json<NewStation>,
) -> Result<(StatusCode, Json<StationView>), AppError> {
    let created = state.catalog.create_station(&input).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// GET `/stations/:id`
pub async fn retrieve(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StationView>, AppError> {
    let found = state.catalog.get_station(StationId::from_uuid(id)).await?;
    Ok(Json(found.into()))
}

/// PUT `/stations/:id`
pub async fn update(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<Uuid>,
    Json(input): Json<NewStation>,
) -> Result<Json<StationView>, AppError> {
    let updated = state
        .catalog
        .update_station(StationId::from_uuid(id), &input)
        .await?;
    Ok(Json(updated.into()))
}

/// DELETE `/stations/:id`
pub async fn remove(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .catalog
        .delete_station(StationId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
