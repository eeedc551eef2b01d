//! Crew catalog endpoints.

use crate::error::AppError;
use crate::extractors::{AuthUser, StaffUser};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use station_core::catalog::NewCrew;
use station_core::ids::CrewId;
use station_core::view::CrewView;
use uuid::Uuid;

/// GET `/crews`
pub async fn list(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<Json<Vec<CrewView>>, AppError> {
    let crews = state.catalog.list_crews().await?;
    Ok(Json(crews.into_iter().map(CrewView::from).collect()))
}

/// POST `/crews`
pub async fn create(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Json(input): Json<NewCrew>,
) -> Result<(StatusCode, Json<CrewView>), AppError> {
    let created = state.catalog.create_crew(&input).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// GET `/crews/:id`
pub async fn retrieve(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CrewView>, AppError> {
    let found = state.catalog.get_crew(CrewId::from_uuid(id)).await?;
    Ok(Json(found.into()))
}

/// PUT `/crews/:id`
pub async fn update(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<Uuid>,
    Json(input): Json<NewCrew>,
) -> Result<Json<CrewView>, AppError> {
    let updated = state
        .catalog
        .update_crew(CrewId::from_uuid(id), &input)
        .await?;
    Ok(Json(updated.into()))
}

/// DELETE `/crews/:id`
pub async fn remove(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete_crew(CrewId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
