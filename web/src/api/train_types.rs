//! Train type catalog endpoints.

use crate::error::AppError;
use crate::extractors::{AuthUser, StaffUser};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use station_core::catalog::NewTrainType;
use station_core::ids::TrainTypeId;
use station_core::view::TrainTypeView;
use uuid::Uuid;

/// GET `/train-types`
pub async fn list(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<Json<Vec<TrainTypeView>>, AppError> {
    let items = state.catalog.list_train_types().await?;
    Ok(Json(items.into_iter().map(TrainTypeView::from).collect()))
}

/// POST `/train-types`
pub async fn create(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Json(input): Json<NewTrainType>,
) -> Result<(StatusCode, Json<TrainTypeView>), AppError> {
    let created = state.catalog.create_train_type(&input).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// GET `/train-types/:id`
pub async fn retrieve(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TrainTypeView>, AppError> {
    let found = state
        .catalog
        .get_train_type(TrainTypeId::from_uuid(id))
        .await?;
    Ok(Json(found.into()))
}

/// PUT `/train-types/:id`
pub async fn update(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<Uuid>,
    Json(input): Json<NewTrainType>,
) -> Result<Json<TrainTypeView>, AppError> {
    let updated = state
        .catalog
        .update_train_type(TrainTypeId::from_uuid(id), &input)
        .await?;
    Ok(Json(updated.into()))
}

/// DELETE `/train-types/:id`
pub async fn remove(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .catalog
        .delete_train_type(TrainTypeId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
