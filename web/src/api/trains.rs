//! Train catalog endpoints.

use crate::error::AppError;
use crate::extractors::{AuthUser, StaffUser};
use crate::projections::{train_detail_view, train_list_view};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use station_core::catalog::NewTrain;
use station_core::ids::TrainId;
use station_core::view::{TrainDetailView, TrainListView};
use uuid::Uuid;

/// GET `/trains`
pub async fn list(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<Json<Vec<TrainListView>>, AppError> {
    let trains = state.catalog.list_trains().await?;
    let mut views = Vec::with_capacity(trains.len());
    for train in trains {
        views.push(train_list_view(&state, train).await?);
    }
    Ok(Json(views))
}

/// POST `/trains`
pub async fn create(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Json(input): Json<NewTrain>,
) -> Result<(StatusCode, Json<TrainDetailView>), AppError> {
    // The type must exist before the train can reference it.
    state.catalog.get_train_type(input.train_type_id).await?;
    let created = state.catalog.create_train(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(train_detail_view(&state, created).await?),
    ))
}

/// GET `/trains/:id`
pub async fn retrieve(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TrainDetailView>, AppError> {
    let train = state.catalog.get_train(TrainId::from_uuid(id)).await?;
    Ok(Json(train_detail_view(&state, train).await?))
}

/// PUT `/trains/:id`
pub async fn update(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<Uuid>,
    Json(input): Json<NewTrain>,
) -> Result<Json<TrainDetailView>, AppError> {
    state.catalog.get_train_type(input.train_type_id).await?;
    let updated = state
        .catalog
        .update_train(TrainId::from_uuid(id), &input)
        .await?;
    Ok(Json(train_detail_view(&state, updated).await?))
}

/// DELETE `/trains/:id`
pub async fn remove(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete_train(TrainId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
