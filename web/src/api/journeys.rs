//! Journey endpoints, backed by the registry.
//!
//! All writes go through [`JourneyRegistry`](station_core::journey::JourneyRegistry),
//! which owns the time-window and reference checks.

use crate::error::AppError;
use crate::extractors::{AuthUser, StaffUser};
use crate::projections::{journey_detail_view, journey_list_view};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use station_core::ids::{JourneyId, RouteId, TrainId};
use station_core::journey::{JourneyFilter, NewJourney};
use station_core::view::{JourneyDetailView, JourneyListView};
use uuid::Uuid;

/// Optional `?route_id=&train_id=` listing filters.
#[derive(Debug, Deserialize)]
pub struct JourneyQuery {
    /// Only journeys on this route.
    pub route_id: Option<Uuid>,
    /// Only journeys driven by this train.
    pub train_id: Option<Uuid>,
}

impl From<JourneyQuery> for JourneyFilter {
    fn from(query: JourneyQuery) -> Self {
        Self {
            route_id: query.route_id.map(RouteId::from_uuid),
            train_id: query.train_id.map(TrainId::from_uuid),
        }
    }
}

/// GET `/journeys`
pub async fn list(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Query(query): Query<JourneyQuery>,
) -> Result<Json<Vec<JourneyListView>>, AppError> {
    let journeys = state.registry.list(&query.into()).await?;
    let mut views = Vec::with_capacity(journeys.len());
    for journey in &journeys {
        views.push(journey_list_view(&state, journey).await?);
    }
    Ok(Json(views))
}

/// POST `/journeys`
pub async fn create(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Json(input): Json<NewJourney>,
) -> Result<(StatusCode, Json<JourneyDetailView>), AppError> {
    let created = state.registry.create(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(journey_detail_view(&state, &created).await?),
    ))
}

/// GET `/journeys/:id`
pub async fn retrieve(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<JourneyDetailView>, AppError> {
    let journey = state.registry.get(JourneyId::from_uuid(id)).await?;
    Ok(Json(journey_detail_view(&state, &journey).await?))
}

/// PUT `/journeys/:id`
pub async fn update(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<Uuid>,
    Json(input): Json<NewJourney>,
) -> Result<Json<JourneyDetailView>, AppError> {
    let updated = state
        .registry
        .update(JourneyId::from_uuid(id), &input)
        .await?;
    Ok(Json(journey_detail_view(&state, &updated).await?))
}

/// DELETE `/journeys/:id`
pub async fn remove(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.registry.delete(JourneyId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
