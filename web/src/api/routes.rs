//! Route catalog endpoints.
//!
//! Creation and update run [`NewRoute::validate`] before touching the
//! store, so a route with identical endpoints never reaches it.

use crate::error::AppError;
use crate::extractors::{AuthUser, StaffUser};
use crate::projections::{route_detail_view, route_list_view};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use station_core::catalog::NewRoute;
use station_core::ids::RouteId;
use station_core::view::{RouteDetailView, RouteListView};
use uuid::Uuid;

/// GET `/routes`
pub async fn list(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<Json<Vec<RouteListView>>, AppError> {
    let routes = state.catalog.list_routes().await?;
    let mut views = Vec::with_capacity(routes.len());
    for route in routes {
        views.push(route_list_view(&state, route).await?);
    }
    Ok(Json(views))
}

/// POST `/routes`
pub async fn create(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Json(input): Json<NewRoute>,
) -> Result<(StatusCode, Json<RouteDetailView>), AppError> {
    input.validate()?;
    state.catalog.get_station(input.source_id).await?;
    state.catalog.get_station(input.destination_id).await?;
    let created = state.catalog.create_route(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(route_detail_view(&state, created).await?),
    ))
}

/// GET `/routes/:id`
pub async fn retrieve(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RouteDetailView>, AppError> {
    let route = state.catalog.get_route(RouteId::from_uuid(id)).await?;
    Ok(Json(route_detail_view(&state, route).await?))
}

/// PUT `/routes/:id`
pub async fn update(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<Uuid>,
    Json(input): Json<NewRoute>,
) -> Result<Json<RouteDetailView>, AppError> {
    input.validate()?;
    state.catalog.get_station(input.source_id).await?;
    state.catalog.get_station(input.destination_id).await?;
    let updated = state
        .catalog
        .update_route(RouteId::from_uuid(id), &input)
        .await?;
    Ok(Json(route_detail_view(&state, updated).await?))
}

/// DELETE `/routes/:id`
pub async fn remove(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete_route(RouteId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
