//! Ticket listing and reservation.

use crate::error::AppError;
use crate::extractors::AuthUser;
use crate::projections::{ticket_detail_view, ticket_list_view};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use station_core::ids::{JourneyId, TicketId};
use station_core::view::{TicketDetailView, TicketListView};
use uuid::Uuid;

/// Body of a reservation request.
#[derive(Debug, Deserialize)]
pub struct ReserveRequest {
    /// Journey to book a seat on.
    pub journey_id: JourneyId,
    /// Cargo section index, 1-based.
    pub cargo: u32,
    /// Seat position within the section.
    pub seats: u32,
}

/// GET `/tickets`
///
/// Staff see every ticket; everyone else only their own.
pub async fn list(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<Vec<TicketListView>>, AppError> {
    let tickets = state.engine.list_tickets(&identity).await?;
    let mut views = Vec::with_capacity(tickets.len());
    for ticket in &tickets {
        views.push(ticket_list_view(&state, ticket).await?);
    }
    Ok(Json(views))
}

/// POST `/tickets`
///
/// Reserves a seat; the engine resolves the order the ticket attaches to.
pub async fn reserve(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(request): Json<ReserveRequest>,
) -> Result<(StatusCode, Json<TicketDetailView>), AppError> {
    let ticket = state
        .engine
        .reserve(&identity, request.journey_id, request.cargo, request.seats)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ticket_detail_view(&state, &ticket).await?),
    ))
}

/// GET `/tickets/:id`
///
/// Non-staff may only fetch their own tickets.
pub async fn retrieve(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TicketDetailView>, AppError> {
    let ticket = state
        .engine
        .get_ticket(&identity, TicketId::from_uuid(id))
        .await?;
    Ok(Json(ticket_detail_view(&state, &ticket).await?))
}
