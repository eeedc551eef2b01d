//! View assembly: resolves the references a view model needs and projects.
//!
//! The core view types take fully-resolved entities; these helpers do the
//! lookups against [`AppState`] so handlers stay a single call.

use crate::error::AppError;
use crate::state::AppState;
use station_core::booking::{Order, OrderWithTickets, Ticket};
use station_core::catalog::{Crew, Route, Station, Train};
use station_core::journey::Journey;
use station_core::view::{
    JourneyDetailView, JourneyListView, OrderListView, OrderView, RouteDetailView, RouteListView,
    TicketDetailView, TicketListView, TrainDetailView, TrainListView,
};

/// Train list row with the type name resolved.
pub async fn train_list_view(state: &AppState, train: Train) -> Result<TrainListView, AppError> {
    let train_type = state.catalog.get_train_type(train.train_type_id).await?;
    Ok(TrainListView::project(train, &train_type))
}

/// Train detail with the full type nested.
pub async fn train_detail_view(
    state: &AppState,
    train: Train,
) -> Result<TrainDetailView, AppError> {
    let train_type = state.catalog.get_train_type(train.train_type_id).await?;
    Ok(TrainDetailView::project(train, train_type))
}

async fn route_endpoints(state: &AppState, route: &Route) -> Result<(Station, Station), AppError> {
    let source = state.catalog.get_station(route.source_id).await?;
    let destination = state.catalog.get_station(route.destination_id).await?;
    Ok((source, destination))
}

/// Route list row with endpoint names resolved.
pub async fn route_list_view(state: &AppState, route: Route) -> Result<RouteListView, AppError> {
    let (source, destination) = route_endpoints(state, &route).await?;
    Ok(RouteListView::project(route, &source, &destination))
}

/// Route detail with full endpoint stations nested.
pub async fn route_detail_view(
    state: &AppState,
    route: Route,
) -> Result<RouteDetailView, AppError> {
    let (source, destination) = route_endpoints(state, &route).await?;
    Ok(RouteDetailView::project(route, source, destination))
}

async fn journey_crew(state: &AppState, journey: &Journey) -> Result<Vec<Crew>, AppError> {
    let mut crew = Vec::with_capacity(journey.crew.len());
    for id in &journey.crew {
        crew.push(state.catalog.get_crew(*id).await?);
    }
    Ok(crew)
}

/// Journey list row with route, train, and crew display strings.
pub async fn journey_list_view(
    state: &AppState,
    journey: &Journey,
) -> Result<JourneyListView, AppError> {
    let route = state.catalog.get_route(journey.route_id).await?;
    let (source, destination) = route_endpoints(state, &route).await?;
    let train = state.catalog.get_train(journey.train_id).await?;
    let crew = journey_crew(state, journey).await?;
    Ok(JourneyListView::project(
        journey,
        &source,
        &destination,
        &train,
        &crew,
    ))
}

/// Journey detail with route, train, and crew nested in full.
pub async fn journey_detail_view(
    state: &AppState,
    journey: &Journey,
) -> Result<JourneyDetailView, AppError> {
    let route = state.catalog.get_route(journey.route_id).await?;
    let route = route_detail_view(state, route).await?;
    let train = state.catalog.get_train(journey.train_id).await?;
    let train = train_detail_view(state, train).await?;
    let crew = journey_crew(state, journey).await?;
    Ok(JourneyDetailView::project(journey, route, train, crew))
}

async fn order_username(state: &AppState, order: &Order) -> Result<String, AppError> {
    Ok(state.users.get(order.user_id).await?.username)
}

/// Ticket list row with journey and order display strings.
pub async fn ticket_list_view(
    state: &AppState,
    ticket: &Ticket,
) -> Result<TicketListView, AppError> {
    let journey = state.registry.get(ticket.journey_id).await?;
    let route = state.catalog.get_route(journey.route_id).await?;
    let (source, destination) = route_endpoints(state, &route).await?;
    let order = state.orders.get(ticket.order_id).await?;
    let username = order_username(state, &order).await?;
    Ok(TicketListView::project(
        ticket,
        &source,
        &destination,
        &order,
        &username,
    ))
}

/// Ticket detail with the full journey and order nested.
pub async fn ticket_detail_view(
    state: &AppState,
    ticket: &Ticket,
) -> Result<TicketDetailView, AppError> {
    let journey = state.registry.get(ticket.journey_id).await?;
    let journey = journey_detail_view(state, &journey).await?;
    let order = state.orders.get(ticket.order_id).await?;
    let username = order_username(state, &order).await?;
    let order = OrderView::project(&order, &username);
    Ok(TicketDetailView::project(ticket, journey, order))
}

/// Order row with its owner resolved and ticket rows nested.
pub async fn order_list_view(
    state: &AppState,
    entry: &OrderWithTickets,
) -> Result<OrderListView, AppError> {
    let username = order_username(state, &entry.order).await?;
    let mut tickets = Vec::with_capacity(entry.tickets.len());
    for ticket in &entry.tickets {
        tickets.push(ticket_list_view(state, ticket).await?);
    }
    Ok(OrderListView::project(&entry.order, &username, tickets))
}
