//! Route table for the booking API.

use crate::api;
use crate::middleware::correlation_id_layer;
use crate::server::health;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};

/// Builds the full application router over `state`.
///
/// Everything under `/api/v1/station` requires a bearer token; catalog and
/// journey mutations additionally require staff. `/api/v1/user/register`
/// and `/api/v1/user/login` are the only open endpoints besides the
/// probes.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let user = Router::new()
        .route("/register", post(api::users::register))
        .route("/login", post(api::users::login))
        .route("/me", get(api::users::me));

    let station = Router::new()
        .route(
            "/train-types",
            get(api::train_types::list).post(api::train_types::create),
        )
        .route(
            "/train-types/:id",
            get(api::train_types::retrieve)
                .put(api::train_types::update)
                .delete(api::train_types::remove),
        )
        .route("/trains", get(api::trains::list).post(api::trains::create))
        .route(
            "/trains/:id",
            get(api::trains::retrieve)
                .put(api::trains::update)
                .delete(api::trains::remove),
        )
        .route(
            "/stations",
            get(api::stations::list).post(api::stations::create),
        )
        .route(
            "/stations/:id",
            get(api::stations::retrieve)
                .put(api::stations::update)
                .delete(api::stations::remove),
        )
        .route("/routes", get(api::routes::list).post(api::routes::create))
        .route(
            "/routes/:id",
            get(api::routes::retrieve)
                .put(api::routes::update)
                .delete(api::routes::remove),
        )
        .route("/crews", get(api::crews::list).post(api::crews::create))
        .route(
            "/crews/:id",
            get(api::crews::retrieve)
                .put(api::crews::update)
                .delete(api::crews::remove),
        )
        .route(
            "/journeys",
            get(api::journeys::list).post(api::journeys::create),
        )
        .route(
            "/journeys/:id",
            get(api::journeys::retrieve)
                .put(api::journeys::update)
                .delete(api::journeys::remove),
        )
        .route("/orders", get(api::orders::list))
        .route(
            "/tickets",
            get(api::tickets::list).post(api::tickets::reserve),
        )
        .route("/tickets/:id", get(api::tickets::retrieve));

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .nest("/api/v1/user", user)
        .nest("/api/v1/station", station)
        .layer(correlation_id_layer())
        .with_state(state)
}
