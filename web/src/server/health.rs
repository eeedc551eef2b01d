//! Liveness and readiness probes.

use crate::error::AppError;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use serde::Serialize;

/// Probe response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `"ok"` when the probe passes.
    pub status: &'static str,
}

/// GET `/health` — process is up.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET `/ready` — the backing store answers queries.
pub async fn ready(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    // A cheap read is enough to prove the store is reachable.
    state.catalog.list_train_types().await?;
    Ok(Json(HealthResponse { status: "ok" }))
}
