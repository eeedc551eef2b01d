//! Order listing, scoped by ownership.

use crate::error::AppError;
use crate::extractors::AuthUser;
use crate::projections::order_list_view;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use station_core::view::OrderListView;

/// GET `/orders`
///
/// Staff see every order; everyone else only their own.
pub async fn list(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<Vec<OrderListView>>, AppError> {
    let orders = state.engine.list_orders(&identity).await?;
    let mut views = Vec::with_capacity(orders.len());
    for entry in &orders {
        views.push(order_list_view(&state, entry).await?);
    }
    Ok(Json(views))
}
