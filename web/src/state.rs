//! Shared application state.

use crate::config::Config;
use station_core::auth::{SessionRepository, UserRepository};
use station_core::booking::{OrderRepository, ReservationEngine, TicketRepository};
use station_core::catalog::CatalogRepository;
use station_core::journey::{JourneyRegistry, JourneyRepository};
use std::sync::Arc;

/// Application state shared across all handlers.
///
/// Repositories are stored behind trait objects so the same router serves
/// the Postgres-backed binary and the in-memory test harness.
#[derive(Clone)]
pub struct AppState {
    /// Catalog reference data.
    pub catalog: Arc<dyn CatalogRepository>,
    /// User accounts.
    pub users: Arc<dyn UserRepository>,
    /// Bearer sessions.
    pub sessions: Arc<dyn SessionRepository>,
    /// Orders.
    pub orders: Arc<dyn OrderRepository>,
    /// Tickets.
    pub tickets: Arc<dyn TicketRepository>,
    /// Journey write-side guard.
    pub registry: JourneyRegistry,
    /// Ticket issuing service.
    pub engine: ReservationEngine,
    /// Runtime configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Assembles the state from its repositories, wiring the services.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        journeys: Arc<dyn JourneyRepository>,
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        orders: Arc<dyn OrderRepository>,
        tickets: Arc<dyn TicketRepository>,
        config: Config,
    ) -> Self {
        let registry = JourneyRegistry::new(Arc::clone(&journeys), Arc::clone(&catalog));
        let engine = ReservationEngine::new(
            journeys,
            Arc::clone(&catalog),
            Arc::clone(&orders),
            Arc::clone(&tickets),
        );
        Self {
            catalog,
            users,
            sessions,
            orders,
            tickets,
            registry,
            engine,
            config: Arc::new(config),
        }
    }
}
