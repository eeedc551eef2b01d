//! HTTP layer of the train station booking service.
//!
//! Exposes the catalog, journey, and reservation operations of
//! `station-core` over an Axum router, with bearer-token authentication
//! and per-request correlation IDs.

pub mod api;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod projections;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::AppError;
pub use server::build_router;
pub use state::AppState;
