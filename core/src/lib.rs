//! Domain core for the train station booking backend.
//!
//! This crate holds the entities, the error taxonomy, the repository
//! traits every storage backend implements, and the two services with
//! behavior of their own:
//!
//! - [`journey::JourneyRegistry`] guards journey writes (time window,
//!   referential checks);
//! - [`booking::ReservationEngine`] issues tickets (seat uniqueness,
//!   cargo capacity) and resolves the order each ticket attaches to.
//!
//! Storage is injected as `Arc<dyn ...Repository>`; the `postgres` crate
//! provides the production implementations, and [`memory::InMemoryStore`]
//! (behind the `test-utils` feature) backs unit and HTTP tests.

pub mod auth;
pub mod booking;
pub mod catalog;
pub mod error;
pub mod ids;
pub mod journey;
pub mod view;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

#[cfg(test)]
mod engine_tests;

pub use booking::{Order, OrderWithTickets, ReservationEngine, Ticket};
pub use error::{Result, StationError};
pub use journey::{Journey, JourneyRegistry};
