//! HTTP handlers, one module per resource.
//!
//! Reads require any authenticated account; catalog and journey mutations
//! require staff. Ownership scoping for orders and tickets lives in the
//! reservation engine, not here.

pub mod crews;
pub mod journeys;
pub mod orders;
pub mod routes;
pub mod stations;
pub mod tickets;
pub mod train_types;
pub mod trains;
pub mod users;
