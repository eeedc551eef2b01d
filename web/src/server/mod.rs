//! Router assembly and operational endpoints.

mod health;
mod routes;

pub use routes::build_router;
