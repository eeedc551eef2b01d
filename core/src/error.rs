//! Error taxonomy for the booking domain.
//!
//! Every fallible operation in the core surfaces one of these variants
//! synchronously; nothing is retried or silently corrected.

use crate::ids::JourneyId;
use thiserror::Error;

/// Result alias used throughout the domain crates.
pub type Result<T> = std::result::Result<T, StationError>;

/// Domain errors surfaced by repositories and services.
#[derive(Debug, Error)]
pub enum StationError {
    /// A referenced entity does not exist.
    #[error("{resource} with id {id} not found")]
    NotFound {
        /// Kind of entity that was looked up.
        resource: &'static str,
        /// Identifier that failed to resolve.
        id: String,
    },

    /// A ticket already occupies `(journey, seats)`.
    #[error("seat {seats} already exists for journey {journey_id}")]
    DuplicateSeat {
        /// Journey the seat belongs to.
        journey_id: JourneyId,
        /// Seat position that is already taken.
        seats: u32,
    },

    /// Requested cargo section exceeds the train's capacity ceiling.
    #[error("cargo {cargo} exceeds available capacity of {available}")]
    CapacityExceeded {
        /// Requested cargo section.
        cargo: u32,
        /// Capacity ceiling of the journey's train.
        available: u32,
    },

    /// Journey arrival is not strictly later than departure.
    #[error("departure time cannot be later than arrival time")]
    InvalidTimeRange,

    /// Route source and destination are the same station.
    #[error("the destination and source cannot be the same")]
    SameSourceDestination,

    /// Input failed a shape check (zero seat index, empty name, ...).
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed to see or change the resource.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The persistent store failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl StationError {
    /// Builds a [`StationError::NotFound`] for `resource` / `id`.
    pub fn not_found(resource: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Builds a [`StationError::Validation`] from any message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Builds a [`StationError::Storage`] from any backend error.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_formats_resource_and_id() {
        let err = StationError::not_found("Journey", "abc");
        assert_eq!(err.to_string(), "Journey with id abc not found");
    }

    #[test]
    fn capacity_exceeded_reports_both_numbers() {
        let err = StationError::CapacityExceeded {
            cargo: 151,
            available: 150,
        };
        assert_eq!(
            err.to_string(),
            "cargo 151 exceeds available capacity of 150"
        );
    }
}
