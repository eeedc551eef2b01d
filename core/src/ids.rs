//! Typed identifiers for every entity in the booking domain.
//!
//! Each identifier is a UUID newtype so that a `JourneyId` can never be
//! passed where an `OrderId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing `Uuid`.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id! {
    /// Unique identifier for a train type.
    TrainTypeId
}

entity_id! {
    /// Unique identifier for a train.
    TrainId
}

entity_id! {
    /// Unique identifier for a station.
    StationId
}

entity_id! {
    /// Unique identifier for a route.
    RouteId
}

entity_id! {
    /// Unique identifier for a crew member.
    CrewId
}

entity_id! {
    /// Unique identifier for a journey.
    JourneyId
}

entity_id! {
    /// Unique identifier for an order.
    OrderId
}

entity_id! {
    /// Unique identifier for a ticket.
    TicketId
}

entity_id! {
    /// Unique identifier for a user.
    UserId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct() {
        assert_ne!(JourneyId::new(), JourneyId::new());
    }

    #[test]
    fn id_round_trips_through_uuid() {
        let id = OrderId::new();
        assert_eq!(OrderId::from_uuid(*id.as_uuid()), id);
    }

    #[test]
    fn id_displays_as_uuid() {
        let uuid = Uuid::new_v4();
        assert_eq!(TrainId::from_uuid(uuid).to_string(), uuid.to_string());
    }
}
