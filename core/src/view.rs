//! View models: explicit list/detail projections of the domain entities.
//!
//! Each use case picks its own shape. List rows flatten references into
//! display strings; detail views nest the full referenced records. The
//! caller resolves the referenced entities and hands them in.

use crate::booking::{Order, Ticket};
use crate::catalog::{Crew, Route, Station, Train, TrainType};
use crate::ids::{CrewId, JourneyId, OrderId, RouteId, StationId, TicketId, TrainId, TrainTypeId};
use crate::journey::Journey;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Serializes timestamps as `YYYY-MM-DD HH:MM:SS`.
fn display_time<S: Serializer>(time: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error> {
    ser.serialize_str(&time.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Train type, same shape in lists and details.
#[derive(Clone, Debug, Serialize)]
pub struct TrainTypeView {
    /// Identifier.
    pub id: TrainTypeId,
    /// Name.
    pub name: String,
}

impl From<TrainType> for TrainTypeView {
    fn from(tt: TrainType) -> Self {
        Self {
            id: tt.id,
            name: tt.name,
        }
    }
}

/// Train list row: the type is flattened to its name.
#[derive(Clone, Debug, Serialize)]
pub struct TrainListView {
    /// Identifier.
    pub id: TrainId,
    /// Display name.
    pub name: String,
    /// Count of cargo sections.
    pub cargo_num: u32,
    /// Seats per cargo section.
    pub places_in_cargo: u32,
    /// Name of the train's type.
    pub train_type: String,
}

impl TrainListView {
    /// Projects a train with its resolved type.
    #[must_use]
    pub fn project(train: Train, train_type: &TrainType) -> Self {
        Self {
            id: train.id,
            name: train.name,
            cargo_num: train.cargo_num,
            places_in_cargo: train.places_in_cargo,
            train_type: train_type.name.clone(),
        }
    }
}

/// Train detail: the type is nested in full.
#[derive(Clone, Debug, Serialize)]
pub struct TrainDetailView {
    /// Identifier.
    pub id: TrainId,
    /// Display name.
    pub name: String,
    /// Count of cargo sections.
    pub cargo_num: u32,
    /// Seats per cargo section.
    pub places_in_cargo: u32,
    /// The train's type.
    pub train_type: TrainTypeView,
}

impl TrainDetailView {
    /// Projects a train with its resolved type.
    #[must_use]
    pub fn project(train: Train, train_type: TrainType) -> Self {
        Self {
            id: train.id,
            name: train.name,
            cargo_num: train.cargo_num,
            places_in_cargo: train.places_in_cargo,
            train_type: train_type.into(),
        }
    }
}

/// Station, same shape in lists and details.
#[derive(Clone, Debug, Serialize)]
pub struct StationView {
    /// Identifier.
    pub id: StationId,
    /// Name.
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl From<Station> for StationView {
    fn from(station: Station) -> Self {
        Self {
            id: station.id,
            name: station.name,
            latitude: station.latitude,
            longitude: station.longitude,
        }
    }
}

/// Route list row: endpoints flattened to their names.
#[derive(Clone, Debug, Serialize)]
pub struct RouteListView {
    /// Identifier.
    pub id: RouteId,
    /// Source station name.
    pub source: String,
    /// Destination station name.
    pub destination: String,
    /// Distance in kilometres.
    pub distance: u32,
}

impl RouteListView {
    /// Projects a route with its resolved endpoints.
    #[must_use]
    pub fn project(route: Route, source: &Station, destination: &Station) -> Self {
        Self {
            id: route.id,
            source: source.name.clone(),
            destination: destination.name.clone(),
            distance: route.distance,
        }
    }
}

/// Route detail: endpoints nested in full.
#[derive(Clone, Debug, Serialize)]
pub struct RouteDetailView {
    /// Identifier.
    pub id: RouteId,
    /// Source station.
    pub source: StationView,
    /// Destination station.
    pub destination: StationView,
    /// Distance in kilometres.
    pub distance: u32,
}

impl RouteDetailView {
    /// Projects a route with its resolved endpoints.
    #[must_use]
    pub fn project(route: Route, source: Station, destination: Station) -> Self {
        Self {
            id: route.id,
            source: source.into(),
            destination: destination.into(),
            distance: route.distance,
        }
    }
}

/// Crew member, same shape in lists and details.
#[derive(Clone, Debug, Serialize)]
pub struct CrewView {
    /// Identifier.
    pub id: CrewId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// "First Last" display form.
    pub full_name: String,
}

impl From<Crew> for CrewView {
    fn from(crew: Crew) -> Self {
        let full_name = crew.full_name();
        Self {
            id: crew.id,
            first_name: crew.first_name,
            last_name: crew.last_name,
            full_name,
        }
    }
}

/// "Source - Destination" display form of a route.
#[must_use]
pub fn route_display(source: &Station, destination: &Station) -> String {
    format!("{} - {}", source.name, destination.name)
}

/// `"Order <id> by <username>"` display form of an order.
#[must_use]
pub fn order_display(order: &Order, username: &str) -> String {
    format!("Order {} by {}", order.id, username)
}

/// Journey list row: route, train, and crew flattened to display strings.
#[derive(Clone, Debug, Serialize)]
pub struct JourneyListView {
    /// Identifier.
    pub id: JourneyId,
    /// "Source - Destination" route display.
    pub route: String,
    /// Train name.
    pub train: String,
    /// Departure instant.
    #[serde(serialize_with = "display_time")]
    pub departure_time: DateTime<Utc>,
    /// Arrival instant.
    #[serde(serialize_with = "display_time")]
    pub arrival_time: DateTime<Utc>,
    /// Crew full names.
    pub crew: Vec<String>,
}

impl JourneyListView {
    /// Projects a journey with its resolved references.
    #[must_use]
    pub fn project(
        journey: &Journey,
        source: &Station,
        destination: &Station,
        train: &Train,
        crew: &[Crew],
    ) -> Self {
        Self {
            id: journey.id,
            route: route_display(source, destination),
            train: train.name.clone(),
            departure_time: journey.departure_time,
            arrival_time: journey.arrival_time,
            crew: crew.iter().map(Crew::full_name).collect(),
        }
    }
}

/// Journey detail: route, train, and crew nested in full.
#[derive(Clone, Debug, Serialize)]
pub struct JourneyDetailView {
    /// Identifier.
    pub id: JourneyId,
    /// Full route with nested stations.
    pub route: RouteDetailView,
    /// Full train with nested type.
    pub train: TrainDetailView,
    /// Departure instant.
    #[serde(serialize_with = "display_time")]
    pub departure_time: DateTime<Utc>,
    /// Arrival instant.
    #[serde(serialize_with = "display_time")]
    pub arrival_time: DateTime<Utc>,
    /// Assigned crew members.
    pub crew: Vec<CrewView>,
}

impl JourneyDetailView {
    /// Projects a journey with its resolved references.
    #[must_use]
    pub fn project(
        journey: &Journey,
        route: RouteDetailView,
        train: TrainDetailView,
        crew: Vec<Crew>,
    ) -> Self {
        Self {
            id: journey.id,
            route,
            train,
            departure_time: journey.departure_time,
            arrival_time: journey.arrival_time,
            crew: crew.into_iter().map(CrewView::from).collect(),
        }
    }
}

/// Ticket list row: journey and order flattened to display strings.
#[derive(Clone, Debug, Serialize)]
pub struct TicketListView {
    /// Identifier.
    pub id: TicketId,
    /// Cargo section index.
    pub cargo: u32,
    /// Seat position.
    pub seats: u32,
    /// "Source - Destination" journey display.
    pub journey: String,
    /// "Order <id> by <username>" display.
    pub order: String,
}

impl TicketListView {
    /// Projects a ticket with its resolved journey endpoints and order.
    #[must_use]
    pub fn project(
        ticket: &Ticket,
        source: &Station,
        destination: &Station,
        order: &Order,
        username: &str,
    ) -> Self {
        Self {
            id: ticket.id,
            cargo: ticket.cargo,
            seats: ticket.seats,
            journey: route_display(source, destination),
            order: order_display(order, username),
        }
    }
}

/// Order row: the purchasing user flattened to their username.
#[derive(Clone, Debug, Serialize)]
pub struct OrderView {
    /// Identifier.
    pub id: OrderId,
    /// Creation instant.
    #[serde(serialize_with = "display_time")]
    pub created_at: DateTime<Utc>,
    /// Purchasing user's login name.
    pub user: String,
}

impl OrderView {
    /// Projects an order with its resolved user.
    #[must_use]
    pub fn project(order: &Order, username: &str) -> Self {
        Self {
            id: order.id,
            created_at: order.created_at,
            user: username.to_string(),
        }
    }
}

/// Order list row: order fields plus nested ticket rows.
#[derive(Clone, Debug, Serialize)]
pub struct OrderListView {
    /// Identifier.
    pub id: OrderId,
    /// Creation instant.
    #[serde(serialize_with = "display_time")]
    pub created_at: DateTime<Utc>,
    /// Purchasing user's login name.
    pub user: String,
    /// Tickets attached to the order.
    pub tickets: Vec<TicketListView>,
}

impl OrderListView {
    /// Projects an order with its resolved user and ticket rows.
    #[must_use]
    pub fn project(order: &Order, username: &str, tickets: Vec<TicketListView>) -> Self {
        Self {
            id: order.id,
            created_at: order.created_at,
            user: username.to_string(),
            tickets,
        }
    }
}

/// Ticket detail: journey and order nested in full.
#[derive(Clone, Debug, Serialize)]
pub struct TicketDetailView {
    /// Identifier.
    pub id: TicketId,
    /// Cargo section index.
    pub cargo: u32,
    /// Seat position.
    pub seats: u32,
    /// Full journey with nested route and train.
    pub journey: JourneyDetailView,
    /// Owning order.
    pub order: OrderView,
}

impl TicketDetailView {
    /// Projects a ticket with its resolved journey and order.
    #[must_use]
    pub fn project(ticket: &Ticket, journey: JourneyDetailView, order: OrderView) -> Self {
        Self {
            id: ticket.id,
            cargo: ticket.cargo,
            seats: ticket.seats,
            journey,
            order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::UserId;
    use chrono::TimeZone;

    fn station(name: &str) -> Station {
        Station {
            id: StationId::new(),
            name: name.to_string(),
            latitude: 50.5,
            longitude: 40.4,
        }
    }

    #[test]
    fn route_display_joins_names() {
        assert_eq!(
            route_display(&station("Kyiv"), &station("Lviv")),
            "Kyiv - Lviv"
        );
    }

    #[test]
    fn train_list_flattens_type_name() {
        let tt = TrainType {
            id: TrainTypeId::new(),
            name: "Intercity".to_string(),
        };
        let train = Train {
            id: TrainId::new(),
            name: "Test train".to_string(),
            cargo_num: 150,
            places_in_cargo: 10,
            train_type_id: tt.id,
        };
        let view = TrainListView::project(train, &tt);
        assert_eq!(view.train_type, "Intercity");
    }

    #[test]
    fn timestamps_use_display_format() {
        let Some(created_at) = Utc.with_ymd_and_hms(2024, 10, 8, 23, 0, 0).single() else {
            return;
        };
        let order = Order {
            id: OrderId::new(),
            user_id: UserId::new(),
            created_at,
        };
        let view = OrderView::project(&order, "alice");
        let json = serde_json::to_value(&view).unwrap_or_default();
        assert_eq!(json["created_at"], "2024-10-08 23:00:00");
        assert_eq!(json["user"], "alice");
    }

    #[test]
    fn order_label_includes_id_and_user() {
        let order = Order {
            id: OrderId::new(),
            user_id: UserId::new(),
            created_at: Utc::now(),
        };
        let label = order_display(&order, "bob");
        assert!(label.starts_with("Order "));
        assert!(label.ends_with("by bob"));
    }
}
