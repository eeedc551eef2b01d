//! In-memory repository implementations for tests.
//!
//! One [`InMemoryStore`] implements every repository trait over a single
//! `RwLock`, so ticket inserts are serialized exactly like they would be
//! by the database's unique index: concurrent same-seat inserts produce
//! one winner and one `DuplicateSeat`.

use crate::auth::{Session, SessionRepository, User, UserRepository};
use crate::booking::{Order, OrderRepository, Ticket, TicketDraft, TicketRepository};
use crate::catalog::{
    CatalogRepository, Crew, NewCrew, NewRoute, NewStation, NewTrain, NewTrainType, Route, Station,
    Train, TrainType,
};
use crate::error::{Result, StationError};
use crate::ids::{
    CrewId, JourneyId, OrderId, RouteId, StationId, TicketId, TrainId, TrainTypeId, UserId,
};
use crate::journey::{Journey, JourneyFilter, JourneyRepository, NewJourney};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    train_types: Vec<TrainType>,
    trains: Vec<Train>,
    stations: Vec<Station>,
    routes: Vec<Route>,
    crews: Vec<Crew>,
    journeys: Vec<Journey>,
    users: Vec<User>,
    sessions: Vec<Session>,
    orders: Vec<Order>,
    tickets: Vec<Ticket>,
}

/// In-memory backing store implementing every repository trait.
///
/// Cloning is cheap and shares the underlying tables.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn find_or_not_found<T: Clone>(
    items: &[T],
    pred: impl Fn(&T) -> bool,
    resource: &'static str,
    id: impl std::fmt::Display,
) -> Result<T> {
    items
        .iter()
        .find(|item| pred(item))
        .cloned()
        .ok_or_else(|| StationError::not_found(resource, id))
}

#[async_trait]
impl CatalogRepository for InMemoryStore {
    async fn create_train_type(&self, input: &NewTrainType) -> Result<TrainType> {
        let mut tables = self.write();
        if tables.train_types.iter().any(|tt| tt.name == input.name) {
            return Err(StationError::validation("train type name already exists"));
        }
        let tt = TrainType {
            id: TrainTypeId::new(),
            name: input.name.clone(),
        };
        tables.train_types.push(tt.clone());
        Ok(tt)
    }

    async fn get_train_type(&self, id: TrainTypeId) -> Result<TrainType> {
        find_or_not_found(&self.read().train_types, |tt| tt.id == id, "TrainType", id)
    }

    async fn list_train_types(&self) -> Result<Vec<TrainType>> {
        Ok(self.read().train_types.clone())
    }

    async fn update_train_type(&self, id: TrainTypeId, input: &NewTrainType) -> Result<TrainType> {
        let mut tables = self.write();
        let tt = tables
            .train_types
            .iter_mut()
            .find(|tt| tt.id == id)
            .ok_or_else(|| StationError::not_found("TrainType", id))?;
        tt.name = input.name.clone();
        Ok(tt.clone())
    }

    async fn delete_train_type(&self, id: TrainTypeId) -> Result<()> {
        let mut tables = self.write();
        let before = tables.train_types.len();
        tables.train_types.retain(|tt| tt.id != id);
        if tables.train_types.len() == before {
            return Err(StationError::not_found("TrainType", id));
        }
        Ok(())
    }

    async fn create_train(&self, input: &NewTrain) -> Result<Train> {
        let mut tables = self.write();
        if !tables
            .train_types
            .iter()
            .any(|tt| tt.id == input.train_type_id)
        {
            return Err(StationError::not_found("TrainType", input.train_type_id));
        }
        let train = Train {
            id: TrainId::new(),
            name: input.name.clone(),
            cargo_num: input.cargo_num,
            places_in_cargo: input.places_in_cargo,
            train_type_id: input.train_type_id,
        };
        tables.trains.push(train.clone());
        Ok(train)
    }

    async fn get_train(&self, id: TrainId) -> Result<Train> {
        find_or_not_found(&self.read().trains, |t| t.id == id, "Train", id)
    }

    async fn list_trains(&self) -> Result<Vec<Train>> {
        Ok(self.read().trains.clone())
    }

    async fn update_train(&self, id: TrainId, input: &NewTrain) -> Result<Train> {
        let mut tables = self.write();
        if !tables
            .train_types
            .iter()
            .any(|tt| tt.id == input.train_type_id)
        {
            return Err(StationError::not_found("TrainType", input.train_type_id));
        }
        let train = tables
            .trains
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StationError::not_found("Train", id))?;
        train.name = input.name.clone();
        train.cargo_num = input.cargo_num;
        train.places_in_cargo = input.places_in_cargo;
        train.train_type_id = input.train_type_id;
        Ok(train.clone())
    }

    async fn delete_train(&self, id: TrainId) -> Result<()> {
        let mut tables = self.write();
        let before = tables.trains.len();
        tables.trains.retain(|t| t.id != id);
        if tables.trains.len() == before {
            return Err(StationError::not_found("Train", id));
        }
        Ok(())
    }

    async fn create_station(&self, input: &NewStation) -> Result<Station> {
        let mut tables = self.write();
        if tables.stations.iter().any(|s| s.name == input.name) {
            return Err(StationError::validation("station name already exists"));
        }
        let station = Station {
            id: StationId::new(),
            name: input.name.clone(),
            latitude: input.latitude,
            longitude: input.longitude,
        };
        tables.stations.push(station.clone());
        Ok(station)
    }

    async fn get_station(&self, id: StationId) -> Result<Station> {
        find_or_not_found(&self.read().stations, |s| s.id == id, "Station", id)
    }

    async fn list_stations(&self) -> Result<Vec<Station>> {
        Ok(self.read().stations.clone())
    }

    async fn update_station(&self, id: StationId, input: &NewStation) -> Result<Station> {
        let mut tables = self.write();
        let station = tables
            .stations
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StationError::not_found("Station", id))?;
        station.name = input.name.clone();
        station.latitude = input.latitude;
        station.longitude = input.longitude;
        Ok(station.clone())
    }

    async fn delete_station(&self, id: StationId) -> Result<()> {
        let mut tables = self.write();
        let before = tables.stations.len();
        tables.stations.retain(|s| s.id != id);
        if tables.stations.len() == before {
            return Err(StationError::not_found("Station", id));
        }
        Ok(())
    }

    async fn create_route(&self, input: &NewRoute) -> Result<Route> {
        input.validate()?;
        let mut tables = self.write();
        for endpoint in [input.source_id, input.destination_id] {
            if !tables.stations.iter().any(|s| s.id == endpoint) {
                return Err(StationError::not_found("Station", endpoint));
            }
        }
        let route = Route {
            id: RouteId::new(),
            source_id: input.source_id,
            destination_id: input.destination_id,
            distance: input.distance,
        };
        tables.routes.push(route.clone());
        Ok(route)
    }

    async fn get_route(&self, id: RouteId) -> Result<Route> {
        find_or_not_found(&self.read().routes, |r| r.id == id, "Route", id)
    }

    async fn list_routes(&self) -> Result<Vec<Route>> {
        Ok(self.read().routes.clone())
    }

    async fn update_route(&self, id: RouteId, input: &NewRoute) -> Result<Route> {
        input.validate()?;
        let mut tables = self.write();
        let route = tables
            .routes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StationError::not_found("Route", id))?;
        route.source_id = input.source_id;
        route.destination_id = input.destination_id;
        route.distance = input.distance;
        Ok(route.clone())
    }

    async fn delete_route(&self, id: RouteId) -> Result<()> {
        let mut tables = self.write();
        let before = tables.routes.len();
        tables.routes.retain(|r| r.id != id);
        if tables.routes.len() == before {
            return Err(StationError::not_found("Route", id));
        }
        Ok(())
    }

    async fn create_crew(&self, input: &NewCrew) -> Result<Crew> {
        let crew = Crew {
            id: CrewId::new(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
        };
        self.write().crews.push(crew.clone());
        Ok(crew)
    }

    async fn get_crew(&self, id: CrewId) -> Result<Crew> {
        find_or_not_found(&self.read().crews, |c| c.id == id, "Crew", id)
    }

    async fn list_crews(&self) -> Result<Vec<Crew>> {
        Ok(self.read().crews.clone())
    }

    async fn update_crew(&self, id: CrewId, input: &NewCrew) -> Result<Crew> {
        let mut tables = self.write();
        let crew = tables
            .crews
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StationError::not_found("Crew", id))?;
        crew.first_name = input.first_name.clone();
        crew.last_name = input.last_name.clone();
        Ok(crew.clone())
    }

    async fn delete_crew(&self, id: CrewId) -> Result<()> {
        let mut tables = self.write();
        let before = tables.crews.len();
        tables.crews.retain(|c| c.id != id);
        if tables.crews.len() == before {
            return Err(StationError::not_found("Crew", id));
        }
        Ok(())
    }
}

#[async_trait]
impl JourneyRepository for InMemoryStore {
    async fn create(&self, input: &NewJourney) -> Result<Journey> {
        let journey = Journey {
            id: JourneyId::new(),
            route_id: input.route_id,
            train_id: input.train_id,
            departure_time: input.departure_time,
            arrival_time: input.arrival_time,
            crew: input.crew.clone(),
        };
        self.write().journeys.push(journey.clone());
        Ok(journey)
    }

    async fn get(&self, id: JourneyId) -> Result<Journey> {
        find_or_not_found(&self.read().journeys, |j| j.id == id, "Journey", id)
    }

    async fn list(&self, filter: &JourneyFilter) -> Result<Vec<Journey>> {
        Ok(self
            .read()
            .journeys
            .iter()
            .filter(|j| filter.route_id.is_none_or(|r| j.route_id == r))
            .filter(|j| filter.train_id.is_none_or(|t| j.train_id == t))
            .cloned()
            .collect())
    }

    async fn update(&self, id: JourneyId, input: &NewJourney) -> Result<Journey> {
        let mut tables = self.write();
        let journey = tables
            .journeys
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| StationError::not_found("Journey", id))?;
        journey.route_id = input.route_id;
        journey.train_id = input.train_id;
        journey.departure_time = input.departure_time;
        journey.arrival_time = input.arrival_time;
        journey.crew.clone_from(&input.crew);
        Ok(journey.clone())
    }

    async fn delete(&self, id: JourneyId) -> Result<()> {
        let mut tables = self.write();
        let before = tables.journeys.len();
        tables.journeys.retain(|j| j.id != id);
        if tables.journeys.len() == before {
            return Err(StationError::not_found("Journey", id));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn create(&self, user_id: UserId) -> Result<Order> {
        let order = Order {
            id: OrderId::new(),
            user_id,
            created_at: Utc::now(),
        };
        self.write().orders.push(order.clone());
        Ok(order)
    }

    async fn get(&self, id: OrderId) -> Result<Order> {
        find_or_not_found(&self.read().orders, |o| o.id == id, "Order", id)
    }

    async fn latest_for_user(&self, user_id: UserId) -> Result<Option<Order>> {
        // Insertion order doubles as creation order.
        Ok(self
            .read()
            .orders
            .iter()
            .rev()
            .find(|o| o.user_id == user_id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        Ok(self
            .read()
            .orders
            .iter()
            .rev()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        Ok(self.read().orders.iter().rev().cloned().collect())
    }
}

#[async_trait]
impl TicketRepository for InMemoryStore {
    async fn insert(&self, draft: &TicketDraft) -> Result<Ticket> {
        let mut tables = self.write();
        // Same guarantee as the database unique index: the check and the
        // insert happen under one write lock.
        if tables
            .tickets
            .iter()
            .any(|t| t.journey_id == draft.journey_id && t.seats == draft.seats)
        {
            return Err(StationError::DuplicateSeat {
                journey_id: draft.journey_id,
                seats: draft.seats,
            });
        }
        let ticket = Ticket {
            id: TicketId::new(),
            cargo: draft.cargo,
            seats: draft.seats,
            journey_id: draft.journey_id,
            order_id: draft.order_id,
        };
        tables.tickets.push(ticket.clone());
        Ok(ticket)
    }

    async fn get(&self, id: TicketId) -> Result<Ticket> {
        find_or_not_found(&self.read().tickets, |t| t.id == id, "Ticket", id)
    }

    async fn seat_taken(&self, journey_id: JourneyId, seats: u32) -> Result<bool> {
        Ok(self
            .read()
            .tickets
            .iter()
            .any(|t| t.journey_id == journey_id && t.seats == seats))
    }

    async fn order_has_journey(&self, order_id: OrderId, journey_id: JourneyId) -> Result<bool> {
        Ok(self
            .read()
            .tickets
            .iter()
            .any(|t| t.order_id == order_id && t.journey_id == journey_id))
    }

    async fn list_for_order(&self, order_id: OrderId) -> Result<Vec<Ticket>> {
        Ok(self
            .read()
            .tickets
            .iter()
            .filter(|t| t.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Ticket>> {
        let tables = self.read();
        let owned: Vec<OrderId> = tables
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .map(|o| o.id)
            .collect();
        Ok(tables
            .tickets
            .iter()
            .filter(|t| owned.contains(&t.order_id))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Ticket>> {
        Ok(self.read().tickets.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, username: &str, password_hash: &str, is_staff: bool) -> Result<User> {
        let mut tables = self.write();
        if tables.users.iter().any(|u| u.username == username) {
            return Err(StationError::validation("username already taken"));
        }
        let user = User {
            id: UserId::new(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            is_staff,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn get(&self, id: UserId) -> Result<User> {
        find_or_not_found(&self.read().users, |u| u.id == id, "User", id)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .read()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn insert(&self, session: &Session) -> Result<()> {
        self.write().sessions.push(session.clone());
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<Session>> {
        Ok(self
            .read()
            .sessions
            .iter()
            .find(|s| s.token == token)
            .cloned())
    }
}
