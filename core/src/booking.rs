//! Orders, tickets, and the reservation engine.
//!
//! The engine is the only place that writes tickets. Validation is
//! fail-fast: the duplicate-seat check runs before the capacity check, and
//! the storage layer re-enforces seat uniqueness with a unique constraint
//! so the loser of a concurrent race still gets `DuplicateSeat`.

use crate::auth::Identity;
use crate::catalog::CatalogRepository;
use crate::error::{Result, StationError};
use crate::ids::{JourneyId, OrderId, TicketId, UserId};
use crate::journey::JourneyRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A grouping of tickets attributed to one purchase action by one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Identifier.
    pub id: OrderId,
    /// Purchasing user.
    pub user_id: UserId,
    /// Creation instant; listings are newest-first.
    pub created_at: DateTime<Utc>,
}

/// A seat in a cargo section of one journey, owned by one order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Identifier.
    pub id: TicketId,
    /// Cargo section index, 1-based.
    pub cargo: u32,
    /// Seat position within the section, unique per journey.
    pub seats: u32,
    /// Journey the seat is on.
    pub journey_id: JourneyId,
    /// Owning order.
    pub order_id: OrderId,
}

/// Fields of a ticket about to be inserted.
#[derive(Clone, Debug)]
pub struct TicketDraft {
    /// Cargo section index.
    pub cargo: u32,
    /// Seat position.
    pub seats: u32,
    /// Journey the seat is on.
    pub journey_id: JourneyId,
    /// Owning order.
    pub order_id: OrderId,
}

/// An order together with its tickets, as returned by listings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderWithTickets {
    /// The order.
    pub order: Order,
    /// Tickets attached to it.
    pub tickets: Vec<Ticket>,
}

/// Storage access for orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Creates an empty order owned by `user_id`.
    async fn create(&self, user_id: UserId) -> Result<Order>;
    /// Fetches an order by id.
    async fn get(&self, id: OrderId) -> Result<Order>;
    /// The most recently created order of `user_id`, if any.
    async fn latest_for_user(&self, user_id: UserId) -> Result<Option<Order>>;
    /// All orders of `user_id`, newest first.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>>;
    /// All orders, newest first.
    async fn list_all(&self) -> Result<Vec<Order>>;
}

/// Storage access for tickets.
///
/// `insert` must enforce `(journey_id, seats)` uniqueness at the storage
/// level, not only via the engine's pre-check.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Inserts a ticket.
    ///
    /// Fails with [`StationError::DuplicateSeat`] when the seat is already
    /// taken on the journey, even under concurrent inserts.
    async fn insert(&self, draft: &TicketDraft) -> Result<Ticket>;
    /// Fetches a ticket by id.
    async fn get(&self, id: TicketId) -> Result<Ticket>;
    /// Whether `(journey_id, seats)` is already occupied.
    async fn seat_taken(&self, journey_id: JourneyId, seats: u32) -> Result<bool>;
    /// Whether `order_id` already holds a ticket for `journey_id`.
    async fn order_has_journey(&self, order_id: OrderId, journey_id: JourneyId) -> Result<bool>;
    /// All tickets attached to `order_id`.
    async fn list_for_order(&self, order_id: OrderId) -> Result<Vec<Ticket>>;
    /// All tickets on orders owned by `user_id`.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Ticket>>;
    /// All tickets.
    async fn list_all(&self) -> Result<Vec<Ticket>>;
}

/// Issues tickets and resolves the order they attach to.
#[derive(Clone)]
pub struct ReservationEngine {
    journeys: Arc<dyn JourneyRepository>,
    catalog: Arc<dyn CatalogRepository>,
    orders: Arc<dyn OrderRepository>,
    tickets: Arc<dyn TicketRepository>,
}

impl ReservationEngine {
    /// Creates an engine over the given stores.
    #[must_use]
    pub fn new(
        journeys: Arc<dyn JourneyRepository>,
        catalog: Arc<dyn CatalogRepository>,
        orders: Arc<dyn OrderRepository>,
        tickets: Arc<dyn TicketRepository>,
    ) -> Self {
        Self {
            journeys,
            catalog,
            orders,
            tickets,
        }
    }

    /// Reserves seat `seats` in cargo section `cargo` on a journey.
    ///
    /// Validation is fail-fast, first violation wins:
    /// 1. `DuplicateSeat` when a ticket already exists for the seat;
    /// 2. `CapacityExceeded` when `cargo` exceeds the train's ceiling
    ///    (`cargo == available_cargo` succeeds).
    ///
    /// On success the ticket is attached to an order resolved by
    /// [`ReservationEngine::resolve_order`].
    ///
    /// # Errors
    ///
    /// `NotFound` for an absent journey, `Validation` for zero indices,
    /// the two violations above, or a storage error.
    #[tracing::instrument(skip(self, identity), fields(user_id = %identity.user_id, journey_id = %journey_id, cargo, seats))]
    pub async fn reserve(
        &self,
        identity: &Identity,
        journey_id: JourneyId,
        cargo: u32,
        seats: u32,
    ) -> Result<Ticket> {
        if cargo == 0 || seats == 0 {
            return Err(StationError::validation(
                "cargo and seats must be positive integers",
            ));
        }

        let journey = self.journeys.get(journey_id).await?;

        if self.tickets.seat_taken(journey_id, seats).await? {
            return Err(StationError::DuplicateSeat { journey_id, seats });
        }

        let train = self.catalog.get_train(journey.train_id).await?;
        let available = train.available_cargo();
        if cargo > available {
            return Err(StationError::CapacityExceeded { cargo, available });
        }

        let order = self.resolve_order(identity.user_id, journey_id).await?;
        let ticket = self
            .tickets
            .insert(&TicketDraft {
                cargo,
                seats,
                journey_id,
                order_id: order.id,
            })
            .await?;
        tracing::info!(ticket_id = %ticket.id, order_id = %order.id, "ticket reserved");
        Ok(ticket)
    }

    /// Picks the order a new ticket attaches to.
    ///
    /// The requester's most recent order is reused only when it already
    /// holds a ticket for the same journey; otherwise a fresh order is
    /// created. In the common case this yields one order per booking
    /// action.
    ///
    /// # Errors
    ///
    /// Returns a storage error if any lookup or the insert fails.
    pub async fn resolve_order(&self, user_id: UserId, journey_id: JourneyId) -> Result<Order> {
        if let Some(order) = self.orders.latest_for_user(user_id).await? {
            if self.tickets.order_has_journey(order.id, journey_id).await? {
                return Ok(order);
            }
        }
        self.orders.create(user_id).await
    }

    /// Lists orders visible to `identity`, with their tickets.
    ///
    /// Staff see every order; everyone else sees only their own. Both
    /// listings are newest-first.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the queries fail.
    pub async fn list_orders(&self, identity: &Identity) -> Result<Vec<OrderWithTickets>> {
        let orders = if identity.is_staff {
            self.orders.list_all().await?
        } else {
            self.orders.list_for_user(identity.user_id).await?
        };

        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let tickets = self.tickets.list_for_order(order.id).await?;
            result.push(OrderWithTickets { order, tickets });
        }
        Ok(result)
    }

    /// Lists tickets visible to `identity`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    pub async fn list_tickets(&self, identity: &Identity) -> Result<Vec<Ticket>> {
        if identity.is_staff {
            self.tickets.list_all().await
        } else {
            self.tickets.list_for_user(identity.user_id).await
        }
    }

    /// Fetches one ticket, enforcing ownership for non-staff identities.
    ///
    /// # Errors
    ///
    /// `NotFound` for an absent ticket, `Forbidden` when a non-staff
    /// identity asks for someone else's ticket, or a storage error.
    pub async fn get_ticket(&self, identity: &Identity, id: TicketId) -> Result<Ticket> {
        let ticket = self.tickets.get(id).await?;
        if !identity.is_staff {
            let order = self.orders.get(ticket.order_id).await?;
            if order.user_id != identity.user_id {
                return Err(StationError::Forbidden(
                    "ticket belongs to another user".to_string(),
                ));
            }
        }
        Ok(ticket)
    }
}
