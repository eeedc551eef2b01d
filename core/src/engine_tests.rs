//! Reservation engine and journey registry behavior tests over the
//! in-memory store.

#![allow(clippy::expect_used)]

use crate::auth::Identity;
use crate::booking::ReservationEngine;
use crate::catalog::{CatalogRepository, NewCrew, NewRoute, NewStation, NewTrain, NewTrainType};
use crate::error::StationError;
use crate::ids::{JourneyId, TrainId, UserId};
use crate::journey::{JourneyFilter, JourneyRegistry, NewJourney};
use crate::memory::InMemoryStore;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

struct Fixture {
    store: InMemoryStore,
    engine: ReservationEngine,
    registry: JourneyRegistry,
}

impl Fixture {
    fn new() -> Self {
        let store = InMemoryStore::new();
        let shared = Arc::new(store.clone());
        let engine = ReservationEngine::new(
            shared.clone(),
            shared.clone(),
            shared.clone(),
            shared.clone(),
        );
        let registry = JourneyRegistry::new(shared.clone(), shared);
        Self {
            store,
            engine,
            registry,
        }
    }

    async fn sample_train(&self, cargo_num: u32) -> TrainId {
        let tt = self
            .store
            .create_train_type(&NewTrainType {
                name: format!("type-{}", uuid::Uuid::new_v4()),
            })
            .await
            .expect("create train type");
        self.store
            .create_train(&NewTrain {
                name: "Test train".to_string(),
                cargo_num,
                places_in_cargo: 10,
                train_type_id: tt.id,
            })
            .await
            .expect("create train")
            .id
    }

    async fn sample_journey(&self, cargo_num: u32) -> JourneyId {
        let source = self
            .store
            .create_station(&NewStation {
                name: format!("station-{}", uuid::Uuid::new_v4()),
                latitude: 50.5,
                longitude: 40.4,
            })
            .await
            .expect("create source");
        let destination = self
            .store
            .create_station(&NewStation {
                name: format!("station-{}", uuid::Uuid::new_v4()),
                latitude: 49.0,
                longitude: 24.0,
            })
            .await
            .expect("create destination");
        let route = self
            .store
            .create_route(&NewRoute {
                source_id: source.id,
                destination_id: destination.id,
                distance: 1000,
            })
            .await
            .expect("create route");
        let crew = self
            .store
            .create_crew(&NewCrew {
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
            })
            .await
            .expect("create crew");
        let train_id = self.sample_train(cargo_num).await;
        self.registry
            .create(&NewJourney {
                route_id: route.id,
                train_id,
                departure_time: at(23, 0),
                arrival_time: at(23, 0) + Duration::hours(11),
                crew: vec![crew.id],
            })
            .await
            .expect("create journey")
            .id
    }
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 8, hour, minute, 0)
        .single()
        .expect("fixed timestamp is valid")
}

fn identity(name: &str, is_staff: bool) -> Identity {
    Identity {
        user_id: UserId::new(),
        username: name.to_string(),
        is_staff,
    }
}

#[tokio::test]
async fn reserve_issues_ticket_and_creates_order() {
    let fx = Fixture::new();
    let journey = fx.sample_journey(150).await;
    let alice = identity("alice", false);

    let ticket = fx
        .engine
        .reserve(&alice, journey, 1, 1)
        .await
        .expect("reserve");
    assert_eq!(ticket.cargo, 1);
    assert_eq!(ticket.seats, 1);
    assert_eq!(ticket.journey_id, journey);

    let orders = fx.engine.list_orders(&alice).await.expect("list orders");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].tickets.len(), 1);
    assert_eq!(orders[0].tickets[0].id, ticket.id);
}

#[tokio::test]
async fn duplicate_seat_rejected_across_users() {
    let fx = Fixture::new();
    let journey = fx.sample_journey(150).await;
    let alice = identity("alice", false);
    let bob = identity("bob", false);

    fx.engine
        .reserve(&alice, journey, 1, 1)
        .await
        .expect("first reservation");
    let err = fx.engine.reserve(&bob, journey, 1, 1).await;
    assert!(matches!(err, Err(StationError::DuplicateSeat { seats: 1, .. })));
}

#[tokio::test]
async fn capacity_exceeded_rejected() {
    let fx = Fixture::new();
    let journey = fx.sample_journey(150).await;
    let alice = identity("alice", false);

    let err = fx.engine.reserve(&alice, journey, 151, 2).await;
    assert!(matches!(
        err,
        Err(StationError::CapacityExceeded {
            cargo: 151,
            available: 150,
        })
    ));
}

#[tokio::test]
async fn capacity_boundary_succeeds() {
    let fx = Fixture::new();
    let journey = fx.sample_journey(150).await;
    let alice = identity("alice", false);

    let ticket = fx
        .engine
        .reserve(&alice, journey, 150, 3)
        .await
        .expect("cargo equal to capacity is allowed");
    assert_eq!(ticket.cargo, 150);
}

#[tokio::test]
async fn duplicate_seat_wins_over_capacity() {
    // Fail-fast ordering: the seat check runs before the capacity check.
    let fx = Fixture::new();
    let journey = fx.sample_journey(150).await;
    let alice = identity("alice", false);

    fx.engine
        .reserve(&alice, journey, 1, 7)
        .await
        .expect("seed seat 7");
    let err = fx.engine.reserve(&alice, journey, 151, 7).await;
    assert!(matches!(err, Err(StationError::DuplicateSeat { .. })));
}

#[tokio::test]
async fn zero_indices_rejected() {
    let fx = Fixture::new();
    let journey = fx.sample_journey(150).await;
    let alice = identity("alice", false);

    assert!(matches!(
        fx.engine.reserve(&alice, journey, 0, 1).await,
        Err(StationError::Validation(_))
    ));
    assert!(matches!(
        fx.engine.reserve(&alice, journey, 1, 0).await,
        Err(StationError::Validation(_))
    ));
}

#[tokio::test]
async fn unknown_journey_rejected() {
    let fx = Fixture::new();
    let alice = identity("alice", false);
    let err = fx.engine.reserve(&alice, JourneyId::new(), 1, 1).await;
    assert!(matches!(err, Err(StationError::NotFound { .. })));
}

#[tokio::test]
async fn consecutive_bookings_on_same_journey_share_an_order() {
    let fx = Fixture::new();
    let journey = fx.sample_journey(150).await;
    let alice = identity("alice", false);

    let first = fx
        .engine
        .reserve(&alice, journey, 1, 1)
        .await
        .expect("seat 1");
    let second = fx
        .engine
        .reserve(&alice, journey, 1, 2)
        .await
        .expect("seat 2");
    assert_eq!(first.order_id, second.order_id);
}

#[tokio::test]
async fn booking_a_different_journey_opens_a_new_order() {
    let fx = Fixture::new();
    let first_journey = fx.sample_journey(150).await;
    let second_journey = fx.sample_journey(150).await;
    let alice = identity("alice", false);

    let first = fx
        .engine
        .reserve(&alice, first_journey, 1, 1)
        .await
        .expect("journey one");
    let second = fx
        .engine
        .reserve(&alice, second_journey, 1, 1)
        .await
        .expect("journey two");
    assert_ne!(first.order_id, second.order_id);

    // The reuse rule only looks at the most recent order, so returning to
    // the first journey opens a third order.
    let third = fx
        .engine
        .reserve(&alice, first_journey, 1, 2)
        .await
        .expect("back to journey one");
    assert_ne!(third.order_id, first.order_id);
    assert_ne!(third.order_id, second.order_id);
}

#[tokio::test]
async fn concurrent_same_seat_has_exactly_one_winner() {
    let fx = Fixture::new();
    let journey = fx.sample_journey(150).await;
    let alice = identity("alice", false);
    let bob = identity("bob", false);

    let (a, b) = tokio::join!(
        fx.engine.reserve(&alice, journey, 1, 42),
        fx.engine.reserve(&bob, journey, 1, 42),
    );
    let winners = usize::from(a.is_ok()) + usize::from(b.is_ok());
    assert_eq!(winners, 1, "exactly one reservation must win");
    for outcome in [a, b] {
        if let Err(err) = outcome {
            assert!(matches!(err, StationError::DuplicateSeat { .. }));
        }
    }
}

#[tokio::test]
async fn order_listing_is_scoped_by_ownership() {
    let fx = Fixture::new();
    let journey = fx.sample_journey(150).await;
    let alice = identity("alice", false);
    let bob = identity("bob", false);
    let staff = identity("admin", true);

    fx.engine
        .reserve(&alice, journey, 1, 1)
        .await
        .expect("alice books");
    fx.engine
        .reserve(&bob, journey, 1, 2)
        .await
        .expect("bob books");

    let alice_orders = fx.engine.list_orders(&alice).await.expect("alice list");
    assert_eq!(alice_orders.len(), 1);
    assert!(
        alice_orders
            .iter()
            .all(|o| o.order.user_id == alice.user_id)
    );

    let staff_orders = fx.engine.list_orders(&staff).await.expect("staff list");
    assert_eq!(staff_orders.len(), 2);
}

#[tokio::test]
async fn ticket_detail_enforces_ownership() {
    let fx = Fixture::new();
    let journey = fx.sample_journey(150).await;
    let alice = identity("alice", false);
    let bob = identity("bob", false);
    let staff = identity("admin", true);

    let ticket = fx
        .engine
        .reserve(&alice, journey, 1, 1)
        .await
        .expect("alice books");

    assert!(fx.engine.get_ticket(&alice, ticket.id).await.is_ok());
    assert!(matches!(
        fx.engine.get_ticket(&bob, ticket.id).await,
        Err(StationError::Forbidden(_))
    ));
    assert!(fx.engine.get_ticket(&staff, ticket.id).await.is_ok());
}

#[tokio::test]
async fn registry_rejects_bad_time_windows() {
    let fx = Fixture::new();
    // Seed one journey to get valid catalog references to reuse.
    let journey_id = fx.sample_journey(150).await;
    let journey = fx.registry.get(journey_id).await.expect("seeded journey");

    let inverted = NewJourney {
        route_id: journey.route_id,
        train_id: journey.train_id,
        departure_time: at(10, 0),
        arrival_time: at(8, 0),
        crew: vec![],
    };
    assert!(matches!(
        fx.registry.create(&inverted).await,
        Err(StationError::InvalidTimeRange)
    ));

    let flat = NewJourney {
        arrival_time: at(10, 0),
        departure_time: at(10, 0),
        ..inverted
    };
    assert!(matches!(
        fx.registry.create(&flat).await,
        Err(StationError::InvalidTimeRange)
    ));
    assert!(matches!(
        fx.registry.update(journey_id, &flat).await,
        Err(StationError::InvalidTimeRange)
    ));
}

#[tokio::test]
async fn registry_checks_references_exist() {
    let fx = Fixture::new();
    let input = NewJourney {
        route_id: crate::ids::RouteId::new(),
        train_id: TrainId::new(),
        departure_time: at(8, 0),
        arrival_time: at(10, 0),
        crew: vec![],
    };
    assert!(matches!(
        fx.registry.create(&input).await,
        Err(StationError::NotFound { .. })
    ));
}

#[tokio::test]
async fn journey_listing_filters_by_route_and_train() {
    let fx = Fixture::new();
    let first = fx.sample_journey(150).await;
    let second = fx.sample_journey(150).await;

    let all = fx
        .registry
        .list(&JourneyFilter::default())
        .await
        .expect("list all");
    assert_eq!(all.len(), 2);
    // Insertion order is preserved.
    assert_eq!(all[0].id, first);
    assert_eq!(all[1].id, second);

    let journey = fx.registry.get(first).await.expect("get first");
    let filtered = fx
        .registry
        .list(&JourneyFilter {
            route_id: Some(journey.route_id),
            train_id: None,
        })
        .await
        .expect("filtered list");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, first);
}
