//! End-to-end HTTP tests over the in-memory store.
//!
//! The router under test is the production one; only the repositories are
//! swapped for [`InMemoryStore`].

#![allow(clippy::expect_used)]

use axum_test::TestServer;
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use station_core::auth::{UserRepository, hash_password};
use station_core::memory::InMemoryStore;
use station_web::{AppState, Config, build_router};
use std::sync::Arc;

fn test_server() -> (TestServer, InMemoryStore) {
    let store = InMemoryStore::new();
    let state = AppState::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Config::from_env(),
    );
    let server = TestServer::new(build_router(state)).expect("test server");
    (server, store)
}

async fn register_and_login(server: &TestServer, username: &str) -> String {
    let response = server
        .post("/api/v1/user/register")
        .json(&json!({ "username": username, "password": "password1" }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    login(server, username).await
}

async fn login(server: &TestServer, username: &str) -> String {
    let response = server
        .post("/api/v1/user/login")
        .json(&json!({ "username": username, "password": "password1" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["token"]
        .as_str()
        .expect("token in login response")
        .to_string()
}

async fn staff_token(server: &TestServer, store: &InMemoryStore) -> String {
    store
        .create("admin", &hash_password("password1"), true)
        .await
        .expect("staff account");
    login(server, "admin").await
}

/// Seeds a full catalog and returns the id of a journey on a train with
/// `cargo_num` sections.
async fn seed_journey(server: &TestServer, token: &str, cargo_num: u32) -> String {
    let train_type: Value = server
        .post("/api/v1/station/train-types")
        .authorization_bearer(token)
        .json(&json!({ "name": "Intercity" }))
        .await
        .json();
    let train: Value = server
        .post("/api/v1/station/trains")
        .authorization_bearer(token)
        .json(&json!({
            "name": "Test train",
            "cargo_num": cargo_num,
            "places_in_cargo": 10,
            "train_type_id": train_type["id"],
        }))
        .await
        .json();
    let source: Value = server
        .post("/api/v1/station/stations")
        .authorization_bearer(token)
        .json(&json!({ "name": "Kyiv", "latitude": 50.45, "longitude": 30.52 }))
        .await
        .json();
    let destination: Value = server
        .post("/api/v1/station/stations")
        .authorization_bearer(token)
        .json(&json!({ "name": "Lviv", "latitude": 49.84, "longitude": 24.03 }))
        .await
        .json();
    let route: Value = server
        .post("/api/v1/station/routes")
        .authorization_bearer(token)
        .json(&json!({
            "source_id": source["id"],
            "destination_id": destination["id"],
            "distance": 540,
        }))
        .await
        .json();
    let departure = Utc::now() + Duration::days(1);
    let response = server
        .post("/api/v1/station/journeys")
        .authorization_bearer(token)
        .json(&json!({
            "route_id": route["id"],
            "train_id": train["id"],
            "departure_time": departure.to_rfc3339(),
            "arrival_time": (departure + Duration::hours(6)).to_rfc3339(),
            "crew": [],
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let journey: Value = response.json();
    journey["id"]
        .as_str()
        .expect("journey id in response")
        .to_string()
}

#[tokio::test]
async fn probes_are_open() {
    let (server, _) = test_server();
    server.get("/health").await.assert_status_ok();
    server.get("/ready").await.assert_status_ok();
}

#[tokio::test]
async fn station_endpoints_require_a_token() {
    let (server, _) = test_server();
    let response = server.get("/api/v1/station/trains").await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);

    let response = server
        .get("/api/v1/station/trains")
        .authorization_bearer("made-up-token")
        .await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_login_me_round_trip() {
    let (server, _) = test_server();
    let token = register_and_login(&server, "alice").await;

    let response = server
        .get("/api/v1/user/me")
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["is_staff"], false);
    assert!(body.get("password_hash").is_none());

    let response = server
        .post("/api/v1/user/login")
        .json(&json!({ "username": "alice", "password": "wrong-password" }))
        .await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn short_password_is_rejected() {
    let (server, _) = test_server();
    let response = server
        .post("/api/v1/user/register")
        .json(&json!({ "username": "alice", "password": "abc" }))
        .await;
    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn catalog_mutations_require_staff() {
    let (server, store) = test_server();
    let member = register_and_login(&server, "alice").await;

    let response = server
        .post("/api/v1/station/train-types")
        .authorization_bearer(&member)
        .json(&json!({ "name": "Intercity" }))
        .await;
    response.assert_status(axum::http::StatusCode::FORBIDDEN);

    let staff = staff_token(&server, &store).await;
    let response = server
        .post("/api/v1/station/train-types")
        .authorization_bearer(&staff)
        .json(&json!({ "name": "Intercity" }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    // Reads stay open to any authenticated account.
    let response = server
        .get("/api/v1/station/train-types")
        .authorization_bearer(&member)
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn route_with_identical_endpoints_is_rejected() {
    let (server, store) = test_server();
    let staff = staff_token(&server, &store).await;
    let station: Value = server
        .post("/api/v1/station/stations")
        .authorization_bearer(&staff)
        .json(&json!({ "name": "Kyiv", "latitude": 50.45, "longitude": 30.52 }))
        .await
        .json();

    let response = server
        .post("/api/v1/station/routes")
        .authorization_bearer(&staff)
        .json(&json!({
            "source_id": station["id"],
            "destination_id": station["id"],
            "distance": 1,
        }))
        .await;
    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["code"], "SAME_SOURCE_DESTINATION");
}

#[tokio::test]
async fn journey_with_inverted_window_is_rejected() {
    let (server, store) = test_server();
    let staff = staff_token(&server, &store).await;
    let journey_id = seed_journey(&server, &staff, 10).await;
    let journey: Value = server
        .get(&format!("/api/v1/station/journeys/{journey_id}"))
        .authorization_bearer(&staff)
        .await
        .json();

    // Reuse the seeded references with the window flipped.
    let departure = Utc::now() + Duration::days(2);
    let response = server
        .post("/api/v1/station/journeys")
        .authorization_bearer(&staff)
        .json(&json!({
            "route_id": journey["route"]["id"],
            "train_id": journey["train"]["id"],
            "departure_time": departure.to_rfc3339(),
            "arrival_time": (departure - Duration::hours(1)).to_rfc3339(),
            "crew": [],
        }))
        .await;
    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_TIME_RANGE");
}

#[tokio::test]
async fn reservation_flow_over_http() {
    let (server, store) = test_server();
    let staff = staff_token(&server, &store).await;
    let journey_id = seed_journey(&server, &staff, 150).await;
    let alice = register_and_login(&server, "alice").await;
    let bob = register_and_login(&server, "bob").await;

    let response = server
        .post("/api/v1/station/tickets")
        .authorization_bearer(&alice)
        .json(&json!({ "journey_id": journey_id, "cargo": 1, "seats": 1 }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let ticket: Value = response.json();
    assert_eq!(ticket["seats"], 1);
    assert_eq!(ticket["journey"]["route"]["source"]["name"], "Kyiv");

    // Same seat, different user: conflict.
    let response = server
        .post("/api/v1/station/tickets")
        .authorization_bearer(&bob)
        .json(&json!({ "journey_id": journey_id, "cargo": 1, "seats": 1 }))
        .await;
    response.assert_status(axum::http::StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "DUPLICATE_SEAT");

    // Cargo above the train's ceiling.
    let response = server
        .post("/api/v1/station/tickets")
        .authorization_bearer(&alice)
        .json(&json!({ "journey_id": journey_id, "cargo": 151, "seats": 2 }))
        .await;
    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["code"], "CAPACITY_EXCEEDED");

    // Cargo exactly at the ceiling is fine.
    let response = server
        .post("/api/v1/station/tickets")
        .authorization_bearer(&alice)
        .json(&json!({ "journey_id": journey_id, "cargo": 150, "seats": 3 }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
}

#[tokio::test]
async fn order_listing_is_scoped_by_ownership() {
    let (server, store) = test_server();
    let staff = staff_token(&server, &store).await;
    let journey_id = seed_journey(&server, &staff, 150).await;
    let alice = register_and_login(&server, "alice").await;
    let bob = register_and_login(&server, "bob").await;

    for (token, seats) in [(&alice, 1), (&bob, 2)] {
        server
            .post("/api/v1/station/tickets")
            .authorization_bearer(token)
            .json(&json!({ "journey_id": journey_id, "cargo": 1, "seats": seats }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    let alice_orders: Value = server
        .get("/api/v1/station/orders")
        .authorization_bearer(&alice)
        .await
        .json();
    let alice_orders = alice_orders.as_array().expect("order list");
    assert_eq!(alice_orders.len(), 1);
    assert_eq!(alice_orders[0]["user"], "alice");
    assert_eq!(alice_orders[0]["tickets"][0]["seats"], 1);

    let staff_orders: Value = server
        .get("/api/v1/station/orders")
        .authorization_bearer(&staff)
        .await
        .json();
    assert_eq!(staff_orders.as_array().expect("order list").len(), 2);
}

#[tokio::test]
async fn consecutive_bookings_on_one_journey_share_an_order() {
    let (server, store) = test_server();
    let staff = staff_token(&server, &store).await;
    let journey_id = seed_journey(&server, &staff, 150).await;
    let alice = register_and_login(&server, "alice").await;

    for seats in [5, 6] {
        server
            .post("/api/v1/station/tickets")
            .authorization_bearer(&alice)
            .json(&json!({ "journey_id": journey_id, "cargo": 1, "seats": seats }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    let orders: Value = server
        .get("/api/v1/station/orders")
        .authorization_bearer(&alice)
        .await
        .json();
    let orders = orders.as_array().expect("order list");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["tickets"].as_array().expect("tickets").len(), 2);
}

#[tokio::test]
async fn ticket_detail_is_owner_only() {
    let (server, store) = test_server();
    let staff = staff_token(&server, &store).await;
    let journey_id = seed_journey(&server, &staff, 150).await;
    let alice = register_and_login(&server, "alice").await;
    let bob = register_and_login(&server, "bob").await;

    let ticket: Value = server
        .post("/api/v1/station/tickets")
        .authorization_bearer(&alice)
        .json(&json!({ "journey_id": journey_id, "cargo": 1, "seats": 1 }))
        .await
        .json();
    let ticket_id = ticket["id"].as_str().expect("ticket id");

    let response = server
        .get(&format!("/api/v1/station/tickets/{ticket_id}"))
        .authorization_bearer(&bob)
        .await;
    response.assert_status(axum::http::StatusCode::FORBIDDEN);

    // The owner and staff both see it.
    for token in [&alice, &staff] {
        server
            .get(&format!("/api/v1/station/tickets/{ticket_id}"))
            .authorization_bearer(token)
            .await
            .assert_status_ok();
    }
}
