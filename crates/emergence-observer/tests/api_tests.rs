//! Integration tests for the Observer API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use emergence_core::scheduler::Simulator;
use emergence_observer::router::build_router;
use emergence_observer::state::AppState;
use emergence_types::{Agent, AgentId, Attributes, ConnectionEdge, ConnectionStatus, HexDirection, LocationId, LocationState, LocationStatic};
use emergence_world::WorldState;
use serde_json::{json, Value};
use tower::ServiceExt;

fn sample_agent(id: &str, name: &str) -> Agent {
    Agent {
        id: AgentId::new(id),
        name: name.to_owned(),
        hp: 10,
        inventory: Vec::new(),
        slots: BTreeMap::new(),
        attributes: Attributes::default(),
        skills: BTreeMap::new(),
        relationships: BTreeMap::new(),
        inherent_tags: Default::default(),
        dynamic_tags: Default::default(),
        memories: Vec::new(),
        core_memories: Vec::new(),
        goals: Vec::new(),
        short_term_memory: Vec::new(),
        next_available_tick: 0,
        last_meal_tick: 0,
        hunger_stage: emergence_types::HungerStage::Sated,
    }
}

fn make_test_state() -> Arc<AppState> {
    let mut world = WorldState::new();

    let town_square = LocationId::new("town_square");
    let market_square = LocationId::new("market_square");

    world.location_statics.insert(
        town_square.clone(),
        LocationStatic {
            id: town_square.clone(),
            description: "The town square.".to_owned(),
            inherent_tags: Default::default(),
            hex_connections: BTreeMap::from([(HexDirection::E, market_square.clone())]),
        },
    );
    world.location_statics.insert(
        market_square.clone(),
        LocationStatic {
            id: market_square.clone(),
            description: "The market square.".to_owned(),
            inherent_tags: Default::default(),
            hex_connections: Default::default(),
        },
    );

    let mut town_square_state = LocationState {
        id: town_square.clone(),
        occupants: vec![AgentId::new("npc_bard")],
        items: Vec::new(),
        sublocations: Default::default(),
        transient_effects: serde_json::Map::new(),
        connections_state: BTreeMap::new(),
    };
    town_square_state.connections_state.insert(
        market_square.clone(),
        ConnectionEdge {
            status: ConnectionStatus::Open,
            direction: Some(HexDirection::E),
        },
    );
    world.location_states.insert(town_square.clone(), town_square_state);

    world.location_states.insert(
        market_square.clone(),
        LocationState {
            id: market_square,
            occupants: Vec::new(),
            items: Vec::new(),
            sublocations: Default::default(),
            transient_effects: serde_json::Map::new(),
            connections_state: BTreeMap::new(),
        },
    );
    world.hydrate_connection_directions();

    world.agents.insert(AgentId::new("npc_bard"), sample_agent("npc_bard", "Bard"));

    let simulator = Simulator::new(world, None);
    Arc::new(AppState::new(simulator))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn index_serves_an_html_status_page() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router.oneshot(Request::get("/").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn get_world_reports_the_loaded_agent_and_location() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/api/world").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let snapshot = body_json(response).await;
    assert_eq!(snapshot["tick"], 0);
    assert_eq!(snapshot["agents"][0]["id"], "npc_bard");
    assert_eq!(snapshot["agents"][0]["hp"], 10);

    let locations = snapshot["locations"].as_array().unwrap();
    let town_square = locations.iter().find(|loc| loc["id"] == "town_square").unwrap();
    assert_eq!(town_square["occupants"][0], "npc_bard");
    let neighbor = town_square["neighbors"].as_array().unwrap().first().unwrap();
    assert_eq!(neighbor["id"], "market_square");
    assert_eq!(neighbor["status"], "open");
}

#[tokio::test]
async fn submit_command_moves_the_actor_and_advances_the_tick() {
    let state = make_test_state();
    let router = build_router(Arc::clone(&state));

    let body = json!({
        "actor_id": "npc_bard",
        "tool": "move",
        "params": {"target_location": "market_square"},
    });

    let response = router
        .oneshot(
            Request::post("/api/command")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let accepted = body_json(response).await;
    assert_eq!(accepted["accepted"], true);
    assert_eq!(accepted["tick"], 1);

    let simulator = state.simulator.lock().await;
    assert_eq!(simulator.tick_count(), 1);
    let market_square = simulator.world.location_states.get(&LocationId::new("market_square")).unwrap();
    assert!(market_square.occupants.contains(&AgentId::new("npc_bard")));
}

#[tokio::test]
async fn submit_command_rejects_a_move_through_a_closed_edge() {
    let state = make_test_state();
    {
        let mut simulator = state.simulator.lock().await;
        let town_square = LocationId::new("town_square");
        let market_square = LocationId::new("market_square");
        if let Some(edge) = simulator
            .world
            .location_states
            .get_mut(&town_square)
            .and_then(|loc| loc.connections_state.get_mut(&market_square))
        {
            edge.status = ConnectionStatus::Closed;
        }
    }
    let router = build_router(Arc::clone(&state));

    let body = json!({
        "actor_id": "npc_bard",
        "tool": "move",
        "params": {"target_location": "market_square"},
    });

    let response = router
        .oneshot(
            Request::post("/api/command")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let simulator = state.simulator.lock().await;
    assert_eq!(simulator.tick_count(), 0, "a rejected command must not advance the clock");
}

#[tokio::test]
async fn submit_command_for_an_unknown_tool_is_a_bad_request() {
    let state = make_test_state();
    let router = build_router(state);

    let body = json!({
        "actor_id": "npc_bard",
        "tool": "teleport",
        "params": {},
    });

    let response = router
        .oneshot(
            Request::post("/api/command")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submit_command_for_an_unknown_actor_is_not_found() {
    let state = make_test_state();
    let router = build_router(state);

    let body = json!({
        "actor_id": "npc_nobody",
        "tool": "wait",
        "params": {"ticks": 1},
    });

    let response = router
        .oneshot(
            Request::post("/api/command")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
