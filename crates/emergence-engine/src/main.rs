//! World Engine binary for the embodied-agent simulation.
//!
//! This is the process entry point: it loads the on-disk world and LLM
//! configuration, wires a [`Simulator`](emergence_core::scheduler::Simulator)
//! to an [`LlmPlanner`](emergence_runner::LlmPlanner), starts the Observer
//! API server in the background, and then drives the tick loop in the
//! foreground for as long as the process runs.
//!
//! # Startup sequence
//!
//! 1. Initialize structured logging (tracing).
//! 2. Load `config/llm.json` (falling back to defaults if absent).
//! 3. Load the world from `data/` (falling back to an empty world if the
//!    directory tree is absent).
//! 4. Build the planner over an [`LlmConnector`](emergence_runner::LlmConnector).
//! 5. Wrap the simulator in [`AppState`](emergence_observer::AppState) and
//!    start the Observer HTTP/WS server as a background task.
//! 6. Run the tick loop: drain one full NPC round, advance the clock by one
//!    tick, broadcast a tick summary, sleep, repeat.

mod error;

use std::env;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use emergence_core::config::LlmConfig;
use emergence_core::decision::Planner;
use emergence_core::scheduler::Simulator;
use emergence_observer::{AppState, ServerConfig, TickBroadcast};
use emergence_runner::{LlmConnector, LlmPlanner};
use emergence_types::AgentId;
use emergence_world::load_world;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

const DEFAULT_TICK_INTERVAL_MS: u64 = 2000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    info!("emergence-engine starting");

    let llm_config = LlmConfig::from_file_or_default(Path::new("config/llm.json")).map_err(EngineError::Config)?;
    info!(endpoint = %llm_config.endpoint, model = %llm_config.model, "LLM configuration loaded");

    let world = load_world(Path::new("data")).map_err(EngineError::WorldLoad)?;
    info!(
        agents = world.agents.len(),
        locations = world.location_states.len(),
        items = world.item_instances.len(),
        "World loaded"
    );

    let player_id = env::var("EMERGENCE_PLAYER_ID").ok().map(AgentId::new);
    if let Some(player_id) = &player_id {
        info!(%player_id, "Player agent excluded from NPC turn order");
    }

    let simulator = Simulator::new(world, player_id).with_perception_buffer_size(llm_config.memory.perception_buffer_size);

    let connector = LlmConnector::new(&llm_config);
    let mut planner = LlmPlanner::new(connector, llm_config.memory.retrieval_top_k);

    let state = Arc::new(AppState::new(simulator));

    let server_config = ServerConfig {
        host: env::var("EMERGENCE_OBSERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_owned()),
        port: env::var("EMERGENCE_OBSERVER_PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(8080),
    };

    let server_state = Arc::clone(&state);
    let server_config_for_task = server_config.clone();
    tokio::spawn(async move {
        if let Err(error) = emergence_observer::start_server(&server_config_for_task, server_state).await {
            tracing::error!(%error, "Observer server exited with an error");
        }
    });
    info!(host = %server_config.host, port = server_config.port, "Observer API server starting");

    let tick_interval = env::var("EMERGENCE_TICK_INTERVAL_MS")
        .ok()
        .and_then(|value| value.parse().ok())
        .map_or_else(|| Duration::from_millis(DEFAULT_TICK_INTERVAL_MS), Duration::from_millis);

    run_tick_loop(&state, &mut planner, tick_interval).await;
    Ok(())
}

/// Drive NPC rounds and ticks forever: a round is exhausted when
/// [`Simulator::run_one_npc_turn`] returns `false`, at which point the
/// engine advances the clock by exactly one tick and broadcasts a summary.
///
/// Runs on the same task that services player command submissions (both
/// go through `state.simulator`'s mutex), matching the single
/// synchronized entry point the concurrency model requires.
async fn run_tick_loop(state: &Arc<AppState>, planner: &mut dyn Planner, tick_interval: Duration) {
    loop {
        {
            let mut simulator = state.simulator.lock().await;
            while simulator.run_one_npc_turn(planner).await {}
            simulator.tick();

            let tick = simulator.tick_count();
            let agents_alive = simulator.world.agents.values().filter(|agent| !agent.is_dead()).count();
            drop(simulator);

            let receivers = state.broadcast(&TickBroadcast { tick, agents_alive });
            tracing::debug!(tick, agents_alive, receivers, "tick broadcast sent");
        }
        tokio::time::sleep(tick_interval).await;
    }
}
