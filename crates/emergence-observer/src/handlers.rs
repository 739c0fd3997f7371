//! REST API endpoint handlers for the Observer server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/world` | Current world snapshot |
//! | `POST` | `/api/command` | Submit a tool invocation for an actor |

use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::Json;
use emergence_types::{AgentId, CommandRequest};

use crate::error::ObserverError;
use crate::snapshot;
use crate::state::AppState;

/// Serve a minimal HTML page showing server status and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let simulator = state.simulator.lock().await;
    let tick = simulator.tick_count();
    let agent_count = simulator.world.agents.len();
    let location_count = simulator.world.location_states.len();
    drop(simulator);

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Emergence Observer</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        li::before {{ content: "GET "; color: #7ee787; font-weight: bold; }}
        .status {{ color: #3fb950; font-weight: bold; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Emergence Observer</h1>
    <p class="subtitle">Embodied-agent simulation -- observer API</p>

    <p>Status: <span class="status">RUNNING</span></p>

    <div>
        <div class="metric">
            <div class="label">Tick</div>
            <div class="value">{tick}</div>
        </div>
        <div class="metric">
            <div class="label">Agents</div>
            <div class="value">{agent_count}</div>
        </div>
        <div class="metric">
            <div class="label">Locations</div>
            <div class="value">{location_count}</div>
        </div>
    </div>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li><a href="/api/world">/api/world</a> -- Current world snapshot</li>
        <li style="list-style:none;"><code>POST /api/command</code> -- Submit a tool invocation</li>
    </ul>

    <h2>WebSocket</h2>
    <ul>
        <li style="list-style:none;"><code>ws://host:port/ws/ticks</code> -- Live tick summary stream</li>
    </ul>
</body>
</html>"#
    ))
}

/// Return the current world snapshot.
pub async fn get_world(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let simulator = state.simulator.lock().await;
    let snapshot = snapshot::build(&simulator.world, simulator.tick_count());
    Json(snapshot)
}

/// The request body for `POST /api/command`.
#[derive(Debug, serde::Deserialize)]
pub struct SubmitCommandRequest {
    /// The acting agent's id.
    pub actor_id: AgentId,
    /// The tool invocation to submit on the actor's behalf.
    #[serde(flatten)]
    pub command: CommandRequest,
}

/// Submit a tool invocation for `actor_id`.
///
/// A successful submission immediately drains the command's events with a
/// single [`Simulator::tick`](emergence_core::scheduler::Simulator::tick)
/// call, matching the tick discipline that gives a player's explicit
/// command exactly one clock advance, same as a full NPC round.
///
/// # Errors
///
/// Returns [`ObserverError::Command`] when the simulator rejects the
/// invocation (unknown tool, busy actor, invalid intent, or an unresolved
/// lookup). The tick clock is not advanced on rejection.
pub async fn submit_command(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmitCommandRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    let mut simulator = state.simulator.lock().await;
    simulator.process_command(&request.actor_id, request.command)?;
    simulator.tick();
    let tick = simulator.tick_count();
    let agents_alive = simulator.world.agents.values().filter(|agent| !agent.is_dead()).count();
    drop(simulator);
    state.broadcast(&crate::state::TickBroadcast { tick, agents_alive });
    Ok(Json(serde_json::json!({"accepted": true, "tick": tick})))
}
