//! Observer API server for the embodied-agent simulation.
//!
//! This crate provides an Axum HTTP server that exposes the simulation's
//! three front-end surfaces:
//!
//! - **`GET /api/world`** -- the read-only world snapshot.
//! - **`POST /api/command`** -- tool-invocation submission for any actor.
//! - **`GET /ws/ticks`** -- a push feed of tick summaries via
//!   [`tokio::sync::broadcast`].
//! - **Minimal HTML dashboard** (`GET /`) showing current tick and
//!   population, with links to the API endpoints.
//!
//! # Architecture
//!
//! The router performs no world mutation of its own; it locks the shared
//! [`state::AppState::simulator`] and calls straight through to
//! [`emergence_core::scheduler::Simulator::process_command`]. `WebSocket`
//! clients receive tick summaries via a broadcast channel with automatic
//! lag handling, so a slow client never blocks the tick cycle.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod snapshot;
pub mod state;
pub mod ws;

pub use router::build_router;
pub use server::{start_server, ServerConfig, ServerError};
pub use state::{AppState, TickBroadcast};
