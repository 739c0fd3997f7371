//! Shared application state for the Observer API server.
//!
//! [`AppState`] owns the single [`Simulator`] behind a `tokio::sync::Mutex`
//! so a `POST /api/command` handler and the engine's own tick-pump task can
//! coordinate without duplicating the single-threaded simulation anywhere --
//! there's exactly one writer of world state, the same invariant
//! `emergence_core::scheduler` upholds internally.

use std::sync::Arc;

use emergence_core::scheduler::Simulator;
use tokio::sync::{broadcast, Mutex};

/// Capacity of the broadcast channel for tick summaries.
///
/// If a subscriber falls behind by more than this many messages it
/// receives a [`broadcast::error::RecvError::Lagged`] and skips ahead to
/// the newest message.
const BROADCAST_CAPACITY: usize = 256;

/// JSON-serializable tick summary pushed over the `WebSocket`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TickBroadcast {
    /// The tick number just completed.
    pub tick: u64,
    /// Number of agents alive at the end of this tick.
    pub agents_alive: usize,
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// The simulation, guarded so the command endpoint and the engine's
    /// tick-pump task never mutate it concurrently.
    pub simulator: Arc<Mutex<Simulator>>,
    /// Broadcast sender for tick summary messages.
    pub tx: broadcast::Sender<TickBroadcast>,
}

impl AppState {
    /// Wrap `simulator` for serving behind the router.
    #[must_use]
    pub fn new(simulator: Simulator) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            simulator: Arc::new(Mutex::new(simulator)),
            tx,
        }
    }

    /// Subscribe to the tick broadcast channel.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TickBroadcast> {
        self.tx.subscribe()
    }

    /// Publish a tick summary to all connected clients.
    ///
    /// Returns the number of receivers that received the message. Zero
    /// receivers (no `WebSocket` clients connected) is not an error.
    pub fn broadcast(&self, summary: &TickBroadcast) -> usize {
        self.tx.send(summary.clone()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use emergence_world::WorldState;

    use super::*;

    #[test]
    fn broadcast_with_no_subscribers_returns_zero() {
        let state = AppState::new(Simulator::new(WorldState::new(), None));
        assert_eq!(state.broadcast(&TickBroadcast { tick: 1, agents_alive: 0 }), 0);
    }
}
