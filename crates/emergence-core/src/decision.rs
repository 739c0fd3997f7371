//! The planner abstraction: how a tool invocation is obtained for an agent's
//! turn.
//!
//! [`Planner`] generalizes a batch-per-tick decision source into a per-agent
//! call, since each NPC turn asks exactly one question of exactly one
//! backend. The LLM call this makes is the engine's only suspension point
//! (see the concurrency model), so `plan` is async; a trait object can't
//! carry a native `async fn`, so it returns a boxed future by hand instead
//! of pulling in a proc-macro crate for one method.

use std::future::Future;
use std::pin::Pin;

use emergence_types::{AgentId, CommandRequest};
use emergence_world::WorldState;

/// Errors a planner backend can surface. A failure here never stops the
/// engine; the scheduler always has a `wait` fallback available.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// The backend did not respond before its deadline.
    #[error("planner timed out for {agent_id} after {deadline_ms}ms")]
    Timeout {
        /// The agent whose turn timed out.
        agent_id: AgentId,
        /// The configured deadline.
        deadline_ms: u64,
    },

    /// The HTTP transport failed outright (connection refused, DNS, TLS, ...).
    #[error("planner transport error calling {endpoint}: {source}")]
    Transport {
        /// The endpoint that was being called.
        endpoint: String,
        /// The underlying error.
        #[source]
        source: anyhow::Error,
    },
}

/// Produces exactly one [`CommandRequest`] for an agent's turn.
///
/// Implementations decide internally how to interpret a malformed or
/// unparseable response; by the time `plan` returns, the result is always a
/// submittable command (the ultimate fallback is `wait` for one tick).
pub trait Planner: Send {
    /// Produce a command for `actor_id` to act on at `tick`.
    fn plan<'a>(
        &'a mut self,
        world: &'a WorldState,
        actor_id: &'a AgentId,
        tick: u64,
    ) -> Pin<Box<dyn Future<Output = CommandRequest> + Send + 'a>>;
}

/// A planner that always proposes `wait` for one tick, useful for driving
/// the tick cycle end-to-end before a real LLM backend is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubPlanner;

impl Planner for StubPlanner {
    fn plan<'a>(
        &'a mut self,
        _world: &'a WorldState,
        _actor_id: &'a AgentId,
        _tick: u64,
    ) -> Pin<Box<dyn Future<Output = CommandRequest> + Send + 'a>> {
        Box::pin(async { CommandRequest::wait(1) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_planner_always_waits() {
        let world = WorldState::new();
        let actor = AgentId::new("npc_sample");
        let mut planner = StubPlanner;
        let command = planner.plan(&world, &actor, 0).await;
        assert_eq!(command.tool, "wait");
    }
}
