use emergence_types::{Agent, Event, EventKind, ToolName};
use emergence_world::WorldState;

use super::Tool;

/// Deliberately pass a number of ticks doing nothing.
pub struct WaitTool;

impl Tool for WaitTool {
    fn name(&self) -> ToolName {
        ToolName::Wait
    }

    fn validate_intent(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        _actor: &Agent,
    ) -> bool {
        params.get("ticks").map_or(true, |value| {
            value.as_u64().is_some_and(|ticks| ticks >= 1)
        })
    }

    fn generate_events(
        &self,
        _params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        actor: &Agent,
        tick: u64,
    ) -> Vec<Event> {
        vec![Event::new(EventKind::Wait, tick, Some(actor.id.clone()))]
    }
}
