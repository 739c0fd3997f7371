use emergence_types::{Agent, Event, EventKind, ToolName};
use emergence_world::WorldState;

use super::Tool;

/// Enable or disable global starvation damage. Administrative; not gated
/// on actor state.
pub struct ToggleStarvationTool;

impl Tool for ToggleStarvationTool {
    fn name(&self) -> ToolName {
        ToolName::ToggleStarvation
    }

    fn validate_intent(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        _actor: &Agent,
    ) -> bool {
        params.get("enabled").is_some_and(serde_json::Value::is_boolean)
    }

    fn generate_events(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        actor: &Agent,
        tick: u64,
    ) -> Vec<Event> {
        let Some(enabled) = params.get("enabled").and_then(serde_json::Value::as_bool) else {
            return Vec::new();
        };
        vec![Event::new(
            EventKind::ToggleStarvation { enabled },
            tick,
            Some(actor.id.clone()),
        )]
    }
}
