use emergence_types::{Agent, Event, EventKind, ToolName};
use emergence_world::WorldState;

use super::Tool;

/// Inspect the actor's current location. Takes no parameters; valid only
/// when the actor has a resolvable location.
pub struct LookTool;

impl Tool for LookTool {
    fn name(&self) -> ToolName {
        ToolName::Look
    }

    fn validate_intent(
        &self,
        _params: &serde_json::Map<String, serde_json::Value>,
        world: &WorldState,
        actor: &Agent,
    ) -> bool {
        world.find_agent_location(&actor.id).is_some()
    }

    fn generate_events(
        &self,
        _params: &serde_json::Map<String, serde_json::Value>,
        world: &WorldState,
        actor: &Agent,
        tick: u64,
    ) -> Vec<Event> {
        if world.find_agent_location(&actor.id).is_none() {
            return Vec::new();
        }
        vec![Event::new(
            EventKind::DescribeLocation,
            tick,
            Some(actor.id.clone()),
        )]
    }
}
