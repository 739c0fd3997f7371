use emergence_types::{Agent, ConnectionStatus, Event, EventKind, LocationId, ToolName};
use emergence_world::WorldState;

use super::Tool;

/// Travel from the actor's current location to an open dynamic neighbor.
pub struct MoveTool;

impl Tool for MoveTool {
    fn name(&self) -> ToolName {
        ToolName::Move
    }

    fn validate_intent(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        world: &WorldState,
        actor: &Agent,
    ) -> bool {
        let Some(target) = params.get("target_location").and_then(serde_json::Value::as_str) else {
            return false;
        };
        let target = LocationId::new(target);
        let Some(current) = world.find_agent_location(&actor.id) else {
            return false;
        };
        let Ok(location) = world.get_location_state(&current) else {
            return false;
        };
        location
            .connections_state
            .get(&target)
            .is_some_and(|edge| edge.status == ConnectionStatus::Open)
    }

    fn generate_events(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        actor: &Agent,
        tick: u64,
    ) -> Vec<Event> {
        let Some(target) = params.get("target_location").and_then(serde_json::Value::as_str) else {
            return Vec::new();
        };
        vec![Event::new(
            EventKind::Move {
                target_location: LocationId::new(target),
            },
            tick,
            Some(actor.id.clone()),
        )]
    }
}
