use emergence_types::{Agent, Event, EventKind, ToolName};
use emergence_world::WorldState;

use super::Tool;

/// Clear an occupied equipment slot, returning its item to the actor's
/// inventory.
pub struct UnequipTool;

impl Tool for UnequipTool {
    fn name(&self) -> ToolName {
        ToolName::Unequip
    }

    fn validate_intent(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        actor: &Agent,
    ) -> bool {
        let Some(slot) = params.get("slot").and_then(serde_json::Value::as_str) else {
            return false;
        };
        actor
            .slots
            .get(slot)
            .is_some_and(|occupant| occupant.is_some())
    }

    fn generate_events(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        actor: &Agent,
        tick: u64,
    ) -> Vec<Event> {
        let Some(slot) = params.get("slot").and_then(serde_json::Value::as_str) else {
            return Vec::new();
        };
        vec![Event::new(
            EventKind::Unequip {
                slot: slot.to_owned(),
            },
            tick,
            Some(actor.id.clone()),
        )]
    }
}
