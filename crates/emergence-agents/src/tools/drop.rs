use emergence_types::{Agent, Event, EventKind, ItemInstanceId, ToolName};
use emergence_world::WorldState;

use super::Tool;

/// Put down a carried item at the actor's current location.
pub struct DropTool;

impl Tool for DropTool {
    fn name(&self) -> ToolName {
        ToolName::Drop
    }

    fn validate_intent(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        actor: &Agent,
    ) -> bool {
        let Some(item_id) = params.get("item_id").and_then(serde_json::Value::as_str) else {
            return false;
        };
        let item_id = ItemInstanceId::new(item_id);
        actor.inventory.contains(&item_id)
    }

    fn generate_events(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        actor: &Agent,
        tick: u64,
    ) -> Vec<Event> {
        let Some(item_id) = params.get("item_id").and_then(serde_json::Value::as_str) else {
            return Vec::new();
        };
        vec![Event::new(
            EventKind::Drop {
                item: ItemInstanceId::new(item_id),
            },
            tick,
            Some(actor.id.clone()),
        )]
    }
}
