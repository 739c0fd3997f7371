use emergence_types::{Agent, Event, EventKind, ItemInstanceId, ToolName};
use emergence_world::WorldState;

use super::Tool;

/// Pick up an item resting at the actor's current location.
pub struct GrabTool;

impl Tool for GrabTool {
    fn name(&self) -> ToolName {
        ToolName::Grab
    }

    fn validate_intent(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        world: &WorldState,
        actor: &Agent,
    ) -> bool {
        let Some(item_id) = params.get("item_id").and_then(serde_json::Value::as_str) else {
            return false;
        };
        let item_id = ItemInstanceId::new(item_id);
        if world.get_item_instance(&item_id).is_err() {
            return false;
        }
        let Some(location_id) = world.find_agent_location(&actor.id) else {
            return false;
        };
        let Ok(location) = world.get_location_state(&location_id) else {
            return false;
        };
        location.items.contains(&item_id)
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
            EventKind::Grab {
                item: ItemInstanceId::new(item_id),
            },
            tick,
            Some(actor.id.clone()),
        )]
    }
}
