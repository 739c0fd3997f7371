use emergence_types::{Agent, Event, EventKind, ItemInstanceId, ToolName};
use emergence_world::WorldState;

use super::Tool;

/// Consume a carried item tagged `food`, destroying the instance.
pub struct EatTool;

impl Tool for EatTool {
    fn name(&self) -> ToolName {
        ToolName::Eat
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
        if !actor.inventory.contains(&item_id) {
            return false;
        }
        let Ok(instance) = world.get_item_instance(&item_id) else {
            return false;
        };
        let Ok(blueprint) = world.get_item_blueprint(&instance.blueprint_id) else {
            return false;
        };
        blueprint.properties.contains("food")
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
            EventKind::Eat {
                item: ItemInstanceId::new(item_id),
            },
            tick,
            Some(actor.id.clone()),
        )]
    }
}
