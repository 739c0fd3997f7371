use emergence_types::{Agent, Event, EventKind, ItemInstanceId, ToolName};
use emergence_world::WorldState;

use super::Tool;

/// Move a carried item into an equipment slot.
pub struct EquipTool;

impl Tool for EquipTool {
    fn name(&self) -> ToolName {
        ToolName::Equip
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
        let Some(slot) = params.get("slot").and_then(serde_json::Value::as_str) else {
            return false;
        };
        let item_id = ItemInstanceId::new(item_id);
        actor.inventory.contains(&item_id) && actor.slots.contains_key(slot)
    }

    fn generate_events(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        actor: &Agent,
        tick: u64,
    ) -> Vec<Event> {
        let (Some(item_id), Some(slot)) = (
            params.get("item_id").and_then(serde_json::Value::as_str),
            params.get("slot").and_then(serde_json::Value::as_str),
        ) else {
            return Vec::new();
        };
        vec![Event::new(
            EventKind::Equip {
                item: ItemInstanceId::new(item_id),
                slot: slot.to_owned(),
            },
            tick,
            Some(actor.id.clone()),
        )]
    }
}
