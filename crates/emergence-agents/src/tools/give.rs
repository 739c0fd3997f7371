use emergence_types::{Agent, AgentId, Event, EventKind, ItemInstanceId, ToolName};
use emergence_world::WorldState;

use super::Tool;

/// Hand a carried item to a co-located agent.
pub struct GiveTool;

impl Tool for GiveTool {
    fn name(&self) -> ToolName {
        ToolName::Give
    }

    fn validate_intent(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        world: &WorldState,
        actor: &Agent,
    ) -> bool {
        let (Some(item_id), Some(target_id)) = (
            params.get("item_id").and_then(serde_json::Value::as_str),
            params.get("target_id").and_then(serde_json::Value::as_str),
        ) else {
            return false;
        };
        let item_id = ItemInstanceId::new(item_id);
        let target_id = AgentId::new(target_id);
        if !actor.inventory.contains(&item_id) {
            return false;
        }
        if world.get_agent(&target_id).is_err() {
            return false;
        }
        let Some(actor_loc) = world.find_agent_location(&actor.id) else {
            return false;
        };
        world.find_agent_location(&target_id) == Some(actor_loc)
    }

    fn generate_events(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        actor: &Agent,
        tick: u64,
    ) -> Vec<Event> {
        let (Some(item_id), Some(target_id)) = (
            params.get("item_id").and_then(serde_json::Value::as_str),
            params.get("target_id").and_then(serde_json::Value::as_str),
        ) else {
            return Vec::new();
        };
        vec![Event::new(
            EventKind::Give {
                item: ItemInstanceId::new(item_id),
                receiver: AgentId::new(target_id),
            },
            tick,
            Some(actor.id.clone()),
        )]
    }
}
