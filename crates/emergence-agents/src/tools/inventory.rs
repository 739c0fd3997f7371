use emergence_types::{Agent, Event, EventKind, ToolName};
use emergence_world::WorldState;

use super::Tool;

/// Inspect the actor's own carried items. Takes no parameters; always
/// valid.
pub struct InventoryTool;

impl Tool for InventoryTool {
    fn name(&self) -> ToolName {
        ToolName::Inventory
    }

    fn validate_intent(
        &self,
        _params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        _actor: &Agent,
    ) -> bool {
        true
    }

    fn generate_events(
        &self,
        _params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        actor: &Agent,
        tick: u64,
    ) -> Vec<Event> {
        vec![Event::new(EventKind::Inventory, tick, Some(actor.id.clone()))]
    }
}
