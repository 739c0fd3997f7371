use emergence_types::{Agent, Event, EventKind, ToolName};
use emergence_world::WorldState;

use super::Tool;

/// Leave whatever conversation the actor is currently participating in.
/// Takes no parameters; always valid.
pub struct LeaveConversationTool;

impl Tool for LeaveConversationTool {
    fn name(&self) -> ToolName {
        ToolName::LeaveConversation
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
        vec![Event::new(
            EventKind::LeaveConversation,
            tick,
            Some(actor.id.clone()),
        )]
    }
}
