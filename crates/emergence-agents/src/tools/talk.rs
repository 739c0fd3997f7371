use emergence_types::{Agent, AgentId, Event, EventKind, ToolName};
use emergence_world::WorldState;

use super::Tool;

/// Speak, optionally addressed to a co-located agent, starting or
/// continuing a conversation.
pub struct TalkTool;

impl Tool for TalkTool {
    fn name(&self) -> ToolName {
        ToolName::Talk
    }

    fn validate_intent(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        world: &WorldState,
        actor: &Agent,
    ) -> bool {
        let Some(content) = params.get("content").and_then(serde_json::Value::as_str) else {
            return false;
        };
        if content.is_empty() {
            return false;
        }
        let Some(target_id) = params.get("target_id").and_then(serde_json::Value::as_str) else {
            return true;
        };
        let target_id = AgentId::new(target_id);
        if world.get_agent(&target_id).is_err() {
            return false;
        }
        world.find_agent_location(&actor.id) == world.find_agent_location(&target_id)
    }

    fn generate_events(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        actor: &Agent,
        tick: u64,
    ) -> Vec<Event> {
        let Some(content) = params.get("content").and_then(serde_json::Value::as_str) else {
            return Vec::new();
        };
        let target_id = params
            .get("target_id")
            .and_then(serde_json::Value::as_str)
            .map(AgentId::new);
        vec![Event::new(
            EventKind::Talk {
                target_id,
                content: content.to_owned(),
            },
            tick,
            Some(actor.id.clone()),
        )]
    }
}
