use emergence_types::{Agent, ConversationId, Event, EventKind, ToolName};
use emergence_world::WorldState;

use super::Tool;

/// Join an existing conversation mid-stream without waiting to be addressed.
///
/// Location co-presence with the conversation's participants is enforced by
/// the scheduler that owns conversation state, not here.
pub struct InterjectTool;

impl Tool for InterjectTool {
    fn name(&self) -> ToolName {
        ToolName::Interject
    }

    fn validate_intent(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        _actor: &Agent,
    ) -> bool {
        let conversation_id = params
            .get("conversation_id")
            .and_then(serde_json::Value::as_str);
        let content = params.get("content").and_then(serde_json::Value::as_str);
        matches!((conversation_id, content), (Some(c), Some(text)) if !c.is_empty() && !text.is_empty())
    }

    fn generate_events(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        actor: &Agent,
        tick: u64,
    ) -> Vec<Event> {
        let (Some(conversation_id), Some(content)) = (
            params.get("conversation_id").and_then(serde_json::Value::as_str),
            params.get("content").and_then(serde_json::Value::as_str),
        ) else {
            return Vec::new();
        };
        vec![Event::new(
            EventKind::Interject {
                conversation_id: ConversationId::new(conversation_id),
                content: content.to_owned(),
            },
            tick,
            Some(actor.id.clone()),
        )]
    }
}
