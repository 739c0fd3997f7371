use emergence_types::{Agent, Event, EventKind, ToolName};
use emergence_world::WorldState;

use super::Tool;

/// Broadcast a shout audible through every neighboring edge, regardless of
/// door status.
pub struct ScreamTool;

impl Tool for ScreamTool {
    fn name(&self) -> ToolName {
        ToolName::Scream
    }

    fn validate_intent(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        _actor: &Agent,
    ) -> bool {
        params
            .get("content")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|content| !content.is_empty())
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
        vec![Event::new(
            EventKind::Scream {
                content: content.to_owned(),
            },
            tick,
            Some(actor.id.clone()),
        )]
    }
}
