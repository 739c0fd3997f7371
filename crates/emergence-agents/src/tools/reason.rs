use emergence_types::{Agent, AgentId, Event, EventKind, GoalStatus, MemoryStatus, ReasonMutation, ToolName};
use emergence_world::WorldState;

use super::Tool;

/// The allowlisted self-mutation tool: memories, goals, and relationships
/// only — never hp, attributes, skills, inventory, slots, or location.
pub struct ReasonTool;

impl Tool for ReasonTool {
    fn name(&self) -> ToolName {
        ToolName::Reason
    }

    fn validate_intent(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        _actor: &Agent,
    ) -> bool {
        parse_mutation(params).is_some()
    }

    fn generate_events(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        actor: &Agent,
        tick: u64,
    ) -> Vec<Event> {
        let Some(mutation) = parse_mutation(params) else {
            return Vec::new();
        };
        vec![Event::new(
            EventKind::Reason { mutation },
            tick,
            Some(actor.id.clone()),
        )]
    }
}

/// Parse `desired_outcome` into exactly one allowlisted [`ReasonMutation`],
/// rejecting anything with more than one recognized key or malformed
/// per-variant fields.
fn parse_mutation(params: &serde_json::Map<String, serde_json::Value>) -> Option<ReasonMutation> {
    let desired = params.get("desired_outcome")?.as_object()?;

    if let Some(data) = desired.get("add_memory").and_then(serde_json::Value::as_object) {
        let text = data.get("text")?.as_str()?;
        return Some(ReasonMutation::AddMemory {
            text: text.to_owned(),
        });
    }
    if let Some(data) = desired
        .get("update_memory_status")
        .and_then(serde_json::Value::as_object)
    {
        let substring = data.get("match_text")?.as_str()?.to_lowercase();
        let status: MemoryStatus = serde_json::from_value(data.get("new_status")?.clone()).ok()?;
        return Some(ReasonMutation::UpdateMemoryStatus { substring, status });
    }
    if let Some(data) = desired.get("add_goal").and_then(serde_json::Value::as_object) {
        let text = data.get("text")?.as_str()?;
        return Some(ReasonMutation::AddGoal {
            text: text.to_owned(),
        });
    }
    if let Some(data) = desired
        .get("update_goal_status")
        .and_then(serde_json::Value::as_object)
    {
        let substring = data.get("match_text")?.as_str()?.to_lowercase();
        let status: GoalStatus = serde_json::from_value(data.get("new_status")?.clone()).ok()?;
        return Some(ReasonMutation::UpdateGoalStatus { substring, status });
    }
    if let Some(data) = desired
        .get("update_relationship")
        .and_then(serde_json::Value::as_object)
    {
        let target = data.get("target_id")?.as_str()?;
        let status = data.get("new_status")?.as_str()?;
        return Some(ReasonMutation::UpdateRelationship {
            target: AgentId::new(target),
            status: status.to_owned(),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_add_memory_variant() {
        let params = json!({"desired_outcome": {"add_memory": {"text": "met the smith"}}})
            .as_object()
            .cloned()
            .expect("object");
        assert_eq!(
            parse_mutation(&params),
            Some(ReasonMutation::AddMemory {
                text: "met the smith".to_owned()
            })
        );
    }

    #[test]
    fn rejects_unrecognized_operation() {
        let params = json!({"desired_outcome": {"delete_everything": {}}})
            .as_object()
            .cloned()
            .expect("object");
        assert_eq!(parse_mutation(&params), None);
    }

    #[test]
    fn rejects_missing_desired_outcome() {
        let params = serde_json::Map::new();
        assert_eq!(parse_mutation(&params), None);
    }
}
