use emergence_types::{Agent, AgentId, Event, EventKind, ToolName};
use emergence_world::WorldState;

use super::Tool;

/// Attempt to attack a co-located agent. Resolution into a hit or miss
/// happens downstream of the `attack_attempt` event, not here.
pub struct AttackTool;

impl Tool for AttackTool {
    fn name(&self) -> ToolName {
        ToolName::Attack
    }

    fn validate_intent(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        world: &WorldState,
        actor: &Agent,
    ) -> bool {
        let Some(target_id) = params.get("target_id").and_then(serde_json::Value::as_str) else {
            return false;
        };
        let target_id = AgentId::new(target_id);
        let Ok(target) = world.get_agent(&target_id) else {
            return false;
        };
        if target.is_dead() {
            return false;
        }
        let attacker_loc = world.find_agent_location(&actor.id);
        let target_loc = world.find_agent_location(&target_id);
        attacker_loc.is_some() && attacker_loc == target_loc
    }

    fn generate_events(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        actor: &Agent,
        tick: u64,
    ) -> Vec<Event> {
        let Some(target_id) = params.get("target_id").and_then(serde_json::Value::as_str) else {
            return Vec::new();
        };
        vec![Event::new(
            EventKind::AttackAttempt {
                target: AgentId::new(target_id),
            },
            tick,
            Some(actor.id.clone()),
        )]
    }
}
