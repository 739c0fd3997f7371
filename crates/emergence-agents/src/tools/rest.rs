use emergence_types::{Agent, Event, EventKind, ToolName};
use emergence_world::WorldState;

use super::Tool;

/// Spend a number of ticks recovering hit points, at 1 HP per tick capped by
/// `2 * constitution`.
pub struct RestTool;

impl Tool for RestTool {
    fn name(&self) -> ToolName {
        ToolName::Rest
    }

    fn validate_intent(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        _actor: &Agent,
    ) -> bool {
        params.get("ticks").map_or(true, |value| {
            value.as_u64().is_some_and(|ticks| ticks >= 1)
        })
    }

    fn generate_events(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        actor: &Agent,
        tick: u64,
    ) -> Vec<Event> {
        let ticks = params
            .get("ticks")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(1);
        let ticks = i64::try_from(ticks).unwrap_or(i64::MAX);
        let cap = 2_i64.saturating_mul(i64::from(actor.attributes.constitution)).max(0);
        let healed = ticks.min(cap);
        vec![Event::new(
            EventKind::Rest { healed },
            tick,
            Some(actor.id.clone()),
        )]
    }
}
