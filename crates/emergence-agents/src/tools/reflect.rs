use emergence_types::{Agent, Event, EventKind, ToolName};
use emergence_world::WorldState;

use super::Tool;

/// Consolidate recent memories into a core memory and mark matching entries
/// archived or consolidated. Does not touch stats, inventory, or slots.
pub struct ReflectTool;

impl Tool for ReflectTool {
    fn name(&self) -> ToolName {
        ToolName::Reflect
    }

    fn validate_intent(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        _actor: &Agent,
    ) -> bool {
        let Some(outputs) = params.get("outputs").and_then(serde_json::Value::as_object) else {
            return false;
        };
        ["new_core_memories", "new_memories", "archive_matches", "consolidate_matches"]
            .into_iter()
            .all(|key| outputs.get(key).map_or(true, serde_json::Value::is_array))
    }

    fn generate_events(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        _world: &WorldState,
        actor: &Agent,
        tick: u64,
    ) -> Vec<Event> {
        let Some(outputs) = params.get("outputs").and_then(serde_json::Value::as_object) else {
            return Vec::new();
        };

        let core_memory = outputs
            .get("new_core_memories")
            .and_then(serde_json::Value::as_array)
            .and_then(|entries| entries.first())
            .and_then(serde_json::Value::as_object)
            .and_then(|entry| entry.get("text"))
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_owned();

        let archive_matches = string_list(outputs, "archive_matches");
        let consolidate_matches = string_list(outputs, "consolidate_matches");

        vec![Event::new(
            EventKind::Reflect {
                core_memory,
                archive_matches,
                consolidate_matches,
            },
            tick,
            Some(actor.id.clone()),
        )]
    }
}

fn string_list(outputs: &serde_json::Map<String, serde_json::Value>, key: &str) -> Vec<String> {
    outputs
        .get(key)
        .and_then(serde_json::Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(serde_json::Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn make_actor() -> Agent {
        Agent {
            id: emergence_types::AgentId::new("npc_sage"),
            name: "Sage".to_owned(),
            hp: 10,
            inventory: Vec::new(),
            slots: std::collections::BTreeMap::new(),
            attributes: emergence_types::Attributes::default(),
            skills: std::collections::BTreeMap::new(),
            relationships: std::collections::BTreeMap::new(),
            inherent_tags: std::collections::BTreeSet::new(),
            dynamic_tags: std::collections::BTreeSet::new(),
            memories: Vec::new(),
            core_memories: Vec::new(),
            goals: Vec::new(),
            short_term_memory: Vec::new(),
            next_available_tick: 0,
            last_meal_tick: 0,
            hunger_stage: emergence_types::HungerStage::Sated,
        }
    }

    #[test]
    fn extracts_core_memory_text_and_match_lists() {
        let tool = ReflectTool;
        let world = WorldState::new();
        let actor = make_actor();
        let params = json!({
            "outputs": {
                "new_core_memories": [{"text": "the forge closed for winter"}],
                "archive_matches": ["rumor"],
                "consolidate_matches": ["forge"]
            }
        })
        .as_object()
        .cloned()
        .expect("object");

        assert!(tool.validate_intent(&params, &world, &actor));
        let events = tool.generate_events(&params, &world, &actor, 5);
        assert_eq!(events.len(), 1);
        match &events[0].kind {
            EventKind::Reflect {
                core_memory,
                archive_matches,
                consolidate_matches,
            } => {
                assert_eq!(core_memory, "the forge closed for winter");
                assert_eq!(archive_matches, &vec!["rumor".to_owned()]);
                assert_eq!(consolidate_matches, &vec!["forge".to_owned()]);
            }
            other => panic!("unexpected event kind: {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_outputs() {
        let tool = ReflectTool;
        let world = WorldState::new();
        let actor = make_actor();
        let params = serde_json::Map::new();
        assert!(!tool.validate_intent(&params, &world, &actor));
    }
}
