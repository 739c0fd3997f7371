//! Per-tool parameter schemas and tiny examples shown to the model, and the
//! schema validation the repair stage checks a proposal against.
//!
//! `reason` and `reflect` are deliberately absent: those are editor/authoring
//! operations (see the front-end surfaces), not verbs the planner itself is
//! offered a turn to choose.

use serde_json::{Map, Value, json};

/// The tool names the planner is offered on every turn, in a fixed order so
/// prompts are stable across calls.
pub const PLANNABLE_TOOLS: [&str; 22] = [
    "move",
    "open",
    "close",
    "grab",
    "drop",
    "attack",
    "talk",
    "talk_loud",
    "scream",
    "interject",
    "leave_conversation",
    "inventory",
    "stats",
    "look",
    "analyze",
    "equip",
    "unequip",
    "eat",
    "give",
    "toggle_starvation",
    "wait",
    "rest",
];

/// A tool's parameter contract: keys that must be present, and groups where
/// at least one member of the group must be present.
pub struct ToolSchema {
    /// Parameter names that must be present.
    pub required: &'static [&'static str],
    /// Groups of parameter names where at least one must be present.
    pub one_of: &'static [&'static [&'static str]],
}

/// The schema for `tool`, if it is one the planner is offered.
#[must_use]
pub fn schema_for(tool: &str) -> Option<ToolSchema> {
    match tool {
        "move" => Some(ToolSchema {
            required: &[],
            one_of: &[&["target_location"]],
        }),
        "open" | "close" => Some(ToolSchema {
            required: &["target_location"],
            one_of: &[],
        }),
        "attack" => Some(ToolSchema {
            required: &["target_id"],
            one_of: &[],
        }),
        "talk" => Some(ToolSchema {
            required: &["content"],
            one_of: &[],
        }),
        "talk_loud" | "scream" => Some(ToolSchema {
            required: &["content"],
            one_of: &[],
        }),
        "grab" | "drop" => Some(ToolSchema {
            required: &["item_id"],
            one_of: &[],
        }),
        "equip" => Some(ToolSchema {
            required: &["item_id", "slot"],
            one_of: &[],
        }),
        "unequip" => Some(ToolSchema {
            required: &["slot"],
            one_of: &[],
        }),
        "inventory" | "stats" | "look" | "leave_conversation" => Some(ToolSchema {
            required: &[],
            one_of: &[],
        }),
        "analyze" | "eat" => Some(ToolSchema {
            required: &["item_id"],
            one_of: &[],
        }),
        "give" => Some(ToolSchema {
            required: &["item_id", "target_id"],
            one_of: &[],
        }),
        "toggle_starvation" => Some(ToolSchema {
            required: &["enabled"],
            one_of: &[],
        }),
        "wait" | "rest" => Some(ToolSchema {
            required: &[],
            one_of: &[],
        }),
        "interject" => Some(ToolSchema {
            required: &["conversation_id", "content"],
            one_of: &[],
        }),
        _ => None,
    }
}

/// A minimal valid `{tool, params}` example for `tool`, for the model's
/// reference and for repair re-prompts.
#[must_use]
pub fn example_for(tool: &str) -> Option<Value> {
    let example = match tool {
        "move" => json!({"tool": "move", "params": {"target_location": "market_square"}}),
        "open" => json!({"tool": "open", "params": {"target_location": "alley"}}),
        "close" => json!({"tool": "close", "params": {"target_location": "market_square"}}),
        "attack" => json!({"tool": "attack", "params": {"target_id": "npc_enemy"}}),
        "talk" => json!({"tool": "talk", "params": {"target_id": "npc_guard", "content": "Good day."}}),
        "talk_loud" => json!({"tool": "talk_loud", "params": {"content": "Hello up there!"}}),
        "scream" => json!({"tool": "scream", "params": {"content": "Help!"}}),
        "grab" => json!({"tool": "grab", "params": {"item_id": "item_rusty_sword_1"}}),
        "drop" => json!({"tool": "drop", "params": {"item_id": "item_rusty_sword_1"}}),
        "equip" => json!({"tool": "equip", "params": {"item_id": "item_leather_armor_1", "slot": "torso"}}),
        "unequip" => json!({"tool": "unequip", "params": {"slot": "torso"}}),
        "inventory" => json!({"tool": "inventory", "params": {}}),
        "stats" => json!({"tool": "stats", "params": {}}),
        "look" => json!({"tool": "look", "params": {}}),
        "analyze" => json!({"tool": "analyze", "params": {"item_id": "item_apple_1"}}),
        "eat" => json!({"tool": "eat", "params": {"item_id": "item_apple_1"}}),
        "give" => json!({"tool": "give", "params": {"item_id": "item_apple_1", "target_id": "npc_bard"}}),
        "toggle_starvation" => json!({"tool": "toggle_starvation", "params": {"enabled": false}}),
        "wait" => json!({"tool": "wait", "params": {"ticks": 1}}),
        "rest" => json!({"tool": "rest", "params": {"ticks": 1}}),
        "interject" => json!({"tool": "interject", "params": {"conversation_id": "convo_123", "content": "Wait."}}),
        "leave_conversation" => json!({"tool": "leave_conversation", "params": {}}),
        _ => return None,
    };
    Some(example)
}

/// Check `params` against `tool`'s schema, returning the first violation
/// found as a human-readable message.
///
/// An unknown tool name is not this function's concern (the caller handles
/// that before reaching schema validation) and always passes.
#[must_use]
pub fn validate(tool: &str, params: &Map<String, Value>) -> Option<String> {
    let schema = schema_for(tool)?;
    for required in schema.required {
        if !params.contains_key(*required) {
            return Some(format!("missing required param '{required}'"));
        }
    }
    for group in schema.one_of {
        if !group.iter().any(|key| params.contains_key(*key)) {
            return Some(format!("one of {group:?} is required"));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_requires_one_of_target_location() {
        let empty = Map::new();
        assert!(validate("move", &empty).is_some());
        let mut params = Map::new();
        params.insert("target_location".to_owned(), json!("market_square"));
        assert!(validate("move", &params).is_none());
    }

    #[test]
    fn give_requires_both_item_and_target() {
        let mut params = Map::new();
        params.insert("item_id".to_owned(), json!("item_apple_1"));
        assert_eq!(validate("give", &params), Some("missing required param 'target_id'".to_owned()));
    }

    #[test]
    fn wait_has_no_required_params() {
        assert!(validate("wait", &Map::new()).is_none());
    }

    #[test]
    fn unknown_tool_has_no_schema() {
        assert!(schema_for("teleport").is_none());
        assert!(validate("teleport", &Map::new()).is_none());
    }

    #[test]
    fn every_plannable_tool_has_an_example() {
        for tool in PLANNABLE_TOOLS {
            assert!(example_for(tool).is_some(), "missing example for {tool}");
        }
    }
}
