//! The three-stage Propose/Repair/Fallback planner protocol.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use emergence_core::decision::Planner;
use emergence_types::{AgentId, CommandRequest};
use emergence_world::WorldState;
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use crate::connector::LlmConnector;
use crate::extract::extract_json;
use crate::schema::{PLANNABLE_TOOLS, example_for, schema_for, validate};
use crate::working_memory;

const SYSTEM_PROMPT: &str = "You are an action planner for a deterministic text-sim.\n\
Return ONLY a single JSON object: {\"tool\": string, \"params\": object}. No prose, no code fences.\n\
A tool_schemas section and tiny examples are provided in the user payload; obey them strictly.\n\
Rules:\n\
- Choose exactly one tool per turn.\n\
- Keep params minimal and valid; prefer ids already present in context.\n\
- If in a conversation and not the current speaker, prefer wait; consider interject only for brief, meaningful asides.\n\
- Working memory is provided; weigh goals, core memories, and recent perceptions when deciding.\n\
- When idle, prefer varied low-impact actions (a short talk, or wait); avoid repeating the same tool consecutively.\n\
- Avoid selecting look more than once every five turns.\n\
- Use move only toward an open neighbor.\n\
- Use attack only when co-located and context justifies it.\n\
- For wait/rest without an explicit duration, use ticks=1.\n\
Before deciding, you may write brief hidden reasoning inside <think>...</think>. Then output ONLY the JSON object.\n";

/// Implements [`Planner`] against an OpenAI-compatible endpoint via the
/// three-stage propose/repair/fallback protocol.
pub struct LlmPlanner {
    connector: LlmConnector,
    retrieval_top_k: usize,
    last_tool_by_actor: BTreeMap<AgentId, String>,
}

impl LlmPlanner {
    /// Build a planner over `connector`, retrieving the top `retrieval_top_k`
    /// long-term memories per turn.
    #[must_use]
    pub fn new(connector: LlmConnector, retrieval_top_k: usize) -> Self {
        Self {
            connector,
            retrieval_top_k,
            last_tool_by_actor: BTreeMap::new(),
        }
    }

    fn repetition_hint(&self, actor_id: &AgentId) -> Value {
        json!({
            "last_tool_by_actor": self.last_tool_by_actor.get(actor_id),
            "avoid_repeat_within": 2,
            "look_cooldown": 5,
        })
    }

    fn tool_schemas_and_examples(&self) -> (Value, Value) {
        let mut schemas = Map::new();
        let mut examples = Map::new();
        for tool in PLANNABLE_TOOLS {
            if let Some(schema) = schema_for(tool) {
                schemas.insert(
                    tool.to_owned(),
                    json!({
                        "required": schema.required,
                        "one_of": schema.one_of,
                    }),
                );
            }
            if let Some(example) = example_for(tool) {
                examples.insert(tool.to_owned(), example);
            }
        }
        (Value::Object(schemas), Value::Object(examples))
    }

    async fn propose(&self, world: &WorldState, actor_id: &AgentId, tick: u64) -> Option<Value> {
        let agent = world.get_agent(actor_id).ok()?;
        let location = world.find_agent_location(actor_id)?;
        let location_static = world.get_location_static(&location).ok();

        let working_memory = working_memory::assemble(world, agent, &location, tick, self.retrieval_top_k);
        let neighbor_ids = working_memory::open_neighbor_ids(world, &location);
        let (tool_schemas, tool_examples) = self.tool_schemas_and_examples();

        let payload = json!({
            "context": {
                "actor": {"id": agent.id, "name": agent.name, "hp": agent.hp, "hunger_stage": agent.hunger_stage},
                "location": {
                    "id": location,
                    "description": location_static.map(|s| s.description.clone()),
                },
                "tick": tick,
            },
            "working_memory": working_memory,
            "repetition_hint": self.repetition_hint(actor_id),
            "neighbor_ids": neighbor_ids,
            "tool_schemas": tool_schemas,
            "tool_examples": tool_examples,
            "input": "Decide the next action. Respect repetition_hint.last_tool_by_actor and avoid repeating it within avoid_repeat_within turns. Do not choose look if used within look_cooldown turns.",
        });

        self.call(&payload.to_string(), actor_id, "propose", tick).await
    }

    async fn repair(&self, last_output: &Value, error: &str, tool_hint: &str, actor_id: &AgentId, tick: u64) -> Option<Value> {
        let payload = json!({
            "context": {
                "error": error,
                "last_output": last_output,
                "expected_schema": schema_for(tool_hint).map(|schema| json!({"required": schema.required, "one_of": schema.one_of})),
                "example": example_for(tool_hint),
            },
            "instruction": "Repair your output to satisfy expected_schema. Return ONLY a single JSON object {tool, params}.",
        });
        self.call(&payload.to_string(), actor_id, "repair", tick).await
    }

    async fn call(&self, user_payload: &str, actor_id: &AgentId, stage: &str, tick: u64) -> Option<Value> {
        match self.connector.complete(SYSTEM_PROMPT, user_payload).await {
            Ok(reply) => extract_json(&reply),
            Err(error) => {
                warn!(endpoint = self.connector.endpoint(), %stage, actor = %actor_id, tick, %error, "planner transport error");
                None
            }
        }
    }

    fn finalize(&mut self, actor_id: &AgentId, command: CommandRequest) -> CommandRequest {
        self.last_tool_by_actor.insert(actor_id.clone(), command.tool.clone());
        command
    }
}

fn normalize(tool: &str, params: &mut Map<String, Value>) {
    match tool {
        "move" | "open" | "close" => alias_first_present(params, "target_location", &["location_id", "target", "to"]),
        "attack" | "give" => alias_first_present(params, "target_id", &["target", "target_ids"]),
        _ => {}
    }
    if matches!(tool, "talk" | "talk_loud" | "scream") {
        if let Some(Value::String(content)) = params.get_mut("content") {
            let clamped: String = content.chars().take(200).collect();
            *content = clamped;
        }
    }
    if matches!(tool, "wait" | "rest") {
        if let Some(ticks) = params.get("ticks").and_then(Value::as_u64) {
            params.insert("ticks".to_owned(), json!(ticks.max(1)));
        }
    }
}

fn alias_first_present(params: &mut Map<String, Value>, canonical: &str, fallbacks: &[&str]) {
    if params.contains_key(canonical) {
        return;
    }
    for fallback in fallbacks {
        let Some(value) = params.get(*fallback).cloned() else {
            continue;
        };
        let resolved = match &value {
            Value::Array(items) => items.first().cloned(),
            _ => Some(value),
        };
        if let Some(resolved) = resolved {
            params.insert(canonical.to_owned(), resolved);
            return;
        }
    }
}

/// Parse a proposal object into `(tool, params)`, normalizing params for the
/// tool in the same pass. Returns `None` if the value isn't a JSON object
/// with a string `tool` field.
fn parse_proposal(value: &Value) -> Option<(String, Map<String, Value>)> {
    let object = value.as_object()?;
    let tool = object.get("tool")?.as_str()?.to_owned();
    let mut params = object.get("params").and_then(Value::as_object).cloned().unwrap_or_default();
    normalize(&tool, &mut params);
    Some((tool, params))
}

impl Planner for LlmPlanner {
    fn plan<'a>(
        &'a mut self,
        world: &'a WorldState,
        actor_id: &'a AgentId,
        tick: u64,
    ) -> Pin<Box<dyn Future<Output = CommandRequest> + Send + 'a>> {
        Box::pin(async move {
            let Some(proposal) = self.propose(world, actor_id, tick).await else {
                info!(actor = %actor_id, tick, "planner propose stage produced nothing, falling back to wait");
                return self.finalize(actor_id, CommandRequest::wait(1));
            };

            let Some((tool, params)) = parse_proposal(&proposal) else {
                info!(actor = %actor_id, tick, "planner propose stage was not a usable object, falling back to wait");
                return self.finalize(actor_id, CommandRequest::wait(1));
            };

            if schema_for(&tool).is_none() {
                info!(actor = %actor_id, tick, tool = %tool, "planner proposed an unknown tool, falling back to wait");
                return self.finalize(actor_id, CommandRequest::wait(1));
            }

            if let Some(error) = validate(&tool, &params) {
                info!(actor = %actor_id, tick, tool = %tool, %error, "planner repair stage starting");
                let repaired = self.repair(&proposal, &error, &tool, actor_id, tick).await;
                if let Some((repaired_tool, repaired_params)) = repaired.as_ref().and_then(parse_proposal) {
                    if schema_for(&repaired_tool).is_some() && validate(&repaired_tool, &repaired_params).is_none() {
                        return self.finalize(
                            actor_id,
                            CommandRequest {
                                tool: repaired_tool,
                                params: repaired_params,
                            },
                        );
                    }
                }
                info!(actor = %actor_id, tick, "planner repair stage failed, falling back to wait");
                return self.finalize(actor_id, CommandRequest::wait(1));
            }

            self.finalize(actor_id, CommandRequest { tool, params })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_aliases_location_id_to_target_location_for_move() {
        let mut params = Map::new();
        params.insert("location_id".to_owned(), json!("market_square"));
        normalize("move", &mut params);
        assert_eq!(params.get("target_location"), Some(&json!("market_square")));
    }

    #[test]
    fn normalize_aliases_first_target_id_out_of_a_list() {
        let mut params = Map::new();
        params.insert("target_ids".to_owned(), json!(["npc_enemy", "npc_bystander"]));
        normalize("attack", &mut params);
        assert_eq!(params.get("target_id"), Some(&json!("npc_enemy")));
    }

    #[test]
    fn normalize_clamps_content_to_two_hundred_chars() {
        let mut params = Map::new();
        params.insert("content".to_owned(), json!("a".repeat(250)));
        normalize("talk", &mut params);
        let clamped = params.get("content").and_then(Value::as_str).unwrap_or_default();
        assert_eq!(clamped.chars().count(), 200);
    }

    #[test]
    fn normalize_raises_zero_ticks_to_one() {
        let mut params = Map::new();
        params.insert("ticks".to_owned(), json!(0));
        normalize("wait", &mut params);
        assert_eq!(params.get("ticks"), Some(&json!(1)));
    }

    #[test]
    fn parse_proposal_rejects_non_object_values() {
        assert!(parse_proposal(&json!("not an object")).is_none());
        assert!(parse_proposal(&json!({"params": {}})).is_none());
    }

    #[test]
    fn parse_proposal_defaults_missing_params_to_empty() {
        let (tool, params) = parse_proposal(&json!({"tool": "look"})).expect("parses");
        assert_eq!(tool, "look");
        assert!(params.is_empty());
    }
}
