//! Working-memory assembly: the slice of an agent's goals, memories, and
//! recent perceptions handed to the planner on its turn.

use emergence_types::{Agent, LocationId, Memory, MemoryStatus};
use emergence_world::WorldState;

const GOALS_LIMIT: usize = 5;
const CORE_MEMORIES_LIMIT: usize = 10;
const STM_TAIL_LIMIT: usize = 10;

/// Extract lowercase `[a-z0-9_]+` tokens from `text`.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in lower.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            current.push(ch);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn status_multiplier(status: MemoryStatus) -> f64 {
    match status {
        MemoryStatus::Archived => 0.6,
        MemoryStatus::Active | MemoryStatus::Recalled => 1.0,
        MemoryStatus::Consolidated => 1.2,
    }
}

/// Score one long-term memory against a keyword set and the current tick.
#[must_use]
pub fn score_memory(keywords: &[String], memory: &Memory, tick: u64) -> f64 {
    let payload_blob = serde_json::Value::Object(memory.payload.clone()).to_string().to_lowercase();
    let text_blob = memory.text.to_lowercase();
    let mut score = 0.0_f64;
    for keyword in keywords {
        if text_blob.contains(keyword.as_str()) || payload_blob.contains(keyword.as_str()) {
            score += 1.0;
        }
    }
    score *= status_multiplier(memory.status);
    score *= memory.confidence.clamp(0.3, 1.2);
    #[allow(clippy::cast_precision_loss)]
    let recency_bonus = (tick as f64 / 100_000.0).min(2.0);
    score += recency_bonus;
    score
}

/// The open neighbor ids of `location`, in location-static iteration order.
#[must_use]
pub fn open_neighbor_ids(world: &WorldState, location: &LocationId) -> Vec<LocationId> {
    let Ok(state) = world.get_location_state(location) else {
        return Vec::new();
    };
    state
        .connections_state
        .iter()
        .filter(|(_, edge)| edge.status == emergence_types::ConnectionStatus::Open)
        .map(|(neighbor, _)| neighbor.clone())
        .collect()
}

fn build_keywords(world: &WorldState, agent: &Agent, location: &LocationId, stm_tail: &[&emergence_types::PerceptionEvent]) -> Vec<String> {
    let mut keywords = Vec::new();
    let mut push_unique = |token: String| {
        if !keywords.contains(&token) {
            keywords.push(token);
        }
    };
    for token in tokenize(&agent.name) {
        push_unique(token);
    }
    for token in tokenize(agent.id.as_str()) {
        push_unique(token);
    }
    if let Ok(location_static) = world.get_location_static(location) {
        for token in tokenize(&location_static.description) {
            push_unique(token);
        }
    }
    for event in stm_tail {
        let payload_blob = serde_json::Value::Object(event.payload.clone()).to_string();
        for token in tokenize(&payload_blob) {
            push_unique(token);
        }
    }
    keywords
}

/// Build the `working_memory` JSON object for `agent`'s turn at `tick`.
#[must_use]
pub fn assemble(world: &WorldState, agent: &Agent, location: &LocationId, tick: u64, retrieval_top_k: usize) -> serde_json::Value {
    let goals: Vec<_> = agent.goals.iter().take(GOALS_LIMIT).cloned().collect();
    let core_memories: Vec<_> = agent.core_memories.iter().take(CORE_MEMORIES_LIMIT).cloned().collect();

    let stm_tail_start = agent.short_term_memory.len().saturating_sub(STM_TAIL_LIMIT);
    let stm_tail: Vec<&emergence_types::PerceptionEvent> = agent
        .short_term_memory
        .get(stm_tail_start..)
        .map(|slice| slice.iter().collect())
        .unwrap_or_default();

    let keywords = build_keywords(world, agent, location, &stm_tail);

    let mut scored: Vec<(f64, &Memory)> = agent.memories.iter().map(|memory| (score_memory(&keywords, memory, tick), memory)).collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    let retrieved: Vec<&Memory> = scored.into_iter().take(retrieval_top_k).map(|(_, memory)| memory).collect();

    serde_json::json!({
        "goals": goals,
        "core_memories": core_memories,
        "perceptions": stm_tail,
        "retrieved_memories": retrieved,
    })
}

#[cfg(test)]
mod tests {
    use emergence_types::{ConnectionEdge, ConnectionStatus, LocationId, LocationState, MemoryPriority};

    use super::*;

    fn sample_memory(text: &str, status: MemoryStatus, confidence: f64, tick: u64) -> Memory {
        Memory {
            text: text.to_owned(),
            tick,
            priority: MemoryPriority::Normal,
            status,
            source_id: None,
            confidence,
            is_secret: false,
            payload: serde_json::Map::new(),
        }
    }

    #[test]
    fn tokenize_lowercases_and_splits_on_non_word_chars() {
        assert_eq!(tokenize("Market Square-Gate_1!"), vec!["market", "square_gate_1"]);
    }

    #[test]
    fn consolidated_memories_score_higher_than_archived_for_the_same_hits() {
        let keywords = vec!["bread".to_owned()];
        let archived = sample_memory("bread on the table", MemoryStatus::Archived, 1.0, 0);
        let consolidated = sample_memory("bread on the table", MemoryStatus::Consolidated, 1.0, 0);
        assert!(score_memory(&keywords, &consolidated, 0) > score_memory(&keywords, &archived, 0));
    }

    #[test]
    fn confidence_is_clamped_into_range() {
        let keywords = vec!["bread".to_owned()];
        let low = sample_memory("bread", MemoryStatus::Active, 0.0, 0);
        let high = sample_memory("bread", MemoryStatus::Active, 5.0, 0);
        assert_eq!(score_memory(&keywords, &low, 0), 0.3);
        assert_eq!(score_memory(&keywords, &high, 0), 1.2);
    }

    #[test]
    fn recency_bonus_is_capped_at_two() {
        let keywords: Vec<String> = Vec::new();
        let memory = sample_memory("anything", MemoryStatus::Active, 1.0, 1_000_000);
        assert_eq!(score_memory(&keywords, &memory, 1_000_000), 2.0);
    }

    #[test]
    fn open_neighbor_ids_excludes_closed_edges() {
        let mut world = WorldState::new();
        let here = LocationId::new("town_square");
        let open = LocationId::new("market_square");
        let closed = LocationId::new("alley");
        let mut state = LocationState {
            id: here.clone(),
            occupants: Vec::new(),
            items: Vec::new(),
            sublocations: Default::default(),
            transient_effects: serde_json::Map::new(),
            connections_state: Default::default(),
        };
        state.connections_state.insert(open.clone(), ConnectionEdge { status: ConnectionStatus::Open, direction: None });
        state.connections_state.insert(closed, ConnectionEdge { status: ConnectionStatus::Closed, direction: None });
        world.location_states.insert(here.clone(), state);
        assert_eq!(open_neighbor_ids(&world, &here), vec![open]);
    }
}
