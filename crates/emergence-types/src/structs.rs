//! Core entity structs for the embodied-agent simulation's data model.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::enums::{ConnectionStatus, GoalStatus, HexDirection, HungerStage, MemoryPriority, MemoryStatus};
use crate::ids::{AgentId, ConversationId, ItemBlueprintId, ItemInstanceId, LocationId};

// ---------------------------------------------------------------------------
// Agent attributes and skills
// ---------------------------------------------------------------------------

/// An agent's core physical attributes, each defaulting to 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    /// Raw physical power; drives melee damage and carry weight.
    pub strength: i32,
    /// Agility and precision; drives AC and finesse attacks.
    pub dexterity: i32,
    /// Fortitude; caps max HP at twice this value and bounds how much a
    /// `rest` heals toward that cap.
    pub constitution: i32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            constitution: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

/// A single memory an agent has formed or recalled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    /// Free text content of the memory.
    pub text: String,
    /// The tick when the memory was formed.
    pub tick: u64,
    /// Subjective importance assigned at write time.
    pub priority: MemoryPriority,
    /// Retention/recall state; drives the working-memory scoring multiplier.
    pub status: MemoryStatus,
    /// The id of the event, agent, or other entity this memory traces back to.
    pub source_id: Option<String>,
    /// Confidence in the memory's accuracy, clamped to `[0.0, 1.2]`.
    pub confidence: f64,
    /// Whether this memory should be withheld from other agents' perception.
    pub is_secret: bool,
    /// Free-form structured payload attached to the memory.
    pub payload: serde_json::Map<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Goal
// ---------------------------------------------------------------------------

/// A goal an agent is pursuing, pending, or has resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Free text description of the goal.
    pub text: String,
    /// Category tag for the goal (free-form, e.g. "survival", "social").
    #[serde(rename = "type")]
    pub goal_type: String,
    /// Relative importance among the agent's goals.
    pub priority: MemoryPriority,
    /// Current lifecycle state.
    pub status: GoalStatus,
    /// Free-form structured payload attached to the goal.
    pub payload: serde_json::Map<String, serde_json::Value>,
    /// Tick after which the goal is considered stale, if any.
    pub expiry_tick: Option<u64>,
}

// ---------------------------------------------------------------------------
// Perception
// ---------------------------------------------------------------------------

/// A compact projection of an applied event, recorded into an observer's
/// short-term memory buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerceptionEvent {
    /// The kind of event that was perceived.
    pub event_type: String,
    /// The tick the originating event occurred on.
    pub tick: u64,
    /// The agent who performed the originating action, if any.
    pub actor_id: Option<AgentId>,
    /// Other entities referenced by the originating event.
    pub target_ids: Vec<String>,
    /// Where the originating event took place.
    pub location_id: LocationId,
    /// A copy of the originating event's payload.
    pub payload: serde_json::Map<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// A living entity in the world: an NPC or the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique agent identifier.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// Current hit points; never negative.
    pub hp: i64,
    /// Ordered sequence of carried item instance ids.
    pub inventory: Vec<ItemInstanceId>,
    /// Equipment slot name to occupying item instance, if any.
    pub slots: BTreeMap<String, Option<ItemInstanceId>>,
    /// Core physical attributes.
    #[serde(default)]
    pub attributes: Attributes,
    /// Skill tag to proficiency level.
    #[serde(default)]
    pub skills: BTreeMap<String, crate::enums::ProficiencyLevel>,
    /// Relationship status keyed by the other agent's id. The status itself
    /// is free text (e.g. "friend", "rival") rather than a closed enum.
    #[serde(default)]
    pub relationships: BTreeMap<AgentId, String>,
    /// Tags assigned at authoring time and never removed by gameplay.
    #[serde(default)]
    pub inherent_tags: BTreeSet<String>,
    /// Tags added or removed by gameplay (e.g. "dead").
    #[serde(default)]
    pub dynamic_tags: BTreeSet<String>,
    /// Long-term memories, oldest first.
    #[serde(default)]
    pub memories: Vec<Memory>,
    /// Consolidated/core memories, bounded to the most recent 50.
    #[serde(default)]
    pub core_memories: Vec<Memory>,
    /// Active and past goals, bounded to the most recent 100.
    #[serde(default)]
    pub goals: Vec<Goal>,
    /// Recent perception buffer, bounded by a configured cap (default 30).
    #[serde(default)]
    pub short_term_memory: Vec<PerceptionEvent>,
    /// The tick at which this agent next becomes eligible to act.
    #[serde(default)]
    pub next_available_tick: u64,
    /// The tick of this agent's last meal.
    #[serde(default)]
    pub last_meal_tick: u64,
    /// Current hunger stage, derived from ticks since the last meal.
    #[serde(default = "default_hunger_stage")]
    pub hunger_stage: HungerStage,
}

const fn default_hunger_stage() -> HungerStage {
    HungerStage::Sated
}

impl Agent {
    /// Whether this agent carries the "dead" dynamic tag.
    ///
    /// Dead agents are excluded from scheduling, combat targeting, and item
    /// handling.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.dynamic_tags.contains("dead")
    }
}

// ---------------------------------------------------------------------------
// World graph: locations
// ---------------------------------------------------------------------------

/// The authored, largely-immutable half of a location: its description,
/// inherent tags, and the static hex layout that seeds dynamic adjacency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationStatic {
    /// Unique location identifier.
    pub id: LocationId,
    /// Narrative description shown to observers.
    pub description: String,
    /// Tags assigned at authoring time (e.g. "elevated_vantage_point").
    #[serde(default)]
    pub inherent_tags: BTreeSet<String>,
    /// Canonical hex direction to neighbor id, as authored.
    #[serde(default)]
    pub hex_connections: BTreeMap<HexDirection, LocationId>,
}

/// One side of a dynamic connection edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEdge {
    /// Whether the edge can currently be traversed.
    pub status: ConnectionStatus,
    /// The canonical direction this edge occupies from its owning location.
    pub direction: Option<HexDirection>,
}

/// The mutable half of a location: who and what is there right now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationState {
    /// Unique location identifier, matching the paired [`LocationStatic`].
    pub id: LocationId,
    /// Agents currently present, in arrival order.
    #[serde(default)]
    pub occupants: Vec<AgentId>,
    /// Item instances currently present, in drop order.
    #[serde(default)]
    pub items: Vec<ItemInstanceId>,
    /// Named sublocations, free-form.
    #[serde(default)]
    pub sublocations: BTreeMap<String, serde_json::Value>,
    /// Transient effects (weather, fire, etc.), free-form.
    #[serde(default)]
    pub transient_effects: serde_json::Map<String, serde_json::Value>,
    /// Dynamic adjacency, keyed by neighbor id.
    #[serde(default)]
    pub connections_state: BTreeMap<LocationId, ConnectionEdge>,
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// The catalog entry for an item: the template, not a concrete instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemBlueprint {
    /// Unique blueprint identifier.
    pub id: ItemBlueprintId,
    /// Display name.
    pub name: String,
    /// Carry weight.
    pub weight: f64,
    /// Damage dice notation (e.g. `"1d4"`), for weapons.
    pub damage_dice: Option<String>,
    /// The damage type dealt on a hit (e.g. "bludgeoning").
    pub damage_type: Option<String>,
    /// Armour rating contributed when equipped.
    #[serde(default)]
    pub armour_rating: i32,
    /// The skill tag used for proficiency lookups when wielded as a weapon.
    pub skill_tag: Option<String>,
    /// Free-form capability tags (e.g. "finesse", "food").
    #[serde(default)]
    pub properties: BTreeSet<String>,
}

/// A concrete item, either carried, equipped, or sitting at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInstance {
    /// Unique instance identifier.
    pub id: ItemInstanceId,
    /// The catalog entry this instance was created from.
    pub blueprint_id: ItemBlueprintId,
    /// The location this instance currently rests at, if not owned.
    pub current_location: Option<LocationId>,
    /// The agent that currently owns this instance (carried or equipped), if any.
    pub owner_id: Option<AgentId>,
    /// Free-form mutable instance state (durability, charges, etc.).
    #[serde(default)]
    pub item_state: serde_json::Map<String, serde_json::Value>,
    /// Contents, for container items.
    #[serde(default)]
    pub inventory: Vec<ItemInstanceId>,
    /// Free-form tags on this specific instance.
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

/// A single recorded line of conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationLine {
    /// Who spoke the line.
    pub speaker: AgentId,
    /// The tick it was spoken on.
    pub tick: u64,
    /// The spoken content.
    pub content: String,
}

/// An in-progress conversation and its turn-taking state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation identifier, synthesized at start.
    pub id: ConversationId,
    /// Current and past members, in join order.
    pub participants: Vec<AgentId>,
    /// Agents queued to speak next, front is next-up.
    pub turn_order: std::collections::VecDeque<AgentId>,
    /// The agent currently allowed to speak, if any.
    pub current_speaker: Option<AgentId>,
    /// The tick the conversation began.
    pub start_tick: u64,
    /// The tick of the most recent line or interjection.
    pub last_interaction_tick: u64,
    /// Full append-only transcript.
    #[serde(default)]
    pub history: Vec<ConversationLine>,
    /// The location this conversation is anchored to.
    pub location_id: LocationId,
}
