//! The canonical world store: every live agent, location, and item, plus the
//! single `apply` entry point that is the only writer of game state.

use std::collections::BTreeMap;

use emergence_types::{
    Agent, AgentId, ConnectionEdge, ConnectionStatus, Event, EventKind, GoalStatus, HexDirection,
    ItemBlueprint, ItemBlueprintId, ItemInstance, ItemInstanceId, LocationId, LocationState,
    LocationStatic, Memory, MemoryStatus, ReasonMutation,
};

use crate::error::WorldError;

/// Ticks since a meal before an agent's hunger stage becomes `hungry`.
pub const HUNGRY_THRESHOLD: u64 = 20;
/// Ticks since a meal before an agent starts taking starvation damage.
pub const STARVING_THRESHOLD: u64 = 40;

/// Memories/goals are soft-archived (memories) or hard-truncated (goals)
/// once their list exceeds this length.
const MEMORY_SOFT_CAP: usize = 1000;
/// Number of oldest memories archived in one pass once [`MEMORY_SOFT_CAP`] is exceeded.
const MEMORY_ARCHIVE_BATCH: usize = 50;
/// Goals list is hard-truncated to its last N entries.
const GOAL_HARD_CAP: usize = 100;
/// Core memories list is hard-truncated to its last N entries.
const CORE_MEMORY_HARD_CAP: usize = 50;
/// Memory text is truncated to this many characters before storage.
const MEMORY_TEXT_CAP: usize = 1000;
/// Goal text is truncated to this many characters before storage.
const GOAL_TEXT_CAP: usize = 500;

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// The canonical, mutable state of the simulated world.
///
/// `apply` is the only method in this crate that mutates agents, locations,
/// or items; everything else here is read-only lookup or the two
/// world-level batch operations (`update_hunger`, `hydrate_connection_directions`).
#[derive(Debug, Clone, Default)]
pub struct WorldState {
    /// All agents, keyed by id.
    pub agents: BTreeMap<AgentId, Agent>,
    /// Authored, largely-immutable location data, keyed by id.
    pub location_statics: BTreeMap<LocationId, LocationStatic>,
    /// Mutable per-location runtime state, keyed by id.
    pub location_states: BTreeMap<LocationId, LocationState>,
    /// Item catalog entries, keyed by id.
    pub item_blueprints: BTreeMap<ItemBlueprintId, ItemBlueprint>,
    /// Concrete item instances, keyed by id.
    pub item_instances: BTreeMap<ItemInstanceId, ItemInstance>,
    /// Whether starvation damage is currently active globally.
    pub starvation_enabled: bool,
}

impl WorldState {
    /// An empty world with starvation damage enabled, matching the
    /// reference engine's default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            agents: BTreeMap::new(),
            location_statics: BTreeMap::new(),
            location_states: BTreeMap::new(),
            item_blueprints: BTreeMap::new(),
            item_instances: BTreeMap::new(),
            starvation_enabled: true,
        }
    }

    /// Look up an agent by id.
    pub fn get_agent(&self, id: &AgentId) -> Result<&Agent, WorldError> {
        self.agents
            .get(id)
            .ok_or_else(|| WorldError::UnknownAgent(id.clone()))
    }

    /// Look up an agent by id, mutably.
    pub fn get_agent_mut(&mut self, id: &AgentId) -> Result<&mut Agent, WorldError> {
        self.agents
            .get_mut(id)
            .ok_or_else(|| WorldError::UnknownAgent(id.clone()))
    }

    /// Look up a location's static data by id.
    pub fn get_location_static(&self, id: &LocationId) -> Result<&LocationStatic, WorldError> {
        self.location_statics
            .get(id)
            .ok_or_else(|| WorldError::UnknownLocation(id.clone()))
    }

    /// Look up a location's runtime state by id.
    pub fn get_location_state(&self, id: &LocationId) -> Result<&LocationState, WorldError> {
        self.location_states
            .get(id)
            .ok_or_else(|| WorldError::UnknownLocation(id.clone()))
    }

    /// Look up a location's runtime state by id, mutably.
    pub fn get_location_state_mut(
        &mut self,
        id: &LocationId,
    ) -> Result<&mut LocationState, WorldError> {
        self.location_states
            .get_mut(id)
            .ok_or_else(|| WorldError::UnknownLocation(id.clone()))
    }

    /// Look up an item instance by id.
    pub fn get_item_instance(&self, id: &ItemInstanceId) -> Result<&ItemInstance, WorldError> {
        self.item_instances
            .get(id)
            .ok_or_else(|| WorldError::UnknownItemInstance(id.clone()))
    }

    /// Look up an item blueprint by id.
    pub fn get_item_blueprint(
        &self,
        id: &ItemBlueprintId,
    ) -> Result<&ItemBlueprint, WorldError> {
        self.item_blueprints
            .get(id)
            .ok_or_else(|| WorldError::UnknownItemBlueprint(id.clone()))
    }

    /// Find the location an agent currently occupies, if any.
    ///
    /// A linear scan over locations; acceptable at the scale this engine
    /// targets (tens to low hundreds of locations).
    #[must_use]
    pub fn find_agent_location(&self, id: &AgentId) -> Option<LocationId> {
        self.location_states
            .values()
            .find(|state| state.occupants.contains(id))
            .map(|state| state.id.clone())
    }

    /// Recompute every non-dead agent's hunger stage from ticks elapsed
    /// since its last meal, emitting one `damage_applied` event per agent
    /// that crosses into starvation.
    ///
    /// Returns no events when starvation damage is globally disabled, but
    /// hunger stages are still refreshed either way.
    pub fn update_hunger(&mut self, current_tick: u64) -> Vec<Event> {
        let mut events = Vec::new();
        for agent in self.agents.values_mut() {
            if agent.is_dead() {
                continue;
            }
            let elapsed = current_tick.saturating_sub(agent.last_meal_tick);
            if elapsed >= STARVING_THRESHOLD {
                agent.hunger_stage = emergence_types::HungerStage::Starving;
                if self.starvation_enabled {
                    events.push(Event::new(
                        EventKind::DamageApplied {
                            amount: 1,
                            cause: "starvation".to_owned(),
                        },
                        current_tick,
                        Some(agent.id.clone()),
                    ));
                }
            } else if elapsed >= HUNGRY_THRESHOLD {
                agent.hunger_stage = emergence_types::HungerStage::Hungry;
            } else {
                agent.hunger_stage = emergence_types::HungerStage::Sated;
            }
        }
        events
    }

    /// Fill in any dynamic connection edges implied by the static hex
    /// layout, without overwriting status or direction already present on
    /// either side.
    pub fn hydrate_connection_directions(&mut self) {
        let hex_connections: Vec<(LocationId, HexDirection, LocationId)> = self
            .location_statics
            .values()
            .flat_map(|loc| {
                loc.hex_connections
                    .iter()
                    .map(|(direction, neighbor)| (loc.id.clone(), *direction, neighbor.clone()))
            })
            .collect();

        for (loc_id, direction, neighbor_id) in hex_connections {
            let Some(state) = self.location_states.get_mut(&loc_id) else {
                continue;
            };
            let entry = state
                .connections_state
                .entry(neighbor_id.clone())
                .or_insert(ConnectionEdge {
                    status: ConnectionStatus::Open,
                    direction: None,
                });
            if entry.direction.is_none() {
                entry.direction = Some(direction);
            }
            let status = entry.status;

            if let Some(recip) = self.location_states.get_mut(&neighbor_id) {
                let recip_entry = recip
                    .connections_state
                    .entry(loc_id.clone())
                    .or_insert(ConnectionEdge {
                        status,
                        direction: None,
                    });
                if recip_entry.direction.is_none() {
                    recip_entry.direction = Some(direction.inverse());
                }
            }
        }
    }

    /// Apply an event to world state. The sole writer of agent, location,
    /// and item data.
    ///
    /// Total over every [`EventKind`] variant: event kinds owned by other
    /// crates (combat resolution, conversation turn-taking, pure
    /// inspection/narration) are no-ops here by design, since they either
    /// carry no world-state effect of their own or are applied via a
    /// follow-up event that does (e.g. `attack_hit` resolves into a
    /// `damage_applied`).
    pub fn apply(&mut self, event: &Event) {
        match &event.kind {
            EventKind::Move { target_location } => self.apply_move(event, target_location),
            EventKind::Grab { item } => self.apply_grab(event, item),
            EventKind::Drop { item } => self.apply_drop(event, item),
            EventKind::Eat { item } => self.apply_eat(event, item),
            EventKind::DamageApplied { amount, .. } => self.apply_damage(event, *amount),
            EventKind::Rest { healed } => self.apply_rest(event, *healed),
            EventKind::Equip { item, slot } => self.apply_equip(event, item, slot),
            EventKind::Unequip { slot } => self.apply_unequip(event, slot),
            EventKind::Give { item, receiver } => self.apply_give(event, item, receiver),
            EventKind::OpenConnection { neighbor } => {
                self.apply_connection(event, neighbor, ConnectionStatus::Open);
            }
            EventKind::CloseConnection { neighbor } => {
                self.apply_connection(event, neighbor, ConnectionStatus::Closed);
            }
            EventKind::NpcDied => self.apply_npc_died(event),
            EventKind::Reason { mutation } => self.apply_reason(event, mutation),
            EventKind::Reflect {
                core_memory,
                archive_matches,
                consolidate_matches,
            } => self.apply_reflect(event, core_memory, archive_matches, consolidate_matches),
            EventKind::ToggleStarvation { enabled } => self.starvation_enabled = *enabled,
            EventKind::AttackAttempt { .. }
            | EventKind::AttackHit { .. }
            | EventKind::AttackMissed { .. }
            | EventKind::Talk { .. }
            | EventKind::TalkLoud { .. }
            | EventKind::Scream { .. }
            | EventKind::Interject { .. }
            | EventKind::LeaveConversation
            | EventKind::Inventory
            | EventKind::Stats
            | EventKind::Look
            | EventKind::Analyze { .. }
            | EventKind::DescribeLocation
            | EventKind::Wait => {}
        }
    }

    fn apply_move(&mut self, event: &Event, target: &LocationId) {
        let Some(actor_id) = &event.actor_id else {
            return;
        };
        if let Some(current) = self.find_agent_location(actor_id) {
            if let Some(state) = self.location_states.get_mut(&current) {
                state.occupants.retain(|id| id != actor_id);
            }
        }
        if let Some(state) = self.location_states.get_mut(target) {
            state.occupants.push(actor_id.clone());
        }
    }

    fn apply_grab(&mut self, event: &Event, item: &ItemInstanceId) {
        let Some(actor_id) = &event.actor_id else {
            return;
        };
        let Some(loc_id) = self.find_agent_location(actor_id) else {
            return;
        };
        let Some(state) = self.location_states.get_mut(&loc_id) else {
            return;
        };
        if !state.items.contains(item) {
            return;
        }
        state.items.retain(|id| id != item);
        if let Some(agent) = self.agents.get_mut(actor_id) {
            agent.inventory.push(item.clone());
        }
        if let Some(instance) = self.item_instances.get_mut(item) {
            instance.owner_id = Some(actor_id.clone());
            instance.current_location = None;
        }
    }

    fn apply_drop(&mut self, event: &Event, item: &ItemInstanceId) {
        let Some(actor_id) = &event.actor_id else {
            return;
        };
        let Some(loc_id) = self.find_agent_location(actor_id) else {
            return;
        };
        let Some(agent) = self.agents.get_mut(actor_id) else {
            return;
        };
        if !agent.inventory.contains(item) {
            return;
        }
        agent.inventory.retain(|id| id != item);
        if let Some(state) = self.location_states.get_mut(&loc_id) {
            state.items.push(item.clone());
        }
        if let Some(instance) = self.item_instances.get_mut(item) {
            instance.owner_id = None;
            instance.current_location = Some(loc_id);
        }
    }

    fn apply_eat(&mut self, event: &Event, item: &ItemInstanceId) {
        let Some(actor_id) = &event.actor_id else {
            return;
        };
        let Some(agent) = self.agents.get_mut(actor_id) else {
            return;
        };
        if !agent.inventory.contains(item) {
            return;
        }
        agent.inventory.retain(|id| id != item);
        self.item_instances.remove(item);
        if let Some(agent) = self.agents.get_mut(actor_id) {
            agent.last_meal_tick = event.tick;
            agent.hunger_stage = emergence_types::HungerStage::Sated;
        }
    }

    fn apply_damage(&mut self, event: &Event, amount: i64) {
        let Some(target) = &event.actor_id else {
            return;
        };
        if let Some(agent) = self.agents.get_mut(target) {
            agent.hp = (agent.hp - amount).max(0);
        }
    }

    fn apply_rest(&mut self, event: &Event, healed: i64) {
        let Some(actor_id) = &event.actor_id else {
            return;
        };
        if let Some(agent) = self.agents.get_mut(actor_id) {
            let max_hp = (i64::from(agent.attributes.constitution) * 2).max(1);
            agent.hp = (agent.hp + healed).min(max_hp);
        }
    }

    fn apply_equip(&mut self, event: &Event, item: &ItemInstanceId, slot: &str) {
        let Some(actor_id) = &event.actor_id else {
            return;
        };
        let Some(agent) = self.agents.get_mut(actor_id) else {
            return;
        };
        if !agent.slots.contains_key(slot) || !agent.inventory.contains(item) {
            return;
        }
        let previous = agent.slots.get(slot).cloned().flatten();
        if let Some(previous) = previous {
            agent.inventory.push(previous);
        }
        agent.inventory.retain(|id| id != item);
        agent.slots.insert(slot.to_owned(), Some(item.clone()));
    }

    fn apply_unequip(&mut self, event: &Event, slot: &str) {
        let Some(actor_id) = &event.actor_id else {
            return;
        };
        let Some(agent) = self.agents.get_mut(actor_id) else {
            return;
        };
        let Some(Some(item)) = agent.slots.get(slot).cloned() else {
            return;
        };
        agent.inventory.push(item);
        agent.slots.insert(slot.to_owned(), None);
    }

    fn apply_give(&mut self, event: &Event, item: &ItemInstanceId, receiver: &AgentId) {
        let Some(actor_id) = &event.actor_id else {
            return;
        };
        if !self.agents.contains_key(receiver) {
            return;
        }
        let Some(giver) = self.agents.get_mut(actor_id) else {
            return;
        };
        if !giver.inventory.contains(item) {
            return;
        }
        giver.inventory.retain(|id| id != item);
        if let Some(receiver_agent) = self.agents.get_mut(receiver) {
            receiver_agent.inventory.push(item.clone());
        }
        if let Some(instance) = self.item_instances.get_mut(item) {
            instance.owner_id = Some(receiver.clone());
        }
    }

    fn apply_connection(&mut self, event: &Event, neighbor: &LocationId, status: ConnectionStatus) {
        let Some(actor_id) = &event.actor_id else {
            return;
        };
        let Some(loc_id) = self.find_agent_location(actor_id) else {
            return;
        };

        let forward_direction = self
            .location_statics
            .get(&loc_id)
            .and_then(|loc| {
                loc.hex_connections
                    .iter()
                    .find(|(_, target)| *target == neighbor)
                    .map(|(direction, _)| *direction)
            });

        if let Some(state) = self.location_states.get_mut(&loc_id) {
            let entry = state
                .connections_state
                .entry(neighbor.clone())
                .or_insert(ConnectionEdge {
                    status,
                    direction: None,
                });
            entry.status = status;
            if entry.direction.is_none() {
                entry.direction = forward_direction;
            }
        }

        let inverse_direction = self
            .location_states
            .get(&loc_id)
            .and_then(|state| state.connections_state.get(neighbor))
            .and_then(|entry| entry.direction)
            .map(HexDirection::inverse);

        if let Some(state) = self.location_states.get_mut(neighbor) {
            let entry = state
                .connections_state
                .entry(loc_id.clone())
                .or_insert(ConnectionEdge {
                    status,
                    direction: None,
                });
            entry.status = status;
            if entry.direction.is_none() {
                entry.direction = inverse_direction;
            }
        }
    }

    fn apply_npc_died(&mut self, event: &Event) {
        let Some(actor_id) = &event.actor_id else {
            return;
        };
        let Some(loc_id) = self.find_agent_location(actor_id) else {
            self.mark_dead(actor_id);
            return;
        };

        let dropped: Vec<ItemInstanceId> = if let Some(agent) = self.agents.get_mut(actor_id) {
            let mut items = std::mem::take(&mut agent.inventory);
            for slot_item in agent.slots.values_mut() {
                if let Some(item) = slot_item.take() {
                    items.push(item);
                }
            }
            items
        } else {
            Vec::new()
        };

        if let Some(state) = self.location_states.get_mut(&loc_id) {
            state.occupants.retain(|id| id != actor_id);
            state.items.extend(dropped.iter().cloned());
        }
        for item in &dropped {
            if let Some(instance) = self.item_instances.get_mut(item) {
                instance.owner_id = None;
                instance.current_location = Some(loc_id.clone());
            }
        }

        self.mark_dead(actor_id);
    }

    fn mark_dead(&mut self, actor_id: &AgentId) {
        if let Some(agent) = self.agents.get_mut(actor_id) {
            agent.dynamic_tags.insert("dead".to_owned());
        }
    }

    fn apply_reason(&mut self, event: &Event, mutation: &ReasonMutation) {
        let Some(actor_id) = &event.actor_id else {
            return;
        };
        let Some(agent) = self.agents.get_mut(actor_id) else {
            return;
        };
        match mutation {
            ReasonMutation::AddMemory { text } => {
                push_memory_with_soft_archive(
                    &mut agent.memories,
                    Memory {
                        text: truncate_chars(text, MEMORY_TEXT_CAP),
                        tick: event.tick,
                        priority: emergence_types::MemoryPriority::Normal,
                        status: MemoryStatus::Active,
                        source_id: None,
                        confidence: 1.0,
                        is_secret: false,
                        payload: serde_json::Map::new(),
                    },
                );
            }
            ReasonMutation::UpdateMemoryStatus { substring, status } => {
                let needle = substring.to_lowercase();
                if let Some(memory) = agent
                    .memories
                    .iter_mut()
                    .find(|memory| memory.text.to_lowercase().contains(&needle))
                {
                    memory.status = *status;
                }
            }
            ReasonMutation::AddGoal { text } => {
                agent.goals.push(emergence_types::Goal {
                    text: truncate_chars(text, GOAL_TEXT_CAP),
                    goal_type: "note".to_owned(),
                    priority: emergence_types::MemoryPriority::Normal,
                    status: GoalStatus::Active,
                    payload: serde_json::Map::new(),
                    expiry_tick: None,
                });
                if agent.goals.len() > GOAL_HARD_CAP {
                    let excess = agent.goals.len() - GOAL_HARD_CAP;
                    agent.goals.drain(0..excess);
                }
            }
            ReasonMutation::UpdateGoalStatus { substring, status } => {
                let needle = substring.to_lowercase();
                if let Some(goal) = agent
                    .goals
                    .iter_mut()
                    .find(|goal| goal.text.to_lowercase().contains(&needle))
                {
                    goal.status = *status;
                }
            }
            ReasonMutation::UpdateRelationship { target, status } => {
                agent.relationships.insert(target.clone(), status.clone());
            }
        }
    }

    fn apply_reflect(
        &mut self,
        event: &Event,
        core_memory: &str,
        archive_matches: &[String],
        consolidate_matches: &[String],
    ) {
        let Some(actor_id) = &event.actor_id else {
            return;
        };
        let Some(agent) = self.agents.get_mut(actor_id) else {
            return;
        };

        agent.core_memories.push(Memory {
            text: truncate_chars(core_memory, MEMORY_TEXT_CAP),
            tick: event.tick,
            priority: emergence_types::MemoryPriority::Normal,
            status: MemoryStatus::Active,
            source_id: Some(actor_id.as_str().to_owned()),
            confidence: 0.8,
            is_secret: false,
            payload: serde_json::Map::new(),
        });
        if agent.core_memories.len() > CORE_MEMORY_HARD_CAP {
            let excess = agent.core_memories.len() - CORE_MEMORY_HARD_CAP;
            agent.core_memories.drain(0..excess);
        }

        let archive_needles: Vec<String> =
            archive_matches.iter().map(|token| token.to_lowercase()).collect();
        let consolidate_needles: Vec<String> = consolidate_matches
            .iter()
            .map(|token| token.to_lowercase())
            .collect();

        mark_all_matches(&mut agent.memories, &archive_needles, &consolidate_needles);
        mark_all_matches(&mut agent.core_memories, &archive_needles, &consolidate_needles);
    }
}

fn push_memory_with_soft_archive(memories: &mut Vec<Memory>, memory: Memory) {
    memories.push(memory);
    if memories.len() > MEMORY_SOFT_CAP {
        for memory in memories.iter_mut().take(MEMORY_ARCHIVE_BATCH) {
            memory.status = MemoryStatus::Archived;
        }
    }
}

/// Mark every memory whose lowercased text contains any archive token as
/// archived, and every memory containing any consolidate token as
/// consolidated — unlike `reason`'s single-match update, `reflect` marks
/// all matches.
fn mark_all_matches(memories: &mut [Memory], archive_needles: &[String], consolidate_needles: &[String]) {
    for memory in memories.iter_mut() {
        let haystack = memory.text.to_lowercase();
        if archive_needles.iter().any(|needle| haystack.contains(needle)) {
            memory.status = MemoryStatus::Archived;
        }
        if consolidate_needles
            .iter()
            .any(|needle| haystack.contains(needle))
        {
            memory.status = MemoryStatus::Consolidated;
        }
    }
}
