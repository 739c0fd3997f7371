//! The simulation's single writer of time: normalizes and validates submitted
//! commands, drives the per-tick event queue, and dispatches applied events
//! to world state, perception, narration, and conversation bookkeeping.
//!
//! [`Simulator`] owns every piece the rest of this crate built in isolation
//! ([`crate::conversation::ConversationStore`], [`crate::narrator`],
//! [`crate::perception`]) and is the only place that calls into all of them
//! together. It holds its own seeded RNG for combat rolls rather than
//! reaching for thread-local randomness, so a recorded seed reproduces a run.

use std::collections::{BTreeMap, VecDeque};

use rand::rngs::StdRng;
use rand::SeedableRng;

use emergence_agents::{combat, tools, tools::Tool};
use emergence_types::{AgentId, CommandRequest, Event, EventKind, HungerStage, ToolName};
use emergence_world::WorldState;

use crate::conversation::ConversationStore;
use crate::decision::Planner;
use crate::error::CommandError;
use crate::{narrator, perception};

/// Default cap on an agent's short-term memory buffer, in perceived events.
const DEFAULT_PERCEPTION_BUFFER: usize = 30;

fn alias_field(params: &mut serde_json::Map<String, serde_json::Value>, canonical: &str, fallbacks: &[&str]) {
    if params.contains_key(canonical) {
        return;
    }
    for key in fallbacks {
        if let Some(value) = params.get(*key).cloned() {
            params.insert(canonical.to_owned(), value);
            return;
        }
    }
}

fn alias_from_target_ids(params: &mut serde_json::Map<String, serde_json::Value>, canonical: &str) {
    if params.contains_key(canonical) {
        return;
    }
    let Some(serde_json::Value::Array(ids)) = params.get("target_ids") else {
        return;
    };
    if let Some(first) = ids.first().cloned() {
        params.insert(canonical.to_owned(), first);
    }
}

const CONTENT_CHAR_CAP: usize = 200;

fn clamp_content(params: &mut serde_json::Map<String, serde_json::Value>) {
    let Some(serde_json::Value::String(content)) = params.get("content") else {
        return;
    };
    if content.chars().count() > CONTENT_CHAR_CAP {
        let clamped: String = content.chars().take(CONTENT_CHAR_CAP).collect();
        params.insert("content".to_owned(), serde_json::Value::String(clamped));
    }
}

/// Apply the step-3 parameter aliasing rules for the tools that accept more
/// than one spelling of the same field from a planner or front end.
fn normalize_params(tool_name: ToolName, params: &mut serde_json::Map<String, serde_json::Value>) {
    match tool_name {
        ToolName::Move | ToolName::Open | ToolName::Close => {
            alias_field(params, "target_location", &["location_id", "target", "to"]);
        }
        ToolName::Attack => {
            alias_field(params, "target_id", &["target"]);
            alias_from_target_ids(params, "target_id");
        }
        ToolName::Give => {
            alias_field(params, "target_id", &["recipient_id"]);
        }
        ToolName::Equip | ToolName::Unequip => {
            alias_field(params, "slot", &["equipment_slot"]);
        }
        ToolName::Talk | ToolName::TalkLoud | ToolName::Scream => {
            clamp_content(params);
        }
        _ => {}
    }
}

/// The effective time cost of a submitted command. `wait` and `rest` read
/// their own `ticks` parameter; every other tool uses its fixed base cost.
fn effective_time_cost(tool_name: ToolName, params: &serde_json::Map<String, serde_json::Value>) -> u64 {
    match tool_name {
        ToolName::Wait | ToolName::Rest => {
            let ticks = params.get("ticks").and_then(serde_json::Value::as_u64).unwrap_or(1);
            ticks.max(1)
        }
        _ => tool_name.base_time_cost(),
    }
}

/// Owns world state, the tool registry, the pending event queue, and
/// conversation bookkeeping; the orchestrator every front end and planner
/// ultimately submits commands through.
pub struct Simulator {
    /// The canonical world the simulation mutates.
    pub world: WorldState,
    conversations: ConversationStore,
    tools: BTreeMap<ToolName, Box<dyn Tool>>,
    tick: u64,
    events: VecDeque<Event>,
    rng: StdRng,
    /// The agent excluded from the NPC turn order, if any (a human-driven
    /// front end submits its commands directly through [`Self::process_command`]).
    player_id: Option<AgentId>,
    turn_order: Vec<AgentId>,
    turn_index: usize,
    perception_buffer_size: usize,
    last_actions: BTreeMap<AgentId, String>,
}

impl Simulator {
    /// Build a simulator over `world`, excluding `player_id` (if any) from
    /// the NPC turn order. The combat RNG is seeded from process entropy;
    /// use [`Self::with_seed`] when a run must be reproducible.
    #[must_use]
    pub fn new(world: WorldState, player_id: Option<AgentId>) -> Self {
        Self::with_seed(world, player_id, rand::random())
    }

    /// Build a simulator over `world` whose combat RNG is seeded
    /// deterministically from `seed`. Two simulators built with the same
    /// seed and fed the same commands reproduce the same rolls.
    #[must_use]
    pub fn with_seed(world: WorldState, player_id: Option<AgentId>, seed: u64) -> Self {
        Self {
            world,
            conversations: ConversationStore::new(),
            tools: tools::registry(),
            tick: 0,
            events: VecDeque::new(),
            rng: StdRng::seed_from_u64(seed),
            player_id,
            turn_order: Vec::new(),
            turn_index: 0,
            perception_buffer_size: DEFAULT_PERCEPTION_BUFFER,
            last_actions: BTreeMap::new(),
        }
    }

    /// Override the per-agent short-term memory cap (defaults to
    /// [`DEFAULT_PERCEPTION_BUFFER`]).
    #[must_use]
    pub fn with_perception_buffer_size(mut self, size: usize) -> Self {
        self.perception_buffer_size = size;
        self
    }

    /// The current tick counter.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick
    }

    /// The last action type name recorded for `agent_id`, if any.
    #[must_use]
    pub fn last_action(&self, agent_id: &AgentId) -> Option<&str> {
        self.last_actions.get(agent_id).map(String::as_str)
    }

    /// Normalize, validate, and enqueue the events a submitted command
    /// produces; sets the actor's `next_available_tick` accordingly.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the tool is unregistered, the actor is
    /// still busy, the intent fails validation, or the actor itself cannot
    /// be looked up.
    pub fn process_command(&mut self, actor_id: &AgentId, command: CommandRequest) -> Result<(), CommandError> {
        let tool_name =
            ToolName::parse(&command.tool).ok_or_else(|| CommandError::UnknownTool(command.tool.clone()))?;

        {
            let actor = self.world.get_agent(actor_id)?;
            if actor.next_available_tick > self.tick {
                return Err(CommandError::Busy(actor_id.clone()));
            }
        }

        let mut params = command.params;
        normalize_params(tool_name, &mut params);

        let (time_cost, events) = {
            let tool = self
                .tools
                .get(&tool_name)
                .ok_or_else(|| CommandError::UnknownTool(command.tool.clone()))?;
            let actor = self.world.get_agent(actor_id)?;
            if !tool.validate_intent(&params, &self.world, actor) {
                return Err(CommandError::InvalidIntent {
                    tool: command.tool.clone(),
                });
            }
            let time_cost = effective_time_cost(tool_name, &params);
            let events = tool.generate_events(&params, &self.world, actor, self.tick);
            (time_cost, events)
        };

        let actor_mut = self.world.get_agent_mut(actor_id)?;
        actor_mut.next_available_tick = self.tick.saturating_add(time_cost);
        self.events.extend(events);
        tracing::debug!(actor = %actor_id, tool = %command.tool, tick = self.tick, "tool dispatched");
        Ok(())
    }

    /// Advance the clock by one tick: schedules starvation damage, then
    /// drains every event ready to apply at or before the new tick
    /// (including follow-ups handlers enqueue along the way).
    pub fn tick(&mut self) {
        self.tick = self.tick.saturating_add(1);
        tracing::debug!(tick = self.tick, "tick start");
        let hunger_events = self.world.update_hunger(self.tick);
        self.events.extend(hunger_events);
        self.drain_ready_events();
        tracing::debug!(tick = self.tick, "tick end");
    }

    fn drain_ready_events(&mut self) {
        while self.events.front().is_some_and(|event| event.tick <= self.tick) {
            let Some(event) = self.events.pop_front() else {
                break;
            };
            self.handle_event(event);
        }
    }

    /// Advance exactly one NPC's turn: rebuild the turn order if it is
    /// exhausted or empty, skip busy or dead agents, ask `planner` for a
    /// command, and submit it. Returns `false` if no NPC was eligible to act.
    ///
    /// Does not advance the tick clock; any follow-up events the turn
    /// produces are drained immediately.
    pub async fn run_one_npc_turn(&mut self, planner: &mut dyn Planner) -> bool {
        if self.turn_index >= self.turn_order.len() {
            self.rebuild_turn_order();
        }
        if self.turn_order.is_empty() {
            return false;
        }

        let Some(actor_id) = self.next_eligible_actor() else {
            return false;
        };

        let mut command = planner.plan(&self.world, &actor_id, self.tick).await;
        self.apply_conversation_safety_guard(&actor_id, &mut command);

        if let Err(error) = self.process_command(&actor_id, command) {
            tracing::warn!(actor = %actor_id, %error, "planner command rejected, agent idles");
        }
        self.drain_ready_events();
        true
    }

    fn rebuild_turn_order(&mut self) {
        self.turn_order = self
            .world
            .agents
            .values()
            .filter(|agent| !agent.is_dead() && Some(&agent.id) != self.player_id.as_ref())
            .map(|agent| agent.id.clone())
            .collect();
        self.turn_order.sort();
        self.turn_index = 0;
    }

    fn next_eligible_actor(&mut self) -> Option<AgentId> {
        loop {
            let candidate = self.turn_order.get(self.turn_index)?.clone();
            self.turn_index = self.turn_index.saturating_add(1);
            let Ok(agent) = self.world.get_agent(&candidate) else {
                continue;
            };
            if agent.is_dead() || agent.next_available_tick > self.tick {
                continue;
            }
            return Some(candidate);
        }
    }

    /// An agent out of turn in its own conversation may not speak over the
    /// current speaker; a planner that proposes it anyway is downgraded to a
    /// one-tick wait rather than rejected outright.
    fn apply_conversation_safety_guard(&self, actor_id: &AgentId, command: &mut CommandRequest) {
        if command.tool != "talk" {
            return;
        }
        if let Some(conversation) = self.conversations.conversation_for(actor_id) {
            if conversation.current_speaker.as_ref() != Some(actor_id) {
                *command = CommandRequest::wait(1);
            }
        }
    }

    /// Apply one dequeued event to world state, narrate it, propagate
    /// perception, and route conversation- and combat-specific follow-ups.
    fn handle_event(&mut self, event: Event) {
        let primary = perception::primary_location(&self.world, &event);
        self.world.apply(&event);

        let line = narrator::render(&event, &self.world);
        if !line.is_empty() {
            tracing::info!(tick = event.tick, "{line}");
        }

        perception::propagate(&mut self.world, &event, primary.clone(), self.perception_buffer_size);

        if let Some(actor_id) = &event.actor_id {
            self.last_actions.insert(actor_id.clone(), event.kind.type_name().to_owned());
        }

        match &event.kind {
            EventKind::Talk { target_id, content } => self.route_talk(&event, target_id.as_ref(), content, primary),
            EventKind::Interject { conversation_id, content } => {
                self.route_interject(&event, conversation_id, content);
            }
            EventKind::LeaveConversation => {
                if let Some(actor_id) = &event.actor_id {
                    self.conversations.handle_leave(actor_id);
                }
            }
            EventKind::AttackAttempt { target } => self.resolve_attack(&event, target),
            EventKind::DamageApplied { .. } => self.check_for_death(&event),
            EventKind::ToggleStarvation { enabled } => self.reset_hunger_on_starvation_disable(*enabled),
            _ => {}
        }

        let world = &self.world;
        self.conversations
            .garbage_collect(self.tick, |agent_id, location_id| {
                world.find_agent_location(agent_id).as_ref() == Some(location_id)
            });
    }

    fn route_talk(
        &mut self,
        event: &Event,
        target_id: Option<&AgentId>,
        content: &str,
        primary: Option<emergence_types::LocationId>,
    ) {
        let Some(actor_id) = &event.actor_id else {
            return;
        };
        let Some(location_id) = primary else {
            return;
        };
        self.conversations
            .handle_talk(actor_id, target_id, content, event.tick, &location_id);
    }

    fn route_interject(&mut self, event: &Event, conversation_id: &emergence_types::ConversationId, content: &str) {
        let Some(actor_id) = &event.actor_id else {
            return;
        };
        let speaker_colocated = self.conversations.get(conversation_id).is_some_and(|conversation| {
            self.world.find_agent_location(actor_id) == Some(conversation.location_id.clone())
        });
        self.conversations
            .handle_interject(conversation_id, actor_id, content, event.tick, speaker_colocated, None);
    }

    fn resolve_attack(&mut self, event: &Event, target: &AgentId) {
        let Some(actor_id) = event.actor_id.clone() else {
            return;
        };
        let Ok(attacker) = self.world.get_agent(&actor_id).cloned() else {
            return;
        };
        let Ok(defender) = self.world.get_agent(target).cloned() else {
            return;
        };
        let resolution = combat::resolve_attack(&self.world, &attacker, &defender, &mut self.rng);

        if resolution.hit {
            self.events.push_back(Event::new(
                EventKind::AttackHit {
                    target: target.clone(),
                    damage: resolution.damage,
                    to_hit: resolution.to_hit,
                    target_ac: resolution.target_ac,
                    critical: resolution.critical,
                },
                self.tick,
                Some(actor_id),
            ));
            self.events.push_back(Event::new(
                EventKind::DamageApplied {
                    amount: resolution.damage,
                    cause: "attack".to_owned(),
                },
                self.tick,
                Some(target.clone()),
            ));
        } else {
            self.events.push_back(Event::new(
                EventKind::AttackMissed {
                    target: target.clone(),
                    to_hit: resolution.to_hit,
                    target_ac: resolution.target_ac,
                },
                self.tick,
                Some(actor_id),
            ));
        }
    }

    /// `apply_damage` only clamps hp; whether the target has actually died
    /// (and should be removed from the world) is the scheduler's call.
    fn check_for_death(&mut self, event: &Event) {
        let Some(actor_id) = &event.actor_id else {
            return;
        };
        let Ok(agent) = self.world.get_agent(actor_id) else {
            return;
        };
        if agent.hp > 0 || agent.is_dead() {
            return;
        }
        let mut died = Event::new(EventKind::NpcDied, self.tick, Some(actor_id.clone()));
        if let Some(location_id) = self.world.find_agent_location(actor_id) {
            died.target_ids = vec![location_id.as_str().to_owned()];
        }
        self.events.push_back(died);
    }

    /// Disabling starvation resets every agent to sated, matching the
    /// reference engine's `toggle_starvation` handler; re-enabling it leaves
    /// hunger stages as they stand.
    fn reset_hunger_on_starvation_disable(&mut self, enabled: bool) {
        if enabled {
            return;
        }
        for agent in self.world.agents.values_mut() {
            agent.hunger_stage = HungerStage::Sated;
            agent.last_meal_tick = self.tick;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use emergence_types::{
        Agent, Attributes, ConnectionEdge, ConnectionStatus, LocationState, LocationStatic,
    };

    use super::*;
    use crate::decision::StubPlanner;

    fn bare_agent(id: &str) -> Agent {
        Agent {
            id: AgentId::new(id),
            name: id.to_owned(),
            hp: 10,
            inventory: Vec::new(),
            slots: BTreeMap::new(),
            attributes: Attributes::default(),
            skills: BTreeMap::new(),
            relationships: BTreeMap::new(),
            inherent_tags: BTreeSet::new(),
            dynamic_tags: BTreeSet::new(),
            memories: Vec::new(),
            core_memories: Vec::new(),
            goals: Vec::new(),
            short_term_memory: Vec::new(),
            next_available_tick: 0,
            last_meal_tick: 0,
            hunger_stage: HungerStage::Sated,
        }
    }

    fn one_location_world(agent_ids: &[&str]) -> WorldState {
        let mut world = WorldState::new();
        let square = emergence_types::LocationId::new("town_square");
        world.location_statics.insert(
            square.clone(),
            LocationStatic {
                id: square.clone(),
                description: "The town square.".to_owned(),
                inherent_tags: BTreeSet::new(),
                hex_connections: BTreeMap::new(),
            },
        );
        world.location_states.insert(
            square.clone(),
            LocationState {
                id: square.clone(),
                occupants: agent_ids.iter().map(|id| AgentId::new(*id)).collect(),
                items: Vec::new(),
                sublocations: BTreeMap::new(),
                transient_effects: serde_json::Map::new(),
                connections_state: BTreeMap::new(),
            },
        );
        for id in agent_ids {
            world.agents.insert(AgentId::new(*id), bare_agent(id));
        }
        world
    }

    #[test]
    fn unknown_tool_is_rejected() {
        let world = one_location_world(&["npc_sample"]);
        let mut sim = Simulator::new(world, None);
        let result = sim.process_command(&AgentId::new("npc_sample"), CommandRequest {
            tool: "teleport".to_owned(),
            params: serde_json::Map::new(),
        });
        assert!(matches!(result, Err(CommandError::UnknownTool(_))));
    }

    #[test]
    fn busy_actor_is_rejected() {
        let world = one_location_world(&["npc_sample"]);
        let mut sim = Simulator::new(world, None);
        let actor = AgentId::new("npc_sample");
        sim.process_command(&actor, CommandRequest::wait(5)).expect("first wait succeeds");
        let result = sim.process_command(&actor, CommandRequest::wait(1));
        assert!(matches!(result, Err(CommandError::Busy(_))));
    }

    #[test]
    fn wait_uses_its_own_ticks_as_time_cost() {
        let world = one_location_world(&["npc_sample"]);
        let mut sim = Simulator::new(world, None);
        let actor = AgentId::new("npc_sample");
        sim.process_command(&actor, CommandRequest::wait(7)).expect("wait succeeds");
        assert_eq!(sim.world.get_agent(&actor).expect("exists").next_available_tick, 7);
    }

    #[test]
    fn move_normalizes_a_location_id_alias_and_narrates() {
        let mut world = one_location_world(&["npc_sample"]);
        let square = emergence_types::LocationId::new("town_square");
        let tower = emergence_types::LocationId::new("watch_tower");
        world.location_statics.insert(
            tower.clone(),
            LocationStatic {
                id: tower.clone(),
                description: "A watch tower.".to_owned(),
                inherent_tags: BTreeSet::new(),
                hex_connections: BTreeMap::new(),
            },
        );
        world.location_states.insert(
            tower.clone(),
            LocationState {
                id: tower.clone(),
                occupants: Vec::new(),
                items: Vec::new(),
                sublocations: BTreeMap::new(),
                transient_effects: serde_json::Map::new(),
                connections_state: BTreeMap::new(),
            },
        );
        if let Some(state) = world.location_states.get_mut(&square) {
            state.connections_state.insert(
                tower.clone(),
                ConnectionEdge {
                    status: ConnectionStatus::Open,
                    direction: None,
                },
            );
        }

        let mut sim = Simulator::new(world, None);
        let actor = AgentId::new("npc_sample");
        let mut params = serde_json::Map::new();
        params.insert("location_id".to_owned(), serde_json::Value::from("watch_tower"));
        sim.process_command(&actor, CommandRequest {
            tool: "move".to_owned(),
            params,
        })
        .expect("move succeeds via the location_id alias");
        sim.tick();
        assert_eq!(sim.world.find_agent_location(&actor), Some(tower));
    }

    #[test]
    fn talk_content_over_the_cap_is_truncated() {
        let world = one_location_world(&["npc_sample"]);
        let mut sim = Simulator::new(world, None);
        let actor = AgentId::new("npc_sample");
        let mut params = serde_json::Map::new();
        params.insert("content".to_owned(), serde_json::Value::from("x".repeat(500)));
        sim.process_command(&actor, CommandRequest {
            tool: "talk".to_owned(),
            params,
        })
        .expect("talk succeeds");
        sim.tick();
        // Standalone talk (no target) leaves no conversation, but the event
        // itself must have been clamped before being generated.
        assert!(sim.conversations.conversation_for(&actor).is_none());
    }

    #[tokio::test]
    async fn npc_turn_excludes_the_designated_player() {
        let world = one_location_world(&["npc_sample", "npc_player"]);
        let mut sim = Simulator::new(world, Some(AgentId::new("npc_player")));
        let mut planner = StubPlanner;
        assert!(sim.run_one_npc_turn(&mut planner).await);
        assert_eq!(sim.turn_order, vec![AgentId::new("npc_sample")]);
    }

    #[test]
    fn lethal_damage_enqueues_an_npc_died_follow_up() {
        let world = one_location_world(&["npc_sample"]);
        let mut sim = Simulator::new(world, None);
        let actor = AgentId::new("npc_sample");
        if let Ok(agent) = sim.world.get_agent_mut(&actor) {
            agent.hp = 1;
        }
        let event = Event::new(
            EventKind::DamageApplied {
                amount: 5,
                cause: "attack".to_owned(),
            },
            0,
            Some(actor.clone()),
        );
        sim.handle_event(event);
        sim.tick();
        assert!(sim.world.get_agent(&actor).expect("still present").is_dead());
    }

    #[test]
    fn disabling_starvation_resets_hunger_to_sated() {
        let world = one_location_world(&["npc_sample"]);
        let mut sim = Simulator::new(world, None);
        let actor = AgentId::new("npc_sample");
        if let Ok(agent) = sim.world.get_agent_mut(&actor) {
            agent.hunger_stage = HungerStage::Starving;
            agent.last_meal_tick = 0;
        }
        sim.tick = 50;
        let event = Event::new(EventKind::ToggleStarvation { enabled: false }, 50, Some(actor.clone()));
        sim.handle_event(event);
        let agent = sim.world.get_agent(&actor).expect("still present");
        assert_eq!(agent.hunger_stage, HungerStage::Sated);
        assert_eq!(agent.last_meal_tick, 50);
    }
}
