//! Perception propagation: deciding whose STM an applied event lands in.
//!
//! Every event has a primary location; its direct recipients are the other
//! occupants there. `scream` and `talk_loud` additionally carry through
//! neighboring edges, and agents with the `elevated_vantage_point` tag see a
//! fixed visual subset of events from any neighbor regardless of door
//! status. `describe_location` and `wait` never propagate -- they describe
//! or consume only the actor's own turn.

use std::collections::BTreeSet;

use emergence_types::{AgentId, ConnectionStatus, Event, EventKind, LocationId, PerceptionEvent};
use emergence_world::WorldState;

/// Event kinds an `elevated_vantage_point` agent can see in a neighboring
/// location regardless of whether the edge between them is open.
const VISUAL_VANTAGE_SUBSET: [&str; 10] = [
    "grab",
    "drop",
    "equip",
    "unequip",
    "attack_hit",
    "attack_missed",
    "damage_applied",
    "inventory",
    "stats",
    "analyze",
];

/// Determine the primary location of an event. Must be called before
/// [`WorldState::apply`] runs: by the time `npc_died` has been applied, the
/// dying agent is no longer anywhere.
#[must_use]
pub fn primary_location(world: &WorldState, event: &Event) -> Option<LocationId> {
    match &event.kind {
        EventKind::Move { target_location } => Some(target_location.clone()),
        _ => event
            .actor_id
            .as_ref()
            .and_then(|actor_id| world.find_agent_location(actor_id)),
    }
}

/// Fan an applied event out to every recipient's short-term memory buffer.
///
/// `primary` must be the value [`primary_location`] returned for this event
/// *before* it was applied. `buffer_cap` caps each agent's STM length,
/// popping the oldest entries first.
pub fn propagate(world: &mut WorldState, event: &Event, primary: Option<LocationId>, buffer_cap: usize) {
    if matches!(event.kind, EventKind::DescribeLocation | EventKind::Wait) {
        return;
    }
    let Some(primary) = primary else {
        return;
    };

    let actor = event.actor_id.clone();
    let mut recipients: BTreeSet<AgentId> = world
        .get_location_state(&primary)
        .map(|state| {
            state
                .occupants
                .iter()
                .filter(|id| Some(*id) != actor.as_ref())
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    let neighbors: Vec<(LocationId, ConnectionStatus)> = world
        .get_location_state(&primary)
        .map(|state| {
            state
                .connections_state
                .iter()
                .map(|(id, edge)| (id.clone(), edge.status))
                .collect()
        })
        .unwrap_or_default();

    match &event.kind {
        EventKind::Scream { .. } => {
            for (neighbor, _) in &neighbors {
                if let Ok(state) = world.get_location_state(neighbor) {
                    recipients.extend(state.occupants.iter().cloned());
                }
            }
        }
        EventKind::TalkLoud { .. } => {
            for (neighbor, status) in &neighbors {
                if *status == ConnectionStatus::Open {
                    if let Ok(state) = world.get_location_state(neighbor) {
                        recipients.extend(state.occupants.iter().cloned());
                    }
                }
            }
        }
        _ => {}
    }

    let type_name = event.kind.type_name();
    if VISUAL_VANTAGE_SUBSET.contains(&type_name) {
        for (neighbor, _) in &neighbors {
            let Ok(state) = world.get_location_state(neighbor) else {
                continue;
            };
            let watchers: Vec<AgentId> = state
                .occupants
                .iter()
                .filter(|id| {
                    world
                        .get_agent(id)
                        .is_ok_and(|agent| agent.inherent_tags.contains("elevated_vantage_point"))
                })
                .cloned()
                .collect();
            recipients.extend(watchers);
        }
    }

    if let Some(actor_id) = &actor {
        recipients.remove(actor_id);
    }

    let payload = serde_json::to_value(&event.kind)
        .ok()
        .and_then(|value| value.as_object().cloned())
        .unwrap_or_default();

    for recipient in recipients {
        let Ok(agent) = world.get_agent_mut(&recipient) else {
            continue;
        };
        agent.short_term_memory.push(PerceptionEvent {
            event_type: type_name.to_owned(),
            tick: event.tick,
            actor_id: actor.clone(),
            target_ids: event.target_ids.clone(),
            location_id: primary.clone(),
            payload: payload.clone(),
        });
        while agent.short_term_memory.len() > buffer_cap {
            agent.short_term_memory.remove(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use emergence_types::{
        Agent, Attributes, ConnectionEdge, HungerStage, LocationState, LocationStatic,
    };

    use super::*;

    fn bare_agent(id: &str, tags: &[&str]) -> Agent {
        Agent {
            id: AgentId::new(id),
            name: id.to_owned(),
            hp: 10,
            inventory: Vec::new(),
            slots: BTreeMap::new(),
            attributes: Attributes::default(),
            skills: BTreeMap::new(),
            relationships: BTreeMap::new(),
            inherent_tags: tags.iter().map(|tag| (*tag).to_owned()).collect(),
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

    fn with_two_locations(edge_status: ConnectionStatus) -> WorldState {
        let mut world = WorldState::new();
        let square = LocationId::new("town_square");
        let tower = LocationId::new("watch_tower");

        world.location_statics.insert(
            square.clone(),
            LocationStatic {
                id: square.clone(),
                description: "The town square.".to_owned(),
                inherent_tags: BTreeSet::new(),
                hex_connections: BTreeMap::new(),
            },
        );
        world.location_statics.insert(
            tower.clone(),
            LocationStatic {
                id: tower.clone(),
                description: "A watch tower.".to_owned(),
                inherent_tags: BTreeSet::new(),
                hex_connections: BTreeMap::new(),
            },
        );

        let mut square_state = LocationState {
            id: square.clone(),
            occupants: vec![AgentId::new("npc_sample")],
            items: Vec::new(),
            sublocations: std::collections::BTreeMap::new(),
            transient_effects: serde_json::Map::new(),
            connections_state: BTreeMap::new(),
        };
        square_state.connections_state.insert(
            tower.clone(),
            ConnectionEdge {
                status: edge_status,
                direction: None,
            },
        );
        world.location_states.insert(square.clone(), square_state);

        let tower_state = LocationState {
            id: tower.clone(),
            occupants: vec![AgentId::new("npc_watcher")],
            items: Vec::new(),
            sublocations: std::collections::BTreeMap::new(),
            transient_effects: serde_json::Map::new(),
            connections_state: BTreeMap::new(),
        };
        world.location_states.insert(tower, tower_state);

        world.agents.insert(AgentId::new("npc_sample"), bare_agent("npc_sample", &[]));
        world.agents.insert(
            AgentId::new("npc_watcher"),
            bare_agent("npc_watcher", &["elevated_vantage_point"]),
        );
        world
    }

    #[test]
    fn scream_reaches_neighbors_through_a_closed_door() {
        let mut world = with_two_locations(ConnectionStatus::Closed);
        let event = Event::new(
            EventKind::Scream {
                content: "help!".to_owned(),
            },
            1,
            Some(AgentId::new("npc_sample")),
        );
        let primary = primary_location(&world, &event);
        propagate(&mut world, &event, primary, 30);
        let watcher = world.get_agent(&AgentId::new("npc_watcher")).expect("exists");
        assert_eq!(watcher.short_term_memory.len(), 1);
        assert_eq!(watcher.short_term_memory[0].event_type, "scream");
    }

    #[test]
    fn talk_loud_does_not_cross_a_closed_door() {
        let mut world = with_two_locations(ConnectionStatus::Closed);
        let event = Event::new(
            EventKind::TalkLoud {
                content: "hello".to_owned(),
            },
            1,
            Some(AgentId::new("npc_sample")),
        );
        let primary = primary_location(&world, &event);
        propagate(&mut world, &event, primary, 30);
        let watcher = world.get_agent(&AgentId::new("npc_watcher")).expect("exists");
        assert!(watcher.short_term_memory.is_empty());
    }

    #[test]
    fn elevated_vantage_point_sees_visual_events_through_a_closed_door() {
        let mut world = with_two_locations(ConnectionStatus::Closed);
        let event = Event::new(
            EventKind::Grab {
                item: emergence_types::ItemInstanceId::new("item_rusty_sword_1"),
            },
            1,
            Some(AgentId::new("npc_sample")),
        );
        let primary = primary_location(&world, &event);
        propagate(&mut world, &event, primary, 30);
        let watcher = world.get_agent(&AgentId::new("npc_watcher")).expect("exists");
        assert_eq!(watcher.short_term_memory.len(), 1);
    }

    #[test]
    fn stm_is_capped_at_the_configured_buffer_size() {
        let mut world = with_two_locations(ConnectionStatus::Open);
        for tick in 0..5 {
            let event = Event::new(
                EventKind::TalkLoud {
                    content: format!("line {tick}"),
                },
                tick,
                Some(AgentId::new("npc_sample")),
            );
            let primary = primary_location(&world, &event);
            propagate(&mut world, &event, primary, 2);
        }
        let watcher = world.get_agent(&AgentId::new("npc_watcher")).expect("exists");
        assert_eq!(watcher.short_term_memory.len(), 2);
        assert_eq!(watcher.short_term_memory[1].tick, 4);
    }
}
