//! The read-only world projection served by `GET /api/world`.
//!
//! Resolves inventory and equipped item ids to `{id, name}` pairs and
//! neighbor connections to `{status, direction, axial}`, per the snapshot
//! shape front ends consume -- raw ids alone aren't enough to render a
//! location graph or an inventory list without a second round trip.

use emergence_types::{
    AgentId, ConnectionStatus, HexDirection, ItemInstanceId, LocationId,
};
use emergence_world::WorldState;
use serde::Serialize;

/// An item instance resolved to its display name.
#[derive(Debug, Clone, Serialize)]
pub struct ItemRef {
    /// The item instance id.
    pub id: ItemInstanceId,
    /// The blueprint's display name, or `"unknown item"` if the blueprint
    /// or instance has gone missing.
    pub name: String,
}

/// One agent, projected for external consumption.
#[derive(Debug, Clone, Serialize)]
pub struct AgentSnapshot {
    /// The agent id.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// Current hit points.
    pub hp: i64,
    /// Current hunger stage.
    pub hunger_stage: emergence_types::HungerStage,
    /// The agent's current location, if it could be resolved.
    pub location: Option<LocationId>,
    /// Carried items, resolved to `{id, name}`.
    pub inventory: Vec<ItemRef>,
    /// Equipment slot to resolved item, if occupied.
    pub equipped: std::collections::BTreeMap<String, Option<ItemRef>>,
}

/// One neighboring connection out of a location.
#[derive(Debug, Clone, Serialize)]
pub struct NeighborSnapshot {
    /// The neighboring location id.
    pub id: LocationId,
    /// Whether the edge is currently open.
    pub status: ConnectionStatus,
    /// The canonical direction this edge occupies, if hydrated.
    pub direction: Option<HexDirection>,
    /// The neighbor's computed axial `(q, r)` position.
    pub axial: (i32, i32),
}

/// One location, projected for external consumption.
#[derive(Debug, Clone, Serialize)]
pub struct LocationSnapshot {
    /// The location id.
    pub id: LocationId,
    /// Narrative description.
    pub description: String,
    /// Agents currently present.
    pub occupants: Vec<AgentId>,
    /// Items currently present, resolved to `{id, name}`.
    pub items: Vec<ItemRef>,
    /// Open and closed neighboring connections.
    pub neighbors: Vec<NeighborSnapshot>,
    /// This location's own computed axial `(q, r)` position.
    pub axial: (i32, i32),
}

/// The complete read-only projection of a world at a tick.
#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    /// The tick this snapshot was taken at.
    pub tick: u64,
    /// Every agent in the world.
    pub agents: Vec<AgentSnapshot>,
    /// Every location with runtime state.
    pub locations: Vec<LocationSnapshot>,
}

fn resolve_item(world: &WorldState, id: &ItemInstanceId) -> ItemRef {
    let name = world
        .item_instances
        .get(id)
        .and_then(|instance| world.item_blueprints.get(&instance.blueprint_id))
        .map(|blueprint| blueprint.name.clone())
        .unwrap_or_else(|| "unknown item".to_owned());
    ItemRef {
        id: id.clone(),
        name,
    }
}

/// Build the full [`WorldSnapshot`] for `world` at `tick`.
#[must_use]
pub fn build(world: &WorldState, tick: u64) -> WorldSnapshot {
    let layout = emergence_world::compute_axial_layout(world);

    let agents = world
        .agents
        .values()
        .map(|agent| AgentSnapshot {
            id: agent.id.clone(),
            name: agent.name.clone(),
            hp: agent.hp,
            hunger_stage: agent.hunger_stage,
            location: world.find_agent_location(&agent.id),
            inventory: agent.inventory.iter().map(|id| resolve_item(world, id)).collect(),
            equipped: agent
                .slots
                .iter()
                .map(|(slot, occupant)| (slot.clone(), occupant.as_ref().map(|id| resolve_item(world, id))))
                .collect(),
        })
        .collect();

    let locations = world
        .location_statics
        .keys()
        .filter_map(|id| {
            let state = world.location_states.get(id)?;
            let axial = layout.get(id).copied().unwrap_or((0, 0));
            let neighbors = state
                .connections_state
                .iter()
                .map(|(neighbor_id, edge)| NeighborSnapshot {
                    id: neighbor_id.clone(),
                    status: edge.status,
                    direction: edge.direction,
                    axial: layout.get(neighbor_id).copied().unwrap_or((0, 0)),
                })
                .collect();
            Some(LocationSnapshot {
                id: id.clone(),
                description: world.location_statics.get(id).map(|s| s.description.clone()).unwrap_or_default(),
                occupants: state.occupants.clone(),
                items: state.items.iter().map(|id| resolve_item(world, id)).collect(),
                neighbors,
                axial,
            })
        })
        .collect();

    WorldSnapshot { tick, agents, locations }
}

#[cfg(test)]
mod tests {
    use emergence_types::{ConnectionEdge, LocationState, LocationStatic};

    use super::*;

    #[test]
    fn locations_missing_runtime_state_are_skipped() {
        let mut world = WorldState::new();
        let id = LocationId::new("ghost_town");
        world.location_statics.insert(
            id.clone(),
            LocationStatic {
                id: id.clone(),
                description: "A place with no runtime state.".to_owned(),
                inherent_tags: Default::default(),
                hex_connections: Default::default(),
            },
        );
        let snapshot = build(&world, 0);
        assert!(snapshot.locations.is_empty());
    }

    #[test]
    fn neighbor_status_and_direction_round_trip() {
        let mut world = WorldState::new();
        let here = LocationId::new("here");
        let there = LocationId::new("there");
        world.location_statics.insert(
            here.clone(),
            LocationStatic {
                id: here.clone(),
                description: "Here.".to_owned(),
                inherent_tags: Default::default(),
                hex_connections: Default::default(),
            },
        );
        let mut state = LocationState {
            id: here.clone(),
            occupants: Vec::new(),
            items: Vec::new(),
            sublocations: Default::default(),
            transient_effects: serde_json::Map::new(),
            connections_state: Default::default(),
        };
        state.connections_state.insert(
            there,
            ConnectionEdge {
                status: ConnectionStatus::Open,
                direction: Some(HexDirection::East),
            },
        );
        world.location_states.insert(here.clone(), state);

        let snapshot = build(&world, 5);
        let location = snapshot.locations.first().expect("one location");
        let neighbor = location.neighbors.first().expect("one neighbor");
        assert_eq!(neighbor.status, ConnectionStatus::Open);
        assert_eq!(neighbor.direction, Some(HexDirection::East));
    }
}
