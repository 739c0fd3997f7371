//! Axial `(q, r)` layout computation for snapshot consumers.
//!
//! This is purely a rendering aid: it never reads edge status (closed
//! doors still contribute to layout) and never feeds back into game state.

use std::collections::{BTreeMap, HashSet, VecDeque};

use emergence_types::{HexDirection, LocationId};

use crate::state::WorldState;

/// Spacing between disconnected layout components, in axial units.
const COMPONENT_SPACING: i32 = 1000;

/// Compute a deterministic axial `(q, r)` position for every location with
/// runtime state, laid out by breadth-first traversal of dynamic
/// connections from a preferred root per connected component.
#[must_use]
pub fn compute_axial_layout(world: &WorldState) -> BTreeMap<LocationId, (i32, i32)> {
    let mut positions: BTreeMap<LocationId, (i32, i32)> = BTreeMap::new();
    let mut occupied: HashSet<(i32, i32)> = HashSet::new();
    let mut visited: HashSet<LocationId> = HashSet::new();
    let mut component_index = 0i32;

    loop {
        let Some(root) = pick_root(world, &visited) else {
            break;
        };

        let origin = (component_index * COMPONENT_SPACING, 0);
        place(&mut positions, &mut occupied, &mut visited, root.clone(), origin);

        let mut queue: VecDeque<LocationId> = VecDeque::new();
        queue.push_back(root);

        while let Some(current) = queue.pop_front() {
            let Some(current_pos) = positions.get(&current).copied() else {
                continue;
            };
            let Some(state) = world.location_states.get(&current) else {
                continue;
            };

            for (neighbor, edge) in &state.connections_state {
                if visited.contains(neighbor) {
                    continue;
                }
                let preferred = edge.direction.unwrap_or(HexDirection::E);
                let Some(position) = find_free_slot(current_pos, preferred, &occupied) else {
                    continue;
                };
                place(&mut positions, &mut occupied, &mut visited, neighbor.clone(), position);
                queue.push_back(neighbor.clone());
            }
        }

        component_index += 1;
    }

    positions
}

fn place(
    positions: &mut BTreeMap<LocationId, (i32, i32)>,
    occupied: &mut HashSet<(i32, i32)>,
    visited: &mut HashSet<LocationId>,
    id: LocationId,
    position: (i32, i32),
) {
    occupied.insert(position);
    positions.insert(id.clone(), position);
    visited.insert(id);
}

/// The location to start the next component's BFS from: `town_square` if
/// unvisited and present, else the lowest unvisited id.
fn pick_root(world: &WorldState, visited: &HashSet<LocationId>) -> Option<LocationId> {
    let town_square = LocationId::new("town_square");
    if world.location_states.contains_key(&town_square) && !visited.contains(&town_square) {
        return Some(town_square);
    }
    world
        .location_states
        .keys()
        .find(|id| !visited.contains(*id))
        .cloned()
}

/// Try `preferred` first, then the remaining five directions in the fixed
/// canonical order starting after `preferred` and wrapping. Returns `None`
/// if all six adjacent slots around `origin` are occupied.
fn find_free_slot(
    origin: (i32, i32),
    preferred: HexDirection,
    occupied: &HashSet<(i32, i32)>,
) -> Option<(i32, i32)> {
    for direction in candidate_order(preferred) {
        let (dq, dr) = direction.axial_delta();
        let candidate = (origin.0 + dq, origin.1 + dr);
        if !occupied.contains(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// `HexDirection::all()` rotated so `preferred` comes first, followed by
/// the rest in their fixed order, wrapping.
fn candidate_order(preferred: HexDirection) -> Vec<HexDirection> {
    let all = HexDirection::all();
    let start = all
        .iter()
        .position(|direction| *direction == preferred)
        .unwrap_or(0);
    all[start..].iter().chain(all[..start].iter()).copied().collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use emergence_types::{ConnectionEdge, ConnectionStatus, LocationState};

    use super::*;

    fn location_with_edges(id: &str, edges: &[(&str, HexDirection)]) -> LocationState {
        LocationState {
            id: LocationId::new(id),
            occupants: Vec::new(),
            items: Vec::new(),
            sublocations: BTreeMap::new(),
            transient_effects: serde_json::Map::new(),
            connections_state: edges
                .iter()
                .map(|(neighbor, direction)| {
                    (
                        LocationId::new(*neighbor),
                        ConnectionEdge {
                            status: ConnectionStatus::Open,
                            direction: Some(*direction),
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn places_root_at_origin_and_neighbor_by_direction() {
        let mut world = WorldState::new();
        world.location_states.insert(
            LocationId::new("town_square"),
            location_with_edges("town_square", &[("market_square", HexDirection::E)]),
        );
        world.location_states.insert(
            LocationId::new("market_square"),
            location_with_edges("market_square", &[("town_square", HexDirection::W)]),
        );

        let layout = compute_axial_layout(&world);
        assert_eq!(layout[&LocationId::new("town_square")], (0, 0));
        assert_eq!(layout[&LocationId::new("market_square")], (1, 0));
    }

    #[test]
    fn disconnected_components_are_offset_by_spacing() {
        let mut world = WorldState::new();
        world
            .location_states
            .insert(LocationId::new("alpha"), location_with_edges("alpha", &[]));
        world
            .location_states
            .insert(LocationId::new("zeta"), location_with_edges("zeta", &[]));

        let layout = compute_axial_layout(&world);
        assert_eq!(layout[&LocationId::new("alpha")], (0, 0));
        assert_eq!(layout[&LocationId::new("zeta")], (COMPONENT_SPACING, 0));
    }

    #[test]
    fn direction_conflict_falls_through_to_next_canonical_slot() {
        let mut world = WorldState::new();
        // Two neighbors both claim direction E from the root; the second
        // must be bumped to the next free canonical slot (NE).
        let mut root = location_with_edges("root", &[("first", HexDirection::E)]);
        root.connections_state.insert(
            LocationId::new("second"),
            ConnectionEdge {
                status: ConnectionStatus::Open,
                direction: Some(HexDirection::E),
            },
        );
        world.location_states.insert(LocationId::new("root"), root);
        world
            .location_states
            .insert(LocationId::new("first"), location_with_edges("first", &[]));
        world
            .location_states
            .insert(LocationId::new("second"), location_with_edges("second", &[]));

        let layout = compute_axial_layout(&world);
        let first_pos = layout[&LocationId::new("first")];
        let second_pos = layout[&LocationId::new("second")];
        assert_ne!(first_pos, second_pos);
        assert!([first_pos, second_pos].contains(&(1, 0)));
        assert!([first_pos, second_pos].contains(&HexDirection::NE.axial_delta()));
    }

    #[test]
    fn rotation_preserves_all_six_directions() {
        let order = candidate_order(HexDirection::NW);
        let mut sorted = order.clone();
        sorted.sort();
        let mut all = HexDirection::all().to_vec();
        all.sort();
        assert_eq!(sorted, all);
        assert_eq!(order[0], HexDirection::NW);
    }
}
