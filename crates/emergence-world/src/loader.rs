//! A reference loader for the on-disk world data format.
//!
//! Reads `data/npcs/*.json`, `data/locations/<id>_static.json` +
//! `<id>_state.json` pairs, `data/items/catalog.json`, and
//! `data/items/instances/*.json` into a [`WorldState`], then calls
//! [`WorldState::hydrate_connection_directions`] once loading completes.
//!
//! This is a reference implementation, not a hardened data pipeline: a
//! malformed file surfaces as [`LoadError`] rather than being patched up or
//! skipped.

use std::path::Path;

use emergence_types::{Agent, ItemBlueprint, ItemBlueprintId, ItemInstance, LocationState, LocationStatic};

use crate::state::WorldState;

/// Errors that can occur while loading the on-disk world data format.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A directory or file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path that could not be read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file's content was not valid JSON for the expected shape.
    #[error("failed to parse {path}: {source}")]
    Json {
        /// The path that failed to parse.
        path: String,
        /// The underlying JSON parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A location's static/state pair was incomplete (only one side present).
    #[error("location {0} has a static or state file but not both")]
    IncompleteLocationPair(String),
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| LoadError::Json {
        path: path.display().to_string(),
        source,
    })
}

fn json_files_in(dir: &Path) -> Result<Vec<std::path::PathBuf>, LoadError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.display().to_string(),
        source,
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Load a complete [`WorldState`] from the directory layout described in
/// the external-interfaces data format: `<root>/npcs`, `<root>/locations`,
/// `<root>/items/catalog.json`, `<root>/items/instances`.
///
/// # Errors
///
/// Returns [`LoadError`] if any expected file is unreadable or malformed,
/// or if a location has only one half of its static/state pair.
pub fn load_world(root: &Path) -> Result<WorldState, LoadError> {
    let mut world = WorldState::new();

    for path in json_files_in(&root.join("npcs")) {
        let agent: Agent = read_json(&path)?;
        world.agents.insert(agent.id.clone(), agent);
    }

    load_locations(root, &mut world)?;

    let catalog_path = root.join("items").join("catalog.json");
    if catalog_path.exists() {
        let catalog: std::collections::BTreeMap<String, CatalogEntry> = read_json(&catalog_path)?;
        for (id, entry) in catalog {
            let blueprint_id = ItemBlueprintId::new(id);
            world.item_blueprints.insert(blueprint_id.clone(), entry.into_blueprint(blueprint_id));
        }
    }

    for path in json_files_in(&root.join("items").join("instances")) {
        let instance: ItemInstance = read_json(&path)?;
        world.item_instances.insert(instance.id.clone(), instance);
    }

    world.hydrate_connection_directions();
    Ok(world)
}

fn load_locations(root: &Path, world: &mut WorldState) -> Result<(), LoadError> {
    let dir = root.join("locations");
    if !dir.exists() {
        return Ok(());
    }

    let mut ids: std::collections::BTreeSet<String> = std::collections::BTreeSet::new();
    for path in json_files_in(&dir) {
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        if let Some(id) = stem.strip_suffix("_static").or_else(|| stem.strip_suffix("_state")) {
            ids.insert(id.to_owned());
        }
    }

    for id in ids {
        let static_path = dir.join(format!("{id}_static.json"));
        let state_path = dir.join(format!("{id}_state.json"));
        if static_path.exists() != state_path.exists() {
            return Err(LoadError::IncompleteLocationPair(id));
        }
        if !static_path.exists() {
            continue;
        }
        let location_static: LocationStatic = read_json(&static_path)?;
        let location_state: LocationState = read_json(&state_path)?;
        world.location_statics.insert(location_static.id.clone(), location_static);
        world.location_states.insert(location_state.id.clone(), location_state);
    }
    Ok(())
}

/// One entry in `data/items/catalog.json`: an [`ItemBlueprint`] without its
/// own id, since the id is the map key rather than a field.
#[derive(Debug, Clone, serde::Deserialize)]
struct CatalogEntry {
    name: String,
    weight: f64,
    damage_dice: Option<String>,
    damage_type: Option<String>,
    #[serde(default)]
    armour_rating: i32,
    skill_tag: Option<String>,
    #[serde(default)]
    properties: std::collections::BTreeSet<String>,
}

impl CatalogEntry {
    fn into_blueprint(self, id: ItemBlueprintId) -> ItemBlueprint {
        ItemBlueprint {
            id,
            name: self.name,
            weight: self.weight,
            damage_dice: self.damage_dice,
            damage_type: self.damage_type,
            armour_rating: self.armour_rating,
            skill_tag: self.skill_tag,
            properties: self.properties,
        }
    }
}
