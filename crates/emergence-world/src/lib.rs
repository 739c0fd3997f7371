//! Canonical world state for the embodied-agent simulation.
//!
//! This crate owns every agent, location, and item, and exposes the single
//! `apply` function that is the only writer of game state, plus the
//! hunger-tick and hex-connection hydration batch operations and the axial
//! layout computation used by snapshot consumers.
//!
//! # Modules
//!
//! - [`error`] -- [`WorldError`], returned by every lookup accessor.
//! - [`state`] -- [`WorldState`], the canonical store and `apply(event)`.
//! - [`layout`] -- axial `(q, r)` layout for snapshot/rendering consumers.
//! - [`loader`] -- reference loader for the on-disk world data format.

pub mod error;
pub mod layout;
pub mod loader;
pub mod state;

pub use error::WorldError;
pub use layout::compute_axial_layout;
pub use loader::{LoadError, load_world};
pub use state::{HUNGRY_THRESHOLD, STARVING_THRESHOLD, WorldState};
