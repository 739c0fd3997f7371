//! Error types for the `emergence-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

use emergence_types::{AgentId, ItemBlueprintId, ItemInstanceId, LocationId};

/// Errors that can occur during canonical world-state lookups.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// No agent exists with the given id.
    #[error("unknown agent: {0}")]
    UnknownAgent(AgentId),

    /// No location exists with the given id.
    #[error("unknown location: {0}")]
    UnknownLocation(LocationId),

    /// No item instance exists with the given id.
    #[error("unknown item instance: {0}")]
    UnknownItemInstance(ItemInstanceId),

    /// No item blueprint exists with the given id.
    #[error("unknown item blueprint: {0}")]
    UnknownItemBlueprint(ItemBlueprintId),
}
