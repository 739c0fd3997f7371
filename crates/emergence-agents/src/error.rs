//! Error types for the `emergence-agents` crate.

use emergence_types::AgentId;

/// Errors surfaced by tool validation, event generation, and combat resolution.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// `process_command` was given a tool name not present in the registry.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// `validate_intent` returned false for the submitted params.
    #[error("invalid intent for tool {tool}: {reason}")]
    InvalidIntent {
        /// The tool that rejected the intent.
        tool: String,
        /// A short, user-facing reason.
        reason: String,
    },

    /// The actor is not yet eligible to act (`next_available_tick > current tick`).
    #[error("actor {0} is busy")]
    Busy(AgentId),

    /// A lookup against world state failed while validating or generating events.
    #[error(transparent)]
    World(#[from] emergence_world::WorldError),
}
