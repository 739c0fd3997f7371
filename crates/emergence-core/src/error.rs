//! Error types surfaced by command submission and configuration loading.

use emergence_types::AgentId;

/// Errors returned by `submit_command`, covering every way a player or
/// front-end request can be rejected before it mutates world state.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The named tool is not in the registry.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The acting agent is not yet eligible to act.
    #[error("actor {0} is busy until a later tick")]
    Busy(AgentId),

    /// `validate_intent` rejected the submitted params.
    #[error("invalid intent for tool {tool}")]
    InvalidIntent {
        /// The tool that rejected the intent.
        tool: String,
    },

    /// A referenced agent, location, or item does not exist.
    #[error(transparent)]
    Lookup(#[from] emergence_world::WorldError),
}

/// Errors from loading `config/llm.json`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not valid JSON for the expected shape.
    #[error("failed to parse config JSON: {source}")]
    Json {
        /// The underlying JSON parse error.
        #[source]
        source: serde_json::Error,
    },
}
