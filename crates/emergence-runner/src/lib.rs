//! The planner protocol: working-memory assembly, the OpenAI-compatible
//! connector, hidden-reasoning stripping, and the propose/repair/fallback
//! decision pipeline that implements [`emergence_core::decision::Planner`].
//!
//! # Modules
//!
//! - [`connector`] -- the chat-completion transport.
//! - [`error`] -- [`error::ConnectorError`], the connector's failure modes.
//! - [`extract`] -- hidden-reasoning stripping and best-effort JSON extraction.
//! - [`schema`] -- per-tool parameter schemas, examples, and validation.
//! - [`working_memory`] -- goal/memory/perception retrieval for a turn's prompt.
//! - [`planner`] -- [`planner::LlmPlanner`], tying the above into a `Planner`.

pub mod connector;
pub mod error;
pub mod extract;
pub mod planner;
pub mod schema;
pub mod working_memory;

pub use connector::LlmConnector;
pub use error::ConnectorError;
pub use planner::LlmPlanner;
