//! Shared type definitions for the embodied-agent simulation.
//!
//! This crate is the single source of truth for all types used across the
//! simulation workspace: entity ids, enums, the data model, the event sum
//! type, and the tool-command contract.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe string wrappers for all entity identifiers
//! - [`enums`] -- Enumeration types (hunger, memory, goals, hex directions)
//! - [`structs`] -- Core entity structs (agents, locations, items, conversations)
//! - [`events`] -- The closed event sum type applied to world state
//! - [`command`] -- The tool-invocation contract submitted by front ends and planners

pub mod command;
pub mod enums;
pub mod events;
pub mod ids;
pub mod structs;

pub use command::{CommandRequest, ToolName};
pub use enums::{
    ConnectionStatus, GoalStatus, HexDirection, HungerStage, MemoryPriority, MemoryStatus,
    ProficiencyLevel, canonicalize_hex_direction,
};
pub use events::{Event, EventKind, ReasonMutation};
pub use ids::{AgentId, ConversationId, ItemBlueprintId, ItemInstanceId, LocationId};
pub use structs::{
    Agent, Attributes, ConnectionEdge, Conversation, ConversationLine, Goal, ItemBlueprint,
    ItemInstance, LocationState, LocationStatic, Memory, PerceptionEvent,
};
