//! Agent-facing action layer for the embodied-agent simulation.
//!
//! This crate turns a tool invocation into the events a scheduler applies:
//! the [`tools`] registry validates and expands one verb per call, and
//! [`combat`] resolves the dice math an `attack_attempt` follow-up needs.
//! World state itself lives in `emergence-world`; this crate only reads it.
//!
//! # Modules
//!
//! - [`error`] -- [`AgentError`], the error type surfaced by tool dispatch
//! - [`combat`] -- ability modifiers, armor class, and attack resolution
//! - [`tools`] -- the [`tools::Tool`] trait and one implementation per verb

pub mod combat;
pub mod error;
pub mod tools;

pub use error::AgentError;
pub use tools::{Tool, registry};
