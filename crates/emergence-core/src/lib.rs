//! Scheduler and orchestration crate for the Emergence simulation: turns
//! submitted commands into world-state transitions, drives the per-tick
//! event queue, and assembles what each agent perceives along the way.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading for the LLM transport and memory
//!   subsystems.
//! - [`conversation`] -- The conversation state machine: membership, turn
//!   order, and dissolution.
//! - [`decision`] -- [`Planner`] trait and [`StubPlanner`].
//! - [`error`] -- [`CommandError`] and [`ConfigError`].
//! - [`narrator`] -- Renders an applied event into a human-readable line.
//! - [`perception`] -- Per-agent perception propagation from applied events.
//! - [`scheduler`] -- [`Simulator`], the tick cycle and command pipeline.
//!
//! [`Planner`]: decision::Planner
//! [`StubPlanner`]: decision::StubPlanner
//! [`CommandError`]: error::CommandError
//! [`ConfigError`]: error::ConfigError
//! [`Simulator`]: scheduler::Simulator

pub mod config;
pub mod conversation;
pub mod decision;
pub mod error;
pub mod narrator;
pub mod perception;
pub mod scheduler;
