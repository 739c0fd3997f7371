//! The tool registry: one [`Tool`] implementation per verb an actor can
//! submit through [`emergence_types::CommandRequest`].
//!
//! Each tool is a stateless pair of pure functions — `validate_intent`
//! checks the submitted params against current world state, and
//! `generate_events` turns an already-validated intent into the events that
//! will be applied. Neither function mutates `world`; scheduling,
//! application, and narration are the caller's job.

mod analyze;
mod attack;
mod close;
mod drop;
mod eat;
mod equip;
mod give;
mod grab;
mod interject;
mod inventory;
mod leave_conversation;
mod look;
mod open;
mod reason;
mod reflect;
mod rest;
mod scream;
mod stats;
mod talk;
mod talk_loud;
mod toggle_starvation;
mod unequip;
mod wait;

pub use analyze::AnalyzeTool;
pub use attack::AttackTool;
pub use close::CloseTool;
pub use drop::DropTool;
pub use eat::EatTool;
pub use equip::EquipTool;
pub use give::GiveTool;
pub use grab::GrabTool;
pub use interject::InterjectTool;
pub use inventory::InventoryTool;
pub use leave_conversation::LeaveConversationTool;
pub use look::LookTool;
pub use open::OpenTool;
pub use reason::ReasonTool;
pub use reflect::ReflectTool;
pub use rest::RestTool;
pub use scream::ScreamTool;
pub use stats::StatsTool;
pub use talk::TalkTool;
pub use talk_loud::TalkLoudTool;
pub use toggle_starvation::ToggleStarvationTool;
pub use unequip::UnequipTool;
pub use wait::WaitTool;

mod r#move;
pub use r#move::MoveTool;

use std::collections::BTreeMap;

use emergence_types::{Agent, Event, ToolName};
use emergence_world::WorldState;

/// One registered verb an actor may invoke.
///
/// Implementations never panic: an unresolvable lookup during
/// `generate_events` is a logic error in the caller (it must only be invoked
/// after `validate_intent` has returned `true` against the same world), but
/// implementations still fail closed (empty event list) rather than assume
/// the precondition held.
pub trait Tool: Send + Sync {
    /// The registered name this tool is looked up by.
    fn name(&self) -> ToolName;

    /// Whether `params` describes a legal action for `actor` given `world`.
    fn validate_intent(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        world: &WorldState,
        actor: &Agent,
    ) -> bool;

    /// Turn an already-validated intent into the events it schedules,
    /// stamped for `tick`.
    fn generate_events(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
        world: &WorldState,
        actor: &Agent,
        tick: u64,
    ) -> Vec<Event>;
}

/// Build the full set of registered tools, keyed by [`ToolName`].
#[must_use]
pub fn registry() -> BTreeMap<ToolName, Box<dyn Tool>> {
    let tools: Vec<Box<dyn Tool>> = vec![
        Box::new(MoveTool),
        Box::new(OpenTool),
        Box::new(CloseTool),
        Box::new(GrabTool),
        Box::new(EatTool),
        Box::new(DropTool),
        Box::new(AttackTool),
        Box::new(TalkTool),
        Box::new(TalkLoudTool),
        Box::new(ScreamTool),
        Box::new(InterjectTool),
        Box::new(LeaveConversationTool),
        Box::new(InventoryTool),
        Box::new(StatsTool),
        Box::new(LookTool),
        Box::new(AnalyzeTool),
        Box::new(EquipTool),
        Box::new(UnequipTool),
        Box::new(GiveTool),
        Box::new(ToggleStarvationTool),
        Box::new(WaitTool),
        Box::new(RestTool),
        Box::new(ReasonTool),
        Box::new(ReflectTool),
    ];
    tools.into_iter().map(|tool| (tool.name(), tool)).collect()
}
