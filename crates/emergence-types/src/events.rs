//! The event model: a closed, typed sum of every state transition the world
//! can apply, replacing a stringly-typed `event_type` plus free-form payload.

use serde::{Deserialize, Serialize};

use crate::enums::{GoalStatus, MemoryStatus};
use crate::ids::{AgentId, ConversationId, ItemInstanceId, LocationId};

/// One allowlisted mutation performed by the `reason` tool.
///
/// `reason` may only touch memories, goals, and relationships — never hp,
/// attributes, skills, inventory, slots, or location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ReasonMutation {
    /// Append a memory (text truncated to 1000 chars before storage).
    AddMemory {
        /// The memory text.
        text: String,
    },
    /// Set the status of the first memory whose lowercased text contains
    /// `substring`.
    UpdateMemoryStatus {
        /// Lowercased substring to match against memory text.
        substring: String,
        /// The status to set on the first match.
        status: MemoryStatus,
    },
    /// Append a goal (text truncated to 500 chars before storage).
    AddGoal {
        /// The goal text.
        text: String,
    },
    /// Set the status of the first goal whose lowercased text contains
    /// `substring`.
    UpdateGoalStatus {
        /// Lowercased substring to match against goal text.
        substring: String,
        /// The status to set on the first match.
        status: GoalStatus,
    },
    /// Directly assign a relationship status toward another agent.
    UpdateRelationship {
        /// The other agent.
        target: AgentId,
        /// The new relationship status (free text).
        status: String,
    },
}

/// The typed payload of an applied event, tagged by `event_type` in its
/// serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum EventKind {
    /// The actor moved to `target_location`.
    Move {
        /// The destination, already validated as an open neighbor.
        target_location: LocationId,
    },
    /// The actor picked up `item` from its current location.
    Grab {
        /// The item instance grabbed.
        item: ItemInstanceId,
    },
    /// The actor dropped `item` at its current location.
    Drop {
        /// The item instance dropped.
        item: ItemInstanceId,
    },
    /// The actor ate `item`, destroying the instance.
    Eat {
        /// The item instance consumed.
        item: ItemInstanceId,
    },
    /// Damage applied to the actor (the target of the damage, not the cause).
    DamageApplied {
        /// Hit points removed.
        amount: i64,
        /// Free-text cause (e.g. "starvation", "attack").
        cause: String,
    },
    /// Healing scheduled by a `rest` tool call lands on the actor.
    Rest {
        /// Hit points restored, capped by `2 * constitution`.
        healed: i64,
    },
    /// The actor equipped `item` into `slot`.
    Equip {
        /// The item instance equipped.
        item: ItemInstanceId,
        /// The slot it was placed in.
        slot: String,
    },
    /// The actor unequipped whatever occupied `slot`.
    Unequip {
        /// The slot that was cleared.
        slot: String,
    },
    /// The actor transferred `item` to `receiver`.
    Give {
        /// The item instance transferred.
        item: ItemInstanceId,
        /// The agent receiving it.
        receiver: AgentId,
    },
    /// An edge from the actor's location to `neighbor` was opened.
    OpenConnection {
        /// The neighbor the edge leads to.
        neighbor: LocationId,
    },
    /// An edge from the actor's location to `neighbor` was closed.
    CloseConnection {
        /// The neighbor the edge leads to.
        neighbor: LocationId,
    },
    /// The actor (the target of the death, not the killer) died.
    NpcDied,
    /// An allowlisted self-mutation by the actor.
    Reason {
        /// The mutation performed.
        mutation: ReasonMutation,
    },
    /// A batch memory consolidation/archival pass by the actor.
    Reflect {
        /// New core memory text appended (hard-truncated list to last 50).
        core_memory: String,
        /// Lowercase tokens that mark every matching memory as archived.
        archive_matches: Vec<String>,
        /// Lowercase tokens that mark every matching memory as consolidated.
        consolidate_matches: Vec<String>,
    },
    /// The actor attempted to attack `target`; resolved into a follow-up
    /// `attack_hit` or `attack_missed` event.
    AttackAttempt {
        /// The agent being attacked.
        target: AgentId,
    },
    /// A resolved attack connected.
    AttackHit {
        /// The agent struck.
        target: AgentId,
        /// Damage dealt.
        damage: i64,
        /// The attack roll total.
        to_hit: i32,
        /// The target's armor class at resolution time.
        target_ac: i32,
        /// Whether the attack roll was a natural 20.
        critical: bool,
    },
    /// A resolved attack missed.
    AttackMissed {
        /// The agent targeted.
        target: AgentId,
        /// The attack roll total.
        to_hit: i32,
        /// The target's armor class at resolution time.
        target_ac: i32,
    },
    /// The actor spoke, addressed to `target_id` if given.
    Talk {
        /// The addressed listener, if any.
        target_id: Option<AgentId>,
        /// The spoken content.
        content: String,
    },
    /// The actor spoke loud enough to carry through open neighboring edges.
    TalkLoud {
        /// The spoken content.
        content: String,
    },
    /// The actor screamed, audible through every neighboring edge regardless
    /// of door status.
    Scream {
        /// The spoken content.
        content: String,
    },
    /// The actor interjected into an existing conversation.
    Interject {
        /// The conversation interjected into.
        conversation_id: ConversationId,
        /// The spoken content.
        content: String,
    },
    /// The actor left whatever conversation it was participating in.
    LeaveConversation,
    /// The actor inspected its own inventory.
    Inventory,
    /// The actor inspected its own stats.
    Stats,
    /// The actor looked around its current location.
    Look,
    /// The actor examined `item`.
    Analyze {
        /// Free-text identifier of the item examined.
        item: String,
    },
    /// A location description was narrated (never perceived by others).
    DescribeLocation,
    /// The actor waited, doing nothing.
    Wait,
    /// Starvation damage was globally enabled or disabled.
    ToggleStarvation {
        /// The new enabled state.
        enabled: bool,
    },
}

impl EventKind {
    /// The lowercase event-type name, matching the narrator dispatch table
    /// and the `event_type` field recorded on [`crate::structs::PerceptionEvent`].
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Grab { .. } => "grab",
            Self::Drop { .. } => "drop",
            Self::Eat { .. } => "eat",
            Self::DamageApplied { .. } => "damage_applied",
            Self::Rest { .. } => "rest",
            Self::Equip { .. } => "equip",
            Self::Unequip { .. } => "unequip",
            Self::Give { .. } => "give",
            Self::OpenConnection { .. } => "open_connection",
            Self::CloseConnection { .. } => "close_connection",
            Self::NpcDied => "npc_died",
            Self::Reason { .. } => "reason",
            Self::Reflect { .. } => "reflect",
            Self::AttackAttempt { .. } => "attack_attempt",
            Self::AttackHit { .. } => "attack_hit",
            Self::AttackMissed { .. } => "attack_missed",
            Self::Talk { .. } => "talk",
            Self::TalkLoud { .. } => "talk_loud",
            Self::Scream { .. } => "scream",
            Self::Interject { .. } => "interject",
            Self::LeaveConversation => "leave_conversation",
            Self::Inventory => "inventory",
            Self::Stats => "stats",
            Self::Look => "look",
            Self::Analyze { .. } => "analyze",
            Self::DescribeLocation => "describe_location",
            Self::Wait => "wait",
            Self::ToggleStarvation { .. } => "toggle_starvation",
        }
    }
}

/// An event stamped with the tick it was scheduled for and the agent that
/// caused it, ready to be applied to the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// The typed transition this event performs.
    #[serde(flatten)]
    pub kind: EventKind,
    /// The tick this event is scheduled to apply on.
    pub tick: u64,
    /// The agent that caused this event, if any (absent for pure world
    /// events such as a future weather tick).
    pub actor_id: Option<AgentId>,
    /// Other entities referenced by this event, beyond what `kind` already
    /// types (kept for perception propagation and narration lookups).
    #[serde(default)]
    pub target_ids: Vec<String>,
}

impl Event {
    /// Construct an event stamped for `tick`, caused by `actor_id`.
    #[must_use]
    pub fn new(kind: EventKind, tick: u64, actor_id: Option<AgentId>) -> Self {
        Self {
            kind,
            tick,
            actor_id,
            target_ids: Vec::new(),
        }
    }

    /// The lowercase event-type name for this event.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_name_matches_serialized_tag() {
        let event = Event::new(
            EventKind::Move {
                target_location: LocationId::new("market_square"),
            },
            12,
            Some(AgentId::new("npc_bard")),
        );
        assert_eq!(event.type_name(), "move");

        let value = serde_json::to_value(&event).expect("serializes");
        assert_eq!(value["event_type"], "move");
        assert_eq!(value["target_location"], "market_square");
    }

    #[test]
    fn reason_mutation_roundtrips() {
        let mutation = ReasonMutation::UpdateGoalStatus {
            substring: "forge".to_owned(),
            status: GoalStatus::Done,
        };
        let json = serde_json::to_string(&mutation).expect("serializes");
        let back: ReasonMutation = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, mutation);
    }
}
