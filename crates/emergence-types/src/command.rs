//! The tool-invocation contract submitted by front ends and planners alike.

use serde::{Deserialize, Serialize};

/// The name of a registered tool.
///
/// Kept separate from [`CommandRequest::tool`] (a raw `String`) because an
/// incoming command may name an unregistered tool — that must fall back to
/// `wait` rather than fail to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    /// Travel to an adjacent, open location.
    Move,
    /// Open a connection edge.
    Open,
    /// Close a connection edge.
    Close,
    /// Pick up an item from the current location.
    Grab,
    /// Put down a carried item.
    Drop,
    /// Attack a co-located agent.
    Attack,
    /// Speak, starting or continuing a conversation.
    Talk,
    /// Speak loud enough to carry through open neighboring edges.
    TalkLoud,
    /// Scream, audible through every neighboring edge.
    Scream,
    /// Join an existing conversation mid-stream.
    Interject,
    /// Leave the current conversation.
    LeaveConversation,
    /// Inspect carried items.
    Inventory,
    /// Inspect own stats.
    Stats,
    /// Inspect the current location.
    Look,
    /// Inspect a specific item.
    Analyze,
    /// Wear or wield a carried item.
    Equip,
    /// Remove an equipped item.
    Unequip,
    /// Consume a food item.
    Eat,
    /// Hand an item to a co-located agent.
    Give,
    /// Enable or disable global starvation damage.
    ToggleStarvation,
    /// Do nothing for a number of ticks.
    Wait,
    /// Recover hit points over a number of ticks.
    Rest,
    /// Perform an allowlisted self-mutation (memories, goals, relationships).
    Reason,
    /// Consolidate and archive memories.
    Reflect,
}

impl ToolName {
    /// Parse a tool name from its lowercase wire form, returning `None` for
    /// anything unregistered.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "move" => Some(Self::Move),
            "open" => Some(Self::Open),
            "close" => Some(Self::Close),
            "grab" => Some(Self::Grab),
            "drop" => Some(Self::Drop),
            "attack" => Some(Self::Attack),
            "talk" => Some(Self::Talk),
            "talk_loud" => Some(Self::TalkLoud),
            "scream" => Some(Self::Scream),
            "interject" => Some(Self::Interject),
            "leave_conversation" => Some(Self::LeaveConversation),
            "inventory" => Some(Self::Inventory),
            "stats" => Some(Self::Stats),
            "look" => Some(Self::Look),
            "analyze" => Some(Self::Analyze),
            "equip" => Some(Self::Equip),
            "unequip" => Some(Self::Unequip),
            "eat" => Some(Self::Eat),
            "give" => Some(Self::Give),
            "toggle_starvation" => Some(Self::ToggleStarvation),
            "wait" => Some(Self::Wait),
            "rest" => Some(Self::Rest),
            "reason" => Some(Self::Reason),
            "reflect" => Some(Self::Reflect),
            _ => None,
        }
    }

    /// The declared base time cost for this tool, in ticks.
    ///
    /// `wait` and `rest` override this with their `ticks` parameter; every
    /// other tool always costs this fixed amount.
    #[must_use]
    pub const fn base_time_cost(self) -> u64 {
        match self {
            Self::Move => 5,
            Self::Attack => 3,
            Self::Equip | Self::Unequip => 2,
            Self::ToggleStarvation => 0,
            Self::Open
            | Self::Close
            | Self::Grab
            | Self::Drop
            | Self::Talk
            | Self::TalkLoud
            | Self::Scream
            | Self::Interject
            | Self::LeaveConversation
            | Self::Inventory
            | Self::Stats
            | Self::Look
            | Self::Analyze
            | Self::Eat
            | Self::Give
            | Self::Wait
            | Self::Rest
            | Self::Reason => 1,
            // Reflection takes longer than a normal action.
            Self::Reflect => 5,
        }
    }
}

/// A tool invocation submitted by a front end or produced by the planner.
///
/// `tool` is kept as a raw string (rather than [`ToolName`]) so that an
/// unrecognized name can be handled as a fallback-to-wait case instead of
/// a deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    /// The raw tool name as submitted.
    pub tool: String,
    /// Tool-specific parameters.
    #[serde(default)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl CommandRequest {
    /// Build a `wait` command for the given number of ticks.
    #[must_use]
    pub fn wait(ticks: u64) -> Self {
        let mut params = serde_json::Map::new();
        params.insert("ticks".to_owned(), serde_json::Value::from(ticks));
        Self {
            tool: "wait".to_owned(),
            params,
        }
    }
}
