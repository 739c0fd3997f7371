//! Enumeration types for the embodied-agent simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Agent hunger
// ---------------------------------------------------------------------------

/// An agent's hunger state, driven by ticks elapsed since its last meal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HungerStage {
    /// Fewer than 20 ticks since the last meal.
    Sated,
    /// 20-39 ticks since the last meal.
    Hungry,
    /// 40 or more ticks since the last meal; takes starvation damage each tick.
    Starving,
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

/// The importance an agent (or its planner) assigned to a memory at write time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryPriority {
    /// Background detail, first to be archived under pressure.
    Low,
    /// Ordinary recollection.
    Normal,
    /// Worth surfacing in working memory ahead of older entries.
    High,
}

/// The retention/recall state of a memory entry.
///
/// Drives the scoring multiplier used when assembling working memory: archived
/// entries score lower, consolidated entries score higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryStatus {
    /// Freshly written, not yet archived or consolidated.
    Active,
    /// Brought back into active consideration by a `reason`/`reflect` mutation.
    Recalled,
    /// Soft-retired once the owning list grows past its cap.
    Archived,
    /// Marked as settled, load-bearing knowledge by `reflect`.
    Consolidated,
}

// ---------------------------------------------------------------------------
// Goals
// ---------------------------------------------------------------------------

/// The lifecycle state of an agent's goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Currently being pursued.
    Active,
    /// Queued, not yet taken up.
    Pending,
    /// Completed.
    Done,
    /// Abandoned without completion.
    Cancelled,
}

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

/// An agent's proficiency with a skill tag, feeding the attack-roll bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProficiencyLevel {
    /// +1 to hit.
    Novice,
    /// +2 to hit.
    Proficient,
    /// +3 to hit.
    Expert,
    /// +4 to hit.
    Master,
}

// ---------------------------------------------------------------------------
// World graph
// ---------------------------------------------------------------------------

/// One of the six canonical flat-top hex edge directions.
///
/// Input variants ("north-east", "northeast", any case/separator) are
/// canonicalized to these six before being stored. "north" canonicalizes to
/// `Nw` and "south" to `Se` — a deliberate convention inherited from the
/// authoring data, not a bug.
///
/// Deserializes via [`canonicalize_hex_direction`] so any authored variant
/// string lands on one of the six canonical values; serializes back out as
/// the bare variant name (`"E"`, `"NE"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum HexDirection {
    /// East.
    E,
    /// North-east.
    NE,
    /// North-west.
    NW,
    /// West.
    W,
    /// South-west.
    SW,
    /// South-east.
    SE,
}

impl HexDirection {
    /// The direction on the reciprocal side of an edge.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::E => Self::W,
            Self::W => Self::E,
            Self::NE => Self::SW,
            Self::SW => Self::NE,
            Self::NW => Self::SE,
            Self::SE => Self::NW,
        }
    }

    /// The axial `(q, r)` offset this direction moves a neighbor by.
    #[must_use]
    pub const fn axial_delta(self) -> (i32, i32) {
        match self {
            Self::E => (1, 0),
            Self::NE => (1, -1),
            Self::NW => (0, -1),
            Self::W => (-1, 0),
            Self::SW => (-1, 1),
            Self::SE => (0, 1),
        }
    }

    /// All six directions, in the fixed tie-break order used by layout and
    /// conflict-resolution code.
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [Self::E, Self::NE, Self::NW, Self::W, Self::SW, Self::SE]
    }
}

impl<'de> Deserialize<'de> for HexDirection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct HexDirectionVisitor;

        impl serde::de::Visitor<'_> for HexDirectionVisitor {
            type Value = HexDirection;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a hex direction string (e.g. \"NE\", \"north-east\")")
            }

            fn visit_str<E>(self, value: &str) -> Result<HexDirection, E>
            where
                E: serde::de::Error,
            {
                canonicalize_hex_direction(value)
                    .ok_or_else(|| E::custom(format!("invalid hex direction: {value}")))
            }
        }

        deserializer.deserialize_str(HexDirectionVisitor)
    }
}

/// Normalize a direction string (any case, with hyphen/underscore/no
/// separator) to one of the six canonical [`HexDirection`] values.
///
/// "north" and "south" canonicalize to `NW`/`SE` respectively — this is the
/// authoring convention, not a defect.
#[must_use]
pub fn canonicalize_hex_direction(raw: &str) -> Option<HexDirection> {
    let normalized: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    match normalized.as_str() {
        "e" | "east" => Some(HexDirection::E),
        "ne" | "northeast" => Some(HexDirection::NE),
        "nw" | "northwest" => Some(HexDirection::NW),
        "w" | "west" => Some(HexDirection::W),
        "sw" | "southwest" => Some(HexDirection::SW),
        "se" | "southeast" => Some(HexDirection::SE),
        "north" => Some(HexDirection::NW),
        "south" => Some(HexDirection::SE),
        _ => None,
    }
}


/// Whether a connection edge can currently be traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// Traversable.
    Open,
    /// Blocked (e.g. a closed door).
    Closed,
}
