//! Type-safe string-backed identifiers for world entities.
//!
//! The on-disk world data authors its own ids directly (`"npc_bard"`,
//! `"town_square"`, `"item_rusty_sword_1"`) rather than generating opaque
//! handles, so every id here is a thin newtype over `String` instead of a
//! UUID wrapper. [`ConversationId`] is the one id synthesized at runtime.

use std::fmt;

/// Defines a newtype wrapper around `String` with the common trait set used
/// for entity identifiers throughout the simulation.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw id string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper, returning the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

define_id!(
    /// Identifies a living entity in the world (agent or player).
    AgentId
);

define_id!(
    /// Identifies a location node in the world graph.
    LocationId
);

define_id!(
    /// Identifies an item blueprint (the catalog entry, not an instance).
    ItemBlueprintId
);

define_id!(
    /// Identifies a concrete item instance.
    ItemInstanceId
);

define_id!(
    /// Identifies an in-progress conversation. Synthesized at runtime as
    /// `convo_{speaker}_{tick}`, never authored on disk.
    ConversationId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_roundtrip_through_serde() {
        let id = AgentId::new("npc_bard");
        let json = serde_json::to_string(&id).expect("serializes");
        assert_eq!(json, "\"npc_bard\"");
        let back: AgentId = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, id);
    }

    #[test]
    fn ids_display_as_raw_string() {
        let id = LocationId::new("town_square");
        assert_eq!(id.to_string(), "town_square");
        assert_eq!(id.as_str(), "town_square");
    }

    #[test]
    fn distinct_id_types_do_not_compare() {
        let agent = AgentId::new("same");
        let location = LocationId::new("same");
        assert_eq!(agent.as_str(), location.as_str());
        // Distinctness is enforced at the type level, not by value.
    }

    #[test]
    fn ids_are_ord_for_deterministic_collections() {
        let mut ids = vec![AgentId::new("npc_c"), AgentId::new("npc_a"), AgentId::new("npc_b")];
        ids.sort();
        assert_eq!(
            ids,
            vec![AgentId::new("npc_a"), AgentId::new("npc_b"), AgentId::new("npc_c")]
        );
    }
}
