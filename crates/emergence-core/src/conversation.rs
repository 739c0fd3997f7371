//! The conversation state machine: membership, turn order, and dissolution.
//!
//! World state itself never mutates on `talk`/`interject`/`leave_conversation`
//! events (`emergence-world` leaves them as no-ops); this store is where
//! those events actually take effect. It holds no reference to `WorldState`
//! so the scheduler decides co-location and GC eligibility and passes the
//! answer in, keeping this module a plain, independently testable state
//! machine.

use std::collections::{BTreeMap, VecDeque};

use emergence_types::{AgentId, Conversation, ConversationId, ConversationLine, LocationId};

/// A conversation dissolves once fewer than two participants remain, or once
/// no next speaker can be found.
const MIN_PARTICIPANTS: usize = 2;

/// How long, in ticks, a conversation survives without a new line before
/// garbage collection removes it.
pub const IDLE_TIMEOUT_TICKS: u64 = 300;

/// What happened to a `talk` event once the state machine examined it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TalkOutcome {
    /// A new conversation was started.
    Started(ConversationId),
    /// An existing conversation received a line and the turn advanced.
    Continued(ConversationId),
    /// No conversation exists and none was started; narrate as standalone speech.
    Standalone,
    /// The speaker holds the floor in no conversation they're allowed to speak in.
    Ignored,
}

/// Owns every live conversation and the actor -> conversation membership
/// index that keeps the "an agent is in at most one conversation" invariant.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    conversations: BTreeMap<ConversationId, Conversation>,
    membership: BTreeMap<AgentId, ConversationId>,
    next_seq: u64,
}

impl ConversationStore {
    /// An empty conversation store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The conversation an agent currently participates in, if any.
    #[must_use]
    pub fn conversation_for(&self, actor: &AgentId) -> Option<&Conversation> {
        self.membership.get(actor).and_then(|id| self.conversations.get(id))
    }

    /// Look up a conversation by id.
    #[must_use]
    pub fn get(&self, id: &ConversationId) -> Option<&Conversation> {
        self.conversations.get(id)
    }

    fn fresh_id(&mut self, tick: u64) -> ConversationId {
        let seq = self.next_seq;
        self.next_seq += 1;
        ConversationId::new(format!("conv_{tick}_{seq}"))
    }

    /// Apply a `talk` event to the state machine.
    ///
    /// `target` must already be known to be co-located with `speaker`
    /// (the tool layer validates that); this only decides what the
    /// conversation machinery does with it.
    pub fn handle_talk(
        &mut self,
        speaker: &AgentId,
        target: Option<&AgentId>,
        content: &str,
        tick: u64,
        location_id: &LocationId,
    ) -> TalkOutcome {
        if let Some(conv_id) = self.membership.get(speaker).cloned() {
            let Some(conv) = self.conversations.get_mut(&conv_id) else {
                return TalkOutcome::Ignored;
            };
            if conv.current_speaker.as_ref() != Some(speaker) {
                return TalkOutcome::Ignored;
            }
            conv.history.push(ConversationLine {
                speaker: speaker.clone(),
                tick,
                content: content.to_owned(),
            });
            conv.last_interaction_tick = tick;
            self.advance_turn(&conv_id, target);
            return TalkOutcome::Continued(conv_id);
        }

        let Some(target) = target else {
            return TalkOutcome::Standalone;
        };

        let id = self.fresh_id(tick);
        let conversation = Conversation {
            id: id.clone(),
            participants: vec![speaker.clone(), target.clone()],
            turn_order: VecDeque::from([target.clone()]),
            current_speaker: Some(speaker.clone()),
            start_tick: tick,
            last_interaction_tick: tick,
            history: vec![ConversationLine {
                speaker: speaker.clone(),
                tick,
                content: content.to_owned(),
            }],
            location_id: location_id.clone(),
        };
        self.conversations.insert(id.clone(), conversation);
        self.membership.insert(speaker.clone(), id.clone());
        self.membership.insert(target.clone(), id.clone());
        self.advance_turn(&id, Some(target));
        TalkOutcome::Started(id)
    }

    /// Apply an `interject` event. Returns `false` if the conversation does
    /// not exist or the speaker is not co-located with it.
    pub fn handle_interject(
        &mut self,
        conversation_id: &ConversationId,
        speaker: &AgentId,
        content: &str,
        tick: u64,
        speaker_colocated: bool,
        hint_target: Option<&AgentId>,
    ) -> bool {
        if !speaker_colocated {
            return false;
        }
        let Some(conv) = self.conversations.get_mut(conversation_id) else {
            return false;
        };

        if !conv.participants.contains(speaker) {
            conv.participants.push(speaker.clone());
            conv.turn_order.push_back(speaker.clone());
            self.membership.insert(speaker.clone(), conversation_id.clone());
        }

        let Some(conv) = self.conversations.get_mut(conversation_id) else {
            return false;
        };
        let was_current = conv.current_speaker.as_ref() == Some(speaker);
        conv.history.push(ConversationLine {
            speaker: speaker.clone(),
            tick,
            content: content.to_owned(),
        });
        conv.last_interaction_tick = tick;

        if was_current {
            self.advance_turn(conversation_id, hint_target);
        } else {
            self.maybe_dissolve(conversation_id);
        }
        true
    }

    /// Apply a `leave_conversation` event for `actor`. A no-op if the actor
    /// is not currently in a conversation.
    pub fn handle_leave(&mut self, actor: &AgentId) {
        let Some(conv_id) = self.membership.remove(actor) else {
            return;
        };
        let Some(conv) = self.conversations.get_mut(&conv_id) else {
            return;
        };
        conv.participants.retain(|id| id != actor);
        conv.turn_order.retain(|id| id != actor);
        if conv.current_speaker.as_ref() == Some(actor) {
            conv.current_speaker = conv.turn_order.pop_front();
        }
        self.maybe_dissolve(&conv_id);
    }

    /// Drop every conversation idle longer than [`IDLE_TIMEOUT_TICKS`], or
    /// with fewer than two participants still co-located with its location.
    /// `is_colocated` reports whether an agent currently occupies a location.
    pub fn garbage_collect(
        &mut self,
        tick: u64,
        mut is_colocated: impl FnMut(&AgentId, &LocationId) -> bool,
    ) {
        let stale: Vec<ConversationId> = self
            .conversations
            .values()
            .filter(|conv| {
                let idle = tick.saturating_sub(conv.last_interaction_tick) > IDLE_TIMEOUT_TICKS;
                let present = conv
                    .participants
                    .iter()
                    .filter(|id| is_colocated(id, &conv.location_id))
                    .count();
                idle || present < MIN_PARTICIPANTS
            })
            .map(|conv| conv.id.clone())
            .collect();
        for id in stale {
            self.dissolve(&id);
        }
    }

    fn advance_turn(&mut self, conv_id: &ConversationId, hint_target: Option<&AgentId>) {
        let Some(conv) = self.conversations.get_mut(conv_id) else {
            return;
        };
        let current = conv.current_speaker.clone();
        let participants = conv.participants.clone();

        conv.turn_order
            .retain(|id| Some(id) != current.as_ref() && participants.contains(id));

        if let Some(hint) = hint_target {
            if participants.contains(hint) && Some(hint) != current.as_ref() {
                conv.turn_order.retain(|id| id != hint);
                conv.turn_order.push_front(hint.clone());
            }
        }

        if let Some(prev) = current {
            conv.turn_order.push_back(prev);
        }
        conv.current_speaker = conv.turn_order.pop_front();
        self.maybe_dissolve(conv_id);
    }

    fn maybe_dissolve(&mut self, conv_id: &ConversationId) {
        let should_dissolve = self
            .conversations
            .get(conv_id)
            .is_some_and(|conv| conv.participants.len() < MIN_PARTICIPANTS || conv.current_speaker.is_none());
        if should_dissolve {
            self.dissolve(conv_id);
        }
    }

    fn dissolve(&mut self, conv_id: &ConversationId) {
        let Some(conv) = self.conversations.remove(conv_id) else {
            return;
        };
        for participant in &conv.participants {
            self.membership.remove(participant);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(name: &str) -> AgentId {
        AgentId::new(name)
    }

    #[test]
    fn talk_with_target_starts_a_conversation_and_hands_off_the_floor() {
        let mut store = ConversationStore::new();
        let location = LocationId::new("town_square");
        let speaker = agent("npc_sample");
        let target = agent("npc_bard");

        let outcome = store.handle_talk(&speaker, Some(&target), "hello", 10, &location);
        let TalkOutcome::Started(id) = outcome else {
            panic!("expected a new conversation");
        };
        let conv = store.get(&id).expect("conversation exists");
        assert_eq!(conv.current_speaker, Some(target.clone()));
        assert_eq!(conv.turn_order, VecDeque::from([speaker.clone()]));
        assert_eq!(conv.participants, vec![speaker.clone(), target.clone()]);

        let outcome = store.handle_talk(&target, None, "well met", 11, &location);
        let TalkOutcome::Continued(id2) = outcome else {
            panic!("expected continuation");
        };
        assert_eq!(id2, id);
        let conv = store.get(&id).expect("conversation still exists");
        assert_eq!(conv.current_speaker, Some(speaker));
    }

    #[test]
    fn talk_with_no_target_and_no_conversation_is_standalone() {
        let mut store = ConversationStore::new();
        let location = LocationId::new("town_square");
        let speaker = agent("npc_sample");
        assert_eq!(
            store.handle_talk(&speaker, None, "hello?", 1, &location),
            TalkOutcome::Standalone
        );
    }

    #[test]
    fn talk_out_of_turn_is_ignored() {
        let mut store = ConversationStore::new();
        let location = LocationId::new("town_square");
        let speaker = agent("npc_sample");
        let target = agent("npc_bard");
        store.handle_talk(&speaker, Some(&target), "hi", 1, &location);

        // speaker is no longer current_speaker after starting the conversation
        assert_eq!(
            store.handle_talk(&speaker, None, "again", 2, &location),
            TalkOutcome::Ignored
        );
    }

    #[test]
    fn leave_conversation_dissolves_once_below_two_participants() {
        let mut store = ConversationStore::new();
        let location = LocationId::new("town_square");
        let speaker = agent("npc_sample");
        let target = agent("npc_bard");
        let TalkOutcome::Started(id) = store.handle_talk(&speaker, Some(&target), "hi", 1, &location) else {
            panic!("expected start");
        };

        store.handle_leave(&target);
        assert!(store.get(&id).is_none());
        assert!(store.conversation_for(&speaker).is_none());
    }

    #[test]
    fn garbage_collection_drops_idle_conversations() {
        let mut store = ConversationStore::new();
        let location = LocationId::new("town_square");
        let speaker = agent("npc_sample");
        let target = agent("npc_bard");
        let TalkOutcome::Started(id) = store.handle_talk(&speaker, Some(&target), "hi", 1, &location) else {
            panic!("expected start");
        };

        store.garbage_collect(302, |_, _| true);
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn interjection_joins_without_advancing_unless_already_current_speaker() {
        let mut store = ConversationStore::new();
        let location = LocationId::new("town_square");
        let speaker = agent("npc_sample");
        let target = agent("npc_bard");
        let interjector = agent("npc_stranger");
        let TalkOutcome::Started(id) = store.handle_talk(&speaker, Some(&target), "hi", 1, &location) else {
            panic!("expected start");
        };
        // current_speaker is now `target`; interjector is not current, turn must not advance
        let joined = store.handle_interject(&id, &interjector, "excuse me", 2, true, None);
        assert!(joined);
        let conv = store.get(&id).expect("still alive");
        assert_eq!(conv.current_speaker, Some(target));
        assert!(conv.participants.contains(&interjector));
    }
}
