//! Turns an applied event into a human-readable line of text.
//!
//! `render` is a pure function: it never mutates `world` and never filters
//! by who is watching. Per-recipient filtering is [`crate::perception`]'s job.

use emergence_types::{Event, EventKind};
use emergence_world::WorldState;

fn agent_name(world: &WorldState, id: &emergence_types::AgentId) -> String {
    world
        .get_agent(id)
        .map_or_else(|_| id.as_str().to_owned(), |agent| agent.name.clone())
}

fn item_name(world: &WorldState, id: &emergence_types::ItemInstanceId) -> String {
    world
        .get_item_instance(id)
        .ok()
        .and_then(|instance| world.get_item_blueprint(&instance.blueprint_id).ok())
        .map_or_else(|| id.as_str().to_owned(), |blueprint| blueprint.name.clone())
}

fn location_label(world: &WorldState, id: &emergence_types::LocationId) -> String {
    world.get_location_static(id).map_or_else(
        |_| id.as_str().to_owned(),
        |location| {
            location
                .description
                .split('.')
                .next()
                .unwrap_or(&location.description)
                .trim()
                .chars()
                .take(60)
                .collect()
        },
    )
}

/// Render `event` to a human-readable line, or an empty string for event
/// kinds with no narration (e.g. `describe_location`, whose text is already
/// the location description itself).
#[must_use]
pub fn render(event: &Event, world: &WorldState) -> String {
    let Some(actor_id) = &event.actor_id else {
        return String::new();
    };
    let actor = agent_name(world, actor_id);

    match &event.kind {
        EventKind::Move { target_location } => {
            format!("{actor} moves to {}.", location_label(world, target_location))
        }
        EventKind::Grab { item } => format!("{actor} picks up {}.", item_name(world, item)),
        EventKind::Drop { item } => format!("{actor} drops {}.", item_name(world, item)),
        EventKind::Eat { item } => format!("{actor} eats {}.", item_name(world, item)),
        EventKind::DamageApplied { amount, cause } => {
            let hp = world.get_agent(actor_id).map_or(0, |agent| agent.hp);
            format!("{actor} takes {amount} {cause} damage (HP: {hp}).")
        }
        EventKind::Rest { healed } => format!("{actor} rests and recovers {healed} HP."),
        EventKind::Equip { item, slot } => {
            format!("{actor} equips {} to {slot}.", item_name(world, item))
        }
        EventKind::Unequip { slot } => format!("{actor} removes whatever was in {slot}."),
        EventKind::Give { item, receiver } => {
            format!(
                "{actor} gives {} to {}.",
                item_name(world, item),
                agent_name(world, receiver)
            )
        }
        EventKind::OpenConnection { neighbor } => {
            format!("{actor} opens the way to {}.", location_label(world, neighbor))
        }
        EventKind::CloseConnection { neighbor } => {
            format!("{actor} closes the way to {}.", location_label(world, neighbor))
        }
        EventKind::NpcDied => format!("{actor} dies."),
        EventKind::Reason { .. } | EventKind::Reflect { .. } => String::new(),
        EventKind::AttackAttempt { target } => {
            format!("{actor} attacks {}.", agent_name(world, target))
        }
        EventKind::AttackHit {
            target,
            to_hit,
            target_ac,
            ..
        } => format!(
            "{actor} hits {} (roll {to_hit} vs AC {target_ac}).",
            agent_name(world, target)
        ),
        EventKind::AttackMissed {
            target,
            to_hit,
            target_ac,
        } => format!(
            "{actor} misses {} (roll {to_hit} vs AC {target_ac}).",
            agent_name(world, target)
        ),
        EventKind::Talk { target_id, content } => target_id.as_ref().map_or_else(
            || format!("{actor} says: {content}"),
            |target| format!("{actor} to {}: {content}", agent_name(world, target)),
        ),
        EventKind::TalkLoud { content } => format!("{actor} shouts: {content}"),
        EventKind::Scream { content } => format!("{actor} screams: {content}"),
        EventKind::Interject { content, .. } => format!("{actor} interjects: {content}"),
        EventKind::LeaveConversation => format!("{actor} leaves the conversation."),
        EventKind::Inventory => {
            let names: Vec<String> = world
                .get_agent(actor_id)
                .map(|agent| agent.inventory.iter().map(|item| item_name(world, item)).collect())
                .unwrap_or_default();
            if names.is_empty() {
                format!("{actor} carries nothing.")
            } else {
                format!("{actor} carries: {}.", names.join(", "))
            }
        }
        EventKind::Stats => {
            world.get_agent(actor_id).map_or_else(
                || format!("{actor} stats unavailable."),
                |agent| format!("{actor} stats - HP: {}.", agent.hp),
            )
        }
        EventKind::Look => format!("{actor} looks around."),
        EventKind::Analyze { item } => format!("{actor} examines {item}."),
        EventKind::DescribeLocation | EventKind::Wait => String::new(),
        EventKind::ToggleStarvation { enabled } => {
            if *enabled {
                "Starvation enabled.".to_owned()
            } else {
                "Starvation disabled.".to_owned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use emergence_types::{Agent, AgentId, Attributes, HungerStage};
    use std::collections::{BTreeMap, BTreeSet};

    use super::*;

    fn agent(id: &str, name: &str) -> Agent {
        Agent {
            id: AgentId::new(id),
            name: name.to_owned(),
            hp: 10,
            inventory: Vec::new(),
            slots: BTreeMap::new(),
            attributes: Attributes::default(),
            skills: BTreeMap::new(),
            relationships: BTreeMap::new(),
            inherent_tags: BTreeSet::new(),
            dynamic_tags: BTreeSet::new(),
            memories: Vec::new(),
            core_memories: Vec::new(),
            goals: Vec::new(),
            short_term_memory: Vec::new(),
            next_available_tick: 0,
            last_meal_tick: 0,
            hunger_stage: HungerStage::Sated,
        }
    }

    #[test]
    fn renders_a_directed_talk_line() {
        let mut world = WorldState::new();
        world.agents.insert(AgentId::new("npc_sample"), agent("npc_sample", "Sample"));
        world.agents.insert(AgentId::new("npc_bard"), agent("npc_bard", "Bard"));
        let event = Event::new(
            EventKind::Talk {
                target_id: Some(AgentId::new("npc_bard")),
                content: "well met".to_owned(),
            },
            1,
            Some(AgentId::new("npc_sample")),
        );
        assert_eq!(render(&event, &world), "Sample to Bard: well met");
    }

    #[test]
    fn renders_empty_for_wait_and_describe_location() {
        let mut world = WorldState::new();
        world.agents.insert(AgentId::new("npc_sample"), agent("npc_sample", "Sample"));
        let wait = Event::new(EventKind::Wait, 1, Some(AgentId::new("npc_sample")));
        assert_eq!(render(&wait, &world), "");
        let describe = Event::new(EventKind::DescribeLocation, 1, Some(AgentId::new("npc_sample")));
        assert_eq!(render(&describe, &world), "");
    }

    #[test]
    fn renders_npc_died() {
        let mut world = WorldState::new();
        world.agents.insert(AgentId::new("npc_sample"), agent("npc_sample", "Sample"));
        let event = Event::new(EventKind::NpcDied, 5, Some(AgentId::new("npc_sample")));
        assert_eq!(render(&event, &world), "Sample dies.");
    }
}
