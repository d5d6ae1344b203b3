//! # Combat Resolver
//!
//! Damage application and the single death transition.

use crate::{ActorId, GameEvent, MessageImportance, WorldOutcome, WorldState};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Result of one attack or damage application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackOutcome {
    /// Damage landed and the defender survived
    Hit,
    /// Damage landed and the defender died
    Killed,
    /// The defender shrugged the damage off
    Blocked,
}

/// Resolves a strength-based attack.
///
/// The defender loses `attacker.strength` health, unless invulnerable.
pub fn attack(world: &mut WorldState, attacker: ActorId, defender: ActorId) -> AttackOutcome {
    let strength = world.actor(attacker).map(|actor| actor.strength).unwrap_or(0);
    apply_damage(world, Some(attacker), defender, strength)
}

/// Applies a fixed amount of damage, attributing it to `source` if any.
///
/// Health never drops below zero. At zero the defender dies exactly once:
/// it leaves the roster and the scheduler, and a player kill is tallied.
pub fn apply_damage(
    world: &mut WorldState,
    source: Option<ActorId>,
    defender: ActorId,
    amount: u32,
) -> AttackOutcome {
    let player_id = world.player_id();
    let source_name = source
        .and_then(|id| world.actor(id))
        .map(|actor| actor.name.clone());

    let Some(target) = world.actor_mut(defender) else {
        warn!("damage aimed at missing actor {}", defender);
        return AttackOutcome::Blocked;
    };

    let defender_name = target.name.clone();
    let defender_is_player = Some(defender) == player_id;

    if target.is_invulnerable() {
        world.push_event(GameEvent::ActorAttacked {
            attacker: source,
            defender,
            damage: 0,
            outcome: AttackOutcome::Blocked,
        });
        let text = if defender_is_player {
            "You shrug off the blow.".to_string()
        } else {
            format!("The {} shrugs off the blow.", defender_name)
        };
        world.emit(text, MessageImportance::Info);
        return AttackOutcome::Blocked;
    }

    target.health = target.health.saturating_sub(amount);
    let survived = target.is_alive();
    let outcome = if survived {
        AttackOutcome::Hit
    } else {
        AttackOutcome::Killed
    };
    debug!(
        "{} took {} damage from {:?}: {:?}",
        defender, amount, source, outcome
    );

    world.push_event(GameEvent::ActorAttacked {
        attacker: source,
        defender,
        damage: amount,
        outcome,
    });
    let text = match (source_name, defender_is_player) {
        (_, true) if source == player_id => format!("You take {} damage.", amount),
        (Some(attacker), true) => format!("The {} hits you for {}.", attacker, amount),
        (None, true) => format!("You take {} damage.", amount),
        (_, false) if source == player_id => format!("You hit the {}.", defender_name),
        (Some(attacker), false) => format!("The {} hits the {}.", attacker, defender_name),
        (None, false) => format!("The {} is hit.", defender_name),
    };
    world.emit(text, MessageImportance::Info);

    if !survived {
        kill(world, defender, source);
    }
    outcome
}

/// The death transition. Never re-entered: the victim is gone afterwards.
fn kill(world: &mut WorldState, victim: ActorId, killer: Option<ActorId>) {
    let player_id = world.player_id();
    let Some(dead) = world.remove_actor(victim) else {
        return;
    };
    debug!("{} ({}) died", victim, dead.species);

    world.push_event(GameEvent::ActorDied {
        actor: victim,
        species: dead.species,
        killer,
    });

    if Some(victim) == player_id {
        world.emit("You die...", MessageImportance::Critical);
        world.push_event(GameEvent::PlayerDied);
        world.halt(WorldOutcome::PlayerDied);
        return;
    }

    // Only hostiles count towards the tally; a bombed summon is not a defeat
    if killer.is_some() && killer == player_id && dead.species.is_hostile() {
        world.player_state.record_defeat(dead.species);
        world.emit(
            format!("You defeated the {}!", dead.name),
            MessageImportance::Notice,
        );
    } else {
        world.emit(format!("The {} dies.", dead.name), MessageImportance::Info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Actor, Level, PlayerState, Position, Species, StatusKind};
    use proptest::prelude::*;

    const ARENA: &str = "
#######
#.....#
#.....#
#######
";

    fn world_with_player() -> (WorldState, ActorId) {
        let mut world = WorldState::new(Level::from_ascii(1, ARENA).unwrap(), 7);
        let player = world
            .spawn_player(Actor::player("Hero", Position::new(1, 1)), PlayerState::new())
            .unwrap();
        (world, player)
    }

    #[test]
    fn test_hit_reduces_health_by_strength() {
        let (mut world, player) = world_with_player();
        let frog = world.spawn_actor(Species::MadFrog, Position::new(2, 1)).unwrap();

        assert_eq!(attack(&mut world, player, frog), AttackOutcome::Hit);
        assert_eq!(world.actor(frog).map(|a| a.health), Some(2));
    }

    #[test]
    fn test_kill_removes_actor_and_tallies() {
        let (mut world, player) = world_with_player();
        let rat = world.spawn_actor(Species::Rat, Position::new(2, 1)).unwrap();

        assert_eq!(attack(&mut world, player, rat), AttackOutcome::Killed);
        assert!(world.actor(rat).is_none());
        assert!(world.occupant_at(Position::new(2, 1)).is_none());
        assert!(!world.scheduler.contains(rat));
        assert_eq!(world.player_state.defeated.get("Rat"), Some(&1));

        // The dead never die twice
        assert_eq!(attack(&mut world, player, rat), AttackOutcome::Blocked);
        assert_eq!(world.player_state.enemies_defeated(), 1);
    }

    #[test]
    fn test_invulnerable_defender_blocks() {
        let (mut world, player) = world_with_player();
        let rat = world.spawn_actor(Species::Rat, Position::new(2, 1)).unwrap();
        if let Some(hero) = world.player_mut() {
            hero.status.apply(StatusKind::Invulnerable, 3);
        }

        assert_eq!(attack(&mut world, rat, player), AttackOutcome::Blocked);
        assert_eq!(world.player().map(|p| p.health), Some(5));
        assert!(world
            .events()
            .messages()
            .any(|text| text.contains("shrug off")));
    }

    #[test]
    fn test_kill_by_non_player_is_not_tallied() {
        let (mut world, _player) = world_with_player();
        let spirit = world.spawn_actor(Species::Spirit, Position::new(3, 1)).unwrap();
        let rat = world.spawn_actor(Species::Rat, Position::new(4, 1)).unwrap();

        assert_eq!(attack(&mut world, spirit, rat), AttackOutcome::Killed);
        assert_eq!(world.player_state.enemies_defeated(), 0);
    }

    #[test]
    fn test_player_death_halts_world() {
        let (mut world, player) = world_with_player();
        let pedro = world.spawn_actor(Species::Assassin, Position::new(2, 1)).unwrap();
        if let Some(hero) = world.player_mut() {
            hero.health = 1;
        }

        assert_eq!(attack(&mut world, pedro, player), AttackOutcome::Killed);
        assert_eq!(world.outcome(), WorldOutcome::PlayerDied);
        assert!(world.player().is_none());
        assert!(world.scheduler.is_empty());
        assert!(world.events().events().contains(&GameEvent::PlayerDied));
    }

    #[test]
    fn test_fixed_damage_ignores_strength() {
        let (mut world, player) = world_with_player();
        let frog = world.spawn_actor(Species::MadFrog, Position::new(4, 2)).unwrap();
        assert_eq!(
            apply_damage(&mut world, Some(player), frog, 3),
            AttackOutcome::Killed
        );
        assert_eq!(world.player_state.defeated.get("Mad Frog"), Some(&1));
    }

    proptest! {
        #[test]
        fn prop_health_after_attack(health in 1u32..20, strength in 0u32..25, shielded: bool) {
            let (mut world, _player) = world_with_player();
            let attacker = world.spawn_actor(Species::Rat, Position::new(2, 1)).unwrap();
            let defender = world.spawn_actor(Species::Frog, Position::new(3, 1)).unwrap();
            if let Some(actor) = world.actor_mut(attacker) {
                actor.strength = strength;
            }
            if let Some(actor) = world.actor_mut(defender) {
                actor.health = health;
                if shielded {
                    actor.status.apply(StatusKind::Invulnerable, 5);
                }
            }

            let outcome = attack(&mut world, attacker, defender);
            let expected = health.saturating_sub(strength);

            if shielded {
                prop_assert_eq!(outcome, AttackOutcome::Blocked);
                prop_assert_eq!(world.actor(defender).map(|a| a.health), Some(health));
            } else if expected == 0 {
                prop_assert_eq!(outcome, AttackOutcome::Killed);
                prop_assert!(world.actor(defender).is_none());
            } else {
                prop_assert_eq!(outcome, AttackOutcome::Hit);
                prop_assert_eq!(world.actor(defender).map(|a| a.health), Some(expected));
            }
        }
    }
}
