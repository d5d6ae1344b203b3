//! # Enemy Decision Engine
//!
//! One strategy per species, run synchronously when a non-player actor's
//! turn comes up. Every strategy treats the player and all other living
//! actors as occupying their cells; only the player is ever attacked by
//! hostiles.

use crate::{
    combat, find_path, Actor, ActorId, Direction, Faction, Position, Strategy, WorldState,
};
use log::{debug, warn};
use rand::seq::SliceRandom;

/// What happened when a single candidate direction was tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    Attacked,
    Moved,
    Blocked,
}

impl StepResult {
    fn succeeded(self) -> bool {
        !matches!(self, StepResult::Blocked)
    }
}

/// Runs one turn for a non-player actor.
pub fn take_turn(world: &mut WorldState, actor_id: ActorId) {
    let Some(strategy) = world.actor(actor_id).map(|actor| actor.species.strategy()) else {
        return;
    };

    match strategy {
        Strategy::Stationary => {}
        Strategy::RandomHop => random_move(world, actor_id, 2),
        Strategy::RandomStep => random_move(world, actor_id, 1),
        Strategy::ChaseHop => chase(world, actor_id, 2),
        Strategy::ChaseStep => chase(world, actor_id, 1),
        Strategy::Pathfinding => pursue(world, actor_id),
        Strategy::Hunter => hunt(world, actor_id),
        Strategy::PlayerControlled => {
            warn!("decision engine asked to act for player-controlled {}", actor_id);
        }
    }
}

/// Tries to move or attack `distance` cells in one direction.
///
/// Cells between the actor and the destination need passable terrain; a
/// hop clears whoever stands on them. The player at the destination is
/// attacked; any other actor there blocks.
pub fn try_direction(
    world: &mut WorldState,
    actor_id: ActorId,
    direction: Direction,
    distance: i32,
) -> StepResult {
    let Some(from) = world.actor(actor_id).map(|actor| actor.position) else {
        return StepResult::Blocked;
    };

    if (1..distance).any(|step| !world.is_passable(from.step(direction, step))) {
        return StepResult::Blocked;
    }

    let destination = from.step(direction, distance);
    if !world.is_passable(destination) {
        return StepResult::Blocked;
    }

    match world.occupant_at(destination) {
        Some(occupant) if Some(occupant) == world.player_id() => {
            combat::attack(world, actor_id, occupant);
            StepResult::Attacked
        }
        Some(_) => StepResult::Blocked,
        None => match world.move_actor(actor_id, destination) {
            Ok(()) => StepResult::Moved,
            Err(_) => StepResult::Blocked,
        },
    }
}

/// Random hop/step: shuffled directions, first success wins, otherwise
/// the turn is skipped.
fn random_move(world: &mut WorldState, actor_id: ActorId, distance: i32) {
    let mut candidates = Direction::ALL.to_vec();
    candidates.shuffle(world.rng_mut());

    for direction in candidates {
        if try_direction(world, actor_id, direction, distance).succeeded() {
            return;
        }
    }
    debug!("{} found no open direction and waits", actor_id);
}

/// Greedy chase: the direction that lands closest to the player first,
/// then the remaining three in random order.
fn chase(world: &mut WorldState, actor_id: ActorId, distance: i32) {
    let (Some(from), Some(target)) = (
        world.actor(actor_id).map(|actor| actor.position),
        world.player().map(|player| player.position),
    ) else {
        return;
    };

    let best = best_direction(from, target, distance);
    if try_direction(world, actor_id, best, distance).succeeded() {
        return;
    }

    let mut remaining: Vec<Direction> = Direction::ALL
        .iter()
        .copied()
        .filter(|direction| *direction != best)
        .collect();
    remaining.shuffle(world.rng_mut());

    for direction in remaining {
        if try_direction(world, actor_id, direction, distance).succeeded() {
            return;
        }
    }
    debug!("{} is boxed in and waits", actor_id);
}

/// The direction whose destination is nearest `target` by Manhattan
/// distance. Ties go to the earliest direction in [`Direction::ALL`].
pub fn best_direction(from: Position, target: Position, distance: i32) -> Direction {
    let mut best = Direction::ALL[0];
    let mut best_distance = u32::MAX;
    for direction in Direction::ALL {
        let candidate = from.step(direction, distance).manhattan_distance(target);
        if candidate < best_distance {
            best = direction;
            best_distance = candidate;
        }
    }
    best
}

/// Full-path pursuit, recomputed every turn.
fn pursue(world: &mut WorldState, actor_id: ActorId) {
    let (Some(from), Some(player)) = (
        world.actor(actor_id).map(|actor| actor.position),
        world.player().map(|player| (player.id, player.position)),
    ) else {
        return;
    };
    let (player_id, target) = player;

    let Some(path) = find_path(&world.level, from, target) else {
        warn!("{} has no path to the player", actor_id);
        return;
    };

    match path.get(1..).unwrap_or_default() {
        [] => debug!("{} already stands on its target", actor_id),
        [_] => {
            combat::attack(world, actor_id, player_id);
        }
        [next, ..] => {
            if world.move_actor(actor_id, *next).is_err() {
                debug!("{} is blocked at {}", actor_id, next);
            }
        }
    }
}

/// Friendly hunter: attack an adjacent hostile, otherwise step toward the
/// nearest one.
fn hunt(world: &mut WorldState, actor_id: ActorId) {
    let Some(from) = world.actor(actor_id).map(|actor| actor.position) else {
        return;
    };

    let Some((prey_id, prey_position)) = nearest_hostile(world, from) else {
        return;
    };

    if from.manhattan_distance(prey_position) == 1 {
        combat::attack(world, actor_id, prey_id);
        return;
    }

    let mut options: Vec<(u32, Direction)> = Direction::ALL
        .iter()
        .map(|direction| (from.step(*direction, 1).manhattan_distance(prey_position), *direction))
        .collect();
    options.sort_by_key(|(distance, _)| *distance);

    for (_, direction) in options {
        let next = from.step(direction, 1);
        if world.is_free(next) && world.move_actor(actor_id, next).is_ok() {
            return;
        }
    }
}

fn nearest_hostile(world: &WorldState, from: Position) -> Option<(ActorId, Position)> {
    world
        .actors()
        .into_iter()
        .filter(|actor| actor.faction() == Faction::Hostile)
        .min_by_key(|actor: &&Actor| from.manhattan_distance(actor.position))
        .map(|actor| (actor.id, actor.position))
}
