//! Integration scenarios for turn order, combat, items and status effects.

use delve::{
    take_turn, try_direction, use_inventory_item, Actor, ActorId, CommandOutcome, DelveResult,
    Direction, GameEvent, Item, ItemKind, ItemUseOutcome, Level, PlayerCommand, PlayerState,
    Position, Species, StatusKind, StepResult, WorldOutcome, WorldState,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const ARENA: &str = "
########################
#......................#
#......................#
#......................#
#......................#
#......................#
#......................#
#......................#
#......................#
#......................#
#......................#
#......................#
#......................#
#......................#
########################
";

fn arena_with_player(at: Position) -> DelveResult<(WorldState, ActorId)> {
    let mut world = WorldState::new(Level::from_ascii(1, ARENA)?, 31337);
    let player = world.spawn_player(Actor::player("Tester", at), PlayerState::new())?;
    world.run();
    Ok((world, player))
}

fn player_health(world: &WorldState) -> Option<u32> {
    world.player().map(|player| player.health)
}

/// First seed whose shuffle of the four directions leads with `first`.
fn seed_shuffling_first(first: Direction) -> u64 {
    (0u64..)
        .find(|seed| {
            let mut directions = Direction::ALL.to_vec();
            directions.shuffle(&mut StdRng::seed_from_u64(*seed));
            directions[0] == first
        })
        .unwrap_or_default()
}

#[test]
fn test_rat_trying_right_attacks_player() -> DelveResult<()> {
    let (mut world, _) = arena_with_player(Position::new(6, 5))?;
    let rat = world.spawn_actor(Species::Rat, Position::new(5, 5))?;

    let result = try_direction(&mut world, rat, Direction::Right, 1);

    assert_eq!(result, StepResult::Attacked);
    assert_eq!(player_health(&world), Some(4));
    assert_eq!(world.actor(rat).map(|a| a.position), Some(Position::new(5, 5)));
    Ok(())
}

#[test]
fn test_random_step_follows_the_seeded_shuffle() -> DelveResult<()> {
    let (mut world, _) = arena_with_player(Position::new(6, 5))?;
    let rat = world.spawn_actor(Species::Rat, Position::new(5, 5))?;

    // Right first: the rat attacks instead of moving
    world.reseed(seed_shuffling_first(Direction::Right));
    take_turn(&mut world, rat);
    assert_eq!(player_health(&world), Some(4));
    assert_eq!(world.actor(rat).map(|a| a.position), Some(Position::new(5, 5)));

    // Left first: the rat walks away and the player is untouched
    world.reseed(seed_shuffling_first(Direction::Left));
    take_turn(&mut world, rat);
    assert_eq!(player_health(&world), Some(4));
    assert_eq!(world.actor(rat).map(|a| a.position), Some(Position::new(4, 5)));
    Ok(())
}

#[test]
fn test_health_potion_restores_full_health() -> DelveResult<()> {
    let (mut world, _) = arena_with_player(Position::new(3, 3))?;
    let slot = world
        .player_state
        .inventory
        .add(Item::new(ItemKind::HealthPotion))
        .map_err(|_| delve::DelveError::InvalidState("inventory full".to_string()))?;
    assert_eq!(slot, 0);
    if let Some(player) = world.player_mut() {
        player.health = 2;
    }

    let outcome = use_inventory_item(&mut world, 0);

    assert_eq!(outcome, ItemUseOutcome::Used(ItemKind::HealthPotion));
    assert_eq!(player_health(&world), Some(5));
    assert!(world.player_state.inventory.get(0).is_none());
    assert_eq!(world.player_state.inventory.slots().len(), 6);
    Ok(())
}

#[test]
fn test_bomb_kills_enemy_in_radius() -> DelveResult<()> {
    let (mut world, _) = arena_with_player(Position::new(10, 10))?;
    let enemy = world.spawn_actor(Species::Rat, Position::new(12, 10))?;
    world
        .player_state
        .inventory
        .add(Item::new(ItemKind::Bomb))
        .map_err(|_| delve::DelveError::InvalidState("inventory full".to_string()))?;

    let outcome = world.submit(PlayerCommand::UseItem(0));

    assert_eq!(outcome, CommandOutcome::Performed);
    assert!(world.actor(enemy).is_none());
    assert!(!world.scheduler.contains(enemy));
    assert_eq!(world.player_state.defeated.get("Rat"), Some(&1));
    assert_eq!(world.score_snapshot().enemies_defeated, 1);
    Ok(())
}

#[test]
fn test_exit_needs_three_keys() -> DelveResult<()> {
    let (mut world, _) = arena_with_player(Position::new(4, 4))?;
    let exit = Position::new(5, 4);
    world.place_item(exit, Item::new(ItemKind::Exit))?;
    world.player_state.keys = 2;

    assert!(world.submit(PlayerCommand::Move(Direction::Right)).is_performed());
    assert_eq!(world.outcome(), WorldOutcome::InProgress);
    assert_eq!(world.item_at(exit).map(|item| item.kind), Some(ItemKind::Exit));
    assert!(world
        .events()
        .messages()
        .any(|text| text.contains("1 more key")));

    // Step off and back on with the last key in hand
    world.player_state.keys = 3;
    assert!(world.submit(PlayerCommand::Move(Direction::Left)).is_performed());
    assert!(world.submit(PlayerCommand::Move(Direction::Right)).is_performed());
    assert_eq!(world.outcome(), WorldOutcome::LevelComplete);
    assert!(world
        .events()
        .events()
        .contains(&GameEvent::LevelCompleted { depth: 1 }));
    assert_eq!(world.item_at(exit).map(|item| item.kind), Some(ItemKind::Exit));
    Ok(())
}

#[test]
fn test_adjacent_assassin_attacks_instead_of_moving() -> DelveResult<()> {
    let (mut world, _) = arena_with_player(Position::new(8, 8))?;
    let pedro = world.spawn_actor(Species::Assassin, Position::new(8, 9))?;

    take_turn(&mut world, pedro);

    assert_eq!(world.actor(pedro).map(|a| a.position), Some(Position::new(8, 9)));
    assert_eq!(player_health(&world), Some(3));
    Ok(())
}

#[test]
fn test_haste_lasts_sixty_own_turns() -> DelveResult<()> {
    let (mut world, _) = arena_with_player(Position::new(2, 2))?;
    // Other actors take turns too; they must not shorten the effect
    world.spawn_actor(Species::Snail, Position::new(20, 12))?;
    world.spawn_actor(Species::Snail, Position::new(19, 12))?;
    if let Some(player) = world.player_mut() {
        player.status.apply(StatusKind::Hasted, 60);
    }

    for _ in 0..59 {
        assert!(world.submit(PlayerCommand::Wait).is_performed());
    }
    let player = world.player().map(|p| (p.speed(), p.status.remaining(StatusKind::Hasted)));
    assert_eq!(player, Some((200, Some(1))));

    assert!(world.submit(PlayerCommand::Wait).is_performed());
    let player = world.player().map(|p| (p.speed(), p.status.is_active(StatusKind::Hasted)));
    assert_eq!(player, Some((100, false)));
    assert!(world
        .events()
        .messages()
        .any(|text| text.contains("wears off")));
    Ok(())
}

#[test]
fn test_invulnerable_player_shrugs_off_attacks() -> DelveResult<()> {
    let (mut world, player) = arena_with_player(Position::new(6, 5))?;
    let rat = world.spawn_actor(Species::MadRat, Position::new(5, 5))?;
    if let Some(hero) = world.player_mut() {
        hero.status.apply(StatusKind::Invulnerable, 30);
    }

    for _ in 0..5 {
        world.submit(PlayerCommand::Wait);
    }

    assert_eq!(player_health(&world), Some(5));
    assert!(world.is_alive(player));
    assert!(world.is_alive(rat));
    Ok(())
}

#[test]
fn test_player_death_ends_the_world() -> DelveResult<()> {
    let (mut world, player) = arena_with_player(Position::new(6, 5))?;
    world.spawn_actor(Species::Assassin, Position::new(7, 5))?;

    for _ in 0..3 {
        world.submit(PlayerCommand::Wait);
    }

    assert_eq!(world.outcome(), WorldOutcome::PlayerDied);
    assert!(!world.is_alive(player));
    assert!(world.scheduler.is_empty());
    assert_eq!(
        world.submit(PlayerCommand::Wait),
        CommandOutcome::Rejected(delve::RejectReason::NotPlayersTurn)
    );
    let score = world.score_snapshot();
    assert_eq!(score.turns, 3);
    Ok(())
}
