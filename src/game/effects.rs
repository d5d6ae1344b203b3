//! # Item Effects
//!
//! What items do. Held items run a use-effect when the player uses their
//! slot; instant items run an interact-effect when the player steps on
//! them. Declined effects leave the world unchanged and explain why.

use crate::{
    combat, config, GameEvent, Item, ItemKind, MessageImportance, Position, Species, StatusKind,
    WorldOutcome, WorldState,
};
use log::debug;
use serde::{Deserialize, Serialize};

/// Why an item could not be used right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclineReason {
    /// Healing at full health
    AlreadyFullHealth,
    /// No free cell near the player for a summon
    NoRoomToSummon,
    /// Inventory already at its hard cap
    CapacityAtMaximum,
    /// Exit reached without every key
    MissingKeys,
    /// This item is not used from the inventory
    NotUsable,
}

/// Result of using an inventory slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemUseOutcome {
    /// The effect ran and the slot was emptied
    Used(ItemKind),
    /// The slot index is beyond the inventory
    InvalidSlot,
    /// The slot holds nothing
    EmptySlot,
    /// The effect declined; the item is back in its slot
    Declined(DeclineReason),
}

/// Result of the player touching the item on their cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractOutcome {
    Nothing,
    PickedUp { kind: ItemKind, slot: usize },
    InventoryFull(ItemKind),
    Triggered(ItemKind),
    Declined(ItemKind, DeclineReason),
}

/// Uses the item in an inventory slot.
///
/// The slot is emptied before the effect runs; a declined effect puts the
/// item straight back.
pub fn use_inventory_item(world: &mut WorldState, slot: usize) -> ItemUseOutcome {
    if slot >= world.player_state.inventory.capacity() {
        return ItemUseOutcome::InvalidSlot;
    }
    let Some(item) = world.player_state.inventory.take(slot) else {
        return ItemUseOutcome::EmptySlot;
    };

    match apply_use_effect(world, item.kind) {
        Ok(()) => {
            world.push_event(GameEvent::ItemUsed { item: item.kind });
            ItemUseOutcome::Used(item.kind)
        }
        Err(reason) => {
            if world.player_state.inventory.restore(slot, item).is_err() {
                debug!("slot {} was refilled during a declined use", slot);
            }
            ItemUseOutcome::Declined(reason)
        }
    }
}

fn apply_use_effect(world: &mut WorldState, kind: ItemKind) -> Result<(), DeclineReason> {
    let Some((player_id, center, at_full_health)) = world
        .player()
        .map(|player| (player.id, player.position, player.is_at_full_health()))
    else {
        return Err(DeclineReason::NotUsable);
    };

    match kind {
        ItemKind::HealthPotion => {
            if at_full_health {
                world.emit("You are already at full health.", MessageImportance::Info);
                return Err(DeclineReason::AlreadyFullHealth);
            }
            if let Some(player) = world.player_mut() {
                player.heal_to_full();
            }
            world.emit("You feel fully restored.", MessageImportance::Notice);
        }
        ItemKind::Bomb => {
            world.emit("The bomb explodes!", MessageImportance::Warning);
            let targets: Vec<_> = world
                .actors()
                .into_iter()
                .filter(|actor| actor.id != player_id)
                .filter(|actor| actor.position.chebyshev_distance(center) <= config::BOMB_RADIUS)
                .map(|actor| actor.id)
                .collect();
            for target in targets {
                combat::apply_damage(world, Some(player_id), target, config::BOMB_DAMAGE);
            }
        }
        ItemKind::InvulnerabilityPotion => {
            grant_status(world, StatusKind::Invulnerable);
            world.emit("Your skin hardens like stone.", MessageImportance::Notice);
        }
        ItemKind::SpeedPotion => {
            grant_status(world, StatusKind::Hasted);
            world.emit("You feel quick on your feet.", MessageImportance::Notice);
        }
        ItemKind::SummonScroll => {
            let Some(cell) = find_summon_cell(world, center) else {
                world.emit("There is no room for a summon here.", MessageImportance::Info);
                return Err(DeclineReason::NoRoomToSummon);
            };
            if world.spawn_actor(Species::Spirit, cell).is_err() {
                return Err(DeclineReason::NoRoomToSummon);
            }
            world.emit("A friendly spirit answers your call.", MessageImportance::Notice);
        }
        ItemKind::MapScroll => {
            let revealed = world.level.reveal_all();
            debug!("map revealed {} cells", revealed.len());
            world.push_event(GameEvent::FullRedraw);
            world.emit("The layout of the level is revealed.", MessageImportance::Notice);
        }
        ItemKind::Exit | ItemKind::Key | ItemKind::Coin | ItemKind::Heart | ItemKind::Belt => {
            return Err(DeclineReason::NotUsable);
        }
    }
    Ok(())
}

fn grant_status(world: &mut WorldState, kind: StatusKind) {
    if let Some(player) = world.player_mut() {
        player.status.apply(kind, kind.default_duration());
    }
}

/// Nearest free cell around `center`, searching square rings outward.
pub fn find_summon_cell(world: &WorldState, center: Position) -> Option<Position> {
    (1..=config::SUMMON_SEARCH_RADIUS)
        .flat_map(|radius| center.ring(radius))
        .find(|pos| world.is_free(*pos))
}

/// Handles the item on the player's cell.
///
/// Held items are picked up (or left with a message when the inventory is
/// full); instant items fire their effect.
pub fn interact(world: &mut WorldState, position: Position) -> InteractOutcome {
    let Some(kind) = world.item_at(position).map(|item| item.kind) else {
        return InteractOutcome::Nothing;
    };

    if kind.is_pickupable() {
        return pick_up(world, position, kind);
    }

    match trigger_instant(world, position, kind) {
        Ok(()) => InteractOutcome::Triggered(kind),
        Err(reason) => InteractOutcome::Declined(kind, reason),
    }
}

fn pick_up(world: &mut WorldState, position: Position, kind: ItemKind) -> InteractOutcome {
    if world.player_state.inventory.is_full() {
        world.emit(
            format!("Your inventory is full; you leave the {} behind.", kind.name()),
            MessageImportance::Warning,
        );
        return InteractOutcome::InventoryFull(kind);
    }
    let Some(item) = world.level.take_item(position) else {
        return InteractOutcome::Nothing;
    };
    match world.player_state.inventory.add(item) {
        Ok(slot) => {
            world.push_event(GameEvent::ItemPickedUp { item: kind, slot });
            world.emit(
                format!("You pick up the {}.", kind.name()),
                MessageImportance::Info,
            );
            InteractOutcome::PickedUp { kind, slot }
        }
        Err(item) => {
            restore_to_map(world, position, item);
            InteractOutcome::InventoryFull(kind)
        }
    }
}

fn restore_to_map(world: &mut WorldState, position: Position, item: Item) {
    if let Err(err) = world.level.place_item(position, item) {
        debug!("could not return item to {}: {}", position, err);
    }
}

fn trigger_instant(
    world: &mut WorldState,
    position: Position,
    kind: ItemKind,
) -> Result<(), DeclineReason> {
    match kind {
        ItemKind::Key => {
            world.level.take_item(position);
            let state = &mut world.player_state;
            state.keys = (state.keys + 1).min(config::KEYS_REQUIRED);
            let keys = state.keys;
            world.emit(
                format!("You found a key ({}/{}).", keys, config::KEYS_REQUIRED),
                MessageImportance::Notice,
            );
        }
        ItemKind::Coin => {
            world.level.take_item(position);
            world.player_state.coins += 1;
            world.emit("You pick up a coin.", MessageImportance::Info);
        }
        ItemKind::Heart => {
            let Some(player) = world.player_mut() else {
                return Err(DeclineReason::NotUsable);
            };
            if player.is_at_full_health() {
                world.emit("You are already at full health.", MessageImportance::Info);
                return Err(DeclineReason::AlreadyFullHealth);
            }
            player.heal(1);
            world.level.take_item(position);
            world.emit("You feel a little better.", MessageImportance::Info);
        }
        ItemKind::Belt => {
            if !world.player_state.inventory.grow() {
                world.emit("You cannot carry any more.", MessageImportance::Info);
                return Err(DeclineReason::CapacityAtMaximum);
            }
            world.level.take_item(position);
            let capacity = world.player_state.inventory.capacity();
            world.emit(
                format!("A sturdier belt: you can now carry {} items.", capacity),
                MessageImportance::Notice,
            );
        }
        ItemKind::Exit => {
            if !world.player_state.has_all_keys() {
                let missing = config::KEYS_REQUIRED - world.player_state.keys;
                world.emit(
                    format!("The exit is locked. You need {} more key(s).", missing),
                    MessageImportance::Info,
                );
                return Err(DeclineReason::MissingKeys);
            }
            let depth = world.level.depth;
            world.emit("You unlock the exit and descend.", MessageImportance::Critical);
            world.push_event(GameEvent::LevelCompleted { depth });
            world.halt(WorldOutcome::LevelComplete);
        }
        ItemKind::HealthPotion
        | ItemKind::Bomb
        | ItemKind::InvulnerabilityPotion
        | ItemKind::SpeedPotion
        | ItemKind::SummonScroll
        | ItemKind::MapScroll => return Err(DeclineReason::NotUsable),
    }
    Ok(())
}
