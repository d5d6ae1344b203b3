//! # Autoexplore Module
//!
//! A simple automatic player for headless runs and soak tests.
//!
//! Each turn it drinks a potion when badly hurt, fights whatever hostile is
//! adjacent, and otherwise walks towards the nearest useful item, then the
//! exit once every key is held, then the nearest unexplored cell.

use crate::{find_path_to, Direction, ItemKind, PlayerCommand, Position, WorldState};
use log::trace;

/// Autoexplore state.
#[derive(Debug, Clone, Default)]
pub struct Autoexplore {
    /// Path currently being followed, starting after the player's cell
    pub current_path: Vec<Position>,
    /// Cell the current path leads to
    pub target: Option<Position>,
}

impl Autoexplore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chooses the player's next command.
    ///
    /// Returns `None` when there is no player or no open turn.
    pub fn next_command(&mut self, world: &WorldState) -> Option<PlayerCommand> {
        if !world.awaiting_player_input() {
            return None;
        }
        let player = world.player()?;
        let here = player.position;

        if player.health * 2 < player.max_health {
            if let Some(slot) = world.player_state.inventory.find(ItemKind::HealthPotion) {
                return Some(PlayerCommand::UseItem(slot));
            }
        }

        if let Some(direction) = adjacent_hostile(world, here) {
            self.clear();
            return Some(PlayerCommand::Move(direction));
        }

        if self.target.map_or(true, |target| !self.still_wanted(world, target)) {
            self.plan(world, here);
        }

        let Some(&next) = self.current_path.first() else {
            return Some(PlayerCommand::Wait);
        };
        let Some(direction) = Direction::from_delta(next - here) else {
            // Knocked off the path; plan again next turn
            self.clear();
            return Some(PlayerCommand::Wait);
        };
        if world.occupant_at(next).is_some() {
            self.clear();
            return Some(PlayerCommand::Wait);
        }
        self.current_path.remove(0);
        Some(PlayerCommand::Move(direction))
    }

    /// Forgets the current path.
    pub fn clear(&mut self) {
        self.current_path.clear();
        self.target = None;
    }

    fn plan(&mut self, world: &WorldState, here: Position) {
        self.clear();
        let path = find_path_to(&world.level, here, |pos| {
            pos != here && (wants_item_at(world, pos) || !world.level.is_explored(pos))
        });
        if let Some(path) = path {
            trace!("autoexplore heading for {:?}", path.last());
            self.target = path.last().copied();
            self.current_path = path.into_iter().skip(1).collect();
        }
    }

    fn still_wanted(&self, world: &WorldState, target: Position) -> bool {
        !self.current_path.is_empty()
            && (wants_item_at(world, target) || !world.level.is_explored(target))
    }
}

fn adjacent_hostile(world: &WorldState, here: Position) -> Option<Direction> {
    Direction::ALL.into_iter().find(|direction| {
        world
            .occupant(here.step(*direction, 1))
            .map_or(false, |actor| actor.species.is_hostile())
    })
}

/// Whether stepping on the cell's item would do the player any good.
fn wants_item_at(world: &WorldState, pos: Position) -> bool {
    let Some(item) = world.item_at(pos) else {
        return false;
    };
    let state = &world.player_state;
    match item.kind {
        ItemKind::Exit => state.has_all_keys(),
        ItemKind::Key | ItemKind::Coin => true,
        ItemKind::Heart => world.player().map_or(false, |p| !p.is_at_full_health()),
        ItemKind::Belt => state.inventory.capacity() < crate::config::MAX_INVENTORY_CAPACITY,
        _ => !state.inventory.is_full(),
    }
}
