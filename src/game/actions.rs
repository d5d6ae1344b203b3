//! # Player Actions
//!
//! Validated player commands and the single transition that closes an open
//! player turn.

use crate::{
    combat, effects, Direction, InteractOutcome, ItemUseOutcome, Position, WorldOutcome,
    WorldState,
};
use log::debug;
use serde::{Deserialize, Serialize};

/// What the player chose to do with their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerCommand {
    /// Step one cell, attacking a hostile occupant instead of moving
    Move(Direction),
    /// Let the turn pass
    Wait,
    /// Use the item in an inventory slot
    UseItem(usize),
}

/// Why a command did not consume the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// No player turn is open
    NotPlayersTurn,
    /// A wall or a friendly actor is in the way
    Blocked,
    /// The slot does not exist
    InvalidSlot,
    /// The slot holds nothing
    EmptySlot,
    /// The item declined to be used
    Declined,
}

/// Result of submitting a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    /// The turn was spent and the world has run on to the next player turn
    Performed,
    /// Nothing happened; the player turn is still open
    Rejected(RejectReason),
}

impl CommandOutcome {
    pub fn is_performed(self) -> bool {
        self == CommandOutcome::Performed
    }
}

impl WorldState {
    /// Answers an open player turn.
    ///
    /// A rejected command leaves the world untouched and the turn open. A
    /// performed one counts a turn, unlocks the scheduler and runs every
    /// other actor until the player is up again or the world halts.
    pub fn submit(&mut self, command: PlayerCommand) -> CommandOutcome {
        if !self.awaiting_player_input() {
            return CommandOutcome::Rejected(RejectReason::NotPlayersTurn);
        }
        let Some(player_id) = self.player_id() else {
            return CommandOutcome::Rejected(RejectReason::NotPlayersTurn);
        };

        let result = match command {
            PlayerCommand::Move(direction) => self.player_move(direction),
            PlayerCommand::Wait => Ok(()),
            PlayerCommand::UseItem(slot) => match effects::use_inventory_item(self, slot) {
                ItemUseOutcome::Used(_) => Ok(()),
                ItemUseOutcome::InvalidSlot => Err(RejectReason::InvalidSlot),
                ItemUseOutcome::EmptySlot => Err(RejectReason::EmptySlot),
                ItemUseOutcome::Declined(_) => Err(RejectReason::Declined),
            },
        };

        if let Err(reason) = result {
            debug!("{:?} rejected: {:?}", command, reason);
            return CommandOutcome::Rejected(reason);
        }

        self.player_state.turns += 1;
        debug!("{} performed {:?}", player_id, command);
        self.scheduler.unlock();
        if self.outcome() == WorldOutcome::InProgress {
            self.run();
        }
        CommandOutcome::Performed
    }

    fn player_move(&mut self, direction: Direction) -> Result<(), RejectReason> {
        let Some((player_id, from)) = self.player().map(|player| (player.id, player.position))
        else {
            return Err(RejectReason::NotPlayersTurn);
        };
        let target = from.step(direction, 1);

        if let Some(occupant) = self.occupant(target) {
            if !occupant.species.is_hostile() {
                return Err(RejectReason::Blocked);
            }
            let defender = occupant.id;
            let outcome = combat::attack(self, player_id, defender);
            debug!("player attacked {}: {:?}", defender, outcome);
            return Ok(());
        }

        if !self.is_passable(target) {
            return Err(RejectReason::Blocked);
        }
        if self.move_actor(player_id, target).is_err() {
            return Err(RejectReason::Blocked);
        }
        self.player_state.steps += 1;
        self.update_player_visibility();
        self.arrive(target);
        Ok(())
    }

    fn arrive(&mut self, position: Position) {
        match effects::interact(self, position) {
            InteractOutcome::Nothing => {}
            outcome => debug!("interaction at {}: {:?}", position, outcome),
        }
    }
}
