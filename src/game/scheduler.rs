//! # Turn Scheduler
//!
//! Speed-weighted ordering of actor turns.
//!
//! Each actor is queued at an absolute time. Taking a turn advances the
//! clock to that time; a recurring actor is queued again `TIME_UNIT / speed`
//! later, so an actor twice as fast acts twice as often. Equal times run in
//! insertion order.
//!
//! While a player-controlled actor is deciding, the scheduler is locked and
//! hands out no further turns until [`TurnScheduler::unlock`] is called.

use crate::{config, ActorId};
use log::trace;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

/// Whether the scheduler may hand out turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerState {
    Running,
    /// A player turn is open; nothing else may act
    AwaitingPlayerInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct ScheduledTurn {
    at: u64,
    sequence: u64,
    actor: ActorId,
}

/// Speed-weighted round-robin over the active roster.
#[derive(Debug, Clone)]
pub struct TurnScheduler {
    queue: BinaryHeap<Reverse<ScheduledTurn>>,
    recurring: HashSet<ActorId>,
    current: Option<ActorId>,
    time: u64,
    sequence: u64,
    state: SchedulerState,
}

/// Time between two turns of an actor with the given speed.
pub fn turn_duration(speed: u32) -> u64 {
    config::SCHEDULER_TIME_UNIT / u64::from(speed.max(1))
}

impl TurnScheduler {
    /// Creates an empty, running scheduler.
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            recurring: HashSet::new(),
            current: None,
            time: 0,
            sequence: 0,
            state: SchedulerState::Running,
        }
    }

    /// Registers an actor. Its first turn comes one duration from now.
    pub fn add(&mut self, actor: ActorId, recurring: bool, speed: u32) {
        if recurring {
            self.recurring.insert(actor);
        }
        self.push(actor, turn_duration(speed));
    }

    /// Removes an actor from the roster, including the one currently acting.
    ///
    /// Returns true if the actor was known to the scheduler.
    pub fn remove(&mut self, actor: ActorId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|Reverse(turn)| turn.actor != actor);
        let was_recurring = self.recurring.remove(&actor);
        let was_current = self.current == Some(actor);
        if was_current {
            self.current = None;
        }
        before != self.queue.len() || was_recurring || was_current
    }

    /// Picks the actor whose turn it is.
    ///
    /// The actor that acted last is re-queued first if it is recurring, using
    /// the speed `speed_of` reports for it now. Returns `None` while locked or
    /// when nobody is left.
    pub fn next<F>(&mut self, speed_of: F) -> Option<ActorId>
    where
        F: Fn(ActorId) -> Option<u32>,
    {
        if self.is_locked() {
            return None;
        }

        if let Some(previous) = self.current.take() {
            if self.recurring.contains(&previous) {
                match speed_of(previous) {
                    Some(speed) => self.push(previous, turn_duration(speed)),
                    None => {
                        self.recurring.remove(&previous);
                    }
                }
            }
        }

        let Reverse(turn) = self.queue.pop()?;
        self.time = turn.at;
        self.current = Some(turn.actor);
        trace!("turn for {} at t={}", turn.actor, self.time);
        Some(turn.actor)
    }

    /// Opens a player turn; no further turns are handed out until unlocked.
    pub fn lock(&mut self) {
        self.state = SchedulerState::AwaitingPlayerInput;
    }

    /// Closes the open player turn.
    pub fn unlock(&mut self) {
        self.state = SchedulerState::Running;
    }

    pub fn is_locked(&self) -> bool {
        self.state == SchedulerState::AwaitingPlayerInput
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// The actor whose turn was handed out last.
    pub fn current(&self) -> Option<ActorId> {
        self.current
    }

    /// Whether the actor still has a turn coming.
    pub fn contains(&self, actor: ActorId) -> bool {
        self.current == Some(actor)
            || self.recurring.contains(&actor)
            || self.queue.iter().any(|Reverse(turn)| turn.actor == actor)
    }

    /// Number of queued turns, not counting the actor currently acting.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty() && self.current.is_none()
    }

    /// Scheduler clock.
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Forgets every actor.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.recurring.clear();
        self.current = None;
    }

    fn push(&mut self, actor: ActorId, delay: u64) {
        let turn = ScheduledTurn {
            at: self.time + delay,
            sequence: self.sequence,
            actor,
        };
        self.sequence += 1;
        self.queue.push(Reverse(turn));
    }
}

impl Default for TurnScheduler {
    fn default() -> Self {
        Self::new()
    }
}
