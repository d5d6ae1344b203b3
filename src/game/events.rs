//! # Game Events
//!
//! Notifications the core hands to the UI layer: narration messages,
//! movement and combat reports, and redraw/visibility hints.
//!
//! The core never waits on these. The UI drains the log after each call
//! into the world and renders whatever it cares about.

use crate::{ActorId, AttackOutcome, ItemKind, Position, Species};
use serde::{Deserialize, Serialize};

/// How prominently a narration message should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageImportance {
    Info,
    Notice,
    Warning,
    Critical,
}

/// Something that happened during a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// User-facing narration
    Message {
        text: String,
        importance: MessageImportance,
    },
    ActorMoved {
        actor: ActorId,
        from: Position,
        to: Position,
    },
    ActorAttacked {
        attacker: Option<ActorId>,
        defender: ActorId,
        damage: u32,
        outcome: AttackOutcome,
    },
    ActorDied {
        actor: ActorId,
        species: Species,
        killer: Option<ActorId>,
    },
    ActorSpawned {
        actor: ActorId,
        species: Species,
        position: Position,
    },
    ItemPickedUp {
        item: ItemKind,
        slot: usize,
    },
    ItemUsed {
        item: ItemKind,
    },
    /// A cell became explored and should be drawn
    Explored { position: Position },
    /// Visibility changed wholesale; redraw everything
    FullRedraw,
    LevelCompleted { depth: u32 },
    PlayerDied,
}

/// Append-only buffer of events produced since the last drain.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an event.
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Records a narration message.
    pub fn emit(&mut self, text: impl Into<String>, importance: MessageImportance) {
        self.events.push(GameEvent::Message {
            text: text.into(),
            importance,
        });
    }

    /// Events recorded so far.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Narration messages recorded so far, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|event| match event {
            GameEvent::Message { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Takes every recorded event, leaving the log empty.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_and_drain() {
        let mut log = EventLog::new();
        log.emit("You found a key.", MessageImportance::Notice);
        log.push(GameEvent::FullRedraw);

        assert_eq!(log.messages().collect::<Vec<_>>(), vec!["You found a key."]);
        assert_eq!(log.events().len(), 2);

        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert!(log.is_empty());
    }
}
