//! # Status Effects
//!
//! Per-actor timed modifiers. Each effect counts down once at the start of
//! its owner's own turn and reverts when it reaches zero.

use crate::config;
use serde::{Deserialize, Serialize};

/// The independent effect kinds an actor can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    /// Blocks all incoming damage
    Invulnerable,
    /// Raises scheduler speed
    Hasted,
}

impl StatusKind {
    /// Full duration in own turns when freshly applied.
    pub fn default_duration(self) -> u32 {
        match self {
            StatusKind::Invulnerable => config::INVULNERABILITY_DURATION,
            StatusKind::Hasted => config::HASTE_DURATION,
        }
    }

    /// Display name used in narration.
    pub fn label(self) -> &'static str {
        match self {
            StatusKind::Invulnerable => "invulnerability",
            StatusKind::Hasted => "haste",
        }
    }
}

/// A running effect and its remaining own turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub remaining: u32,
}

/// The set of effects active on one actor.
///
/// At most one effect of each kind is held; kinds overlap freely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffects {
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    /// Creates an empty effect set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an effect for `duration` own turns.
    ///
    /// Re-applying an active kind resets its counter; magnitudes never stack.
    /// A zero duration is ignored.
    pub fn apply(&mut self, kind: StatusKind, duration: u32) {
        if duration == 0 {
            return;
        }
        match self.effects.iter_mut().find(|effect| effect.kind == kind) {
            Some(effect) => effect.remaining = duration,
            None => self.effects.push(StatusEffect {
                kind,
                remaining: duration,
            }),
        }
    }

    /// Whether an effect of this kind is running.
    pub fn is_active(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|effect| effect.kind == kind)
    }

    /// Own turns left on an effect, if active.
    pub fn remaining(&self, kind: StatusKind) -> Option<u32> {
        self.effects
            .iter()
            .find(|effect| effect.kind == kind)
            .map(|effect| effect.remaining)
    }

    /// Counts every effect down by one own turn.
    ///
    /// Returns the kinds that reached zero and were cleared.
    pub fn tick(&mut self) -> Vec<StatusKind> {
        let mut expired = Vec::new();
        for effect in &mut self.effects {
            effect.remaining = effect.remaining.saturating_sub(1);
            if effect.remaining == 0 {
                expired.push(effect.kind);
            }
        }
        self.effects.retain(|effect| effect.remaining > 0);
        expired
    }

    /// Drops every effect.
    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
