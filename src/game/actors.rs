//! # Actors
//!
//! The shared actor record, the closed set of species with their stat and
//! strategy tables, and the progress the player carries between levels.

use crate::{config, new_actor_id, ActorId, Inventory, Position, StatusEffects, StatusKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every kind of actor the simulation knows about.
///
/// Declaration order is the order enemies are placed during population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    Player,
    Snail,
    Frog,
    Rat,
    MadFrog,
    MadRat,
    Assassin,
    /// Friendly summon that hunts hostiles
    Spirit,
}

/// Which side an actor fights on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Hostile,
    Friendly,
}

/// Decision strategy selected by species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Waits for an external command
    PlayerControlled,
    /// Never acts
    Stationary,
    /// Random orthogonal jump of two cells
    RandomHop,
    /// Random orthogonal step of one cell
    RandomStep,
    /// Greedy jump toward the player, then random
    ChaseHop,
    /// Greedy step toward the player, then random
    ChaseStep,
    /// Follows a shortest path to the player
    Pathfinding,
    /// Steps toward and attacks the nearest hostile
    Hunter,
}

/// Base numbers for a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeciesStats {
    pub health: u32,
    pub strength: u32,
    pub speed: u32,
    pub glyph: char,
}

impl Species {
    /// Hostile species in population order.
    pub const ENEMIES: [Species; 6] = [
        Species::Snail,
        Species::Frog,
        Species::Rat,
        Species::MadFrog,
        Species::MadRat,
        Species::Assassin,
    ];

    /// Display name used in narration and the defeat tally.
    pub fn name(self) -> &'static str {
        match self {
            Species::Player => "Player",
            Species::Snail => "Snail",
            Species::Frog => "Frog",
            Species::Rat => "Rat",
            Species::MadFrog => "Mad Frog",
            Species::MadRat => "Mad Rat",
            Species::Assassin => "Pedro",
            Species::Spirit => "Spirit",
        }
    }

    pub fn stats(self) -> SpeciesStats {
        let (health, strength, glyph) = match self {
            Species::Player => (config::PLAYER_MAX_HEALTH, config::PLAYER_STRENGTH, '@'),
            Species::Snail => (1, 0, 's'),
            Species::Frog => (2, 1, 'f'),
            Species::Rat => (1, 1, 'r'),
            Species::MadFrog => (3, 1, 'F'),
            Species::MadRat => (2, 1, 'R'),
            Species::Assassin => (4, 2, 'P'),
            Species::Spirit => (3, 1, '*'),
        };
        SpeciesStats {
            health,
            strength,
            speed: config::BASE_SPEED,
            glyph,
        }
    }

    pub fn strategy(self) -> Strategy {
        match self {
            Species::Player => Strategy::PlayerControlled,
            Species::Snail => Strategy::Stationary,
            Species::Frog => Strategy::RandomHop,
            Species::Rat => Strategy::RandomStep,
            Species::MadFrog => Strategy::ChaseHop,
            Species::MadRat => Strategy::ChaseStep,
            Species::Assassin => Strategy::Pathfinding,
            Species::Spirit => Strategy::Hunter,
        }
    }

    pub fn faction(self) -> Faction {
        match self {
            Species::Player => Faction::Player,
            Species::Spirit => Faction::Friendly,
            _ => Faction::Hostile,
        }
    }

    pub fn is_hostile(self) -> bool {
        self.faction() == Faction::Hostile
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The base record shared by the player, enemies and summons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub species: Species,
    pub position: Position,
    pub health: u32,
    pub max_health: u32,
    /// Damage dealt per attack
    pub strength: u32,
    /// Scheduler speed when no effect modifies it
    pub base_speed: u32,
    pub status: StatusEffects,
}

impl Actor {
    /// Creates an actor of a species at a position using its base stats.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Actor, Position, Species};
    ///
    /// let rat = Actor::new(Species::Rat, Position::new(3, 4));
    /// assert_eq!(rat.name, "Rat");
    /// assert!(rat.is_alive());
    /// ```
    pub fn new(species: Species, position: Position) -> Self {
        let stats = species.stats();
        Self {
            id: new_actor_id(),
            name: species.name().to_string(),
            species,
            position,
            health: stats.health,
            max_health: stats.health,
            strength: stats.strength,
            base_speed: stats.speed,
            status: StatusEffects::new(),
        }
    }

    /// Creates a named player actor.
    pub fn player(name: impl Into<String>, position: Position) -> Self {
        let mut actor = Self::new(Species::Player, position);
        actor.name = name.into();
        actor
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_player(&self) -> bool {
        self.species == Species::Player
    }

    pub fn faction(&self) -> Faction {
        self.species.faction()
    }

    /// Scheduler-visible speed including haste.
    pub fn speed(&self) -> u32 {
        if self.status.is_active(StatusKind::Hasted) {
            self.base_speed.max(config::HASTED_SPEED)
        } else {
            self.base_speed
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.status.is_active(StatusKind::Invulnerable)
    }

    pub fn is_at_full_health(&self) -> bool {
        self.health >= self.max_health
    }

    /// Heals up to max health. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let healed = amount.min(self.max_health.saturating_sub(self.health));
        self.health += healed;
        healed
    }

    /// Restores full health. Returns the amount restored.
    pub fn heal_to_full(&mut self) -> u32 {
        self.heal(self.max_health)
    }
}

/// Progress and possessions that belong to the player rather than to the
/// actor record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Completed player turns
    pub turns: u64,
    /// Successful moves
    pub steps: u64,
    pub coins: u32,
    /// Keys found on the current level
    pub keys: u32,
    pub inventory: Inventory,
    /// Species name to number defeated by the player
    pub defeated: BTreeMap<String, u32>,
}

impl PlayerState {
    /// Creates fresh progress with an empty starting inventory.
    pub fn new() -> Self {
        Self {
            turns: 0,
            steps: 0,
            coins: 0,
            keys: 0,
            inventory: Inventory::new(config::INITIAL_INVENTORY_CAPACITY),
            defeated: BTreeMap::new(),
        }
    }

    /// Adds one defeat of a species to the tally.
    pub fn record_defeat(&mut self, species: Species) {
        *self.defeated.entry(species.name().to_string()).or_insert(0) += 1;
    }

    /// Total enemies defeated across all species.
    pub fn enemies_defeated(&self) -> u32 {
        self.defeated.values().sum()
    }

    pub fn has_all_keys(&self) -> bool {
        self.keys >= config::KEYS_REQUIRED
    }

    /// Read-only figures handed to the leaderboard collaborator.
    pub fn score_snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            turns: self.turns,
            steps: self.steps,
            coins_collected: self.coins,
            enemies_defeated: self.enemies_defeated(),
        }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Final figures of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub turns: u64,
    pub steps: u64,
    pub coins_collected: u32,
    pub enemies_defeated: u32,
}
