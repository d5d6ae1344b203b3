//! # World State Module
//!
//! The explicit context every operation of a level runs against.
//!
//! A [`WorldState`] owns the level map, the active roster of living actors,
//! the turn scheduler, the random source and the event log. It is created
//! when a level starts and replaced wholesale when the player moves on or
//! restarts; it is never partially reset.

use crate::{
    ai, config, Actor, ActorId, DelveError, DelveResult, EventLog, GameEvent, Item, Level,
    MessageImportance, PlayerState, Position, ScoreSnapshot, Species, TurnScheduler,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

/// How the level ended, if it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldOutcome {
    /// Turns are still being played
    InProgress,
    /// The player opened the exit
    LevelComplete,
    /// The player died; the world is halted
    PlayerDied,
}

/// Everything one level's simulation reads and mutates.
#[derive(Debug)]
pub struct WorldState {
    /// The map and its items
    pub level: Level,
    /// Living actors, indexed by ID
    actors: HashMap<ActorId, Actor>,
    /// Occupancy index; at most one actor per cell
    position_index: HashMap<Position, ActorId>,
    player_id: Option<ActorId>,
    /// Progress that belongs to the player
    pub player_state: PlayerState,
    /// Turn ordering for the roster
    pub scheduler: TurnScheduler,
    rng: StdRng,
    events: EventLog,
    outcome: WorldOutcome,
    /// Seed the random source was created from
    pub rng_seed: u64,
}

impl WorldState {
    /// Creates an empty world on a level with a seeded random source.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Level, WorldState};
    ///
    /// let level = Level::from_ascii(1, "#####\n#...#\n#####").unwrap();
    /// let world = WorldState::new(level, 12345);
    /// assert!(world.player_id().is_none());
    /// assert_eq!(world.free_cells().len(), 3);
    /// ```
    pub fn new(level: Level, seed: u64) -> Self {
        Self {
            level,
            actors: HashMap::new(),
            position_index: HashMap::new(),
            player_id: None,
            player_state: PlayerState::new(),
            scheduler: TurnScheduler::new(),
            rng: StdRng::seed_from_u64(seed),
            events: EventLog::new(),
            outcome: WorldOutcome::InProgress,
            rng_seed: seed,
        }
    }

    /// Places the player and their carried progress, and schedules them.
    pub fn spawn_player(&mut self, mut player: Actor, state: PlayerState) -> DelveResult<ActorId> {
        if self.player_id.is_some() {
            return Err(DelveError::InvalidState(
                "Level already has a player".to_string(),
            ));
        }
        player.species = Species::Player;
        let player_id = self.add_actor(player)?;
        self.player_id = Some(player_id);
        self.player_state = state;
        self.update_player_visibility();
        Ok(player_id)
    }

    /// Creates an actor of a species on a free cell and schedules it.
    pub fn spawn_actor(&mut self, species: Species, position: Position) -> DelveResult<ActorId> {
        if species == Species::Player {
            return Err(DelveError::InvalidAction(
                "Players are placed with spawn_player".to_string(),
            ));
        }
        let actor_id = self.add_actor(Actor::new(species, position))?;
        self.events.push(GameEvent::ActorSpawned {
            actor: actor_id,
            species,
            position,
        });
        Ok(actor_id)
    }

    /// Adds an actor to the roster and the scheduler.
    ///
    /// The target cell must be passable and unoccupied.
    pub fn add_actor(&mut self, actor: Actor) -> DelveResult<ActorId> {
        let position = actor.position;
        if !self.level.is_passable(position) {
            return Err(DelveError::InvalidState(format!(
                "Cannot place {} on impassable cell {}",
                actor.name, position
            )));
        }
        if let Some(occupant) = self.occupant_at(position) {
            return Err(DelveError::InvalidState(format!(
                "Cell {} is already occupied by {}",
                position, occupant
            )));
        }
        if !actor.is_alive() {
            return Err(DelveError::InvalidState(format!(
                "Cannot add {} with no health",
                actor.name
            )));
        }

        let actor_id = actor.id;
        self.scheduler.add(actor_id, true, actor.speed());
        self.position_index.insert(position, actor_id);
        self.actors.insert(actor_id, actor);
        debug!("added {} at {}", actor_id, position);
        Ok(actor_id)
    }

    /// Takes an actor out of the roster, the occupancy index and the scheduler.
    pub fn remove_actor(&mut self, actor_id: ActorId) -> Option<Actor> {
        let actor = self.actors.remove(&actor_id)?;
        if self.position_index.get(&actor.position) == Some(&actor_id) {
            self.position_index.remove(&actor.position);
        }
        self.scheduler.remove(actor_id);
        Some(actor)
    }

    /// Puts an item on the map.
    pub fn place_item(&mut self, position: Position, item: Item) -> DelveResult<()> {
        self.level.place_item(position, item)
    }

    pub fn player_id(&self) -> Option<ActorId> {
        self.player_id
    }

    /// The living player actor.
    pub fn player(&self) -> Option<&Actor> {
        self.player_id.and_then(|id| self.actors.get(&id))
    }

    pub fn player_mut(&mut self) -> Option<&mut Actor> {
        match self.player_id {
            Some(id) => self.actors.get_mut(&id),
            None => None,
        }
    }

    pub fn actor(&self, actor_id: ActorId) -> Option<&Actor> {
        self.actors.get(&actor_id)
    }

    pub fn actor_mut(&mut self, actor_id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&actor_id)
    }

    /// Whether the actor is on the active roster.
    pub fn is_alive(&self, actor_id: ActorId) -> bool {
        self.actors
            .get(&actor_id)
            .map(Actor::is_alive)
            .unwrap_or(false)
    }

    /// All living actors, ordered by position (row-major).
    pub fn actors(&self) -> Vec<&Actor> {
        let mut actors: Vec<&Actor> = self.actors.values().collect();
        actors.sort_by_key(|actor| (actor.position.y, actor.position.x));
        actors
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// The actor standing on a cell.
    pub fn occupant_at(&self, position: Position) -> Option<ActorId> {
        self.position_index.get(&position).copied()
    }

    /// The actor record standing on a cell.
    pub fn occupant(&self, position: Position) -> Option<&Actor> {
        self.occupant_at(position)
            .and_then(|actor_id| self.actors.get(&actor_id))
    }

    /// Terrain passability.
    pub fn is_passable(&self, position: Position) -> bool {
        self.level.is_passable(position)
    }

    /// Passable and not occupied by any actor.
    pub fn is_free(&self, position: Position) -> bool {
        self.is_passable(position) && self.occupant_at(position).is_none()
    }

    pub fn item_at(&self, position: Position) -> Option<&Item> {
        self.level.item_at(position)
    }

    /// Passable cells holding neither an actor nor an item, row-major.
    pub fn free_cells(&self) -> Vec<Position> {
        self.level
            .passable_cells()
            .into_iter()
            .filter(|pos| self.occupant_at(*pos).is_none() && self.level.item_at(*pos).is_none())
            .collect()
    }

    /// Moves an actor to a free cell.
    pub fn move_actor(&mut self, actor_id: ActorId, to: Position) -> DelveResult<()> {
        if !self.is_free(to) {
            return Err(DelveError::InvalidAction(format!(
                "Position {} is blocked",
                to
            )));
        }
        let actor = self
            .actors
            .get_mut(&actor_id)
            .ok_or_else(|| DelveError::InvalidState(format!("Actor {} not found", actor_id)))?;
        let from = actor.position;
        actor.position = to;

        self.position_index.remove(&from);
        self.position_index.insert(to, actor_id);
        self.events.push(GameEvent::ActorMoved {
            actor: actor_id,
            from,
            to,
        });
        Ok(())
    }

    /// Marks cells around the player explored.
    pub fn update_player_visibility(&mut self) {
        let Some(center) = self.player().map(|player| player.position) else {
            return;
        };
        let radius = config::SIGHT_RADIUS;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let pos = Position::new(center.x + dx, center.y + dy);
                if self.level.mark_explored(pos) {
                    self.events.push(GameEvent::Explored { position: pos });
                }
            }
        }
    }

    /// Draws the explored part of the level as text, one line per row.
    ///
    /// Actors are drawn over items, items over terrain. Unexplored cells
    /// are blank.
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(((self.level.width + 1) * self.level.height) as usize);
        for y in 0..self.level.height as i32 {
            let mut row = String::with_capacity(self.level.width as usize);
            for x in 0..self.level.width as i32 {
                row.push(self.glyph_at(Position::new(x, y)));
            }
            out.push_str(row.trim_end());
            out.push('\n');
        }
        out
    }

    fn glyph_at(&self, pos: Position) -> char {
        if !self.level.is_explored(pos) {
            return ' ';
        }
        if let Some(actor) = self.occupant(pos) {
            return actor.species.stats().glyph;
        }
        if let Some(item) = self.item_at(pos) {
            return item.kind.glyph();
        }
        self.level
            .get_tile(pos)
            .map(|tile| tile.tile_type.glyph())
            .unwrap_or(' ')
    }

    /// Runs turns until the player must decide or the world halts.
    ///
    /// Enemy turns run to completion here. When the player's turn comes up
    /// the scheduler locks and control returns to the caller, who answers
    /// with [`WorldState::submit`]. If the roster is empty the world simply
    /// stops.
    pub fn run(&mut self) {
        while self.outcome == WorldOutcome::InProgress {
            let actors = &self.actors;
            let Some(actor_id) = self
                .scheduler
                .next(|id| actors.get(&id).map(Actor::speed))
            else {
                return;
            };

            self.begin_turn(actor_id);
            if !self.is_alive(actor_id) {
                continue;
            }

            if Some(actor_id) == self.player_id {
                self.scheduler.lock();
                return;
            }

            ai::take_turn(self, actor_id);
        }
    }

    /// Start-of-turn bookkeeping: counts the actor's own status effects down.
    fn begin_turn(&mut self, actor_id: ActorId) {
        let is_player = Some(actor_id) == self.player_id;
        let Some(actor) = self.actors.get_mut(&actor_id) else {
            return;
        };
        let expired = actor.status.tick();
        for kind in expired {
            debug!("{} lost {}", actor_id, kind.label());
            if is_player {
                self.events.emit(
                    format!("Your {} wears off.", kind.label()),
                    MessageImportance::Notice,
                );
            }
        }
    }

    /// Whether the world is waiting for a player command.
    pub fn awaiting_player_input(&self) -> bool {
        self.outcome == WorldOutcome::InProgress && self.scheduler.is_locked()
    }

    pub fn outcome(&self) -> WorldOutcome {
        self.outcome
    }

    /// Ends the level. The scheduler hands out no further turns.
    pub fn halt(&mut self, outcome: WorldOutcome) {
        info!("world halted: {:?}", outcome);
        self.outcome = outcome;
        if outcome == WorldOutcome::PlayerDied {
            self.scheduler.clear();
        }
    }

    /// The player's final figures.
    pub fn score_snapshot(&self) -> ScoreSnapshot {
        self.player_state.score_snapshot()
    }

    /// Records a narration message.
    pub fn emit(&mut self, text: impl Into<String>, importance: MessageImportance) {
        self.events.emit(text, importance);
    }

    /// Records an event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events recorded since the last drain.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Takes every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /// The injected random source.
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Replaces the random source with a freshly seeded one.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = seed;
    }
}
