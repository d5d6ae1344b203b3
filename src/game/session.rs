//! # Game Session
//!
//! Strings levels together. A session owns the current [`WorldState`] and
//! replaces it with a fresh one when the player opens the exit or restarts.

use crate::{
    populate_level, Actor, CommandOutcome, DelveError, DelveResult, GameEvent, LevelSource,
    PlayerCommand, PlayerState, Position, ScoreSnapshot, WorldOutcome, WorldState,
};
use log::info;

/// Seed offset between consecutive depths.
const DEPTH_SEED_STRIDE: u64 = 1000;

/// A run through consecutive levels.
#[derive(Debug)]
pub struct GameSession<S: LevelSource> {
    source: S,
    world: WorldState,
    depth: u32,
    seed: u64,
    player_name: String,
    final_score: Option<ScoreSnapshot>,
    /// Events of a finished level not yet drained
    carried_events: Vec<GameEvent>,
}

impl<S: LevelSource> GameSession<S> {
    /// Starts a new run at depth 1 and runs until the player's first turn.
    pub fn new(source: S, player_name: impl Into<String>, seed: u64) -> DelveResult<Self> {
        Self::starting_at(source, player_name, seed, 1)
    }

    /// Starts a new run at the given depth.
    pub fn starting_at(
        mut source: S,
        player_name: impl Into<String>,
        seed: u64,
        depth: u32,
    ) -> DelveResult<Self> {
        let player_name = player_name.into();
        let depth = depth.max(1);
        let player = Actor::player(player_name.clone(), Position::new(0, 0));
        let world = build_world(&mut source, depth, seed, player, PlayerState::new())?;
        Ok(Self {
            source,
            world,
            depth,
            seed,
            player_name,
            final_score: None,
            carried_events: Vec::new(),
        })
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Whether the player has died.
    pub fn is_over(&self) -> bool {
        self.world.outcome() == WorldOutcome::PlayerDied
    }

    /// The figures captured at the player's death.
    pub fn final_score(&self) -> Option<ScoreSnapshot> {
        self.final_score
    }

    /// Takes every event since the last drain, including those of a level
    /// that has just been left.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        let mut events = std::mem::take(&mut self.carried_events);
        events.extend(self.world.drain_events());
        events
    }

    /// Submits a player command, moving to the next level if it completed
    /// this one.
    pub fn submit(&mut self, command: PlayerCommand) -> DelveResult<CommandOutcome> {
        let outcome = self.world.submit(command);
        match self.world.outcome() {
            WorldOutcome::LevelComplete => self.advance_level()?,
            WorldOutcome::PlayerDied if self.final_score.is_none() => {
                let score = self.world.score_snapshot();
                info!("player died on depth {}: {:?}", self.depth, score);
                self.final_score = Some(score);
            }
            _ => {}
        }
        Ok(outcome)
    }

    /// Builds the next depth and carries the player over.
    ///
    /// Health, inventory, coins, counters and the defeat tally travel with
    /// the player; keys and status effects do not.
    pub fn advance_level(&mut self) -> DelveResult<()> {
        let next_depth = self.depth + 1;
        let (mut player, mut state) = match self.world.player() {
            Some(player) => (player.clone(), self.world.player_state.clone()),
            None => {
                return Err(DelveError::InvalidState(
                    "no living player to carry to the next level".to_string(),
                ))
            }
        };

        state.keys = 0;
        player.status.clear();

        let world = build_world(&mut self.source, next_depth, self.seed, player, state)?;
        let mut finished = std::mem::replace(&mut self.world, world);
        self.carried_events.extend(finished.drain_events());
        self.depth = next_depth;
        info!("descended to depth {}", next_depth);
        Ok(())
    }

    /// Throws the run away and starts again from depth 1.
    pub fn restart(&mut self) -> DelveResult<()> {
        let player = Actor::player(self.player_name.clone(), Position::new(0, 0));
        self.world = build_world(&mut self.source, 1, self.seed, player, PlayerState::new())?;
        self.depth = 1;
        self.final_score = None;
        self.carried_events.clear();
        info!("restarted run with seed {}", self.seed);
        Ok(())
    }
}

fn depth_seed(seed: u64, depth: u32) -> u64 {
    seed.wrapping_add(u64::from(depth).wrapping_mul(DEPTH_SEED_STRIDE))
}

fn build_world<S: LevelSource>(
    source: &mut S,
    depth: u32,
    seed: u64,
    player: Actor,
    state: PlayerState,
) -> DelveResult<WorldState> {
    let level = source.level(depth)?;
    let mut world = WorldState::new(level, depth_seed(seed, depth));
    populate_level(&mut world, player, state, &source.population(depth))?;
    info!("depth {} ready with seed {}", depth, world.rng_seed);
    world.run();
    Ok(world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AsciiLayouts, Item, ItemKind, PopulationConfig, StatusKind};

    fn session() -> GameSession<AsciiLayouts> {
        let layouts = AsciiLayouts::builtin().with_population(PopulationConfig::for_testing());
        GameSession::new(layouts, "Hero", 2024).unwrap()
    }

    #[test]
    fn test_new_session_waits_for_player() {
        let session = session();
        assert_eq!(session.depth(), 1);
        assert!(session.world().awaiting_player_input());
        assert!(!session.is_over());
    }

    #[test]
    fn test_exit_advances_and_carries_player() {
        let mut session = session();
        let world = session.world_mut();
        world.player_state.keys = 3;
        world.player_state.coins = 4;
        world.player_state.inventory.add(Item::new(ItemKind::Bomb)).unwrap();
        if let Some(player) = world.player_mut() {
            player.health = 3;
            player.status.apply(StatusKind::Hasted, 10);
        }
        let position = world.player().map(|p| p.position).unwrap();
        let direction = crate::Direction::ALL
            .into_iter()
            .find(|dir| {
                let cell = position.step(*dir, 1);
                world.is_free(cell) && world.item_at(cell).is_none()
            })
            .unwrap();
        world
            .place_item(position.step(direction, 1), Item::new(ItemKind::Exit))
            .unwrap();

        let outcome = session.submit(PlayerCommand::Move(direction)).unwrap();
        assert_eq!(outcome, CommandOutcome::Performed);
        assert_eq!(session.depth(), 2);

        let world = session.world();
        assert_eq!(world.level.depth, 2);
        assert_eq!(world.player_state.keys, 0);
        assert_eq!(world.player_state.coins, 4);
        assert_eq!(world.player_state.turns, 1);
        assert_eq!(world.player_state.inventory.find(ItemKind::Bomb), Some(0));
        let player = world.player().unwrap();
        assert_eq!(player.health, 3);
        assert!(!player.status.is_active(StatusKind::Hasted));
        assert!(world.awaiting_player_input());

        let events = session.drain_events();
        assert!(events.contains(&GameEvent::LevelCompleted { depth: 1 }));
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_death_records_final_score_and_restart() {
        let mut session = session();
        if let Some(player) = session.world_mut().player_mut() {
            player.health = 1;
        }
        let world = session.world();
        let position = world.player().map(|p| p.position).unwrap();
        let cell = position
            .cardinal_adjacent_positions()
            .into_iter()
            .find(|cell| world.is_free(*cell))
            .unwrap();
        let pedro = session
            .world_mut()
            .spawn_actor(crate::Species::Assassin, cell)
            .unwrap();
        assert!(session.world().actor(pedro).is_some());

        // The assassin gets its turn as soon as the player waits
        session.submit(PlayerCommand::Wait).unwrap();
        assert!(session.is_over());
        let score = session.final_score().unwrap();
        assert_eq!(score.turns, 1);

        session.restart().unwrap();
        assert!(!session.is_over());
        assert_eq!(session.depth(), 1);
        assert!(session.final_score().is_none());
        assert_eq!(session.world().player_state.turns, 0);
    }

    #[test]
    fn test_same_seed_same_run() {
        let a = session();
        let b = session();
        let positions = |s: &GameSession<AsciiLayouts>| {
            s.world()
                .actors()
                .into_iter()
                .map(|actor| (actor.species, actor.position))
                .collect::<Vec<_>>()
        };
        assert_eq!(positions(&a), positions(&b));
    }

    #[test]
    fn test_depth_seeds_differ() {
        assert_ne!(depth_seed(1, 1), depth_seed(1, 2));
        assert_eq!(depth_seed(u64::MAX, 1), 999);
    }
}
