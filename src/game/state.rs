//! # Game State Module
//!
//! The engine that owns a game session and executes every player action.
//!
//! A [`GameState`] holds the dungeon, the player, the start and goal, the
//! configuration it was built from and the seeded random source. Actions
//! check all of their preconditions before touching anything, so a failed
//! action always leaves the session exactly as it was.

use crate::generation::{build_dungeon, create_rng, GeneratedDungeon};
use crate::{
    DelveError, DelveResult, Direction, Dungeon, GameView, GenerationConfig, Location,
    MonsterView, PathAnalyzer, Player, PlayerStatus, Position, Treasure,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Counters tracking what the player has done this session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Successful moves
    pub steps_taken: u64,
    /// Arrows shot, hits and misses alike
    pub arrows_fired: u32,
    /// Units of treasure picked up
    pub treasure_collected: u32,
    /// Arrows picked up from the floor
    pub arrows_collected: u32,
    /// Times a thief caught up with the player
    pub times_robbed: u32,
}

impl GameStatistics {
    /// Creates new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A single game session.
///
/// Exactly one caller drives a session at a time. Front-ends read it through
/// [`GameState::view`] and change it only through the action methods.
#[derive(Debug, Clone)]
pub struct GameState {
    config: GenerationConfig,
    dungeon: Dungeon,
    player: Player,
    start: Position,
    goal: Position,
    visited: HashSet<Position>,
    statistics: GameStatistics,
    rng: StdRng,
    /// Hand-built dungeon this session restarts from, if any
    prebuilt: Option<GeneratedDungeon>,
}

impl GameState {
    /// Builds a new session from a configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{GameState, GenerationConfig, PlayerStatus};
    ///
    /// let game = GameState::new(GenerationConfig::for_testing(3)).unwrap();
    /// assert_eq!(game.status(), PlayerStatus::Playing);
    /// assert_eq!(game.player().position(), game.start());
    /// assert_ne!(game.start(), game.goal());
    /// ```
    pub fn new(config: GenerationConfig) -> DelveResult<Self> {
        let mut rng = create_rng(&config);
        let built = build_dungeon(&config, &mut rng)?;

        info!(
            "New {}x{} game (seed {}): start {}, goal {}",
            config.rows, config.columns, config.seed, built.start, built.goal
        );

        Ok(Self::assemble(config, built, rng, None))
    }

    /// Wraps an already populated dungeon in a session.
    ///
    /// The dungeon must be connected, the start and goal must differ, the
    /// goal must hold the boss Otyugh and the start must hold no Otyugh.
    /// The configuration still supplies the rules and the seed.
    pub fn from_dungeon(
        dungeon: Dungeon,
        start: Position,
        goal: Position,
        config: GenerationConfig,
    ) -> DelveResult<Self> {
        config.validate()?;

        let (start_location, goal_location) = match (dungeon.location(start), dungeon.location(goal)) {
            (Some(s), Some(g)) => (s, g),
            _ => {
                return Err(DelveError::InvalidConfig(format!(
                    "Start {} or goal {} lies outside the {}x{} dungeon",
                    start,
                    goal,
                    dungeon.rows(),
                    dungeon.columns()
                )))
            }
        };

        if start == goal {
            return Err(DelveError::InvalidConfig(
                "Start and goal must be different locations".to_string(),
            ));
        }
        if start_location.monster().is_some() {
            return Err(DelveError::InvalidConfig(format!(
                "Start {} must not hold an Otyugh",
                start
            )));
        }
        if !goal_location.monster().map_or(false, |m| m.is_boss()) {
            return Err(DelveError::InvalidConfig(format!(
                "Goal {} must hold the boss Otyugh",
                goal
            )));
        }
        if !PathAnalyzer::new(&dungeon).is_connected() {
            return Err(DelveError::InvalidConfig(
                "Every location must be reachable".to_string(),
            ));
        }

        info!(
            "New prebuilt {}x{} game: start {}, goal {}",
            dungeon.rows(),
            dungeon.columns(),
            start,
            goal
        );

        let built = GeneratedDungeon {
            dungeon,
            start,
            goal,
        };
        let rng = create_rng(&config);
        Ok(Self::assemble(config, built.clone(), rng, Some(built)))
    }

    fn assemble(
        config: GenerationConfig,
        built: GeneratedDungeon,
        rng: StdRng,
        prebuilt: Option<GeneratedDungeon>,
    ) -> Self {
        let player = Player::new(built.start, config.rules.starting_arrows);
        let mut visited = HashSet::new();
        visited.insert(built.start);

        Self {
            config,
            dungeon: built.dungeon,
            player,
            start: built.start,
            goal: built.goal,
            visited,
            statistics: GameStatistics::new(),
            rng,
            prebuilt,
        }
    }

    /// Starts the session over from the same configuration and seed.
    ///
    /// Replaying the same actions after a restart gives the same results.
    pub fn restart(&mut self) -> DelveResult<()> {
        let fresh = match &self.prebuilt {
            Some(built) => Self::from_dungeon(
                built.dungeon.clone(),
                built.start,
                built.goal,
                self.config.clone(),
            )?,
            None => Self::new(self.config.clone())?,
        };

        info!("Restarted game with seed {}", self.config.seed);
        *self = fresh;
        Ok(())
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Read-only access to the whole map.
    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn status(&self) -> PlayerStatus {
        self.player.status()
    }

    pub fn is_game_over(&self) -> bool {
        self.player.status().is_terminal()
    }

    pub fn statistics(&self) -> &GameStatistics {
        &self.statistics
    }

    /// Whether the player has stood at `position` this session.
    pub fn is_visited(&self, position: Position) -> bool {
        self.visited.contains(&position)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    fn ensure_playing(&self) -> DelveResult<()> {
        if self.is_game_over() {
            return Err(DelveError::IllegalState(format!(
                "The game is over: {:?}",
                self.player.status()
            )));
        }
        Ok(())
    }

    fn current_location_mut(&mut self) -> DelveResult<&mut Location> {
        let position = self.player.position();
        self.dungeon
            .location_mut(position)
            .ok_or_else(|| DelveError::IllegalState(format!("Player is lost at {}", position)))
    }

    /// Moves the player one location and resolves what waits there.
    ///
    /// Arrival resolves a pit first, then an Otyugh, then the goal.
    pub fn move_player(&mut self, direction: Direction) -> DelveResult<PlayerStatus> {
        self.ensure_playing()?;

        let from = self.player.position();
        let to = self.dungeon.neighbor(from, direction).ok_or_else(|| {
            DelveError::IllegalState(format!("No exit {} from {}", direction, from))
        })?;

        self.player.set_position(to);
        self.visited.insert(to);
        self.statistics.steps_taken += 1;
        debug!("Player moved {} from {} to {}", direction, from, to);

        self.resolve_arrival(to);
        Ok(self.player.status())
    }

    fn resolve_arrival(&mut self, position: Position) {
        let Some(location) = self.dungeon.location(position) else {
            return;
        };
        let has_pit = location.has_pit();
        let monster = location.monster().copied();
        let rules = &self.config.rules;

        if has_pit && self.rng.gen_bool(rules.pit_fall_chance) {
            debug!("Player fell into the pit at {}", position);
            self.player.set_status(PlayerStatus::FallenInPit);
            return;
        }

        if let Some(monster) = monster.filter(|m| m.is_alive()) {
            if !monster.is_injured() && self.rng.gen_bool(rules.monster_kill_chance) {
                debug!("Otyugh at {} ate the player", position);
                self.player.set_status(PlayerStatus::Killed);
                return;
            }
            debug!("Player escaped the Otyugh at {}", position);
        }

        let boss_defeated = monster.map_or(true, |m| !m.is_alive());
        if position == self.goal && boss_defeated {
            info!("Player reached the goal at {}", position);
            self.player.set_status(PlayerStatus::ReachedEnd);
        }
    }

    /// Picks up one unit of `kind` from the player's location.
    pub fn pick_treasure(&mut self, kind: Treasure) -> DelveResult<()> {
        self.ensure_playing()?;

        self.current_location_mut()?.take_treasure(kind)?;
        self.player.add_treasure(kind, 1);
        self.statistics.treasure_collected += 1;
        debug!("Player picked up a {}", kind);
        Ok(())
    }

    /// Picks up every arrow at the player's location and returns how many.
    pub fn pick_arrow(&mut self) -> DelveResult<u32> {
        self.ensure_playing()?;

        let location = self.current_location_mut()?;
        if location.arrows() == 0 {
            return Err(DelveError::IllegalState(format!(
                "No arrows at {}",
                location.position()
            )));
        }
        let picked = location.take_arrows();

        self.player.add_arrows(picked);
        self.statistics.arrows_collected += picked;
        debug!("Player picked up {} arrows", picked);
        Ok(picked)
    }

    /// Shoots an arrow `distance` edges toward `direction`.
    ///
    /// The arrow is spent whatever it hits. An Otyugh in the cave where the
    /// arrow comes to rest loses one point of health; nothing tells the
    /// caller whether that happened.
    pub fn shoot_arrow(&mut self, distance: usize, direction: Direction) -> DelveResult<()> {
        self.ensure_playing()?;

        if distance < 1 {
            return Err(DelveError::IllegalArgument(format!(
                "Shooting distance must be at least 1, got {}",
                distance
            )));
        }
        self.player.spend_arrow()?;
        self.statistics.arrows_fired += 1;

        let from = self.player.position();
        let landing = PathAnalyzer::new(&self.dungeon).arrow_path(from, direction, distance);
        let Some(target) = landing else {
            debug!("Arrow shot {} from {} hit a wall", direction, from);
            return Ok(());
        };

        if let Some(location) = self.dungeon.location_mut(target).filter(|l| l.is_cave()) {
            if let Some(monster) = location.monster_mut().filter(|m| m.is_alive()) {
                let health = monster.take_hit();
                debug!("Arrow hit the Otyugh at {}, health now {}", target, health);
                return Ok(());
            }
        }

        debug!("Arrow landed at {} without hitting anything", target);
        Ok(())
    }

    /// Lets a thief at the player's location rob them.
    ///
    /// A thief strikes at most once per cooldown window, taking a random
    /// share of every kind of treasure the player holds. Returns whether
    /// anything was taken.
    pub fn check_treasure_stolen(&mut self, now_millis: u64) -> DelveResult<bool> {
        self.ensure_playing()?;

        let position = self.player.position();
        let thief_here = self
            .dungeon
            .location(position)
            .map_or(false, |l| l.has_thief());
        if !thief_here {
            return Ok(false);
        }

        if let Some(last) = self.player.last_robbed_at() {
            if now_millis.saturating_sub(last) < self.config.rules.thief_cooldown_ms {
                return Ok(false);
            }
        }

        let held: Vec<(Treasure, u32)> = self
            .player
            .treasure()
            .iter()
            .map(|(kind, count)| (*kind, *count))
            .collect();

        let mut stolen = 0;
        for (kind, count) in held {
            let amount = self.rng.gen_range(1..=count);
            stolen += self.player.remove_treasure(kind, amount);
        }

        self.player.mark_robbed(now_millis);
        self.statistics.times_robbed += 1;
        debug!("Thief at {} stole {} treasure", position, stolen);
        Ok(stolen > 0)
    }

    /// Builds the read-only view of the player's surroundings.
    pub fn view(&self) -> GameView {
        let position = self.player.position();
        let fallback;
        let location = match self.dungeon.location(position) {
            Some(location) => location,
            None => {
                fallback = Location::new(position);
                &fallback
            }
        };
        let paths = PathAnalyzer::new(&self.dungeon);

        GameView {
            position,
            kind: location.kind(),
            possible_moves: location.possible_moves(),
            location_treasure: location.treasure().clone(),
            location_arrows: location.arrows(),
            monster: location.monster().map(|m| MonsterView {
                health: m.health(),
                boss: m.is_boss(),
            }),
            has_pit: location.has_pit(),
            has_thief: location.has_thief(),
            smell: paths.smell_at(position),
            sound: paths.sound_at(position),
            player_treasure: self.player.treasure().clone(),
            player_arrows: self.player.arrows(),
            status: self.player.status(),
            at_start: position == self.start,
            at_goal: position == self.goal,
            visited_count: self.visited.len(),
        }
    }
}
