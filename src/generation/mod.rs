//! # Generation Module
//!
//! Procedural dungeon construction: the cave graph, start and goal
//! selection, and the treasure, arrows and encounters that fill it.
//!
//! Every step draws from one seeded [`StdRng`], so the same configuration
//! always produces the same dungeon.

pub mod dungeon;
pub mod encounters;
pub mod items;

pub use dungeon::*;
pub use encounters::*;
pub use items::*;

use crate::{config, DelveError, DelveResult, Dungeon, PathAnalyzer, Position};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for building a game session.
///
/// Controls the shape of the dungeon, how much is placed in it, and the
/// rules the engine plays by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation and play
    pub seed: u64,
    /// Number of grid rows
    pub rows: usize,
    /// Number of grid columns
    pub columns: usize,
    /// Whether edges may cross the grid border to the opposite side
    pub wrapping: bool,
    /// Extra edges added on top of the spanning tree
    pub interconnectivity: usize,
    /// Percentage of caves given treasure, and of all locations given arrows
    pub treasure_percent: u32,
    /// Number of Otyughs, the boss included
    pub monsters: usize,
    /// Number of thieves
    pub thieves: usize,
    /// Number of pits
    pub pits: usize,
    /// Minimum number of edges between start and goal
    pub min_path_length: usize,
    /// Rules applied during play
    pub rules: GameRules,
}

/// Probabilities and limits the engine plays by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    /// Arrows in the player's quiver at the start
    pub starting_arrows: u32,
    /// Chance that arriving at a pit location is fatal (0.0 to 1.0)
    pub pit_fall_chance: f64,
    /// Chance that an uninjured Otyugh eats an arriving player (0.0 to 1.0)
    pub monster_kill_chance: f64,
    /// Minimum milliseconds between two thefts
    pub thief_cooldown_ms: u64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            starting_arrows: config::DEFAULT_STARTING_ARROWS,
            pit_fall_chance: config::DEFAULT_PIT_FALL_CHANCE,
            monster_kill_chance: config::DEFAULT_MONSTER_KILL_CHANCE,
            thief_cooldown_ms: config::DEFAULT_THIEF_COOLDOWN_MS,
        }
    }
}

impl GenerationConfig {
    /// Creates a default configuration with the given seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rows: config::DEFAULT_ROWS,
            columns: config::DEFAULT_COLUMNS,
            wrapping: false,
            interconnectivity: config::DEFAULT_INTERCONNECTIVITY,
            treasure_percent: config::DEFAULT_TREASURE_PERCENT,
            monsters: config::DEFAULT_MONSTERS,
            thieves: config::DEFAULT_THIEVES,
            pits: config::DEFAULT_PITS,
            min_path_length: config::MIN_PATH_LENGTH,
            rules: GameRules::default(),
        }
    }

    /// Creates a configuration for testing: the smallest grid, a plain tree
    /// and only the boss Otyugh.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            rows: config::MIN_GRID_DIMENSION,
            columns: config::MIN_GRID_DIMENSION,
            wrapping: false,
            interconnectivity: 0,
            treasure_percent: 20,
            monsters: 1,
            thieves: 0,
            pits: 0,
            min_path_length: config::MIN_PATH_LENGTH,
            rules: GameRules::default(),
        }
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> DelveResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> DelveResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Number of edges the full candidate grid offers.
    ///
    /// Saturates at `usize::MAX` for grids too large to count.
    pub fn candidate_edge_count(&self) -> usize {
        let count = if self.wrapping {
            self.rows
                .checked_mul(self.columns)
                .and_then(|cells| cells.checked_mul(2))
        } else {
            let across = self.rows.checked_mul(self.columns.saturating_sub(1));
            let down = self.columns.checked_mul(self.rows.saturating_sub(1));
            across
                .zip(down)
                .and_then(|(across, down)| across.checked_add(down))
        };
        count.unwrap_or(usize::MAX)
    }

    /// Number of edges in any spanning tree of the grid.
    pub fn spanning_edge_count(&self) -> usize {
        self.rows
            .checked_mul(self.columns)
            .map_or(usize::MAX, |cells| cells.saturating_sub(1))
    }

    /// Checks the parameters that can be judged before any dungeon exists.
    ///
    /// Entity counts are checked again against the caves of the built graph.
    pub fn validate(&self) -> DelveResult<()> {
        let reject = |message: String| -> DelveResult<()> {
            warn!("Rejecting configuration: {}", message);
            Err(DelveError::InvalidConfig(message))
        };

        if self.rows < config::MIN_GRID_DIMENSION || self.columns < config::MIN_GRID_DIMENSION {
            return reject(format!(
                "Dungeon must be at least {}x{}, got {}x{}",
                config::MIN_GRID_DIMENSION,
                config::MIN_GRID_DIMENSION,
                self.rows,
                self.columns
            ));
        }

        if self.rows > config::MAX_GRID_DIMENSION || self.columns > config::MAX_GRID_DIMENSION {
            return reject(format!(
                "Dungeon must be at most {}x{}, got {}x{}",
                config::MAX_GRID_DIMENSION,
                config::MAX_GRID_DIMENSION,
                self.rows,
                self.columns
            ));
        }

        let spare = self
            .candidate_edge_count()
            .saturating_sub(self.spanning_edge_count());
        if self.interconnectivity > spare {
            return reject(format!(
                "Interconnectivity {} exceeds the {} edges left after the spanning tree",
                self.interconnectivity, spare
            ));
        }

        if self.treasure_percent > 100 {
            return reject(format!(
                "Treasure percentage must be at most 100, got {}",
                self.treasure_percent
            ));
        }

        if self.monsters == 0 {
            return reject("At least one Otyugh is needed to guard the goal".to_string());
        }

        if self.min_path_length == 0 {
            return reject("Minimum path length must be positive".to_string());
        }

        for (name, chance) in [
            ("Pit fall chance", self.rules.pit_fall_chance),
            ("Monster kill chance", self.rules.monster_kill_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return reject(format!("{} must be within 0.0..=1.0, got {}", name, chance));
            }
        }

        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// A fully populated dungeon and the two locations that frame a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedDungeon {
    pub dungeon: Dungeon,
    pub start: Position,
    pub goal: Position,
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> DelveResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Trait for systems that decorate an existing dungeon with content.
pub trait Placer {
    /// Places content, never at locations the rules forbid for it.
    fn place(
        &self,
        dungeon: &mut Dungeon,
        start: Position,
        goal: Position,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> DelveResult<()>;

    /// Gets the placer type name for logging and debugging.
    fn placer_type(&self) -> &'static str;
}

/// Creates a seeded random number generator from the config.
pub fn create_rng(config: &GenerationConfig) -> StdRng {
    StdRng::seed_from_u64(config.seed)
}

/// Picks a start cave and a goal cave at least `min_path_length` edges apart.
pub fn choose_endpoints(
    dungeon: &Dungeon,
    min_path_length: usize,
    rng: &mut StdRng,
) -> DelveResult<(Position, Position)> {
    let mut caves = dungeon.caves();
    caves.shuffle(rng);
    let paths = PathAnalyzer::new(dungeon);

    for &start in &caves {
        let distances = paths.distances_from(start, None);
        let goals: Vec<Position> = caves
            .iter()
            .copied()
            .filter(|cave| {
                distances
                    .get(cave)
                    .map_or(false, |distance| *distance >= min_path_length)
            })
            .collect();

        if let Some(&goal) = goals.choose(rng) {
            debug!(
                "Start {} and goal {} are {} edges apart",
                start, goal, distances[&goal]
            );
            return Ok((start, goal));
        }
    }

    Err(DelveError::InvalidConfig(format!(
        "No pair of caves is at least {} edges apart",
        min_path_length
    )))
}

/// Runs the whole pipeline: graph, endpoints, items, encounters.
///
/// # Examples
///
/// ```
/// use delve::{generation, GenerationConfig, PathAnalyzer};
///
/// let config = GenerationConfig::for_testing(99);
/// let mut rng = generation::create_rng(&config);
/// let built = generation::build_dungeon(&config, &mut rng).unwrap();
///
/// let distance = PathAnalyzer::new(&built.dungeon).distance(built.start, built.goal);
/// assert!(distance.unwrap() >= 5);
/// ```
pub fn build_dungeon(config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<GeneratedDungeon> {
    config.validate()?;

    let generator = MazeGenerator::new();
    let mut dungeon = generator.generate(config, rng)?;
    generator.validate(&dungeon, config)?;

    let (start, goal) = choose_endpoints(&dungeon, config.min_path_length, rng)?;

    let placers: [&dyn Placer; 2] = [&ItemPlacer, &EncounterPlacer];
    for placer in placers {
        placer.place(&mut dungeon, start, goal, config, rng)?;
        debug!("{} finished", placer.placer_type());
    }

    Ok(GeneratedDungeon {
        dungeon,
        start,
        goal,
    })
}
