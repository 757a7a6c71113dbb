//! # Delve
//!
//! A grid dungeon hunt: the player wanders a maze of caves and tunnels,
//! gathering treasure and arrows while avoiding pits, thieves and the
//! Otyughs that lurk in the caves. Slay the boss Otyugh guarding the goal
//! cave and walk in to win.
//!
//! ## Architecture Overview
//!
//! - **Generation**: a randomized spanning tree over the grid plus a tunable
//!   number of extra edges, followed by treasure, arrow and encounter placement
//! - **Path analysis**: breadth-first distances used for start/goal selection
//!   and for the smell and sound signals
//! - **Game State**: the single owner of the dungeon and the player, exposing
//!   an action API and a read-only [`GameView`] projection
//! - **Action System**: one [`PlayerAction`] enum shared by every front-end
//!
//! Front-ends never receive a mutable reference to the engine state. They
//! dispatch actions and read views.

pub mod game;
pub mod generation;
pub mod input;
pub mod utils;

pub use game::*;
pub use generation::*;
pub use input::*;
pub use utils::*;

pub use game::{
    // From actions
    ActionOutcome,
    PlayerAction,
    // From entities
    Player,
    PlayerStatus,
    // From state
    GameState,
    GameStatistics,
    // From view
    GameView,
    MonsterView,
    Smell,
    Sound,
    // From world
    Dungeon,
    Exits,
    Location,
    LocationKind,
    Otyugh,
    Treasure,
    // From game
    Direction,
    Position,
};

pub use generation::{
    EncounterPlacer, GameRules, GeneratedDungeon, GenerationConfig, Generator, ItemPlacer,
    MazeGenerator, Placer,
};

pub use utils::PathAnalyzer;

/// Core error type for the Delve game engine.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Construction parameters admit no valid game
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Action is not possible in the current game state
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// Action or construction call received a bad argument
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    /// Generated content failed its own validation
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

impl DelveError {
    /// Whether the caller can simply reprompt and keep driving the same session.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::DelveError;
    ///
    /// assert!(DelveError::IllegalState("no exit".to_string()).is_recoverable());
    /// assert!(!DelveError::InvalidConfig("rows".to_string()).is_recoverable());
    /// ```
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DelveError::IllegalState(_) | DelveError::IllegalArgument(_)
        )
    }
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Smallest number of rows or columns a dungeon may have
    pub const MIN_GRID_DIMENSION: usize = 5;

    /// Largest number of rows or columns a dungeon may have
    pub const MAX_GRID_DIMENSION: usize = 100;

    /// Default dungeon height in locations
    pub const DEFAULT_ROWS: usize = 6;

    /// Default dungeon width in locations
    pub const DEFAULT_COLUMNS: usize = 8;

    /// Default number of extra edges beyond the spanning tree
    pub const DEFAULT_INTERCONNECTIVITY: usize = 2;

    /// Default percentage of caves holding treasure
    pub const DEFAULT_TREASURE_PERCENT: u32 = 30;

    /// Default number of Otyughs, the boss included
    pub const DEFAULT_MONSTERS: usize = 3;

    /// Default number of thieves
    pub const DEFAULT_THIEVES: usize = 1;

    /// Default number of pits
    pub const DEFAULT_PITS: usize = 1;

    /// Minimum number of edges between start and goal
    pub const MIN_PATH_LENGTH: usize = 5;

    /// Arrows the player carries at the start
    pub const DEFAULT_STARTING_ARROWS: u32 = 3;

    /// Chance that arriving at a pit location ends the game
    pub const DEFAULT_PIT_FALL_CHANCE: f64 = 1.0;

    /// Chance that a full-health Otyugh eats an arriving player
    pub const DEFAULT_MONSTER_KILL_CHANCE: f64 = 0.5;

    /// Minimum time between two thefts, in milliseconds
    pub const DEFAULT_THIEF_COOLDOWN_MS: u64 = 10_000;

    /// Health of an uninjured Otyugh
    pub const OTYUGH_FULL_HEALTH: u8 = 2;

    /// Most treasure units a single cave can start with
    pub const MAX_TREASURE_PER_CAVE: u32 = 3;
}
