//! # View Module
//!
//! The read-only projection front-ends receive after every action.
//!
//! A [`GameView`] is rebuilt from the engine on each query and owns all of
//! its data, so holding one never keeps the engine borrowed and cannot be
//! used to change it.

use crate::{Direction, LocationKind, PlayerStatus, Position, Treasure};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How strongly the player smells nearby Otyughs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Smell {
    Nothing,
    Faint,
    Strong,
}

/// Whether a thief can be heard nearby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sound {
    Silent,
    Cackling,
}

/// What the player sees of an Otyugh sharing their location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterView {
    pub health: u8,
    pub boss: bool,
}

/// Snapshot of the player's surroundings and belongings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameView {
    /// Where the player stands
    pub position: Position,
    /// Cave or tunnel
    pub kind: LocationKind,
    /// Directions with an open exit
    pub possible_moves: Vec<Direction>,
    /// Treasure lying at the player's location
    pub location_treasure: BTreeMap<Treasure, u32>,
    /// Arrows lying at the player's location
    pub location_arrows: u32,
    /// Otyugh at the player's location, dead or alive
    pub monster: Option<MonsterView>,
    pub has_pit: bool,
    pub has_thief: bool,
    pub smell: Smell,
    pub sound: Sound,
    /// Treasure carried by the player
    pub player_treasure: BTreeMap<Treasure, u32>,
    /// Arrows carried by the player
    pub player_arrows: u32,
    pub status: PlayerStatus,
    pub at_start: bool,
    pub at_goal: bool,
    /// Number of distinct locations visited so far
    pub visited_count: usize,
}

impl GameView {
    pub fn is_killed(&self) -> bool {
        self.status == PlayerStatus::Killed
    }

    pub fn has_fallen(&self) -> bool {
        self.status == PlayerStatus::FallenInPit
    }

    pub fn has_reached_end(&self) -> bool {
        self.status == PlayerStatus::ReachedEnd
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn can_move(&self, direction: Direction) -> bool {
        self.possible_moves.contains(&direction)
    }
}
