//! # Entities Module
//!
//! The player character and the states a run can end in.

use crate::{DelveError, DelveResult, Position, Treasure};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where the player stands in the life of a run.
///
/// Everything except [`PlayerStatus::Playing`] is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    /// Alive and still exploring
    Playing,
    /// Eaten by an Otyugh
    Killed,
    /// Fell into a bottomless pit
    FallenInPit,
    /// Entered the goal cave after the boss was slain
    ReachedEnd,
}

impl PlayerStatus {
    pub fn is_terminal(self) -> bool {
        self != PlayerStatus::Playing
    }
}

/// The adventurer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    position: Position,
    treasure: BTreeMap<Treasure, u32>,
    arrows: u32,
    status: PlayerStatus,
    last_robbed_at: Option<u64>,
}

impl Player {
    /// Creates a player standing at `position` with a quiver of `arrows`.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Player, PlayerStatus, Position};
    ///
    /// let player = Player::new(Position::new(1, 2), 3);
    /// assert_eq!(player.arrows(), 3);
    /// assert_eq!(player.status(), PlayerStatus::Playing);
    /// ```
    pub fn new(position: Position, arrows: u32) -> Self {
        Self {
            position,
            treasure: BTreeMap::new(),
            arrows,
            status: PlayerStatus::Playing,
            last_robbed_at: None,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn treasure(&self) -> &BTreeMap<Treasure, u32> {
        &self.treasure
    }

    pub fn treasure_count(&self, kind: Treasure) -> u32 {
        self.treasure.get(&kind).copied().unwrap_or(0)
    }

    /// Total units of treasure carried, all kinds together.
    pub fn total_treasure(&self) -> u32 {
        self.treasure.values().sum()
    }

    pub(crate) fn add_treasure(&mut self, kind: Treasure, count: u32) {
        if count > 0 {
            *self.treasure.entry(kind).or_insert(0) += count;
        }
    }

    /// Removes up to `count` units of `kind` and returns how many were taken.
    pub(crate) fn remove_treasure(&mut self, kind: Treasure, count: u32) -> u32 {
        let held = self.treasure_count(kind);
        let taken = held.min(count);
        if taken == held {
            self.treasure.remove(&kind);
        } else if let Some(entry) = self.treasure.get_mut(&kind) {
            *entry -= taken;
        }
        taken
    }

    pub fn arrows(&self) -> u32 {
        self.arrows
    }

    pub(crate) fn add_arrows(&mut self, count: u32) {
        self.arrows += count;
    }

    pub(crate) fn spend_arrow(&mut self) -> DelveResult<()> {
        if self.arrows == 0 {
            return Err(DelveError::IllegalArgument(
                "Out of arrows".to_string(),
            ));
        }
        self.arrows -= 1;
        Ok(())
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: PlayerStatus) {
        self.status = status;
    }

    pub fn is_alive(&self) -> bool {
        !matches!(
            self.status,
            PlayerStatus::Killed | PlayerStatus::FallenInPit
        )
    }

    pub fn is_killed(&self) -> bool {
        self.status == PlayerStatus::Killed
    }

    pub fn has_fallen(&self) -> bool {
        self.status == PlayerStatus::FallenInPit
    }

    pub fn has_reached_end(&self) -> bool {
        self.status == PlayerStatus::ReachedEnd
    }

    /// Timestamp, in milliseconds, of the most recent theft.
    pub fn last_robbed_at(&self) -> Option<u64> {
        self.last_robbed_at
    }

    pub(crate) fn mark_robbed(&mut self, now_millis: u64) {
        self.last_robbed_at = Some(now_millis);
    }
}
