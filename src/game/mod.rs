//! # Game Module
//!
//! Core game state management, dungeon representation, and the action system.
//!
//! This module contains the fundamental building blocks of Delve:
//! - Grid coordinates and the four compass directions
//! - The dungeon arena of caves and tunnels
//! - The player and the Otyughs
//! - The action enum and the engine that executes it
//! - The read-only view handed to front-ends

pub mod actions;
pub mod entities;
pub mod state;
pub mod view;
pub mod world;

pub use actions::*;
pub use entities::*;
pub use state::*;
pub use view::*;
pub use world::*;

use crate::{DelveError, DelveResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A location coordinate in the dungeon grid.
///
/// # Examples
///
/// ```
/// use delve::Position;
///
/// let pos = Position::new(2, 3);
/// assert_eq!(pos.row, 2);
/// assert_eq!(pos.col, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Directions for movement and shooting.
///
/// North is toward row 0, West toward column 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// All four directions in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Returns the direction pointing the other way.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::Direction;
    ///
    /// assert_eq!(Direction::North.opposite(), Direction::South);
    /// assert_eq!(Direction::East.opposite(), Direction::West);
    /// ```
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Converts a direction to a (row, column) delta.
    pub fn to_delta(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }

    /// Bit used for this direction inside an exit mask.
    pub(crate) fn bit(self) -> u8 {
        match self {
            Direction::North => 0b0001,
            Direction::South => 0b0010,
            Direction::East => 0b0100,
            Direction::West => 0b1000,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        };
        f.write_str(name)
    }
}

impl FromStr for Direction {
    type Err = DelveError;

    /// Accepts compass names, screen names (up/down/left/right) and their initials.
    fn from_str(s: &str) -> DelveResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "n" | "north" | "u" | "up" => Ok(Direction::North),
            "s" | "south" | "d" | "down" => Ok(Direction::South),
            "e" | "east" | "r" | "right" => Ok(Direction::East),
            "w" | "west" | "l" | "left" => Ok(Direction::West),
            other => Err(DelveError::IllegalArgument(format!(
                "Unknown direction '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_creation() {
        let pos = Position::new(5, 10);
        assert_eq!(pos.row, 5);
        assert_eq!(pos.col, 10);
        assert_eq!(Position::origin(), Position::new(0, 0));
    }

    #[test]
    fn test_position_ordering_is_row_major() {
        assert!(Position::new(0, 4) < Position::new(1, 0));
        assert!(Position::new(2, 1) < Position::new(2, 3));
    }

    #[test]
    fn test_direction_opposites() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
    }

    #[test]
    fn test_direction_deltas_cancel() {
        for direction in Direction::ALL {
            let (dr, dc) = direction.to_delta();
            let (or, oc) = direction.opposite().to_delta();
            assert_eq!((dr + or, dc + oc), (0, 0));
        }
    }

    #[test]
    fn test_direction_bits_are_distinct() {
        let combined = Direction::ALL.iter().fold(0u8, |acc, d| acc | d.bit());
        assert_eq!(combined, 0b1111);
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("N".parse::<Direction>().unwrap(), Direction::North);
        assert_eq!("down".parse::<Direction>().unwrap(), Direction::South);
        assert_eq!(" east ".parse::<Direction>().unwrap(), Direction::East);
        assert_eq!("l".parse::<Direction>().unwrap(), Direction::West);
        assert!("sideways".parse::<Direction>().is_err());
    }
}
