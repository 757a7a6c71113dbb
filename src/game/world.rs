//! # World Module
//!
//! The dungeon arena: a rows × columns grid of locations joined by edges.
//!
//! Edges are stored on both endpoints as direction bitmasks rather than as
//! links between locations, so the dungeon owns every location outright and
//! neighbors are resolved through grid arithmetic. A location's kind is never
//! stored; it is derived from the number of open exits each time it is asked.

use crate::{config, DelveError, DelveResult, Direction, Position};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// The set of open exits of a location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Exits(u8);

impl Exits {
    /// An exit set with nothing open.
    pub fn none() -> Self {
        Self(0)
    }

    /// Whether the exit toward `direction` is open.
    pub fn is_open(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    /// Opens the exit toward `direction`.
    pub fn open(&mut self, direction: Direction) {
        self.0 |= direction.bit();
    }

    /// Number of open exits.
    pub fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Open directions in [`Direction::ALL`] order.
    pub fn directions(self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| self.is_open(*d))
            .collect()
    }
}

/// Caves have one, three or four exits. Tunnels have exactly two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationKind {
    Cave,
    Tunnel,
}

impl LocationKind {
    /// Classifies a location from its exits.
    pub fn classify(exits: Exits) -> Self {
        if exits.count() == 2 {
            LocationKind::Tunnel
        } else {
            LocationKind::Cave
        }
    }
}

/// Kinds of treasure found in caves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Treasure {
    Diamond,
    Ruby,
    Sapphire,
}

impl Treasure {
    /// Every treasure kind.
    pub const ALL: [Treasure; 3] = [Treasure::Diamond, Treasure::Ruby, Treasure::Sapphire];
}

impl fmt::Display for Treasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Treasure::Diamond => "diamond",
            Treasure::Ruby => "ruby",
            Treasure::Sapphire => "sapphire",
        };
        f.write_str(name)
    }
}

impl FromStr for Treasure {
    type Err = DelveError;

    fn from_str(s: &str) -> DelveResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "diamond" | "diamonds" => Ok(Treasure::Diamond),
            "ruby" | "rubies" => Ok(Treasure::Ruby),
            "sapphire" | "sapphires" => Ok(Treasure::Sapphire),
            other => Err(DelveError::IllegalArgument(format!(
                "Unknown treasure '{}'",
                other
            ))),
        }
    }
}

/// An Otyugh, the cave-dwelling monster.
///
/// Health runs 2 (uninjured) → 1 (injured) → 0 (dead); each arrow hit
/// removes one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Otyugh {
    health: u8,
    boss: bool,
}

impl Otyugh {
    /// Creates an uninjured Otyugh.
    pub fn new() -> Self {
        Self {
            health: config::OTYUGH_FULL_HEALTH,
            boss: false,
        }
    }

    /// Creates the boss Otyugh that guards the goal.
    pub fn boss() -> Self {
        Self {
            health: config::OTYUGH_FULL_HEALTH,
            boss: true,
        }
    }

    pub fn health(&self) -> u8 {
        self.health
    }

    pub fn is_boss(&self) -> bool {
        self.boss
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_injured(&self) -> bool {
        self.is_alive() && self.health < config::OTYUGH_FULL_HEALTH
    }

    /// Applies one arrow hit and returns the remaining health.
    pub fn take_hit(&mut self) -> u8 {
        self.health = self.health.saturating_sub(1);
        self.health
    }
}

impl Default for Otyugh {
    fn default() -> Self {
        Self::new()
    }
}

/// A single node of the dungeon graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    position: Position,
    exits: Exits,
    treasure: BTreeMap<Treasure, u32>,
    arrows: u32,
    monster: Option<Otyugh>,
    pit: bool,
    thief: bool,
}

impl Location {
    /// Creates an empty location with no exits.
    pub fn new(position: Position) -> Self {
        Self {
            position,
            exits: Exits::none(),
            treasure: BTreeMap::new(),
            arrows: 0,
            monster: None,
            pit: false,
            thief: false,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn exits(&self) -> Exits {
        self.exits
    }

    pub fn kind(&self) -> LocationKind {
        LocationKind::classify(self.exits)
    }

    pub fn is_cave(&self) -> bool {
        self.kind() == LocationKind::Cave
    }

    pub fn is_tunnel(&self) -> bool {
        self.kind() == LocationKind::Tunnel
    }

    /// Directions the player may move from here.
    pub fn possible_moves(&self) -> Vec<Direction> {
        self.exits.directions()
    }

    pub fn treasure(&self) -> &BTreeMap<Treasure, u32> {
        &self.treasure
    }

    pub fn treasure_count(&self, kind: Treasure) -> u32 {
        self.treasure.get(&kind).copied().unwrap_or(0)
    }

    pub fn has_treasure(&self) -> bool {
        self.treasure.values().any(|count| *count > 0)
    }

    /// Adds treasure to a cave. Tunnels never hold treasure.
    pub fn add_treasure(&mut self, kind: Treasure, count: u32) -> DelveResult<()> {
        self.require_cave("treasure")?;
        if count > 0 {
            *self.treasure.entry(kind).or_insert(0) += count;
        }
        Ok(())
    }

    /// Removes a single unit of `kind`.
    pub fn take_treasure(&mut self, kind: Treasure) -> DelveResult<()> {
        let remaining = match self.treasure.get_mut(&kind) {
            Some(count) if *count > 0 => {
                *count -= 1;
                *count
            }
            _ => {
                return Err(DelveError::IllegalState(format!(
                    "No {} at {}",
                    kind, self.position
                )))
            }
        };
        if remaining == 0 {
            self.treasure.remove(&kind);
        }
        Ok(())
    }

    pub fn arrows(&self) -> u32 {
        self.arrows
    }

    pub fn add_arrows(&mut self, count: u32) {
        self.arrows += count;
    }

    /// Removes and returns every arrow lying here.
    pub fn take_arrows(&mut self) -> u32 {
        std::mem::take(&mut self.arrows)
    }

    pub fn monster(&self) -> Option<&Otyugh> {
        self.monster.as_ref()
    }

    pub fn monster_mut(&mut self) -> Option<&mut Otyugh> {
        self.monster.as_mut()
    }

    pub fn has_live_monster(&self) -> bool {
        self.monster.map(|m| m.is_alive()).unwrap_or(false)
    }

    /// Puts an Otyugh in this cave. A cave holds at most one.
    pub fn place_monster(&mut self, monster: Otyugh) -> DelveResult<()> {
        self.require_cave("an Otyugh")?;
        if self.monster.is_some() {
            return Err(DelveError::IllegalArgument(format!(
                "{} already holds an Otyugh",
                self.position
            )));
        }
        self.monster = Some(monster);
        Ok(())
    }

    pub fn has_pit(&self) -> bool {
        self.pit
    }

    pub fn place_pit(&mut self) -> DelveResult<()> {
        self.require_cave("a pit")?;
        self.pit = true;
        Ok(())
    }

    pub fn has_thief(&self) -> bool {
        self.thief
    }

    pub fn place_thief(&mut self) -> DelveResult<()> {
        self.require_cave("a thief")?;
        self.thief = true;
        Ok(())
    }

    fn require_cave(&self, what: &str) -> DelveResult<()> {
        if self.is_tunnel() {
            return Err(DelveError::IllegalArgument(format!(
                "Tunnel at {} cannot hold {}",
                self.position, what
            )));
        }
        Ok(())
    }
}

/// The full grid of locations and the edges between them.
///
/// # Examples
///
/// ```
/// use delve::{Direction, Dungeon, Position};
///
/// let mut dungeon = Dungeon::new(5, 5, false).unwrap();
/// let east = dungeon.connect(Position::new(0, 0), Direction::East).unwrap();
/// assert_eq!(east, Position::new(0, 1));
/// assert_eq!(dungeon.neighbor(east, Direction::West), Some(Position::new(0, 0)));
/// assert_eq!(dungeon.edge_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dungeon {
    rows: usize,
    columns: usize,
    wrapping: bool,
    locations: Vec<Location>,
}

impl Dungeon {
    /// Creates a grid with every location isolated.
    pub fn new(rows: usize, columns: usize, wrapping: bool) -> DelveResult<Self> {
        if rows < config::MIN_GRID_DIMENSION || columns < config::MIN_GRID_DIMENSION {
            return Err(DelveError::InvalidConfig(format!(
                "Dungeon must be at least {}x{}, got {}x{}",
                config::MIN_GRID_DIMENSION,
                config::MIN_GRID_DIMENSION,
                rows,
                columns
            )));
        }
        if rows > config::MAX_GRID_DIMENSION || columns > config::MAX_GRID_DIMENSION {
            return Err(DelveError::InvalidConfig(format!(
                "Dungeon must be at most {}x{}, got {}x{}",
                config::MAX_GRID_DIMENSION,
                config::MAX_GRID_DIMENSION,
                rows,
                columns
            )));
        }

        let locations = (0..rows)
            .flat_map(|row| (0..columns).map(move |col| Location::new(Position::new(row, col))))
            .collect();

        Ok(Self {
            rows,
            columns,
            wrapping,
            locations,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn is_wrapping(&self) -> bool {
        self.wrapping
    }

    /// Total number of locations.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn contains(&self, position: Position) -> bool {
        position.row < self.rows && position.col < self.columns
    }

    /// Arena index of a position.
    pub fn index_of(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.row * self.columns + position.col)
    }

    /// Position stored at an arena index.
    pub fn position_at(&self, index: usize) -> Option<Position> {
        (index < self.locations.len())
            .then(|| Position::new(index / self.columns, index % self.columns))
    }

    pub fn location(&self, position: Position) -> Option<&Location> {
        self.index_of(position).map(|i| &self.locations[i])
    }

    pub fn location_mut(&mut self, position: Position) -> Option<&mut Location> {
        let index = self.index_of(position)?;
        Some(&mut self.locations[index])
    }

    /// Like [`Dungeon::location_mut`], but reports a missing position as an error.
    pub fn try_location_mut(&mut self, position: Position) -> DelveResult<&mut Location> {
        let index = self.index_of(position).ok_or_else(|| {
            DelveError::IllegalArgument(format!("{} is outside the dungeon", position))
        })?;
        Ok(&mut self.locations[index])
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.locations.iter().map(|l| l.position())
    }

    /// Positions of every cave.
    pub fn caves(&self) -> Vec<Position> {
        self.locations
            .iter()
            .filter(|l| l.is_cave())
            .map(|l| l.position())
            .collect()
    }

    /// Positions of every tunnel.
    pub fn tunnels(&self) -> Vec<Position> {
        self.locations
            .iter()
            .filter(|l| l.is_tunnel())
            .map(|l| l.position())
            .collect()
    }

    /// Grid neighbor in `direction`, ignoring edges.
    ///
    /// Returns `None` when the step would leave a non-wrapping grid.
    pub fn step(&self, position: Position, direction: Direction) -> Option<Position> {
        if !self.contains(position) {
            return None;
        }
        let (dr, dc) = direction.to_delta();
        let row = position.row as isize + dr;
        let col = position.col as isize + dc;
        let (rows, cols) = (self.rows as isize, self.columns as isize);

        if self.wrapping {
            Some(Position::new(
                row.rem_euclid(rows) as usize,
                col.rem_euclid(cols) as usize,
            ))
        } else if row < 0 || col < 0 || row >= rows || col >= cols {
            None
        } else {
            Some(Position::new(row as usize, col as usize))
        }
    }

    /// Neighbor reached through an open edge in `direction`.
    pub fn neighbor(&self, position: Position, direction: Direction) -> Option<Position> {
        let location = self.location(position)?;
        if !location.exits().is_open(direction) {
            return None;
        }
        self.step(position, direction)
    }

    /// Every neighbor reachable over one open edge.
    pub fn open_neighbors(&self, position: Position) -> Vec<Position> {
        Direction::ALL
            .into_iter()
            .filter_map(|d| self.neighbor(position, d))
            .collect()
    }

    /// Opens the edge between `position` and its grid neighbor in `direction`,
    /// on both endpoints, and returns the neighbor.
    pub fn connect(&mut self, position: Position, direction: Direction) -> DelveResult<Position> {
        let other = self.step(position, direction).ok_or_else(|| {
            DelveError::IllegalArgument(format!(
                "No location {} of {} in this dungeon",
                direction, position
            ))
        })?;

        if self.try_location_mut(position)?.exits().is_open(direction) {
            return Err(DelveError::IllegalArgument(format!(
                "{} is already open toward {}",
                position, direction
            )));
        }

        self.try_location_mut(position)?.exits.open(direction);
        self.try_location_mut(other)?.exits.open(direction.opposite());
        Ok(other)
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.locations.iter().map(|l| l.exits().count()).sum::<usize>() / 2
    }

    /// Every undirected edge as an ordered pair, smaller position first.
    pub fn edges(&self) -> BTreeSet<(Position, Position)> {
        let mut edges = BTreeSet::new();
        for location in &self.locations {
            let here = location.position();
            for other in self.open_neighbors(here) {
                edges.insert((here.min(other), here.max(other)));
            }
        }
        edges
    }

    /// Whether every open exit has a matching exit on the other side.
    pub fn is_symmetric(&self) -> bool {
        self.locations.iter().all(|location| {
            location.exits().directions().into_iter().all(|d| {
                self.step(location.position(), d)
                    .and_then(|other| self.location(other))
                    .map(|other| other.exits().is_open(d.opposite()))
                    .unwrap_or(false)
            })
        })
    }
}
