//! # Path Analysis
//!
//! Breadth-first distances over the open edges of a dungeon. Used to keep
//! the goal far enough from the start and to work out what the player can
//! smell and hear from where they stand.

use crate::{Direction, Dungeon, Position, Smell, Sound};
use pathfinding::prelude::{bfs, bfs_reach};
use std::collections::{HashMap, VecDeque};

/// Read-only distance queries over a dungeon.
#[derive(Debug, Clone, Copy)]
pub struct PathAnalyzer<'a> {
    dungeon: &'a Dungeon,
}

impl<'a> PathAnalyzer<'a> {
    pub fn new(dungeon: &'a Dungeon) -> Self {
        Self { dungeon }
    }

    /// Length, in edges, of the shortest path from `from` to `to`.
    ///
    /// `None` only when no path exists, which a generated dungeon rules out.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Direction, Dungeon, PathAnalyzer, Position};
    ///
    /// let mut dungeon = Dungeon::new(5, 5, false).unwrap();
    /// let a = Position::new(0, 0);
    /// let b = dungeon.connect(a, Direction::East).unwrap();
    /// let c = dungeon.connect(b, Direction::South).unwrap();
    ///
    /// let paths = PathAnalyzer::new(&dungeon);
    /// assert_eq!(paths.distance(a, c), Some(2));
    /// assert_eq!(paths.distance(a, a), Some(0));
    /// assert_eq!(paths.distance(a, Position::new(4, 4)), None);
    /// ```
    pub fn distance(&self, from: Position, to: Position) -> Option<usize> {
        if !self.dungeon.contains(from) || !self.dungeon.contains(to) {
            return None;
        }
        bfs(
            &from,
            |p| self.dungeon.open_neighbors(*p),
            |p| *p == to,
        )
        .map(|path| path.len() - 1)
    }

    /// Distances from `start` to every location within `max_depth` edges,
    /// or to every reachable location when `max_depth` is `None`.
    pub fn distances_from(
        &self,
        start: Position,
        max_depth: Option<usize>,
    ) -> HashMap<Position, usize> {
        let mut distances = HashMap::new();
        if !self.dungeon.contains(start) {
            return distances;
        }

        let mut queue = VecDeque::new();
        distances.insert(start, 0);
        queue.push_back(start);

        while let Some(position) = queue.pop_front() {
            let depth = distances[&position];
            if max_depth.map_or(false, |max| depth >= max) {
                continue;
            }
            for next in self.dungeon.open_neighbors(position) {
                if !distances.contains_key(&next) {
                    distances.insert(next, depth + 1);
                    queue.push_back(next);
                }
            }
        }

        distances
    }

    /// Whether every location can be reached from every other.
    pub fn is_connected(&self) -> bool {
        match self.dungeon.positions().next() {
            Some(first) => {
                bfs_reach(first, |p| self.dungeon.open_neighbors(*p)).count()
                    == self.dungeon.len()
            }
            None => true,
        }
    }

    /// Where an arrow shot from `from` toward `direction` comes to rest
    /// after exactly `distance` edges.
    ///
    /// The arrow flies straight through caves and follows the bend of every
    /// tunnel it enters. `None` when the flight runs into a wall first.
    pub fn arrow_path(
        &self,
        from: Position,
        direction: Direction,
        distance: usize,
    ) -> Option<Position> {
        let mut here = from;
        let mut heading = direction;

        for hop in 0..distance {
            let location = self.dungeon.location(here)?;
            let exit = if hop > 0 && location.is_tunnel() {
                location
                    .exits()
                    .directions()
                    .into_iter()
                    .find(|d| *d != heading.opposite())?
            } else {
                heading
            };
            here = self.dungeon.neighbor(here, exit)?;
            heading = exit;
        }

        Some(here)
    }

    /// Otyugh smell at `position`.
    ///
    /// Any live Otyugh within one edge, or two or more at exactly two edges,
    /// smells strong. A single one at two edges smells faint.
    pub fn smell_at(&self, position: Position) -> Smell {
        let mut near = 0;
        let mut far = 0;

        for (at, depth) in self.distances_from(position, Some(2)) {
            let live = self
                .dungeon
                .location(at)
                .map(|l| l.has_live_monster())
                .unwrap_or(false);
            if !live {
                continue;
            }
            if depth <= 1 {
                near += 1;
            } else {
                far += 1;
            }
        }

        match (near, far) {
            (0, 0) => Smell::Nothing,
            (0, 1) => Smell::Faint,
            _ => Smell::Strong,
        }
    }

    /// Thief cackling at `position`: audible when a thief is within one edge.
    pub fn sound_at(&self, position: Position) -> Sound {
        let heard = self
            .distances_from(position, Some(1))
            .keys()
            .filter_map(|at| self.dungeon.location(*at))
            .any(|l| l.has_thief());

        if heard {
            Sound::Cackling
        } else {
            Sound::Silent
        }
    }
}
