//! # Dungeon Generation
//!
//! Builds the cave graph: a random spanning tree over the grid, then a
//! number of extra edges that add loops.
//!
//! This generator creates dungeons by:
//! 1. Listing every candidate edge of the grid (border-crossing ones too when wrapping)
//! 2. Shuffling the candidates and running Kruskal over the shuffled ranks
//! 3. Opening the tree edges, which connects every location
//! 4. Opening the first `interconnectivity` leftover candidates

use crate::{
    DelveError, DelveResult, Direction, Dungeon, GenerationConfig, Generator, PathAnalyzer,
    Position,
};
use log::debug;
use pathfinding::prelude::kruskal_indices;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

/// One edge of the full grid that the generator may open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateEdge {
    pub from: Position,
    pub direction: Direction,
    pub to: Position,
}

/// Cave graph generator.
///
/// Validation always insists on a connected graph.
#[derive(Debug, Clone, Default)]
pub struct MazeGenerator;

impl MazeGenerator {
    /// Creates a new maze generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{GenerationConfig, Generator, MazeGenerator};
    ///
    /// let config = GenerationConfig::for_testing(1);
    /// let mut rng = delve::generation::create_rng(&config);
    /// let dungeon = MazeGenerator::new().generate(&config, &mut rng).unwrap();
    /// assert_eq!(dungeon.edge_count(), 24);
    /// ```
    pub fn new() -> Self {
        Self
    }

    /// Every edge of the grid, each listed once: eastward and southward from
    /// each location, skipping border crossings unless the dungeon wraps.
    pub fn candidate_edges(dungeon: &Dungeon) -> Vec<CandidateEdge> {
        dungeon
            .positions()
            .flat_map(move |from| {
                [Direction::East, Direction::South]
                    .into_iter()
                    .filter_map(move |direction| {
                        dungeon.step(from, direction).map(|to| CandidateEdge {
                            from,
                            direction,
                            to,
                        })
                    })
            })
            .collect()
    }

    /// Picks the spanning tree edges from shuffled candidates.
    ///
    /// Each candidate's rank in the shuffled list is its Kruskal weight, so
    /// the tree depends only on the shuffle.
    fn spanning_tree(
        &self,
        dungeon: &Dungeon,
        candidates: &[CandidateEdge],
    ) -> DelveResult<HashSet<usize>> {
        let mut weighted = Vec::with_capacity(candidates.len());
        for (rank, edge) in candidates.iter().enumerate() {
            let a = dungeon.index_of(edge.from);
            let b = dungeon.index_of(edge.to);
            match (a, b) {
                (Some(a), Some(b)) => weighted.push((a, b, rank)),
                _ => {
                    return Err(DelveError::GenerationFailed(format!(
                        "Candidate edge {} -> {} leaves the grid",
                        edge.from, edge.to
                    )))
                }
            }
        }

        let tree: HashSet<usize> = kruskal_indices(dungeon.len(), &weighted)
            .map(|(_, _, rank)| rank)
            .collect();

        if tree.len() + 1 != dungeon.len() {
            return Err(DelveError::GenerationFailed(format!(
                "Spanning tree has {} edges for {} locations",
                tree.len(),
                dungeon.len()
            )));
        }

        Ok(tree)
    }
}

impl Generator<Dungeon> for MazeGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<Dungeon> {
        config.validate()?;

        let mut dungeon = Dungeon::new(config.rows, config.columns, config.wrapping)?;
        let mut candidates = Self::candidate_edges(&dungeon);
        candidates.shuffle(rng);

        let tree = self.spanning_tree(&dungeon, &candidates)?;
        for edge in candidates
            .iter()
            .enumerate()
            .filter(|(rank, _)| tree.contains(rank))
            .map(|(_, edge)| edge)
        {
            dungeon.connect(edge.from, edge.direction)?;
        }

        let leftovers: Vec<&CandidateEdge> = candidates
            .iter()
            .enumerate()
            .filter(|(rank, _)| !tree.contains(rank))
            .map(|(_, edge)| edge)
            .collect();

        if config.interconnectivity > leftovers.len() {
            return Err(DelveError::InvalidConfig(format!(
                "Interconnectivity {} exceeds the {} edges left after the spanning tree",
                config.interconnectivity,
                leftovers.len()
            )));
        }

        for edge in leftovers.iter().take(config.interconnectivity) {
            dungeon.connect(edge.from, edge.direction)?;
        }

        debug!(
            "{}: {}x{} grid, {} tree edges, {} extra edges, wrapping={}",
            self.generator_type(),
            config.rows,
            config.columns,
            tree.len(),
            config.interconnectivity,
            config.wrapping
        );

        Ok(dungeon)
    }

    fn validate(&self, dungeon: &Dungeon, config: &GenerationConfig) -> DelveResult<()> {
        let expected = config.spanning_edge_count() + config.interconnectivity;
        if dungeon.edge_count() != expected {
            return Err(DelveError::GenerationFailed(format!(
                "Expected {} edges, found {}",
                expected,
                dungeon.edge_count()
            )));
        }

        if !dungeon.is_symmetric() {
            return Err(DelveError::GenerationFailed(
                "Edge without a matching edge on the other side".to_string(),
            ));
        }

        if !PathAnalyzer::new(dungeon).is_connected() {
            return Err(DelveError::GenerationFailed(
                "Some locations cannot be reached".to_string(),
            ));
        }

        if !dungeon.is_wrapping() && dungeon.edges().iter().any(|(a, b)| crosses_border(*a, *b)) {
            return Err(DelveError::GenerationFailed(
                "Edge crosses the border of a non-wrapping dungeon".to_string(),
            ));
        }

        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "MazeGenerator"
    }
}

/// Whether an edge joins locations that are not grid-adjacent.
pub fn crosses_border(a: Position, b: Position) -> bool {
    a.row.abs_diff(b.row) + a.col.abs_diff(b.col) != 1
}
