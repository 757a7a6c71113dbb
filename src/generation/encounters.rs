//! # Encounter Placement
//!
//! Puts the Otyughs, thieves and pits into the caves.
//!
//! The boss Otyugh always guards the goal. Nothing dangerous is ever placed
//! at the start, and thieves and pits stay out of the goal as well.

use crate::{DelveError, DelveResult, Dungeon, GenerationConfig, Otyugh, Placer, Position};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Places monsters, thieves and pits.
pub struct EncounterPlacer;

impl EncounterPlacer {
    /// Caves that may receive an encounter: every cave but the start and goal.
    pub fn eligible_caves(dungeon: &Dungeon, start: Position, goal: Position) -> Vec<Position> {
        dungeon
            .caves()
            .into_iter()
            .filter(|p| *p != start && *p != goal)
            .collect()
    }

    fn pick(
        eligible: &[Position],
        count: usize,
        what: &str,
        rng: &mut StdRng,
    ) -> DelveResult<Vec<Position>> {
        if count > eligible.len() {
            return Err(DelveError::InvalidConfig(format!(
                "Cannot place {} {}: only {} eligible caves",
                count,
                what,
                eligible.len()
            )));
        }
        Ok(eligible.choose_multiple(rng, count).copied().collect())
    }
}

impl Placer for EncounterPlacer {
    fn place(
        &self,
        dungeon: &mut Dungeon,
        start: Position,
        goal: Position,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> DelveResult<()> {
        if config.monsters == 0 {
            return Err(DelveError::InvalidConfig(
                "At least one Otyugh is needed to guard the goal".to_string(),
            ));
        }

        let eligible = Self::eligible_caves(dungeon, start, goal);
        let monsters = Self::pick(&eligible, config.monsters - 1, "Otyughs", rng)?;
        let thieves = Self::pick(&eligible, config.thieves, "thieves", rng)?;
        let pits = Self::pick(&eligible, config.pits, "pits", rng)?;

        dungeon
            .try_location_mut(goal)?
            .place_monster(Otyugh::boss())
            .map_err(|e| DelveError::InvalidConfig(format!("Goal cannot hold the boss: {}", e)))?;

        for position in &monsters {
            dungeon.try_location_mut(*position)?.place_monster(Otyugh::new())?;
        }
        for position in &thieves {
            dungeon.try_location_mut(*position)?.place_thief()?;
        }
        for position in &pits {
            dungeon.try_location_mut(*position)?.place_pit()?;
        }

        debug!(
            "Boss at {}, {} more Otyughs, {} thieves, {} pits",
            goal,
            monsters.len(),
            thieves.len(),
            pits.len()
        );
        Ok(())
    }

    fn placer_type(&self) -> &'static str {
        "EncounterPlacer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{choose_endpoints, create_rng};
    use crate::{Generator, MazeGenerator};

    fn prepared(config: &GenerationConfig) -> (Dungeon, Position, Position, StdRng) {
        let mut rng = create_rng(config);
        let dungeon = MazeGenerator::new().generate(config, &mut rng).unwrap();
        let (start, goal) = choose_endpoints(&dungeon, config.min_path_length, &mut rng).unwrap();
        (dungeon, start, goal, rng)
    }

    #[test]
    fn test_boss_guards_goal() {
        let config = GenerationConfig::for_testing(11);
        let (mut dungeon, start, goal, mut rng) = prepared(&config);

        EncounterPlacer
            .place(&mut dungeon, start, goal, &config, &mut rng)
            .unwrap();

        let boss = dungeon.location(goal).unwrap().monster().unwrap();
        assert!(boss.is_boss());
        assert!(boss.is_alive());
        assert_eq!(
            dungeon.locations().filter(|l| l.monster().is_some()).count(),
            1
        );
    }

    #[test]
    fn test_start_stays_safe() {
        let mut config = GenerationConfig::new(12);
        config.monsters = 4;
        config.thieves = 2;
        config.pits = 2;
        let (mut dungeon, start, goal, mut rng) = prepared(&config);

        EncounterPlacer
            .place(&mut dungeon, start, goal, &config, &mut rng)
            .unwrap();

        let start_location = dungeon.location(start).unwrap();
        assert!(start_location.monster().is_none());
        assert!(!start_location.has_pit());
        assert!(!start_location.has_thief());

        let goal_location = dungeon.location(goal).unwrap();
        assert!(!goal_location.has_pit());
        assert!(!goal_location.has_thief());

        assert_eq!(dungeon.locations().filter(|l| l.monster().is_some()).count(), 4);
        assert_eq!(dungeon.locations().filter(|l| l.has_thief()).count(), 2);
        assert_eq!(dungeon.locations().filter(|l| l.has_pit()).count(), 2);
        assert!(dungeon
            .locations()
            .filter(|l| l.monster().is_some() || l.has_pit() || l.has_thief())
            .all(|l| l.is_cave()));
    }

    #[test]
    fn test_too_many_monsters() {
        let mut config = GenerationConfig::for_testing(13);
        let (mut dungeon, start, goal, mut rng) = prepared(&config);
        config.monsters = EncounterPlacer::eligible_caves(&dungeon, start, goal).len() + 2;

        let result = EncounterPlacer.place(&mut dungeon, start, goal, &config, &mut rng);
        assert!(matches!(result, Err(DelveError::InvalidConfig(_))));
        assert!(dungeon.locations().all(|l| l.monster().is_none()));
    }

    #[test]
    fn test_too_many_pits() {
        let mut config = GenerationConfig::for_testing(14);
        let (mut dungeon, start, goal, mut rng) = prepared(&config);
        config.pits = EncounterPlacer::eligible_caves(&dungeon, start, goal).len() + 1;

        assert!(matches!(
            EncounterPlacer.place(&mut dungeon, start, goal, &config, &mut rng),
            Err(DelveError::InvalidConfig(_))
        ));
    }
}
