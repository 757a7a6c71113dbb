//! # Item Placement
//!
//! Scatters treasure through the caves and arrows through the whole dungeon.
//! The same percentage drives both: that share of caves receives treasure,
//! and that share of all locations, tunnels included, receives an arrow.

use crate::{config, DelveResult, Dungeon, GenerationConfig, Placer, Position, Treasure};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Places treasure and arrows.
pub struct ItemPlacer;

impl ItemPlacer {
    /// How many of `available` locations a percentage selects, rounding up
    /// so any non-zero percentage selects at least one.
    pub fn share(available: usize, percent: u32) -> usize {
        (available * percent as usize + 99) / 100
    }

    fn place_treasure(
        &self,
        dungeon: &mut Dungeon,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> DelveResult<usize> {
        let caves = dungeon.caves();
        let count = Self::share(caves.len(), config.treasure_percent);
        let chosen: Vec<Position> = caves.choose_multiple(rng, count).copied().collect();

        for position in &chosen {
            let units = rng.gen_range(1..=config::MAX_TREASURE_PER_CAVE);
            for _ in 0..units {
                let kind = Treasure::ALL[rng.gen_range(0..Treasure::ALL.len())];
                dungeon.try_location_mut(*position)?.add_treasure(kind, 1)?;
            }
        }

        Ok(chosen.len())
    }

    fn place_arrows(
        &self,
        dungeon: &mut Dungeon,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> DelveResult<usize> {
        let all: Vec<Position> = dungeon.positions().collect();
        let count = Self::share(all.len(), config.treasure_percent);
        let chosen: Vec<Position> = all.choose_multiple(rng, count).copied().collect();

        for position in &chosen {
            dungeon.try_location_mut(*position)?.add_arrows(1);
        }

        Ok(chosen.len())
    }
}

impl Placer for ItemPlacer {
    fn place(
        &self,
        dungeon: &mut Dungeon,
        _start: Position,
        _goal: Position,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> DelveResult<()> {
        let treasure_caves = self.place_treasure(dungeon, config, rng)?;
        let arrow_locations = self.place_arrows(dungeon, config, rng)?;
        debug!(
            "Placed treasure in {} caves and arrows at {} locations",
            treasure_caves, arrow_locations
        );
        Ok(())
    }

    fn placer_type(&self) -> &'static str {
        "ItemPlacer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::create_rng;
    use crate::{Generator, MazeGenerator};

    fn generated(config: &GenerationConfig) -> (Dungeon, StdRng) {
        let mut rng = create_rng(config);
        let dungeon = MazeGenerator::new().generate(config, &mut rng).unwrap();
        (dungeon, rng)
    }

    #[test]
    fn test_share_rounds_up() {
        assert_eq!(ItemPlacer::share(10, 0), 0);
        assert_eq!(ItemPlacer::share(10, 1), 1);
        assert_eq!(ItemPlacer::share(10, 20), 2);
        assert_eq!(ItemPlacer::share(10, 25), 3);
        assert_eq!(ItemPlacer::share(7, 100), 7);
    }

    #[test]
    fn test_treasure_only_in_caves() {
        let mut config = GenerationConfig::for_testing(77);
        config.treasure_percent = 100;
        config.interconnectivity = 6;
        let (mut dungeon, mut rng) = generated(&config);

        ItemPlacer
            .place(&mut dungeon, Position::origin(), Position::origin(), &config, &mut rng)
            .unwrap();

        for location in dungeon.locations() {
            if location.is_cave() {
                let units: u32 = location.treasure().values().sum();
                assert!((1..=config::MAX_TREASURE_PER_CAVE).contains(&units));
            } else {
                assert!(!location.has_treasure());
            }
            assert_eq!(location.arrows(), 1);
        }
    }

    #[test]
    fn test_percentage_controls_counts() {
        let mut config = GenerationConfig::for_testing(5);
        config.treasure_percent = 40;
        let (mut dungeon, mut rng) = generated(&config);
        let caves = dungeon.caves().len();

        ItemPlacer
            .place(&mut dungeon, Position::origin(), Position::origin(), &config, &mut rng)
            .unwrap();

        let treasure_caves = dungeon.locations().filter(|l| l.has_treasure()).count();
        let arrow_spots = dungeon.locations().filter(|l| l.arrows() > 0).count();
        assert_eq!(treasure_caves, ItemPlacer::share(caves, 40));
        assert_eq!(arrow_spots, ItemPlacer::share(25, 40));
    }

    #[test]
    fn test_zero_percent_places_nothing() {
        let mut config = GenerationConfig::for_testing(6);
        config.treasure_percent = 0;
        let (mut dungeon, mut rng) = generated(&config);

        ItemPlacer
            .place(&mut dungeon, Position::origin(), Position::origin(), &config, &mut rng)
            .unwrap();

        assert!(dungeon
            .locations()
            .all(|l| !l.has_treasure() && l.arrows() == 0));
    }
}
