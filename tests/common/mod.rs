//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use delve::{
    Direction, Dungeon, GameState, GenerationConfig, Otyugh, PathAnalyzer, Position, Treasure,
};

pub const GOAL: Position = Position { row: 4, col: 4 };
pub const MONSTER_CAVE: Position = Position { row: 4, col: 2 };
pub const PIT_CAVE: Position = Position { row: 4, col: 1 };
pub const THIEF_CAVE: Position = Position { row: 0, col: 2 };
pub const TREASURE_CAVE: Position = Position { row: 0, col: 1 };
pub const ARROW_TUNNEL: Position = Position { row: 1, col: 0 };

/// A 5x5 comb: row 0 is the spine and every column hangs a tooth down to
/// row 4. Tooth middles and the spine's two ends are tunnels.
pub fn comb_dungeon() -> Dungeon {
    let mut dungeon = Dungeon::new(5, 5, false).unwrap();
    for col in 0..4 {
        dungeon.connect(Position::new(0, col), Direction::East).unwrap();
    }
    for col in 0..5 {
        for row in 0..4 {
            dungeon.connect(Position::new(row, col), Direction::South).unwrap();
        }
    }

    dungeon.try_location_mut(GOAL).unwrap().place_monster(Otyugh::boss()).unwrap();
    dungeon
        .try_location_mut(MONSTER_CAVE)
        .unwrap()
        .place_monster(Otyugh::new())
        .unwrap();
    dungeon.try_location_mut(PIT_CAVE).unwrap().place_pit().unwrap();
    dungeon.try_location_mut(THIEF_CAVE).unwrap().place_thief().unwrap();

    let treasure = dungeon.try_location_mut(TREASURE_CAVE).unwrap();
    treasure.add_treasure(Treasure::Ruby, 2).unwrap();
    treasure.add_treasure(Treasure::Diamond, 1).unwrap();

    dungeon.try_location_mut(ARROW_TUNNEL).unwrap().add_arrows(3);
    dungeon
}

/// A session on the comb dungeon with the player standing at `start`.
pub fn comb_game(start: Position, config: GenerationConfig) -> GameState {
    GameState::from_dungeon(comb_dungeon(), start, GOAL, config).unwrap()
}

/// The direction leading from `from` straight to the adjacent `to`.
pub fn direction_between(game: &GameState, from: Position, to: Position) -> Option<Direction> {
    Direction::ALL
        .into_iter()
        .find(|d| game.dungeon().neighbor(from, *d) == Some(to))
}

/// Walks the player along a shortest path until `target` is `stop_short` edges away.
pub fn walk_toward(game: &mut GameState, target: Position, stop_short: usize) {
    let distances = PathAnalyzer::new(game.dungeon()).distances_from(target, None);

    loop {
        let here = game.player().position();
        let remaining = distances[&here];
        if remaining <= stop_short {
            return;
        }

        let next = game
            .dungeon()
            .open_neighbors(here)
            .into_iter()
            .find(|p| distances[p] + 1 == remaining)
            .unwrap();
        let direction = direction_between(game, here, next).unwrap();
        game.move_player(direction).unwrap();
    }
}
