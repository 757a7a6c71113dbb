//! # Action System
//!
//! One command type for everything a player can do.
//!
//! Every front-end turns its input into a [`PlayerAction`] and hands it to
//! [`PlayerAction::execute`], so the console driver and any other caller go
//! through the same engine calls.

use crate::{DelveResult, Direction, GameState, PlayerStatus, Treasure};
use serde::{Deserialize, Serialize};

/// A player command with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Walk through the exit in a direction
    Move(Direction),
    /// Pick up one unit of a treasure kind
    PickTreasure(Treasure),
    /// Pick up every arrow lying here
    PickArrow,
    /// Shoot an arrow a number of edges in a direction
    Shoot { distance: usize, direction: Direction },
    /// Give a thief here the chance to strike, at a time in milliseconds
    CheckTheft { now_millis: u64 },
}

/// What an executed action reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    /// The player moved; carries the status after arrival
    Moved(PlayerStatus),
    /// Arrows were picked up
    ArrowsPicked(u32),
    /// The action completed with nothing further to report
    Completed,
    /// A theft check ran; `robbed` tells whether anything was taken
    TheftChecked { robbed: bool },
}

impl PlayerAction {
    /// Runs the action against a game session.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{ActionOutcome, GameState, GenerationConfig, PlayerAction};
    ///
    /// let mut game = GameState::new(GenerationConfig::for_testing(8)).unwrap();
    /// let direction = game.view().possible_moves[0];
    /// let outcome = PlayerAction::Move(direction).execute(&mut game).unwrap();
    /// assert!(matches!(outcome, ActionOutcome::Moved(_)));
    /// ```
    pub fn execute(&self, game: &mut GameState) -> DelveResult<ActionOutcome> {
        match *self {
            PlayerAction::Move(direction) => game.move_player(direction).map(ActionOutcome::Moved),
            PlayerAction::PickTreasure(kind) => {
                game.pick_treasure(kind)?;
                Ok(ActionOutcome::Completed)
            }
            PlayerAction::PickArrow => game.pick_arrow().map(ActionOutcome::ArrowsPicked),
            PlayerAction::Shoot {
                distance,
                direction,
            } => {
                game.shoot_arrow(distance, direction)?;
                Ok(ActionOutcome::Completed)
            }
            PlayerAction::CheckTheft { now_millis } => game
                .check_treasure_stolen(now_millis)
                .map(|robbed| ActionOutcome::TheftChecked { robbed }),
        }
    }

    /// Whether the action is a move, after which a front-end should give
    /// any thief at the new location its chance.
    pub fn is_move(&self) -> bool {
        matches!(self, PlayerAction::Move(_))
    }
}
