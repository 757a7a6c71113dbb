//! # Input Module
//!
//! Turns typed console lines into player commands.
//!
//! Commands are short words followed by their arguments:
//! `move north`, `m n`, `pick arrow`, `p ruby`, `shoot 2 east`, `s 2 e`.
//! With vi keys enabled a bare `h`, `j`, `k` or `l` moves as well.

use crate::{DelveError, DelveResult, Direction, PlayerAction, Treasure};

/// Help text listing every command the parser accepts.
pub const HELP_TEXT: &str = "\
Commands:
  move <dir>            m n | m south | north       walk through an exit
  pick arrow            p a                         pick up every arrow here
  pick <treasure>       p ruby | p diamond          pick up one treasure
  shoot <dist> <dir>    s 2 e                       shoot an arrow
  look                  .                           describe the location again
  restart                                           start this dungeon over
  help                  ?                           show this text
  quit                  q
Directions: north/n/up, south/s/down, east/e/right, west/w/left
Vi keys: h=west j=south k=north l=east";

/// Input handler for processing player commands.
///
/// Parses console lines and converts them to game actions.
pub struct InputHandler {
    /// Whether to accept bare vi-style movement keys (hjkl)
    pub vi_keys_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Direction, InputHandler, PlayerAction, PlayerInput};
    ///
    /// let input_handler = InputHandler::new();
    /// let input = input_handler.parse_line("m n").unwrap();
    /// assert_eq!(input, PlayerInput::Action(PlayerAction::Move(Direction::North)));
    /// ```
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: true,
        }
    }

    /// Parses one line of player input.
    ///
    /// Blank lines repeat nothing and parse as [`PlayerInput::Look`].
    pub fn parse_line(&self, line: &str) -> DelveResult<PlayerInput> {
        let lowered = line.trim().to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();

        let Some((&command, arguments)) = words.split_first() else {
            return Ok(PlayerInput::Look);
        };

        if arguments.is_empty() {
            if let Some(direction) = self.bare_direction(command) {
                return Ok(PlayerInput::Action(PlayerAction::Move(direction)));
            }
        }

        match command {
            "q" | "quit" | "exit" => Ok(PlayerInput::Quit),
            "?" | "help" => Ok(PlayerInput::Help),
            "." | "look" => Ok(PlayerInput::Look),
            "restart" => Ok(PlayerInput::Restart),
            "m" | "move" | "go" => {
                let direction = Self::single_argument(command, arguments)?.parse()?;
                Ok(PlayerInput::Action(PlayerAction::Move(direction)))
            }
            "p" | "pick" | "take" => {
                let item = Self::single_argument(command, arguments)?;
                Ok(PlayerInput::Action(Self::pick_action(item)?))
            }
            "s" | "shoot" => match arguments {
                [distance, direction] => {
                    let distance = distance.parse::<usize>().map_err(|_| {
                        DelveError::IllegalArgument(format!(
                            "Distance must be a whole number of caves, got '{}'",
                            distance
                        ))
                    })?;
                    Ok(PlayerInput::Action(PlayerAction::Shoot {
                        distance,
                        direction: direction.parse()?,
                    }))
                }
                _ => Err(DelveError::IllegalArgument(
                    "Usage: shoot <distance> <direction>".to_string(),
                )),
            },
            other => Err(DelveError::IllegalArgument(format!(
                "Unknown command '{}', type ? for help",
                other
            ))),
        }
    }

    fn bare_direction(&self, word: &str) -> Option<Direction> {
        if self.vi_keys_enabled {
            let vi = match word {
                "h" => Some(Direction::West),
                "j" => Some(Direction::South),
                "k" => Some(Direction::North),
                "l" => Some(Direction::East),
                _ => None,
            };
            if vi.is_some() {
                return vi;
            }
        }

        // Full names only, so single letters stay free for commands.
        match word {
            "north" | "south" | "east" | "west" | "up" | "down" | "left" | "right" => {
                word.parse().ok()
            }
            _ => None,
        }
    }

    fn single_argument<'a>(command: &str, arguments: &[&'a str]) -> DelveResult<&'a str> {
        match arguments {
            [argument] => Ok(argument),
            _ => Err(DelveError::IllegalArgument(format!(
                "'{}' takes exactly one argument",
                command
            ))),
        }
    }

    fn pick_action(item: &str) -> DelveResult<PlayerAction> {
        match item {
            "a" | "arrow" | "arrows" => Ok(PlayerAction::PickArrow),
            other => other
                .parse::<Treasure>()
                .map(PlayerAction::PickTreasure),
        }
    }
}

/// Player input types that can be processed by the input handler.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerInput {
    /// A game action to run against the session
    Action(PlayerAction),
    /// Describe the current location again
    Look,
    /// Show help information
    Help,
    /// Start the same dungeon over
    Restart,
    /// Quit the game
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> DelveResult<PlayerInput> {
        InputHandler::new().parse_line(line)
    }

    fn action(line: &str) -> PlayerAction {
        match parse(line).unwrap() {
            PlayerInput::Action(action) => action,
            other => panic!("'{}' parsed as {:?}", line, other),
        }
    }

    #[test]
    fn test_move_commands() {
        assert_eq!(action("m n"), PlayerAction::Move(Direction::North));
        assert_eq!(action("move South"), PlayerAction::Move(Direction::South));
        assert_eq!(action("  go   e "), PlayerAction::Move(Direction::East));
        assert_eq!(action("west"), PlayerAction::Move(Direction::West));
        assert_eq!(action("k"), PlayerAction::Move(Direction::North));
        assert_eq!(action("l"), PlayerAction::Move(Direction::East));
    }

    #[test]
    fn test_vi_keys_can_be_disabled() {
        let handler = InputHandler {
            vi_keys_enabled: false,
        };
        assert!(handler.parse_line("j").is_err());
        assert!(handler.parse_line("north").is_ok());
    }

    #[test]
    fn test_pick_commands() {
        assert_eq!(action("p a"), PlayerAction::PickArrow);
        assert_eq!(action("pick arrows"), PlayerAction::PickArrow);
        assert_eq!(action("p ruby"), PlayerAction::PickTreasure(Treasure::Ruby));
        assert_eq!(
            action("take Diamonds"),
            PlayerAction::PickTreasure(Treasure::Diamond)
        );
        assert!(matches!(
            parse("p gold"),
            Err(DelveError::IllegalArgument(_))
        ));
    }

    #[test]
    fn test_shoot_commands() {
        assert_eq!(
            action("s 2 e"),
            PlayerAction::Shoot {
                distance: 2,
                direction: Direction::East
            }
        );
        assert!(parse("shoot e 2").is_err());
        assert!(parse("shoot -1 e").is_err());
        assert!(parse("shoot 3").is_err());
    }

    #[test]
    fn test_meta_commands() {
        assert_eq!(parse("q").unwrap(), PlayerInput::Quit);
        assert_eq!(parse("?").unwrap(), PlayerInput::Help);
        assert_eq!(parse("").unwrap(), PlayerInput::Look);
        assert_eq!(parse("look").unwrap(), PlayerInput::Look);
        assert_eq!(parse("restart").unwrap(), PlayerInput::Restart);
        assert!(matches!(
            parse("dance"),
            Err(DelveError::IllegalArgument(_))
        ));
        assert!(parse("m").is_err());
    }
}
