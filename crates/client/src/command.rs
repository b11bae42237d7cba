//! Typed player commands.

use std::fmt;
use std::str::FromStr;

use crawl_core::GridPoint;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Click on a tile: move there, interact with what stands there, or use
    /// the door.
    Click(GridPoint),
    /// Step one tile in a compass direction.
    Step(i32, i32),
    Use(usize),
    Equip(usize),
    Inventory,
    Look,
    Menu,
    Help,
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseCommandError(String);

impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ParseCommandError {}

fn number<T: FromStr>(word: Option<&str>, what: &str) -> Result<T, ParseCommandError> {
    word.and_then(|w| w.parse().ok())
        .ok_or_else(|| ParseCommandError(format!("expected {what}")))
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(Self::Look);
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "move" | "m" | "go" | "click" => {
                let x = number(words.next(), "an x coordinate")?;
                let y = number(words.next(), "a y coordinate")?;
                Self::Click(GridPoint::new(x, y))
            }
            "n" | "north" => Self::Step(0, -1),
            "s" | "south" => Self::Step(0, 1),
            "e" | "east" => Self::Step(1, 0),
            "w" | "west" => Self::Step(-1, 0),
            "use" | "u" => Self::Use(number(words.next(), "a slot number")?),
            "equip" | "eq" => Self::Equip(number(words.next(), "a slot number")?),
            "inventory" | "inv" | "i" => Self::Inventory,
            "look" | "l" => Self::Look,
            "menu" => Self::Menu,
            "help" | "?" => Self::Help,
            "quit" | "q" => Self::Quit,
            other => return Err(ParseCommandError(format!("unknown command '{other}'"))),
        };

        if let Some(extra) = words.next() {
            return Err(ParseCommandError(format!("unexpected '{extra}'")));
        }
        Ok(command)
    }
}

pub const HELP: &str = "\
Commands:
  move X Y     walk to a tile, or act on what is there (doors included)
  n/s/e/w      step one tile
  use N        eat, drink or cast the item in slot N
  equip N      ready or put away the item in slot N
  inv          list what you carry
  look         redraw the map
  menu         save and return to the main menu
  quit         leave the game";
