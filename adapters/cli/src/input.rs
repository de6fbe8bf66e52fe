//! Parsing of the line-oriented commands typed into the terminal.

use std::time::Duration;

use thiserror::Error;
use zombie_rescue_core::{CellCoord, Difficulty, Direction, UnknownDifficulty};

/// One parsed terminal command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Input {
    /// Step toward a neighbouring cell.
    Key(Direction),
    /// Walk toward a cell.
    Go(CellCoord),
    /// Pointer click in board pixels.
    Click(f32, f32),
    /// Advance simulated time.
    Wait(Duration),
    /// Redraw the board.
    Show,
    /// Restart with another difficulty.
    Difficulty(Difficulty),
    /// Restart with the current configuration.
    Restart,
    /// Print the command summary.
    Help,
    /// Leave the program.
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum InputError {
    #[error("unknown command `{0}`; type `help` for a list")]
    UnknownCommand(String),
    #[error("`{command}` expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("`{0}` is not a valid number")]
    InvalidNumber(String),
    #[error(transparent)]
    Difficulty(#[from] UnknownDifficulty),
}

pub(crate) const HELP: &str = "\
commands:
  w a s d | up down left right   step one cell
  go X Y                         walk toward cell (X, Y)
  click PX PY                    click the board at pixel (PX, PY)
  wait MS                        let MS milliseconds pass (60000 at most)
  show                           redraw the board
  difficulty easy|medium|hard    restart on another difficulty
  restart                        restart the session
  help                           show this list
  quit                           leave";

/// Parses a non-empty line; blank lines yield `Ok(None)`.
pub(crate) fn parse(line: &str) -> Result<Option<Input>, InputError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };

    let input = match command.to_ascii_lowercase().as_str() {
        "w" | "up" => Input::Key(Direction::North),
        "s" | "down" => Input::Key(Direction::South),
        "a" | "left" => Input::Key(Direction::West),
        "d" | "right" => Input::Key(Direction::East),
        "go" => {
            let column = number(words.next(), "go", "a column and a row")?;
            let row = number(words.next(), "go", "a column and a row")?;
            Input::Go(CellCoord::new(column, row))
        }
        "click" => {
            let x = number(words.next(), "click", "two pixel coordinates")?;
            let y = number(words.next(), "click", "two pixel coordinates")?;
            Input::Click(x, y)
        }
        "wait" => Input::Wait(Duration::from_millis(number(
            words.next(),
            "wait",
            "a duration in milliseconds",
        )?)),
        "show" => Input::Show,
        "difficulty" => {
            let label = words.next().ok_or(InputError::MissingArgument {
                command: "difficulty",
                expected: "easy, medium or hard",
            })?;
            Input::Difficulty(label.parse()?)
        }
        "restart" => Input::Restart,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => return Err(InputError::UnknownCommand(other.to_owned())),
    };

    Ok(Some(input))
}

fn number<T: std::str::FromStr>(
    word: Option<&str>,
    command: &'static str,
    expected: &'static str,
) -> Result<T, InputError> {
    let word = word.ok_or(InputError::MissingArgument { command, expected })?;
    word.parse()
        .map_err(|_| InputError::InvalidNumber(word.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_movement_aliases() {
        assert_eq!(parse("w"), Ok(Some(Input::Key(Direction::North))));
        assert_eq!(parse("  LEFT "), Ok(Some(Input::Key(Direction::West))));
        assert_eq!(parse("go 12 3"), Ok(Some(Input::Go(CellCoord::new(12, 3)))));
        assert_eq!(parse("click 45 19.5"), Ok(Some(Input::Click(45.0, 19.5))));
    }

    #[test]
    fn parses_session_commands() {
        assert_eq!(
            parse("wait 500"),
            Ok(Some(Input::Wait(Duration::from_millis(500))))
        );
        assert_eq!(
            parse("difficulty hard"),
            Ok(Some(Input::Difficulty(Difficulty::Hard)))
        );
        assert_eq!(parse(""), Ok(None));
        assert_eq!(parse("q"), Ok(Some(Input::Quit)));
    }

    #[test]
    fn reports_malformed_commands() {
        assert_eq!(
            parse("jump"),
            Err(InputError::UnknownCommand("jump".to_owned()))
        );
        assert_eq!(
            parse("go 3"),
            Err(InputError::MissingArgument {
                command: "go",
                expected: "a column and a row",
            })
        );
        assert_eq!(
            parse("wait soon"),
            Err(InputError::InvalidNumber("soon".to_owned()))
        );
        assert!(matches!(
            parse("difficulty nightmare"),
            Err(InputError::Difficulty(_))
        ));
    }
}
