use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::world::{Cell, WorkerId};

/// Single-step heading for a worker relocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Neighbour visit order used by every search expansion.
    pub const SEARCH_ORDER: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Row/column offset applied when stepping in this direction.
    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'U' => Some(Direction::Up),
            'D' => Some(Direction::Down),
            'L' => Some(Direction::Left),
            'R' => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Worker command emitted for a single day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Hire the next dense worker id onto `cell`.
    Hire { cell: Cell },
    /// Move an existing worker one cell.
    Move {
        worker: WorkerId,
        direction: Direction,
    },
}

impl Action {
    pub fn is_hire(&self) -> bool {
        matches!(self, Action::Hire { .. })
    }

    pub fn is_move(&self) -> bool {
        matches!(self, Action::Move { .. })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Hire { cell } => write!(f, "H {} {}", cell.row, cell.col),
            Action::Move { worker, direction } => {
                write!(f, "M {} {}", worker, direction.letter())
            }
        }
    }
}

/// Longest command line the judge accepts.
pub const MAX_COMMAND_LEN: usize = 10;

/// Largest number a command may carry (two decimal digits).
pub const MAX_COMMAND_NUMBER: u32 = 99;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseActionError {
    #[error("command is longer than 10 characters")]
    TooLong,
    #[error("expected `H <ROW> <COL>` or `M <ID> <DIR>`")]
    Shape,
    #[error("`{0}` is not a number from 0 to 99 without leading zeros")]
    Number(String),
    #[error("`{0}` is not one of U, L, D, R")]
    Direction(String),
}

impl FromStr for Action {
    type Err = ParseActionError;

    /// Strict command grammar: single spaces, numbers 0..=99 with no leading
    /// zeros, direction letters `ULDR`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        if line.len() > MAX_COMMAND_LEN {
            return Err(ParseActionError::TooLong);
        }
        let parts: Vec<&str> = line.split(' ').collect();
        match parts.as_slice() {
            ["H", row, col] => Ok(Action::Hire {
                cell: Cell::new(parse_number(row)?, parse_number(col)?),
            }),
            ["M", id, dir] => {
                let worker = parse_number(id)?;
                let mut letters = dir.chars();
                let direction = match (letters.next(), letters.next()) {
                    (Some(letter), None) => Direction::from_letter(letter),
                    _ => None,
                }
                .ok_or_else(|| ParseActionError::Direction(dir.to_string()))?;
                Ok(Action::Move { worker, direction })
            }
            _ => Err(ParseActionError::Shape),
        }
    }
}

fn parse_number(token: &str) -> Result<u32, ParseActionError> {
    let invalid = || ParseActionError::Number(token.to_string());
    if token.is_empty()
        || token.len() > 2
        || !token.bytes().all(|b| b.is_ascii_digit())
        || (token.len() > 1 && token.starts_with('0'))
    {
        return Err(invalid());
    }
    let value: u32 = token.parse().map_err(|_| invalid())?;
    if value > MAX_COMMAND_NUMBER {
        return Err(invalid());
    }
    Ok(value)
}
