//! Migration direction tokens and their normalization.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical token for the forward direction
pub const UP_MIGRATION: &str = "up";

/// Canonical token for the reverse direction
pub const DOWN_MIGRATION: &str = "down";

/// Whether SQL moves a schema forward or reverts it.
///
/// Text is turned into a `Direction` only through [`Direction::normalize`];
/// `FromStr`, `TryFrom<&str>` and serde deserialization all delegate to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Direction {
    /// Apply the migration
    Up,
    /// Revert the migration
    Down,
}

impl Direction {
    /// Both directions, in processing order.
    pub const ALL: [Direction; 2] = [Direction::Up, Direction::Down];

    /// Validate and canonicalize a direction value (case-insensitive).
    pub fn normalize(value: &str) -> CoreResult<Self> {
        match value.to_lowercase().as_str() {
            UP_MIGRATION => Ok(Direction::Up),
            DOWN_MIGRATION => Ok(Direction::Down),
            _ => Err(CoreError::InvalidDirection {
                value: value.to_string(),
            }),
        }
    }

    /// The canonical lowercase token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => UP_MIGRATION,
            Direction::Down => DOWN_MIGRATION,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::normalize(s)
    }
}

impl TryFrom<&str> for Direction {
    type Error = CoreError;

    fn try_from(value: &str) -> CoreResult<Self> {
        Self::normalize(value)
    }
}

impl TryFrom<String> for Direction {
    type Error = CoreError;

    fn try_from(value: String) -> CoreResult<Self> {
        Self::normalize(&value)
    }
}

impl From<Direction> for &'static str {
    fn from(direction: Direction) -> Self {
        direction.as_str()
    }
}

#[cfg(test)]
#[path = "direction_test.rs"]
mod tests;
