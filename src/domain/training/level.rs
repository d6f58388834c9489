//! Difficulty level value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// A difficulty tier within a product's persona catalog.
///
/// Levels start at 1. A session's level only moves forward: passing a level
/// advances to the next one, and nothing lowers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level(u32);

impl Level {
    /// The entry level every product starts at.
    pub const ONE: Self = Self(1);

    /// Creates a Level, returning error for zero.
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::out_of_range("level", 1, i32::MAX, 0));
        }
        Ok(Self(value))
    }

    /// Returns the level value.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Returns the level that follows this one, saturating at `u32::MAX`.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
