use serde::{Deserialize, Serialize};

use crate::ConfigurationError;

/// The rules of a game. Every field is optional when deserializing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// The board is `grid_size` x `grid_size` cells.
    pub grid_size: usize,
    /// How many equal symbols in a line win the game.
    pub streak: usize,
    /// When set, a move must land in the lowest empty cell of its column.
    pub gravity: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 3,
            streak: 3,
            gravity: false,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.streak == 0 {
            return Err(ConfigurationError::ZeroStreak);
        }
        if self.grid_size < self.streak {
            return Err(ConfigurationError::GridSmallerThanStreak {
                grid_size: self.grid_size,
                streak: self.streak,
            });
        }
        Ok(())
    }
}
