//! Lesson mechanics: answer grading, mini-game timers, and the lives budget.

mod grading;
mod minigames;

pub use grading::*;
pub use minigames::*;

use serde::{Deserialize, Serialize};

/// Outcome state of a running mini-game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GameStatus {
    #[default]
    Running,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, GameStatus::Running)
    }
}

/// Retry budget. Every incorrect answer costs one life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lives {
    pub remaining: u32,
    pub max: u32,
}

impl Lives {
    /// Start with a full budget.
    pub fn new(max: u32) -> Self {
        Self {
            remaining: max,
            max,
        }
    }

    /// Spend one life, returning what is left.
    pub fn lose_one(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    pub fn is_depleted(&self) -> bool {
        self.remaining == 0
    }

    /// Refill to the maximum.
    pub fn reset(&mut self) {
        self.remaining = self.max;
    }
}

impl Default for Lives {
    fn default() -> Self {
        Self::new(3)
    }
}
