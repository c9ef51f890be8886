//! Result of applying one input to an interaction.

use lesson_rules::{GameStatus, Pathway};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing decided yet.
    Pending,
    /// A non-graded scene is done.
    Completed,
    Correct,
    Incorrect,
    /// The story branches.
    Branch(Pathway),
}

impl Outcome {
    pub fn graded(correct: bool) -> Self {
        if correct {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        }
    }

    pub fn from_status(status: GameStatus) -> Self {
        match status {
            GameStatus::Running => Outcome::Pending,
            GameStatus::Won => Outcome::Correct,
            GameStatus::Lost => Outcome::Incorrect,
        }
    }
}
