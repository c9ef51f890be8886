//! Linear progress over the question scenes of the route act1 + pathway.

use lesson_rules::{Act, Pathway, StoryBook};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Progress {
    /// Question scenes strictly before the current scene on the route.
    pub position: usize,
    /// Question scenes on the whole route.
    pub total: usize,
    /// The route has been completed.
    pub finished: bool,
}

impl Progress {
    /// Fraction complete in 0.0..=1.0.
    pub fn ratio(&self) -> f32 {
        if self.total == 0 {
            return if self.finished { 1.0 } else { 0.0 };
        }
        (self.position as f32 / self.total as f32).min(1.0)
    }

    /// Whole-number percentage, as shown on a progress bar.
    pub fn percent(&self) -> u8 {
        (self.ratio() * 100.0).round() as u8
    }

    /// Compute progress at `scene_index` of `act`.
    ///
    /// Before a pathway is chosen the longer branch is assumed, so the ratio
    /// never drops when the story branches. Game over is not handled here;
    /// the session keeps the last value instead.
    pub fn compute(
        book: &StoryBook,
        act: Act,
        pathway: Option<Pathway>,
        scene_index: usize,
    ) -> Self {
        let act1_questions = StoryBook::question_count(&book.act1);
        let branch_questions = match pathway {
            Some(pathway) => StoryBook::question_count(book.pathway_scenes(pathway)),
            None => Pathway::ALL
                .iter()
                .map(|p| StoryBook::question_count(book.pathway_scenes(*p)))
                .max()
                .unwrap_or(0),
        };
        let total = act1_questions + branch_questions;

        let before = |scenes: &[lesson_rules::Scene]| {
            StoryBook::question_count(&scenes[..scene_index.min(scenes.len())])
        };

        match act {
            Act::Act1 => Self {
                position: before(&book.act1[..]),
                total,
                finished: false,
            },
            Act::Pathway => Self {
                position: act1_questions + before(book.scenes_for(act, pathway)),
                total,
                finished: false,
            },
            Act::Victory | Act::GameOver => Self {
                position: total,
                total,
                finished: act == Act::Victory,
            },
        }
    }
}
