//! Scene definitions - the single narrative units a story is made of.

use serde::{Deserialize, Serialize};

use super::SceneId;
use crate::error::ContentError;

/// A single narrative unit: a line of dialogue, a question, an animation, or a mini-game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub id: SceneId,

    /// Who is speaking, if anyone (e.g. "Dr. Macrophage").
    #[serde(default)]
    pub speaker: Option<String>,

    /// Dialogue line, narration, or the prompt of a question.
    #[serde(default)]
    pub text: String,

    /// The `type` discriminator plus its per-type payload.
    #[serde(flatten)]
    pub kind: SceneKind,
}

/// Every interaction type a scene can present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneKind {
    // Non-graded
    Dialogue {
        /// Overrides the session's default auto-advance delay.
        #[serde(default)]
        auto_advance_ms: Option<u64>,
    },
    Narration,
    Animation {
        duration_ms: u64,
    },
    InfoCard {
        #[serde(default)]
        term: Option<String>,
    },
    PathwayChoice,

    // Quizzes
    MultipleChoice {
        options: Vec<String>,
        correct: usize,
        #[serde(default)]
        explanation: Option<String>,
    },
    TrueFalse {
        answer: bool,
    },
    MultiSelect {
        options: Vec<String>,
        correct: Vec<usize>,
    },
    FillBlank {
        accepted: Vec<String>,
    },

    // Exercises
    DragDrop {
        targets: Vec<String>,
        items: Vec<DragItem>,
    },
    /// Steps are listed in their correct order.
    Sequence {
        steps: Vec<String>,
    },
    /// `left[i]` pairs with `right[i]`.
    Matching {
        left: Vec<String>,
        right: Vec<String>,
    },
    TimedChallenge {
        options: Vec<String>,
        correct: usize,
        /// Falls back to the session default when absent.
        #[serde(default)]
        time_limit_ms: Option<u64>,
    },

    // Mini-games
    TimingBar {
        zone_start: f32,
        zone_end: f32,
        period_ms: u64,
        hits_required: u32,
        max_misses: u32,
    },
    ShrinkingCircle {
        start_radius: f32,
        shrink_per_sec: f32,
        target_min: f32,
        target_max: f32,
    },
    ShootingGallery {
        targets: Vec<GalleryTarget>,
        required_hits: u32,
        time_limit_ms: u64,
        max_friendly_fire: u32,
    },
}

/// A draggable item and the index of the target it belongs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragItem {
    pub label: String,
    pub target: usize,
}

/// Something that appears in the shooting gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryTarget {
    pub label: String,
    pub kind: TargetKind,
}

/// Whether a gallery target should be shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Pathogen,
    SelfCell,
}

impl SceneKind {
    /// The `type` discriminator as it appears in content files.
    pub fn type_name(&self) -> &'static str {
        match self {
            SceneKind::Dialogue { .. } => "dialogue",
            SceneKind::Narration => "narration",
            SceneKind::Animation { .. } => "animation",
            SceneKind::InfoCard { .. } => "info_card",
            SceneKind::PathwayChoice => "pathway_choice",
            SceneKind::MultipleChoice { .. } => "multiple_choice",
            SceneKind::TrueFalse { .. } => "true_false",
            SceneKind::MultiSelect { .. } => "multi_select",
            SceneKind::FillBlank { .. } => "fill_blank",
            SceneKind::DragDrop { .. } => "drag_drop",
            SceneKind::Sequence { .. } => "sequence",
            SceneKind::Matching { .. } => "matching",
            SceneKind::TimedChallenge { .. } => "timed_challenge",
            SceneKind::TimingBar { .. } => "timing_bar",
            SceneKind::ShrinkingCircle { .. } => "shrinking_circle",
            SceneKind::ShootingGallery { .. } => "shooting_gallery",
        }
    }

    /// Graded scenes count toward progress and cost a life when failed.
    pub fn is_question(&self) -> bool {
        !matches!(
            self,
            SceneKind::Dialogue { .. }
                | SceneKind::Narration
                | SceneKind::Animation { .. }
                | SceneKind::InfoCard { .. }
                | SceneKind::PathwayChoice
        )
    }
}

impl Scene {
    /// Create a scene with no speaker.
    pub fn new(id: impl Into<SceneId>, text: impl Into<String>, kind: SceneKind) -> Self {
        Self {
            id: id.into(),
            speaker: None,
            text: text.into(),
            kind,
        }
    }

    /// Set the speaker.
    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    pub fn is_question(&self) -> bool {
        self.kind.is_question()
    }

    /// Check that the payload can actually be played and answered.
    pub fn check(&self) -> Result<(), ContentError> {
        let invalid = |reason: String| ContentError::InvalidScene {
            scene: self.id.to_string(),
            reason,
        };

        match &self.kind {
            SceneKind::MultipleChoice {
                options, correct, ..
            }
            | SceneKind::TimedChallenge {
                options, correct, ..
            } => {
                if options.len() < 2 {
                    return Err(invalid("needs at least two options".into()));
                }
                if *correct >= options.len() {
                    return Err(invalid(format!(
                        "correct option {} is out of range for {} options",
                        correct,
                        options.len()
                    )));
                }
            }
            SceneKind::MultiSelect { options, correct } => {
                if correct.is_empty() {
                    return Err(invalid("has no correct options".into()));
                }
                if let Some(bad) = correct.iter().find(|c| **c >= options.len()) {
                    return Err(invalid(format!("correct option {} is out of range", bad)));
                }
                let mut sorted = correct.clone();
                sorted.sort_unstable();
                sorted.dedup();
                if sorted.len() != correct.len() {
                    return Err(invalid("lists a correct option twice".into()));
                }
            }
            SceneKind::FillBlank { accepted } => {
                if accepted.iter().all(|a| a.trim().is_empty()) {
                    return Err(invalid("has no accepted answers".into()));
                }
            }
            SceneKind::DragDrop { targets, items } => {
                if items.is_empty() || targets.is_empty() {
                    return Err(invalid("needs items and targets".into()));
                }
                if let Some(item) = items.iter().find(|i| i.target >= targets.len()) {
                    return Err(invalid(format!(
                        "item '{}' points at missing target {}",
                        item.label, item.target
                    )));
                }
            }
            SceneKind::Sequence { steps } => {
                if steps.len() < 2 {
                    return Err(invalid("needs at least two steps".into()));
                }
            }
            SceneKind::Matching { left, right } => {
                if left.is_empty() || left.len() != right.len() {
                    return Err(invalid("left and right columns must be equal and non-empty".into()));
                }
            }
            SceneKind::TimingBar {
                zone_start,
                zone_end,
                period_ms,
                hits_required,
                max_misses,
            } => {
                if !(0.0..=100.0).contains(zone_start)
                    || !(0.0..=100.0).contains(zone_end)
                    || zone_start > zone_end
                {
                    return Err(invalid("zone must lie within 0..=100".into()));
                }
                if *period_ms == 0 || *hits_required == 0 || *max_misses == 0 {
                    return Err(invalid("period, hits and misses must be positive".into()));
                }
            }
            SceneKind::ShrinkingCircle {
                start_radius,
                shrink_per_sec,
                target_min,
                target_max,
            } => {
                if ![start_radius, target_min, target_max]
                    .iter()
                    .all(|r| r.is_finite())
                {
                    return Err(invalid("radii must be finite".into()));
                }
                if !shrink_per_sec.is_finite() || *shrink_per_sec <= 0.0 {
                    return Err(invalid("circle must shrink".into()));
                }
                if !(0.0 <= *target_min && target_min <= target_max && target_max <= start_radius) {
                    return Err(invalid("target window must lie inside the starting radius".into()));
                }
            }
            SceneKind::ShootingGallery {
                targets,
                required_hits,
                time_limit_ms,
                ..
            } => {
                let pathogens = targets
                    .iter()
                    .filter(|t| t.kind == TargetKind::Pathogen)
                    .count();
                if *required_hits == 0 || *required_hits as usize > pathogens {
                    return Err(invalid(format!(
                        "requires {} hits but only {} pathogens appear",
                        required_hits, pathogens
                    )));
                }
                if *time_limit_ms == 0 {
                    return Err(invalid("time limit must be positive".into()));
                }
            }
            SceneKind::Animation { .. }
            | SceneKind::Dialogue { .. }
            | SceneKind::Narration
            | SceneKind::InfoCard { .. }
            | SceneKind::PathwayChoice
            | SceneKind::TrueFalse { .. } => {}
        }

        Ok(())
    }
}
