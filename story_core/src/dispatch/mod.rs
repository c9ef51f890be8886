//! Interaction dispatch - turns a scene's `type` into live interaction state
//! and routes player inputs to it.
//!
//! Each scene type gets its own [`InteractionState`] variant. The session never
//! looks inside; it only sees the [`Outcome`] of applying an input.

mod outcome;

pub use outcome::*;

use lesson_rules::{
    grade_choice, grade_drag_drop, grade_fill_blank, grade_matching, grade_multi_select,
    grade_sequence, grade_true_false, AnswerError, Countdown, DragItem, GameStatus, Scene,
    SceneId, SceneKind, ShootingGallery, ShrinkingCircle, TimingBar,
};
use std::time::Duration;

use crate::config::SessionConfig;
use crate::error::StoryError;
use crate::events::PlayerInput;

/// Runtime state of the interaction for one scene.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionState {
    /// Dialogue, narration and info cards. Optionally auto-advancing.
    Passive { auto_advance: Option<Countdown> },
    Animation(Countdown),
    PathwayChoice,
    Choice { option_count: usize, correct: usize },
    TrueFalse { answer: bool },
    MultiSelect { option_count: usize, correct: Vec<usize> },
    FillBlank { accepted: Vec<String> },
    DragDrop {
        items: Vec<DragItem>,
        target_count: usize,
        placements: Vec<Option<usize>>,
    },
    Sequence { step_count: usize },
    Matching { pair_count: usize },
    TimedChallenge {
        option_count: usize,
        correct: usize,
        clock: Countdown,
    },
    TimingBar(TimingBar),
    ShrinkingCircle(ShrinkingCircle),
    ShootingGallery(ShootingGallery),
}

/// The live interaction of the current scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    scene: SceneId,
    scene_type: &'static str,
    state: InteractionState,
}

impl Interaction {
    /// Build the interaction a scene calls for.
    pub fn from_scene(scene: &Scene, config: &SessionConfig) -> Self {
        let state = match &scene.kind {
            SceneKind::Dialogue { auto_advance_ms } => {
                let auto_advance = match auto_advance_ms {
                    Some(ms) => Some(Countdown::new(Duration::from_millis(*ms))),
                    None if config.auto_advance_dialogue => {
                        Some(Countdown::new(config.default_auto_advance()))
                    }
                    None => None,
                };
                InteractionState::Passive { auto_advance }
            }
            SceneKind::Narration | SceneKind::InfoCard { .. } => {
                InteractionState::Passive { auto_advance: None }
            }
            SceneKind::Animation { duration_ms } => {
                InteractionState::Animation(Countdown::new(Duration::from_millis(*duration_ms)))
            }
            SceneKind::PathwayChoice => InteractionState::PathwayChoice,
            SceneKind::MultipleChoice {
                options, correct, ..
            } => InteractionState::Choice {
                option_count: options.len(),
                correct: *correct,
            },
            SceneKind::TrueFalse { answer } => InteractionState::TrueFalse { answer: *answer },
            SceneKind::MultiSelect { options, correct } => InteractionState::MultiSelect {
                option_count: options.len(),
                correct: correct.clone(),
            },
            SceneKind::FillBlank { accepted } => InteractionState::FillBlank {
                accepted: accepted.clone(),
            },
            SceneKind::DragDrop { targets, items } => InteractionState::DragDrop {
                items: items.clone(),
                target_count: targets.len(),
                placements: vec![None; items.len()],
            },
            SceneKind::Sequence { steps } => InteractionState::Sequence {
                step_count: steps.len(),
            },
            SceneKind::Matching { left, .. } => InteractionState::Matching {
                pair_count: left.len(),
            },
            SceneKind::TimedChallenge {
                options,
                correct,
                time_limit_ms,
            } => {
                let limit = time_limit_ms
                    .map(Duration::from_millis)
                    .unwrap_or_else(|| config.timed_challenge_default());
                InteractionState::TimedChallenge {
                    option_count: options.len(),
                    correct: *correct,
                    clock: Countdown::new(limit),
                }
            }
            SceneKind::TimingBar {
                zone_start,
                zone_end,
                period_ms,
                hits_required,
                max_misses,
            } => InteractionState::TimingBar(TimingBar::new(
                *zone_start,
                *zone_end,
                Duration::from_millis(*period_ms),
                *hits_required,
                *max_misses,
            )),
            SceneKind::ShrinkingCircle {
                start_radius,
                shrink_per_sec,
                target_min,
                target_max,
            } => InteractionState::ShrinkingCircle(ShrinkingCircle::new(
                *start_radius,
                *shrink_per_sec,
                *target_min,
                *target_max,
            )),
            SceneKind::ShootingGallery {
                targets,
                required_hits,
                time_limit_ms,
                max_friendly_fire,
            } => InteractionState::ShootingGallery(ShootingGallery::new(
                targets.iter().map(|t| t.kind).collect(),
                *required_hits,
                Duration::from_millis(*time_limit_ms),
                *max_friendly_fire,
            )),
        };

        Self {
            scene: scene.id.clone(),
            scene_type: scene.kind.type_name(),
            state,
        }
    }

    pub fn scene(&self) -> &SceneId {
        &self.scene
    }

    pub fn scene_type(&self) -> &'static str {
        self.scene_type
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Route one input to the interaction.
    ///
    /// Ticks are accepted by every interaction type; anything else the type
    /// does not understand is an [`StoryError::UnexpectedInput`].
    pub fn apply(&mut self, input: &PlayerInput) -> Result<Outcome, StoryError> {
        if let PlayerInput::Tick(dt) = input {
            return Ok(self.tick(*dt));
        }

        let scene = &self.scene;
        let graded = |result: Result<bool, AnswerError>| -> Result<Outcome, StoryError> {
            result
                .map(Outcome::graded)
                .map_err(|source| StoryError::InvalidAnswer {
                    scene: scene.clone(),
                    source,
                })
        };

        match (&mut self.state, input) {
            (InteractionState::Passive { .. }, PlayerInput::Continue)
            | (InteractionState::Animation(_), PlayerInput::Continue) => Ok(Outcome::Completed),

            (InteractionState::PathwayChoice, PlayerInput::SelectPathway(pathway)) => {
                Ok(Outcome::Branch(*pathway))
            }

            (
                InteractionState::Choice {
                    option_count,
                    correct,
                },
                PlayerInput::ChooseOption(chosen),
            ) => graded(grade_choice(*correct, *chosen, *option_count)),

            (InteractionState::TrueFalse { answer }, PlayerInput::AnswerTrueFalse(given)) => {
                Ok(Outcome::graded(grade_true_false(*answer, *given)))
            }

            (
                InteractionState::MultiSelect {
                    option_count,
                    correct,
                },
                PlayerInput::SubmitSelection(selected),
            ) => graded(grade_multi_select(correct, selected, *option_count)),

            (InteractionState::FillBlank { accepted }, PlayerInput::SubmitText(text)) => {
                Ok(Outcome::graded(grade_fill_blank(accepted, text)))
            }

            (
                InteractionState::DragDrop {
                    items,
                    target_count,
                    placements,
                },
                PlayerInput::Place { item, target },
            ) => {
                if *item >= items.len() {
                    return graded(Err(AnswerError::OptionOutOfRange {
                        index: *item,
                        count: items.len(),
                    }));
                }
                if *target >= *target_count {
                    return graded(Err(AnswerError::OptionOutOfRange {
                        index: *target,
                        count: *target_count,
                    }));
                }
                placements[*item] = Some(*target);
                Ok(Outcome::Pending)
            }

            (
                InteractionState::DragDrop {
                    items, placements, ..
                },
                PlayerInput::SubmitPlacement,
            ) => graded(grade_drag_drop(items, placements)),

            (InteractionState::Sequence { step_count }, PlayerInput::SubmitOrder(order)) => {
                graded(grade_sequence(*step_count, order))
            }

            (InteractionState::Matching { pair_count }, PlayerInput::SubmitPairs(pairs)) => {
                graded(grade_matching(*pair_count, pairs))
            }

            (
                InteractionState::TimedChallenge {
                    option_count,
                    correct,
                    ..
                },
                PlayerInput::ChooseOption(chosen),
            ) => graded(grade_choice(*correct, *chosen, *option_count)),

            (InteractionState::TimingBar(bar), PlayerInput::Press) => {
                Ok(Outcome::from_status(bar.press()))
            }

            (InteractionState::ShrinkingCircle(circle), PlayerInput::Press) => {
                Ok(Outcome::from_status(circle.press()))
            }

            (InteractionState::ShootingGallery(gallery), PlayerInput::Shoot(index)) => {
                let status = gallery.shoot(*index).map_err(|source| StoryError::InvalidAnswer {
                    scene: scene.clone(),
                    source,
                })?;
                Ok(Outcome::from_status(status))
            }

            (_, input) => Err(StoryError::UnexpectedInput {
                scene: self.scene.clone(),
                scene_type: self.scene_type,
                input: input.name(),
            }),
        }
    }

    /// Advance every clock the interaction owns.
    fn tick(&mut self, dt: Duration) -> Outcome {
        match &mut self.state {
            InteractionState::Passive {
                auto_advance: Some(clock),
            }
            | InteractionState::Animation(clock) => {
                clock.tick(dt);
                if clock.is_expired() {
                    Outcome::Completed
                } else {
                    Outcome::Pending
                }
            }
            InteractionState::TimedChallenge { clock, .. } => {
                clock.tick(dt);
                if clock.is_expired() {
                    Outcome::Incorrect
                } else {
                    Outcome::Pending
                }
            }
            InteractionState::TimingBar(bar) => {
                bar.tick(dt);
                Outcome::from_status(bar.status())
            }
            InteractionState::ShrinkingCircle(circle) => {
                circle.tick(dt);
                Outcome::from_status(circle.status())
            }
            InteractionState::ShootingGallery(gallery) => {
                gallery.tick(dt);
                Outcome::from_status(gallery.status())
            }
            _ => Outcome::Pending,
        }
    }

    /// Status of the mini-game, if this interaction is one.
    pub fn game_status(&self) -> Option<GameStatus> {
        match &self.state {
            InteractionState::TimingBar(bar) => Some(bar.status()),
            InteractionState::ShrinkingCircle(circle) => Some(circle.status()),
            InteractionState::ShootingGallery(gallery) => Some(gallery.status()),
            _ => None,
        }
    }
}
