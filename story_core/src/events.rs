//! Player inputs going into a session and the events coming out of it.

use lesson_rules::{Act, Pathway, SceneId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Everything a front-end can send to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerInput {
    /// Dismiss dialogue, narration, info cards; skip animations.
    Continue,
    SelectPathway(Pathway),
    /// Multiple choice and timed challenges.
    ChooseOption(usize),
    AnswerTrueFalse(bool),
    SubmitSelection(Vec<usize>),
    SubmitText(String),
    /// Drop drag-drop item `item` onto target `target`.
    Place { item: usize, target: usize },
    SubmitPlacement,
    SubmitOrder(Vec<usize>),
    /// `(left, right)` links for a matching exercise.
    SubmitPairs(Vec<(usize, usize)>),
    /// Timing bar and shrinking circle.
    Press,
    Shoot(usize),
    /// Time passing; drives auto-advance and mini-game clocks.
    Tick(Duration),
}

impl PlayerInput {
    /// Short name used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            PlayerInput::Continue => "continue",
            PlayerInput::SelectPathway(_) => "select_pathway",
            PlayerInput::ChooseOption(_) => "choose_option",
            PlayerInput::AnswerTrueFalse(_) => "answer_true_false",
            PlayerInput::SubmitSelection(_) => "submit_selection",
            PlayerInput::SubmitText(_) => "submit_text",
            PlayerInput::Place { .. } => "place",
            PlayerInput::SubmitPlacement => "submit_placement",
            PlayerInput::SubmitOrder(_) => "submit_order",
            PlayerInput::SubmitPairs(_) => "submit_pairs",
            PlayerInput::Press => "press",
            PlayerInput::Shoot(_) => "shoot",
            PlayerInput::Tick(_) => "tick",
        }
    }
}

/// What happened as a result of an input. Front-ends render from these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    SceneEntered { scene: SceneId, scene_type: String },
    SceneCompleted { scene: SceneId },
    /// `attempts` counts failed tries before this one.
    AnswerAccepted { scene: SceneId, attempts: u32 },
    AnswerRejected { scene: SceneId, lives_remaining: u32 },
    PathwaySelected(Pathway),
    ActChanged { from: Act, to: Act },
    GameOver { scene: SceneId },
    Victory { answered: u32, mistakes: u32 },
    Restarted,
}

impl SessionEvent {
    /// The scene this event is about, if any.
    pub fn scene(&self) -> Option<&SceneId> {
        match self {
            SessionEvent::SceneEntered { scene, .. }
            | SessionEvent::SceneCompleted { scene }
            | SessionEvent::AnswerAccepted { scene, .. }
            | SessionEvent::AnswerRejected { scene, .. }
            | SessionEvent::GameOver { scene } => Some(scene),
            SessionEvent::PathwaySelected(_)
            | SessionEvent::ActChanged { .. }
            | SessionEvent::Victory { .. }
            | SessionEvent::Restarted => None,
        }
    }

    /// Terminal events end the run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionEvent::GameOver { .. } | SessionEvent::Victory { .. })
    }
}
