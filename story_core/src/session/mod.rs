//! Story session - the controller state machine.
//!
//! A session tracks where the player is (act, scene, pathway), how many lives
//! are left, and the live interaction of the current scene. Inputs go in
//! through [`StorySession::handle`]; [`SessionEvent`]s come out.
//!
//! ```text
//! act1 ──(pathway_choice)──> pathway ──(last scene)──> victory
//!   │                           │
//!   └──────(lives == 0)─────────┴──────────────────> gameover
//! ```

mod progress;

pub use progress::*;

use lesson_rules::{Act, Lives, Pathway, Scene, SceneId, StoryBook};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::dispatch::{Interaction, Outcome};
use crate::error::StoryError;
use crate::events::{PlayerInput, SessionEvent};

/// Unique identifier for a play session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Serializable view of a session, for debugging and front-end hydration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub act: Act,
    pub scene: Option<SceneId>,
    pub scene_type: Option<String>,
    pub pathway: Option<Pathway>,
    pub lives: Lives,
    pub attempts: u32,
    pub answered: u32,
    pub mistakes: u32,
    pub progress: Progress,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String, StoryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One playthrough of a story book.
#[derive(Debug, Clone)]
pub struct StorySession {
    id: SessionId,
    book: StoryBook,
    config: SessionConfig,

    act: Act,
    pathway: Option<Pathway>,
    scene_index: usize,
    lives: Lives,

    /// `None` only in terminal acts.
    interaction: Option<Interaction>,

    /// Failed attempts at the current scene.
    attempts: u32,
    /// Questions answered correctly this run.
    answered: u32,
    mistakes: u32,

    /// Last progress seen outside game over.
    progress: Progress,
}

impl StorySession {
    /// Validate the book and config, then start at the first scene of act1.
    pub fn new(book: StoryBook, config: SessionConfig) -> Result<Self, StoryError> {
        book.validate()?;
        config.validate()?;

        let mut session = Self {
            id: SessionId::new(),
            lives: Lives::new(config.starting_lives),
            book,
            config,
            act: Act::Act1,
            pathway: None,
            scene_index: 0,
            interaction: None,
            attempts: 0,
            answered: 0,
            mistakes: 0,
            progress: Progress::default(),
        };
        let mut events = Vec::new();
        session.enter_scene(&mut events);
        info!(session = %session.id, title = %session.book.title, "story session started");
        Ok(session)
    }

    /// Start a session with default configuration.
    pub fn with_defaults(book: StoryBook) -> Result<Self, StoryError> {
        Self::new(book, SessionConfig::default())
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn act(&self) -> Act {
        self.act
    }

    pub fn pathway(&self) -> Option<Pathway> {
        self.pathway
    }

    pub fn lives(&self) -> Lives {
        self.lives
    }

    pub fn book(&self) -> &StoryBook {
        &self.book
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn interaction(&self) -> Option<&Interaction> {
        self.interaction.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.act.is_terminal()
    }

    /// The scene being played, `None` in victory and game over.
    pub fn current_scene(&self) -> Option<&Scene> {
        self.book
            .scenes_for(self.act, self.pathway)
            .get(self.scene_index)
    }

    pub fn current_scene_id(&self) -> Option<&SceneId> {
        self.current_scene().map(|scene| &scene.id)
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            act: self.act,
            scene: self.current_scene_id().cloned(),
            scene_type: self
                .current_scene()
                .map(|scene| scene.kind.type_name().to_string()),
            pathway: self.pathway,
            lives: self.lives,
            attempts: self.attempts,
            answered: self.answered,
            mistakes: self.mistakes,
            progress: self.progress,
        }
    }

    /// Feed one player input through the active interaction.
    ///
    /// Ticks after the run has ended are ignored; any other input is refused
    /// with [`StoryError::SessionFinished`].
    #[instrument(level = "debug", skip_all, fields(session = %self.id, input = input.name()))]
    pub fn handle(&mut self, input: PlayerInput) -> Result<Vec<SessionEvent>, StoryError> {
        let Some(interaction) = self.interaction.as_mut() else {
            if matches!(input, PlayerInput::Tick(_)) {
                return Ok(Vec::new());
            }
            warn!(act = %self.act, "input after the session ended");
            return Err(StoryError::SessionFinished(self.act));
        };

        if let PlayerInput::SelectPathway(_) = input {
            if self.pathway.is_some() {
                return Err(StoryError::UnexpectedInput {
                    scene: interaction.scene().clone(),
                    scene_type: interaction.scene_type(),
                    input: input.name(),
                });
            }
        }

        let outcome = match interaction.apply(&input) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "input rejected");
                return Err(err);
            }
        };

        let scene = interaction.scene().clone();
        let mut events = Vec::new();
        match outcome {
            Outcome::Pending => {}
            Outcome::Completed => {
                events.push(SessionEvent::SceneCompleted { scene });
                self.advance(&mut events)?;
            }
            Outcome::Correct => {
                self.answered += 1;
                debug!(scene = %scene, attempts = self.attempts, "answer accepted");
                events.push(SessionEvent::AnswerAccepted {
                    scene: scene.clone(),
                    attempts: self.attempts,
                });
                events.push(SessionEvent::SceneCompleted { scene });
                self.advance(&mut events)?;
            }
            Outcome::Incorrect => self.reject_answer(scene, &mut events),
            Outcome::Branch(pathway) => {
                info!(pathway = %pathway, "pathway selected");
                self.pathway = Some(pathway);
                events.push(SessionEvent::PathwaySelected(pathway));
                events.push(SessionEvent::SceneCompleted { scene });
                self.advance(&mut events)?;
            }
        }

        Ok(events)
    }

    /// Let time pass.
    pub fn tick(&mut self, dt: std::time::Duration) -> Result<Vec<SessionEvent>, StoryError> {
        self.handle(PlayerInput::Tick(dt))
    }

    /// Back to the first scene with full lives and no pathway.
    pub fn restart(&mut self) -> Vec<SessionEvent> {
        info!(session = %self.id, from = %self.act, "session restarted");
        let mut events = vec![SessionEvent::Restarted];
        self.pathway = None;
        self.lives.reset();
        self.answered = 0;
        self.mistakes = 0;
        self.progress = Progress::default();
        self.set_act(Act::Act1, &mut events);
        self.scene_index = 0;
        self.enter_scene(&mut events);
        events
    }

    /// The "try again" button on the game over screen.
    ///
    /// Re-enters the start of the chosen pathway with full lives. Without a
    /// pathway there is nothing to resume, so the whole story restarts.
    pub fn retry_pathway(&mut self) -> Result<Vec<SessionEvent>, StoryError> {
        if self.act != Act::GameOver {
            return Err(StoryError::RetryUnavailable(self.act));
        }
        let Some(pathway) = self.pathway else {
            return Ok(self.restart());
        };

        info!(session = %self.id, pathway = %pathway, "retrying pathway");
        let mut events = vec![SessionEvent::Restarted];
        self.lives.reset();
        self.answered = StoryBook::question_count(&self.book.act1) as u32;
        self.mistakes = 0;
        self.set_act(Act::Pathway, &mut events);
        self.scene_index = 0;
        self.enter_scene(&mut events);
        Ok(events)
    }

    /// Move straight to a scene, e.g. from a chapter select.
    ///
    /// Jumping into a branch selects it. Jumping onto the pathway choice or
    /// anything before it clears the pathway; act1 scenes after the choice
    /// keep the recorded one and fail with [`StoryError::NoPathwaySelected`]
    /// when there is none. Leaving victory or game over starts a fresh run
    /// with full lives.
    pub fn jump_to(&mut self, id: &SceneId) -> Result<Vec<SessionEvent>, StoryError> {
        let (location, _) = self
            .book
            .find(id)
            .ok_or_else(|| StoryError::UnknownScene(id.clone()))?;

        let past_fork = location.act == Act::Act1
            && self
                .book
                .pathway_choice_index()
                .is_some_and(|fork| location.index > fork);
        let pathway = if past_fork {
            Some(self.pathway.ok_or(StoryError::NoPathwaySelected)?)
        } else {
            location.pathway
        };

        debug!(session = %self.id, scene = %id, "jumping to scene");
        let mut events = Vec::new();
        if self.act.is_terminal() {
            info!(session = %self.id, from = %self.act, "leaving the end screen");
            events.push(SessionEvent::Restarted);
            self.lives.reset();
            self.answered = 0;
            self.mistakes = 0;
        }
        self.pathway = pathway;
        self.set_act(location.act, &mut events);
        self.scene_index = location.index;
        self.enter_scene(&mut events);
        Ok(events)
    }

    fn reject_answer(&mut self, scene: SceneId, events: &mut Vec<SessionEvent>) {
        let lives_remaining = self.lives.lose_one();
        self.mistakes += 1;
        debug!(scene = %scene, lives_remaining, "answer rejected");
        events.push(SessionEvent::AnswerRejected {
            scene: scene.clone(),
            lives_remaining,
        });

        if self.lives.is_depleted() {
            info!(scene = %scene, "out of lives");
            self.set_act(Act::GameOver, events);
            self.interaction = None;
            events.push(SessionEvent::GameOver { scene });
            return;
        }

        // Same scene again from a clean state.
        self.attempts += 1;
        let attempts = self.attempts;
        self.enter_scene_quiet();
        self.attempts = attempts;
    }

    fn advance(&mut self, events: &mut Vec<SessionEvent>) -> Result<(), StoryError> {
        let next = self.scene_index + 1;
        if next < self.book.scenes_for(self.act, self.pathway).len() {
            self.scene_index = next;
            self.enter_scene(events);
            return Ok(());
        }

        match self.act {
            Act::Act1 => {
                // act1 only ends after its pathway_choice, which sets the pathway.
                if self.pathway.is_none() {
                    return Err(StoryError::NoPathwaySelected);
                }
                self.set_act(Act::Pathway, events);
                self.scene_index = 0;
                self.enter_scene(events);
            }
            Act::Pathway => {
                self.set_act(Act::Victory, events);
                self.scene_index = 0;
                self.interaction = None;
                self.progress = Progress::compute(&self.book, Act::Victory, self.pathway, 0);
                info!(answered = self.answered, mistakes = self.mistakes, "victory");
                events.push(SessionEvent::Victory {
                    answered: self.answered,
                    mistakes: self.mistakes,
                });
            }
            Act::Victory | Act::GameOver => {}
        }
        Ok(())
    }

    fn set_act(&mut self, act: Act, events: &mut Vec<SessionEvent>) {
        if self.act != act {
            info!(from = %self.act, to = %act, "act changed");
            events.push(SessionEvent::ActChanged { from: self.act, to: act });
            self.act = act;
        }
    }

    /// Build the interaction for the current scene and report it.
    fn enter_scene(&mut self, events: &mut Vec<SessionEvent>) {
        self.enter_scene_quiet();
        if let Some(scene) = self.current_scene() {
            debug!(scene = %scene.id, scene_type = scene.kind.type_name(), "scene entered");
            events.push(SessionEvent::SceneEntered {
                scene: scene.id.clone(),
                scene_type: scene.kind.type_name().to_string(),
            });
        }
    }

    fn enter_scene_quiet(&mut self) {
        self.attempts = 0;
        self.interaction = self
            .current_scene()
            .map(|scene| Interaction::from_scene(scene, &self.config));
        if !self.act.is_terminal() {
            self.progress = Progress::compute(&self.book, self.act, self.pathway, self.scene_index);
        }
    }
}
