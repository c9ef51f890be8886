//! Story engine error types.

use lesson_rules::{Act, AnswerError, ContentError, SceneId};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for everything a session can refuse or fail at.
#[derive(Debug, Error)]
pub enum StoryError {
    /// The story book failed to load or validate.
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("session config is not valid TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to read session config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid session config: {0}")]
    InvalidConfig(String),

    /// The input does not belong to the active interaction type. Costs no life.
    #[error("{input} is not accepted by {scene_type} scene '{scene}'")]
    UnexpectedInput {
        scene: SceneId,
        scene_type: &'static str,
        input: &'static str,
    },

    /// The answer is malformed and was not graded. Costs no life.
    #[error("answer for scene '{scene}' was not graded: {source}")]
    InvalidAnswer {
        scene: SceneId,
        #[source]
        source: AnswerError,
    },

    #[error("the session has ended ({0})")]
    SessionFinished(Act),

    #[error("retry is only available after game over, the session is in {0}")]
    RetryUnavailable(Act),

    /// A jump to an act1 scene after the pathway choice, made before any
    /// pathway was chosen. Playing through act1 always picks one first.
    #[error("no pathway has been selected yet")]
    NoPathwaySelected,

    #[error("unknown scene '{0}'")]
    UnknownScene(SceneId),

    #[error("failed to serialize session snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}
