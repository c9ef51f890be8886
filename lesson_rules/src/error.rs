//! Errors raised while loading or validating story content.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong turning a TOML file into a usable [`StoryBook`].
///
/// [`StoryBook`]: crate::content::StoryBook
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read story file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("story content is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("scene id '{0}' is used more than once")]
    DuplicateSceneId(String),

    #[error("scene array '{0}' is empty")]
    EmptyArray(&'static str),

    #[error("act1 has no pathway_choice scene, the story can never branch")]
    MissingPathwayChoice,

    #[error("scene '{scene}' is invalid: {reason}")]
    InvalidScene { scene: String, reason: String },
}
