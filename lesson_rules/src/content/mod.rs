//! Story content - the static scene arrays a session traverses.
//!
//! A story is split into acts:
//! - **act1**: the shared opening, ending in a pathway choice
//! - **pathway**: one of two mutually exclusive branches, picked once
//! - **victory** / **gameover**: terminal acts with no scenes of their own

mod scene;

pub use scene::*;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::ContentError;

/// String identifier of a scene, unique across the whole story.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(pub String);

impl SceneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SceneId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SceneId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Top-level narrative phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Act {
    #[default]
    Act1,
    Pathway,
    Victory,
    GameOver,
}

impl Act {
    /// Victory and game over end the run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Act::Victory | Act::GameOver)
    }
}

impl std::fmt::Display for Act {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Act::Act1 => "act1",
            Act::Pathway => "pathway",
            Act::Victory => "victory",
            Act::GameOver => "gameover",
        };
        write!(f, "{}", name)
    }
}

/// The two branches of the immune response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pathway {
    /// T cells kill infected cells directly.
    CellMediated,
    /// B cells release antibodies into the blood.
    Humoral,
}

impl Pathway {
    pub const ALL: [Pathway; 2] = [Pathway::CellMediated, Pathway::Humoral];
}

impl std::fmt::Display for Pathway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pathway::CellMediated => write!(f, "cell_mediated"),
            Pathway::Humoral => write!(f, "humoral"),
        }
    }
}

/// Where a scene lives inside a story book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneLocation {
    pub act: Act,
    pub pathway: Option<Pathway>,
    pub index: usize,
}

/// The complete static content tree of a lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryBook {
    #[serde(default)]
    pub title: String,

    /// Shared opening scenes.
    #[serde(default)]
    pub act1: Vec<Scene>,

    /// Scenes of the cell-mediated branch.
    #[serde(default)]
    pub cell_mediated: Vec<Scene>,

    /// Scenes of the humoral branch.
    #[serde(default)]
    pub humoral: Vec<Scene>,
}

impl StoryBook {
    /// Parse a story from TOML and validate it.
    pub fn from_toml_str(source: &str) -> Result<Self, ContentError> {
        let book: StoryBook = toml::from_str(source)?;
        book.validate()?;
        Ok(book)
    }

    /// Read, parse and validate a story file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Check that the story can be played from start to either ending.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.act1.is_empty() {
            return Err(ContentError::EmptyArray("act1"));
        }
        if self.cell_mediated.is_empty() {
            return Err(ContentError::EmptyArray("cell_mediated"));
        }
        if self.humoral.is_empty() {
            return Err(ContentError::EmptyArray("humoral"));
        }

        let mut choices = self
            .act1
            .iter()
            .filter(|s| matches!(s.kind, SceneKind::PathwayChoice));
        if choices.next().is_none() {
            return Err(ContentError::MissingPathwayChoice);
        }
        // The pathway is picked once per run.
        if let Some(extra) = choices.next() {
            return Err(ContentError::InvalidScene {
                scene: extra.id.to_string(),
                reason: "act1 may hold only one pathway_choice".into(),
            });
        }

        let mut seen = HashSet::new();
        for scene in self.all_scenes() {
            if !seen.insert(&scene.id) {
                return Err(ContentError::DuplicateSceneId(scene.id.to_string()));
            }
            scene.check()?;
        }

        // A second branch point inside a branch has nowhere to go.
        for scene in self.cell_mediated.iter().chain(&self.humoral) {
            if matches!(scene.kind, SceneKind::PathwayChoice) {
                return Err(ContentError::InvalidScene {
                    scene: scene.id.to_string(),
                    reason: "pathway_choice is only allowed in act1".into(),
                });
            }
        }

        Ok(())
    }

    /// The scene array traversed in `act`. Terminal acts have no scenes.
    pub fn scenes_for(&self, act: Act, pathway: Option<Pathway>) -> &[Scene] {
        match (act, pathway) {
            (Act::Act1, _) => &self.act1,
            (Act::Pathway, Some(pathway)) => self.pathway_scenes(pathway),
            _ => &[],
        }
    }

    /// The scene array of one branch.
    pub fn pathway_scenes(&self, pathway: Pathway) -> &[Scene] {
        match pathway {
            Pathway::CellMediated => &self.cell_mediated,
            Pathway::Humoral => &self.humoral,
        }
    }

    /// Find a scene and where it lives.
    pub fn find(&self, id: &SceneId) -> Option<(SceneLocation, &Scene)> {
        let act1 = self.act1.iter().enumerate().map(|(index, scene)| {
            (
                SceneLocation {
                    act: Act::Act1,
                    pathway: None,
                    index,
                },
                scene,
            )
        });
        let branches = Pathway::ALL.into_iter().flat_map(move |pathway| {
            self.pathway_scenes(pathway)
                .iter()
                .enumerate()
                .map(move |(index, scene)| {
                    (
                        SceneLocation {
                            act: Act::Pathway,
                            pathway: Some(pathway),
                            index,
                        },
                        scene,
                    )
                })
        });

        act1.chain(branches).find(|(_, scene)| &scene.id == id)
    }

    /// Index of the act1 scene where the story branches.
    pub fn pathway_choice_index(&self) -> Option<usize> {
        self.act1
            .iter()
            .position(|s| matches!(s.kind, SceneKind::PathwayChoice))
    }

    /// Number of graded scenes in an array.
    pub fn question_count(scenes: &[Scene]) -> usize {
        scenes.iter().filter(|s| s.is_question()).count()
    }

    /// Iterate every scene in the book, act1 first.
    pub fn all_scenes(&self) -> impl Iterator<Item = &Scene> {
        self.act1
            .iter()
            .chain(&self.cell_mediated)
            .chain(&self.humoral)
    }

    /// Total number of scenes.
    pub fn scene_count(&self) -> usize {
        self.act1.len() + self.cell_mediated.len() + self.humoral.len()
    }
}
