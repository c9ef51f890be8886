//! # Story Core
//!
//! The controller of an Immune Quest lesson. This crate reads a
//! `lesson_rules::StoryBook`, walks its scene graph, and decides what every
//! player input means.
//!
//! ## Core Components
//!
//! - **session**: The state machine - act, scene, pathway, lives, and progress
//! - **dispatch**: Maps a scene's `type` to live interaction state and grades inputs against it
//! - **events**: Player inputs in, session events out
//! - **config**: Session tunables, loadable from TOML
//!
//! ## Design Philosophy
//!
//! - **Event-Driven**: Front-ends send inputs and render from the returned events
//! - **Deterministic**: Time only passes through `Tick` inputs, so every run can be replayed
//! - **Content-Agnostic**: All narrative lives in the story book; the engine holds none

pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod session;

pub use config::*;
pub use dispatch::*;
pub use error::*;
pub use events::*;
pub use session::*;
