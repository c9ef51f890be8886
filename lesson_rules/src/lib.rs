//! # Lesson Rules
//!
//! The "rule book" crate - contains the story content model, the rules of every
//! interaction type, and the mini-game mechanics for Immune Quest.
//! This crate holds no session state; it only describes and judges.

pub mod content;
pub mod error;
pub mod mechanics;

pub use content::*;
pub use error::*;
pub use mechanics::*;
