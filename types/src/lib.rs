//! Core domain types for hexaprofile.
//!
//! This crate contains pure domain types with no IO and minimal dependencies.
//! Identifiers are range-checked newtypes; holding one proves it is valid.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod diagnostics;
mod ids;
mod lines;
mod pattern;
mod settings;
mod vector;

pub use diagnostics::{InputShapeWarning, StageResolutionGap};
pub use ids::{ArchetypeId, IdRangeError, LinePosition, PalaceId, PalacePosition, StageOrdinal};
pub use lines::{Lines, LinesRangeError, Polarity, Trigram};
pub use pattern::{
    ClassificationDomainError, PatternId, PatternParseError, Radix, TRAIT_WIDTH, TraitBits,
};
pub use settings::{AnswerScale, EngineSettings, SettingsError};
pub use vector::{Dimension, Facet, ScoreRangeError, TraitVector};
