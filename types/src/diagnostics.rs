//! Recoverable conditions surfaced on results instead of returned as errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::ArchetypeId;

/// Why an answer vector was replaced by the neutral default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputShapeWarning {
    #[error("expected {expected} answers, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("answer {index} is undefined")]
    UndefinedEntry { index: usize },
    #[error("answer {index} ({value}) is outside the answer scale {min}..={max}")]
    OutOfScale {
        index: usize,
        value: i32,
        min: i32,
        max: i32,
    },
}

/// An archetype id that no declared stage range covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("archetype {archetype} is not covered by any declared stage range")]
pub struct StageResolutionGap {
    pub archetype: ArchetypeId,
}
