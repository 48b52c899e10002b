//! Resolved engine settings.
//!
//! Raw TOML structs (with `Option` fields) stay private in
//! `hexaprofile-config`. The loader resolves them into these types at the
//! parse boundary, so holding an [`EngineSettings`] proves every value is
//! usable.

use serde::Serialize;
use thiserror::Error;

use crate::vector::TraitVector;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SettingsError {
    #[error("answer scale min ({min}) must be below max ({max})")]
    EmptyScale { min: i32, max: i32 },
    #[error("polarity cutoff {0} must be a finite value in 0..=100")]
    Cutoff(f64),
    #[error("changing-line threshold {0} must be a finite, non-negative value")]
    Threshold(f64),
}

/// Inclusive range of discrete answer values.
///
/// Invariant: `min < max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerScale {
    min: i32,
    max: i32,
}

impl AnswerScale {
    /// Binary yes/no answers.
    pub const BINARY: AnswerScale = AnswerScale { min: 0, max: 1 };

    pub fn new(min: i32, max: i32) -> Result<Self, SettingsError> {
        if min >= max {
            return Err(SettingsError::EmptyScale { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub const fn min(self) -> i32 {
        self.min
    }

    #[must_use]
    pub const fn max(self) -> i32 {
        self.max
    }

    #[must_use]
    pub const fn contains(self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Map an answer onto the canonical `0..=100` score axis.
    ///
    /// Returns `None` for answers outside the scale.
    #[must_use]
    pub fn normalize(self, value: i32) -> Option<f64> {
        if !self.contains(value) {
            return None;
        }
        let span = f64::from(self.max) - f64::from(self.min);
        Some((f64::from(value) - f64::from(self.min)) * TraitVector::MAX_SCORE / span)
    }
}

impl Default for AnswerScale {
    fn default() -> Self {
        Self::BINARY
    }
}

/// Validated engine tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngineSettings {
    answer_scale: AnswerScale,
    polarity_cutoff: f64,
    changing_line_threshold: f64,
}

impl EngineSettings {
    pub const DEFAULT_POLARITY_CUTOFF: f64 = 50.0;
    pub const DEFAULT_CHANGING_LINE_THRESHOLD: f64 = 20.0;

    pub fn new(
        answer_scale: AnswerScale,
        polarity_cutoff: f64,
        changing_line_threshold: f64,
    ) -> Result<Self, SettingsError> {
        if !polarity_cutoff.is_finite()
            || !(TraitVector::MIN_SCORE..=TraitVector::MAX_SCORE).contains(&polarity_cutoff)
        {
            return Err(SettingsError::Cutoff(polarity_cutoff));
        }
        if !changing_line_threshold.is_finite() || changing_line_threshold < 0.0 {
            return Err(SettingsError::Threshold(changing_line_threshold));
        }
        Ok(Self {
            answer_scale,
            polarity_cutoff,
            changing_line_threshold,
        })
    }

    #[must_use]
    pub const fn answer_scale(&self) -> AnswerScale {
        self.answer_scale
    }

    #[must_use]
    pub const fn polarity_cutoff(&self) -> f64 {
        self.polarity_cutoff
    }

    #[must_use]
    pub const fn changing_line_threshold(&self) -> f64 {
        self.changing_line_threshold
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            answer_scale: AnswerScale::BINARY,
            polarity_cutoff: Self::DEFAULT_POLARITY_CUTOFF,
            changing_line_threshold: Self::DEFAULT_CHANGING_LINE_THRESHOLD,
        }
    }
}
