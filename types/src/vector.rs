//! Trait dimensions, facets, and canonical score vectors.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lines::{Polarity, Trigram};
use crate::pattern::{TRAIT_WIDTH, TraitBits};

/// One of the eight scored trait dimensions, in vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Creativity,
    Harmony,
    Expression,
    Action,
    Adaptability,
    Inquiry,
    Stability,
    Receptivity,
}

impl Dimension {
    /// Dimensions in vector order (index 0 first).
    pub const ALL: [Dimension; TRAIT_WIDTH] = [
        Dimension::Creativity,
        Dimension::Harmony,
        Dimension::Expression,
        Dimension::Action,
        Dimension::Adaptability,
        Dimension::Inquiry,
        Dimension::Stability,
        Dimension::Receptivity,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The trigram this dimension is associated with.
    #[must_use]
    pub const fn trigram(self) -> Trigram {
        match self {
            Dimension::Creativity => Trigram::Qian,
            Dimension::Harmony => Trigram::Dui,
            Dimension::Expression => Trigram::Li,
            Dimension::Action => Trigram::Zhen,
            Dimension::Adaptability => Trigram::Xun,
            Dimension::Inquiry => Trigram::Kan,
            Dimension::Stability => Trigram::Gen,
            Dimension::Receptivity => Trigram::Kun,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Dimension::Creativity => "creativity",
            Dimension::Harmony => "harmony",
            Dimension::Expression => "expression",
            Dimension::Action => "action",
            Dimension::Adaptability => "adaptability",
            Dimension::Inquiry => "inquiry",
            Dimension::Stability => "stability",
            Dimension::Receptivity => "receptivity",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the three independent classification runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    /// Inner drive and values.
    Engine,
    /// Social presentation.
    Interface,
    /// Behavior under pressure.
    SafeMode,
}

impl Facet {
    pub const ALL: [Facet; 3] = [Facet::Engine, Facet::Interface, Facet::SafeMode];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Facet::Engine => "engine",
            Facet::Interface => "interface",
            Facet::SafeMode => "safe_mode",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("score {value} for {dimension} is outside 0..=100")]
pub struct ScoreRangeError {
    pub dimension: Dimension,
    pub value: f64,
}

/// Eight canonical scores in `0.0..=100.0`, one per [`Dimension`].
///
/// Invariant: every score is finite and within range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 8]", into = "[f64; 8]")]
pub struct TraitVector([f64; TRAIT_WIDTH]);

impl TraitVector {
    pub const MIN_SCORE: f64 = 0.0;
    pub const MAX_SCORE: f64 = 100.0;
    pub const MIDPOINT: f64 = 50.0;

    pub fn new(scores: [f64; TRAIT_WIDTH]) -> Result<Self, ScoreRangeError> {
        for (dimension, value) in Dimension::ALL.into_iter().zip(scores) {
            if !value.is_finite() || !(Self::MIN_SCORE..=Self::MAX_SCORE).contains(&value) {
                return Err(ScoreRangeError { dimension, value });
            }
        }
        Ok(Self(scores))
    }

    /// Every score at the midpoint.
    #[must_use]
    pub const fn neutral() -> Self {
        Self([Self::MIDPOINT; TRAIT_WIDTH])
    }

    /// Extreme scores for the given polarities: 100 for positive, 0 for negative.
    #[must_use]
    pub fn from_bits(bits: &TraitBits) -> Self {
        Self(bits.as_array().map(|polarity| {
            if polarity.is_positive() {
                Self::MAX_SCORE
            } else {
                Self::MIN_SCORE
            }
        }))
    }

    #[must_use]
    pub const fn scores(&self) -> &[f64; TRAIT_WIDTH] {
        &self.0
    }

    #[must_use]
    pub const fn score(&self, dimension: Dimension) -> f64 {
        self.0[dimension.index()]
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        self.0.iter().sum::<f64>() / TRAIT_WIDTH as f64
    }

    /// Polarity projection: a score at or above `cutoff` is positive.
    #[must_use]
    pub fn bits(&self, cutoff: f64) -> TraitBits {
        TraitBits::new(self.0.map(|score| Polarity::from_bit(score >= cutoff)))
    }
}

impl TryFrom<[f64; TRAIT_WIDTH]> for TraitVector {
    type Error = ScoreRangeError;

    fn try_from(value: [f64; TRAIT_WIDTH]) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TraitVector> for [f64; TRAIT_WIDTH] {
    fn from(value: TraitVector) -> Self {
        value.0
    }
}
