//! Answers to canonical trait vectors.
//!
//! Encoding fails closed: any malformed input yields the neutral vector and
//! [`PatternId::NEUTRAL`] together with a warning describing the first
//! problem found. Undefined answers never propagate into a score.

use hexaprofile_types::{
    AnswerScale, EngineSettings, InputShapeWarning, PatternId, TRAIT_WIDTH, TraitVector,
};
use serde::Serialize;

/// A canonical vector and its pattern id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EncodedVector {
    pub vector: TraitVector,
    pub pattern: PatternId,
    /// Set when the input was replaced by the neutral default.
    pub warning: Option<InputShapeWarning>,
}

impl EncodedVector {
    fn neutral(warning: InputShapeWarning) -> Self {
        Self {
            vector: TraitVector::neutral(),
            pattern: PatternId::NEUTRAL,
            warning: Some(warning),
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.warning.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TraitVectorEncoder {
    scale: AnswerScale,
    polarity_cutoff: f64,
}

impl TraitVectorEncoder {
    #[must_use]
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            scale: settings.answer_scale(),
            polarity_cutoff: settings.polarity_cutoff(),
        }
    }

    /// Encode one answer per dimension, in dimension order.
    #[must_use]
    pub fn encode_answers(&self, answers: &[Option<i32>]) -> EncodedVector {
        match self.normalize(answers) {
            Ok(vector) => self.encode_scores(vector),
            Err(warning) => {
                tracing::warn!(%warning, "Malformed answer vector; using neutral default");
                EncodedVector::neutral(warning)
            }
        }
    }

    /// Encode scores the caller already holds on the canonical axis.
    #[must_use]
    pub fn encode_scores(&self, vector: TraitVector) -> EncodedVector {
        EncodedVector {
            vector,
            pattern: PatternId::encode(&vector.bits(self.polarity_cutoff)),
            warning: None,
        }
    }

    fn normalize(&self, answers: &[Option<i32>]) -> Result<TraitVector, InputShapeWarning> {
        if answers.len() != TRAIT_WIDTH {
            return Err(InputShapeWarning::LengthMismatch {
                expected: TRAIT_WIDTH,
                actual: answers.len(),
            });
        }
        let mut scores = [0.0; TRAIT_WIDTH];
        for (index, (score, answer)) in scores.iter_mut().zip(answers).enumerate() {
            let value = answer.ok_or(InputShapeWarning::UndefinedEntry { index })?;
            *score = self
                .scale
                .normalize(value)
                .ok_or(InputShapeWarning::OutOfScale {
                    index,
                    value,
                    min: self.scale.min(),
                    max: self.scale.max(),
                })?;
        }
        TraitVector::new(scores).map_err(|err| {
            let index = err.dimension.index();
            InputShapeWarning::OutOfScale {
                index,
                value: answers[index].unwrap_or_default(),
                min: self.scale.min(),
                max: self.scale.max(),
            }
        })
    }
}
