//! `ProfileEngine`: the public entry point.
//!
//! The engine owns a shared handle to immutable reference data plus the
//! resolved settings. It holds no per-request state, so a single engine can
//! be cloned freely and used from any number of threads.

use std::sync::Arc;

use hexaprofile_config::{ConfigError, HexaConfig};
use hexaprofile_types::{
    ArchetypeId, ClassificationDomainError, EngineSettings, Facet, LinePosition, PatternId,
    TraitVector,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classifier::{self, PatternClassification};
use crate::coordinator::{self, TripleClassification};
use crate::encoder::{EncodedVector, TraitVectorEncoder};
use crate::reference::{ReferenceData, ReferenceDataError};
use crate::relations::{self, LineTransformation, RelationalSet};
use crate::stages::{self, SequenceNeighbours, SequenceRelation, StageResolution};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Reference(#[from] ReferenceDataError),
}

/// Raw answers for the three facets, one answer per dimension each.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetAnswers {
    #[serde(default)]
    pub engine: Vec<Option<i32>>,
    #[serde(default)]
    pub interface: Vec<Option<i32>>,
    #[serde(default)]
    pub safe_mode: Vec<Option<i32>>,
}

/// Relational and developmental metadata for one facet archetype.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetDetail {
    pub facet: Facet,
    pub relations: RelationalSet,
    pub transformation: LineTransformation,
    pub stage: StageResolution,
    pub neighbours: SequenceNeighbours,
}

/// Everything downstream guidance selection needs for one profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileReport {
    pub classification: TripleClassification,
    pub details: Vec<FacetDetail>,
    pub sequence: Vec<SequenceRelation>,
}

#[derive(Debug, Clone)]
pub struct ProfileEngine {
    reference: Arc<ReferenceData>,
    settings: EngineSettings,
    encoder: TraitVectorEncoder,
}

impl ProfileEngine {
    #[must_use]
    pub fn new(reference: Arc<ReferenceData>, settings: EngineSettings) -> Self {
        Self {
            encoder: TraitVectorEncoder::new(&settings),
            reference,
            settings,
        }
    }

    /// Built-in reference data with default settings.
    pub fn builtin() -> Result<Self, ReferenceDataError> {
        Ok(Self::new(
            Arc::new(ReferenceData::builtin()?),
            EngineSettings::default(),
        ))
    }

    /// Settings and (optionally) reference data path from a loaded config.
    pub fn from_config(config: &HexaConfig) -> Result<Self, EngineError> {
        let settings = config.settings()?;
        let reference = match config.reference_path() {
            Some(path) => ReferenceData::from_path(&path)?,
            None => ReferenceData::builtin()?,
        };
        Ok(Self::new(Arc::new(reference), settings))
    }

    #[must_use]
    pub fn reference(&self) -> &Arc<ReferenceData> {
        &self.reference
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    #[must_use]
    pub fn encode_answers(&self, answers: &[Option<i32>]) -> EncodedVector {
        self.encoder.encode_answers(answers)
    }

    /// Classify raw answers for all three facets.
    #[must_use]
    pub fn classify(&self, answers: &FacetAnswers) -> TripleClassification {
        let encoded = [
            self.encoder.encode_answers(&answers.engine),
            self.encoder.encode_answers(&answers.interface),
            self.encoder.encode_answers(&answers.safe_mode),
        ];
        coordinator::coordinate(&self.reference, &encoded)
    }

    /// Classify canonical score vectors (Engine, Interface, SafeMode order).
    #[must_use]
    pub fn classify_vectors(&self, vectors: &[TraitVector; 3]) -> TripleClassification {
        let encoded = vectors.map(|vector| self.encoder.encode_scores(vector));
        coordinator::coordinate(&self.reference, &encoded)
    }

    #[must_use]
    pub fn classify_pattern(&self, pattern: PatternId) -> PatternClassification {
        classifier::classify(&self.reference, pattern)
    }

    pub fn classify_value(
        &self,
        value: u64,
    ) -> Result<PatternClassification, ClassificationDomainError> {
        classifier::classify_value(&self.reference, value)
    }

    #[must_use]
    pub fn derive_relations(&self, archetype: ArchetypeId) -> RelationalSet {
        relations::derive_relations(&self.reference, archetype)
    }

    /// Changing lines from `scores` at the configured threshold.
    #[must_use]
    pub fn derive_line_transformation(
        &self,
        archetype: ArchetypeId,
        scores: &TraitVector,
    ) -> LineTransformation {
        relations::derive_line_transformation(
            &self.reference,
            archetype,
            scores,
            self.settings.changing_line_threshold(),
        )
    }

    #[must_use]
    pub fn transform_line(&self, archetype: ArchetypeId, line: LinePosition) -> LineTransformation {
        relations::transform_line(&self.reference, archetype, line)
    }

    #[must_use]
    pub fn resolve_stage(&self, archetype: ArchetypeId) -> StageResolution {
        stages::resolve_stage(&self.reference, archetype)
    }

    #[must_use]
    pub fn sequence_neighbours(&self, archetype: ArchetypeId) -> SequenceNeighbours {
        stages::sequence_neighbours(&self.reference, archetype)
    }

    #[must_use]
    pub fn relate(&self, from: ArchetypeId, to: ArchetypeId) -> SequenceRelation {
        stages::relate(&self.reference, from, to)
    }

    /// Classification plus per-facet relations, transformation, and stage.
    #[must_use]
    pub fn report(&self, answers: &FacetAnswers) -> ProfileReport {
        self.report_for(self.classify(answers))
    }

    #[must_use]
    pub fn report_for(&self, classification: TripleClassification) -> ProfileReport {
        let details = classification
            .facets()
            .iter()
            .map(|facet| FacetDetail {
                facet: facet.facet,
                relations: self.derive_relations(facet.archetype),
                transformation: self
                    .derive_line_transformation(facet.archetype, &facet.dimension_scores),
                stage: self.resolve_stage(facet.archetype),
                neighbours: self.sequence_neighbours(facet.archetype),
            })
            .collect();
        let [engine, interface, safe_mode] = classification.facets().map(|facet| facet.archetype);
        let sequence = vec![
            self.relate(engine, interface),
            self.relate(engine, safe_mode),
            self.relate(interface, safe_mode),
        ];
        ProfileReport {
            classification,
            details,
            sequence,
        }
    }
}
