//! Classification engine for hexaprofile.
//!
//! Maps questionnaire answers onto the 64-archetype taxonomy and derives the
//! relational and developmental metadata used to select guidance text.
//! Everything here is synchronous and pure over an immutable
//! [`ReferenceData`]; [`ProfileEngine`] bundles the pieces behind one handle.

pub mod classifier;
pub mod coordinator;
pub mod encoder;
mod engine;
pub mod reference;
pub mod relations;
pub mod stages;

pub use classifier::PatternClassification;
pub use coordinator::{
    ConsistencyReport, FacetClassification, RiskLevel, TripleClassification,
};
pub use encoder::{EncodedVector, TraitVectorEncoder};
pub use engine::{EngineError, FacetAnswers, FacetDetail, ProfileEngine, ProfileReport};
pub use reference::{
    Archetype, FacetProfile, Palace, PoolCandidate, ReferenceData, ReferenceDataError,
    SequenceStage, WeightedDimension,
};
pub use relations::{LineTransformation, RelationalSet};
pub use stages::{
    RelationKind, SequenceNeighbours, SequenceRelation, StageResolution, StageSource,
};
