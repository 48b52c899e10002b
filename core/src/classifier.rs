//! Pattern id to archetype lookup.

use hexaprofile_types::{
    ArchetypeId, ClassificationDomainError, Lines, PalaceId, PalacePosition, PatternId,
};
use serde::Serialize;

use crate::reference::ReferenceData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatternClassification {
    pub pattern: PatternId,
    pub archetype: ArchetypeId,
    pub palace: PalaceId,
    pub position: PalacePosition,
    pub lines: Lines,
}

/// Classify a pattern id. Total over the domain.
#[must_use]
pub fn classify(reference: &ReferenceData, pattern: PatternId) -> PatternClassification {
    let lines = pattern.lines();
    let archetype = reference.by_lines(lines);
    PatternClassification {
        pattern,
        archetype: archetype.id(),
        palace: archetype.palace(),
        position: archetype.position(),
        lines,
    }
}

/// Classify a raw integer, rejecting anything outside `0..=255`.
pub fn classify_value(
    reference: &ReferenceData,
    value: u64,
) -> Result<PatternClassification, ClassificationDomainError> {
    Ok(classify(reference, PatternId::new(value)?))
}
