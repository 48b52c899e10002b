//! Developmental sequence stages and sequence-distance relations.

use std::cmp::Reverse;

use hexaprofile_types::{ArchetypeId, StageOrdinal, StageResolutionGap};
use serde::Serialize;

use crate::reference::{ReferenceData, SequenceStage};
use crate::relations;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageSource {
    /// The id falls inside the stage's declared range.
    Declared,
    /// No range covers the id; the stage was ranked by shared tags.
    TagFallback {
        gap: StageResolutionGap,
        matched_tags: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageResolution {
    pub archetype: ArchetypeId,
    pub stage: StageOrdinal,
    pub name: String,
    pub source: StageSource,
}

impl StageResolution {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, StageSource::TagFallback { .. })
    }
}

#[must_use]
pub fn resolve_stage(reference: &ReferenceData, id: ArchetypeId) -> StageResolution {
    let stages = reference.stages();
    if let Some(stage) = stages.iter().find(|stage| stage.contains(id)) {
        return StageResolution {
            archetype: id,
            stage: stage.ordinal(),
            name: stage.name().to_string(),
            source: StageSource::Declared,
        };
    }

    let tags = reference.archetype(id).tags();
    let rank = |stage: &SequenceStage| {
        let overlap = shared_tags(tags, stage).len();
        (Reverse(overlap), stage.distance(id), stage.ordinal())
    };
    let [first, rest @ ..] = stages;
    let best = rest
        .iter()
        .fold(first, |best, stage| if rank(stage) < rank(best) { stage } else { best });

    let gap = StageResolutionGap { archetype: id };
    let matched_tags = shared_tags(tags, best);
    tracing::warn!(
        %gap,
        stage = %best.ordinal(),
        ?matched_tags,
        "Resolved stage by tag fallback"
    );

    StageResolution {
        archetype: id,
        stage: best.ordinal(),
        name: best.name().to_string(),
        source: StageSource::TagFallback { gap, matched_tags },
    }
}

/// Archetype tags that also characterize `stage`, in archetype tag order.
fn shared_tags(tags: &[String], stage: &SequenceStage) -> Vec<String> {
    tags.iter()
        .filter(|tag| stage.tags().contains(*tag))
        .cloned()
        .collect()
}

/// Predecessor and successor in the sequence. The sequence does not wrap:
/// 1 has no predecessor and 64 has no successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SequenceNeighbours {
    pub archetype: ArchetypeId,
    pub previous: Option<ArchetypeId>,
    pub next: Option<ArchetypeId>,
    /// The successor lies outside every declared range holding `archetype`.
    pub next_opens_stage: bool,
}

#[must_use]
pub fn sequence_neighbours(reference: &ReferenceData, id: ArchetypeId) -> SequenceNeighbours {
    let ordinal = u32::from(id.get());
    let previous = ArchetypeId::try_new(ordinal - 1).ok();
    let next = ArchetypeId::try_new(ordinal + 1).ok();
    let next_opens_stage = next.is_some_and(|next| {
        !reference
            .stages()
            .iter()
            .any(|stage| stage.contains(id) && stage.contains(next))
    });
    SequenceNeighbours {
        archetype: id,
        previous,
        next,
        next_opens_stage,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Identical,
    /// Sequence distance 1.
    Adjacent,
    /// Sequence distance 2.
    Paired,
    /// Sequence distance up to 8.
    SameFamily,
    /// Every line inverted.
    Complement,
    /// Half the sequence or more apart.
    Opposite,
    Distant,
}

impl RelationKind {
    const OPPOSITE_DISTANCE: u8 = 32;

    /// Relative weight of the relation, `0..=1`.
    #[must_use]
    pub const fn strength(self) -> f64 {
        match self {
            RelationKind::Identical | RelationKind::Adjacent => 1.0,
            RelationKind::Paired => 0.8,
            RelationKind::Complement => 0.7,
            RelationKind::SameFamily => 0.6,
            RelationKind::Opposite => 0.5,
            RelationKind::Distant => 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SequenceRelation {
    pub from: ArchetypeId,
    pub to: ArchetypeId,
    pub distance: u8,
    pub kind: RelationKind,
}

/// Relate two archetypes by their distance in the sequence.
///
/// Distance rules take precedence; beyond 8 apart the structural
/// complement is checked before the opposite-half rule.
#[must_use]
pub fn relate(reference: &ReferenceData, from: ArchetypeId, to: ArchetypeId) -> SequenceRelation {
    let distance = from.get().abs_diff(to.get());
    let kind = match distance {
        0 => RelationKind::Identical,
        1 => RelationKind::Adjacent,
        2 => RelationKind::Paired,
        3..=8 => RelationKind::SameFamily,
        _ if relations::derive_relations(reference, from).complement == to => {
            RelationKind::Complement
        }
        d if d >= RelationKind::OPPOSITE_DISTANCE => RelationKind::Opposite,
        _ => RelationKind::Distant,
    };
    SequenceRelation {
        from,
        to,
        distance,
        kind,
    }
}
