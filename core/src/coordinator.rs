//! Three-facet classification and cross-facet consistency.
//!
//! Each facet vector is classified by pattern, which makes the archetype
//! facet-independent. The facet profile then contributes a weighted
//! composite and a selection from the facet's own candidate pool.

use hexaprofile_types::{
    ArchetypeId, Facet, InputShapeWarning, PalaceId, PalacePosition, PatternId, TraitVector,
};
use serde::Serialize;

use crate::classifier;
use crate::encoder::EncodedVector;
use crate::reference::{FacetProfile, ReferenceData};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FacetClassification {
    pub facet: Facet,
    pub archetype: ArchetypeId,
    /// Polarity projection of `dimension_scores`, except when `degraded`:
    /// then it is [`PatternId::NEUTRAL`] while the scores are all at the
    /// midpoint, so the pattern cannot be re-derived from them.
    pub pattern: PatternId,
    pub palace: PalaceId,
    pub position: PalacePosition,
    pub dimension_scores: TraitVector,
    /// Weighted composite of the facet's profile dimensions, `0..=100`.
    pub composite: f64,
    /// Candidate-pool member whose anchor is nearest the composite.
    pub pool_archetype: ArchetypeId,
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<InputShapeWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Severe,
}

impl RiskLevel {
    #[must_use]
    pub fn from_consistency(score: f64) -> Self {
        if score >= 80.0 {
            RiskLevel::Low
        } else if score >= 60.0 {
            RiskLevel::Moderate
        } else if score >= 40.0 {
            RiskLevel::High
        } else {
            RiskLevel::Severe
        }
    }
}

/// Pairwise agreement between facet archetypes, each in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConsistencyReport {
    pub engine_interface: f64,
    pub engine_safe_mode: f64,
    pub interface_safe_mode: f64,
    pub overall: f64,
    pub risk: RiskLevel,
}

impl ConsistencyReport {
    #[must_use]
    pub fn new(engine: ArchetypeId, interface: ArchetypeId, safe_mode: ArchetypeId) -> Self {
        let engine_interface = pair_consistency(engine, interface);
        let engine_safe_mode = pair_consistency(engine, safe_mode);
        let interface_safe_mode = pair_consistency(interface, safe_mode);
        let overall = (engine_interface + engine_safe_mode + interface_safe_mode) / 3.0;
        Self {
            engine_interface,
            engine_safe_mode,
            interface_safe_mode,
            overall,
            risk: RiskLevel::from_consistency(overall),
        }
    }
}

/// `max(0, 100 - 2 * |a - b|)` over archetype ids.
#[must_use]
pub fn pair_consistency(a: ArchetypeId, b: ArchetypeId) -> f64 {
    let gap = f64::from(a.get().abs_diff(b.get()));
    (100.0 - 2.0 * gap).max(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripleClassification {
    pub engine: FacetClassification,
    pub interface: FacetClassification,
    pub safe_mode: FacetClassification,
    pub consistency: ConsistencyReport,
}

impl TripleClassification {
    #[must_use]
    pub fn facets(&self) -> [&FacetClassification; 3] {
        [&self.engine, &self.interface, &self.safe_mode]
    }

    #[must_use]
    pub fn get(&self, facet: Facet) -> &FacetClassification {
        match facet {
            Facet::Engine => &self.engine,
            Facet::Interface => &self.interface,
            Facet::SafeMode => &self.safe_mode,
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.facets().iter().any(|facet| facet.degraded)
    }

    /// Warnings from every degraded facet, in facet order.
    #[must_use]
    pub fn warnings(&self) -> Vec<(Facet, InputShapeWarning)> {
        self.facets()
            .iter()
            .filter_map(|facet| facet.warning.map(|warning| (facet.facet, warning)))
            .collect()
    }
}

/// Σ(weight · score) / Σ(weight) over the profile dimensions.
#[must_use]
pub fn composite(profile: &FacetProfile, vector: &TraitVector) -> f64 {
    let (weighted, total) = profile
        .weights()
        .iter()
        .fold((0.0, 0.0), |(weighted, total), entry| {
            (
                weighted + entry.weight * vector.score(entry.dimension),
                total + entry.weight,
            )
        });
    if total > 0.0 {
        weighted / total
    } else {
        TraitVector::MIDPOINT
    }
}

/// Pool member whose anchor is nearest `composite`; ties go to the lowest id.
#[must_use]
pub fn select_from_pool(profile: &FacetProfile, composite: f64) -> Option<ArchetypeId> {
    profile
        .candidates
        .iter()
        .map(|candidate| ((candidate.anchor - composite).abs(), candidate.archetype))
        .reduce(|best, next| {
            if next.0 < best.0 || (next.0 == best.0 && next.1 < best.1) {
                next
            } else {
                best
            }
        })
        .map(|(_, archetype)| archetype)
}

#[must_use]
pub fn classify_facet(
    reference: &ReferenceData,
    facet: Facet,
    encoded: &EncodedVector,
) -> FacetClassification {
    let pattern = classifier::classify(reference, encoded.pattern);
    let profile = reference.facet(facet);
    let composite = composite(profile, &encoded.vector);
    // Validated profiles never have an empty pool.
    let pool_archetype = select_from_pool(profile, composite).unwrap_or(pattern.archetype);

    tracing::debug!(
        %facet,
        pattern = %encoded.pattern,
        archetype = %pattern.archetype,
        composite,
        pool_archetype = %pool_archetype,
        "Classified facet"
    );

    FacetClassification {
        facet,
        archetype: pattern.archetype,
        pattern: encoded.pattern,
        palace: pattern.palace,
        position: pattern.position,
        dimension_scores: encoded.vector,
        composite,
        pool_archetype,
        degraded: encoded.is_degraded(),
        warning: encoded.warning,
    }
}

/// Classify the three facet vectors (Engine, Interface, SafeMode order).
#[must_use]
pub fn coordinate(reference: &ReferenceData, vectors: &[EncodedVector; 3]) -> TripleClassification {
    let [engine, interface, safe_mode] = vectors;
    let engine = classify_facet(reference, Facet::Engine, engine);
    let interface = classify_facet(reference, Facet::Interface, interface);
    let safe_mode = classify_facet(reference, Facet::SafeMode, safe_mode);
    let consistency =
        ConsistencyReport::new(engine.archetype, interface.archetype, safe_mode.archetype);
    TripleClassification {
        engine,
        interface,
        safe_mode,
        consistency,
    }
}
