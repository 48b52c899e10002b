//! Reference dataset: archetypes, palaces, sequence stages, facet profiles.
//!
//! The dataset is parsed from JSON into raw structs, then validated and
//! indexed once. A [`ReferenceData`] value is immutable; reloading means
//! building a new one.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use hexaprofile_types::{
    ArchetypeId, Dimension, Facet, Lines, PalaceId, PalacePosition, StageOrdinal, Trigram,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

const BUILTIN_JSON: &str = include_str!("../assets/reference.json");

const ARCHETYPE_COUNT: usize = 64;
const PALACE_COUNT: usize = 8;
const PALACE_SIZE: usize = 8;
pub const STAGE_COUNT: usize = 8;

#[derive(Debug, Error)]
pub enum ReferenceDataError {
    #[error("failed to read reference data at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse reference data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("expected 64 archetypes, found {0}")]
    ArchetypeCount(usize),
    #[error("archetype {0} is declared more than once")]
    DuplicateArchetype(ArchetypeId),
    #[error("archetypes {first} and {second} share the composition {lines}")]
    DuplicateComposition {
        first: ArchetypeId,
        second: ArchetypeId,
        lines: Lines,
    },
    #[error("expected 8 palaces, found {0}")]
    PalaceCount(usize),
    #[error("palace {0} is declared more than once")]
    DuplicatePalace(PalaceId),
    #[error("archetype {archetype} names undeclared palace {palace}")]
    UnknownPalace {
        archetype: ArchetypeId,
        palace: PalaceId,
    },
    #[error("archetypes {first} and {second} both occupy palace {palace} position {position}")]
    PalaceSlotCollision {
        palace: PalaceId,
        position: PalacePosition,
        first: ArchetypeId,
        second: ArchetypeId,
    },
    #[error("palace {palace} holds {size} archetypes, expected 8")]
    PalaceSize { palace: PalaceId, size: usize },
    #[error("expected 8 stages, found {0}")]
    StageCount(usize),
    #[error("stage {0} is declared more than once")]
    DuplicateStage(StageOrdinal),
    #[error("stage {ordinal} range {first}..={last} is inverted")]
    InvertedStageRange {
        ordinal: StageOrdinal,
        first: ArchetypeId,
        last: ArchetypeId,
    },
    #[error("stages {first} and {second} both cover archetype {archetype}")]
    StageOverlap {
        first: StageOrdinal,
        second: StageOrdinal,
        archetype: ArchetypeId,
    },
    #[error("{facet} weight for {dimension} must be positive, got {weight}")]
    InvalidWeight {
        facet: Facet,
        dimension: Dimension,
        weight: f64,
    },
    #[error("{0} candidate pool is empty")]
    EmptyPool(Facet),
    #[error("{facet} candidate pool lists archetype {archetype} more than once")]
    DuplicateCandidate { facet: Facet, archetype: ArchetypeId },
    #[error("{facet} anchor {anchor} for archetype {archetype} is outside 0..=100")]
    AnchorRange {
        facet: Facet,
        archetype: ArchetypeId,
        anchor: f64,
    },
}

// ============================================================================
// Raw (file) shape
// ============================================================================

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawReference {
    archetypes: Vec<RawArchetype>,
    palaces: Vec<RawPalace>,
    stages: Vec<RawStage>,
    facets: RawFacets,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawArchetype {
    id: ArchetypeId,
    name: String,
    upper: Trigram,
    lower: Trigram,
    palace: PalaceId,
    position: PalacePosition,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPalace {
    id: PalaceId,
    name: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStage {
    ordinal: StageOrdinal,
    name: String,
    first: ArchetypeId,
    last: ArchetypeId,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFacets {
    engine: FacetProfile,
    interface: FacetProfile,
    safe_mode: FacetProfile,
}

// ============================================================================
// Validated shape
// ============================================================================

/// One of the 64 categories of the taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Archetype {
    id: ArchetypeId,
    name: String,
    upper: Trigram,
    lower: Trigram,
    palace: PalaceId,
    position: PalacePosition,
    tags: Vec<String>,
}

impl Archetype {
    #[must_use]
    pub fn id(&self) -> ArchetypeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn upper(&self) -> Trigram {
        self.upper
    }

    #[must_use]
    pub fn lower(&self) -> Trigram {
        self.lower
    }

    #[must_use]
    pub fn lines(&self) -> Lines {
        Lines::from_trigrams(self.upper, self.lower)
    }

    #[must_use]
    pub fn palace(&self) -> PalaceId {
        self.palace
    }

    #[must_use]
    pub fn position(&self) -> PalacePosition {
        self.position
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// A fixed group of eight archetypes, ordered by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palace {
    id: PalaceId,
    name: String,
    members: [ArchetypeId; PALACE_SIZE],
}

impl Palace {
    #[must_use]
    pub fn id(&self) -> PalaceId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in position order.
    #[must_use]
    pub fn members(&self) -> &[ArchetypeId; PALACE_SIZE] {
        &self.members
    }

    #[must_use]
    pub fn at(&self, position: PalacePosition) -> ArchetypeId {
        self.members[position.index()]
    }
}

/// A developmental stage covering a contiguous id range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceStage {
    ordinal: StageOrdinal,
    name: String,
    first: ArchetypeId,
    last: ArchetypeId,
    tags: Vec<String>,
}

impl SequenceStage {
    #[must_use]
    pub fn ordinal(&self) -> StageOrdinal {
        self.ordinal
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn first(&self) -> ArchetypeId {
        self.first
    }

    #[must_use]
    pub fn last(&self) -> ArchetypeId {
        self.last
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[must_use]
    pub fn contains(&self, id: ArchetypeId) -> bool {
        self.first <= id && id <= self.last
    }

    /// Distance from `id` to the nearest end of the range; zero inside it.
    #[must_use]
    pub fn distance(&self, id: ArchetypeId) -> u8 {
        if id < self.first {
            self.first.get() - id.get()
        } else if id > self.last {
            id.get() - self.last.get()
        } else {
            0
        }
    }
}

/// A dimension and its weight in a facet composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightedDimension {
    pub dimension: Dimension,
    pub weight: f64,
}

/// A pool member and its position on the composite axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolCandidate {
    pub archetype: ArchetypeId,
    pub anchor: f64,
}

/// Static scoring profile of one facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FacetProfile {
    pub primary: WeightedDimension,
    pub secondary: WeightedDimension,
    pub support: WeightedDimension,
    pub candidates: Vec<PoolCandidate>,
}

impl FacetProfile {
    #[must_use]
    pub fn weights(&self) -> [WeightedDimension; 3] {
        [self.primary, self.secondary, self.support]
    }
}

/// Validated, indexed reference dataset.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    archetypes: Vec<Archetype>,
    by_lines: [ArchetypeId; ARCHETYPE_COUNT],
    palaces: Vec<Palace>,
    stages: [SequenceStage; STAGE_COUNT],
    engine: FacetProfile,
    interface: FacetProfile,
    safe_mode: FacetProfile,
    fingerprint: String,
}

impl ReferenceData {
    /// The dataset compiled into the crate.
    pub fn builtin() -> Result<Self, ReferenceDataError> {
        Self::from_json_str(BUILTIN_JSON)
    }

    pub fn from_path(path: &Path) -> Result<Self, ReferenceDataError> {
        let content = fs::read_to_string(path).map_err(|source| ReferenceDataError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(source: &str) -> Result<Self, ReferenceDataError> {
        let raw: RawReference = serde_json::from_str(source)?;
        let data = Self::validate(raw, fingerprint(source))?;
        tracing::info!(
            archetypes = data.archetypes.len(),
            stages = data.stages.len(),
            fingerprint = %data.fingerprint,
            "Loaded reference data"
        );
        Ok(data)
    }

    fn validate(raw: RawReference, fingerprint: String) -> Result<Self, ReferenceDataError> {
        let archetypes = validate_archetypes(raw.archetypes)?;
        let by_lines = index_compositions(&archetypes)?;
        let palaces = validate_palaces(raw.palaces, &archetypes)?;
        let stages = validate_stages(raw.stages)?;

        let RawFacets {
            engine,
            interface,
            safe_mode,
        } = raw.facets;
        validate_facet(Facet::Engine, &engine)?;
        validate_facet(Facet::Interface, &interface)?;
        validate_facet(Facet::SafeMode, &safe_mode)?;

        Ok(Self {
            archetypes,
            by_lines,
            palaces,
            stages,
            engine,
            interface,
            safe_mode,
            fingerprint,
        })
    }

    #[must_use]
    pub fn archetype(&self, id: ArchetypeId) -> &Archetype {
        &self.archetypes[id.index()]
    }

    /// All archetypes in id order.
    #[must_use]
    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    /// The unique archetype with this composition.
    #[must_use]
    pub fn by_lines(&self, lines: Lines) -> &Archetype {
        self.archetype(self.by_lines[usize::from(lines.bits())])
    }

    #[must_use]
    pub fn palace(&self, id: PalaceId) -> &Palace {
        &self.palaces[id.index()]
    }

    /// All palaces in id order.
    #[must_use]
    pub fn palaces(&self) -> &[Palace] {
        &self.palaces
    }

    /// All stages in ordinal order.
    #[must_use]
    pub fn stages(&self) -> &[SequenceStage; STAGE_COUNT] {
        &self.stages
    }

    #[must_use]
    pub fn facet(&self, facet: Facet) -> &FacetProfile {
        match facet {
            Facet::Engine => &self.engine,
            Facet::Interface => &self.interface,
            Facet::SafeMode => &self.safe_mode,
        }
    }

    /// Lowercase hex SHA-256 of the JSON source.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn validate_archetypes(raw: Vec<RawArchetype>) -> Result<Vec<Archetype>, ReferenceDataError> {
    if raw.len() != ARCHETYPE_COUNT {
        return Err(ReferenceDataError::ArchetypeCount(raw.len()));
    }
    let mut by_id: BTreeMap<ArchetypeId, Archetype> = BTreeMap::new();
    for entry in raw {
        let archetype = Archetype {
            id: entry.id,
            name: entry.name,
            upper: entry.upper,
            lower: entry.lower,
            palace: entry.palace,
            position: entry.position,
            tags: entry.tags,
        };
        if by_id.insert(entry.id, archetype).is_some() {
            return Err(ReferenceDataError::DuplicateArchetype(entry.id));
        }
    }
    // 64 distinct ids drawn from 1..=64 cover the range, so map order is id order.
    Ok(by_id.into_values().collect())
}

fn index_compositions(
    archetypes: &[Archetype],
) -> Result<[ArchetypeId; ARCHETYPE_COUNT], ReferenceDataError> {
    let mut slots: [Option<ArchetypeId>; ARCHETYPE_COUNT] = [None; ARCHETYPE_COUNT];
    for archetype in archetypes {
        let lines = archetype.lines();
        let slot = &mut slots[usize::from(lines.bits())];
        if let Some(first) = *slot {
            return Err(ReferenceDataError::DuplicateComposition {
                first,
                second: archetype.id,
                lines,
            });
        }
        *slot = Some(archetype.id);
    }
    // 64 distinct compositions over 64 slots leave none empty.
    let mut index = [ArchetypeId::FIRST; ARCHETYPE_COUNT];
    for (target, slot) in index.iter_mut().zip(slots) {
        if let Some(id) = slot {
            *target = id;
        }
    }
    Ok(index)
}

fn validate_palaces(
    raw: Vec<RawPalace>,
    archetypes: &[Archetype],
) -> Result<Vec<Palace>, ReferenceDataError> {
    if raw.len() != PALACE_COUNT {
        return Err(ReferenceDataError::PalaceCount(raw.len()));
    }
    let mut names: BTreeMap<PalaceId, String> = BTreeMap::new();
    for palace in raw {
        if names.insert(palace.id, palace.name).is_some() {
            return Err(ReferenceDataError::DuplicatePalace(palace.id));
        }
    }

    let mut slots: BTreeMap<PalaceId, [Option<ArchetypeId>; PALACE_SIZE]> = names
        .keys()
        .map(|id| (*id, [None; PALACE_SIZE]))
        .collect();
    for archetype in archetypes {
        let Some(members) = slots.get_mut(&archetype.palace) else {
            return Err(ReferenceDataError::UnknownPalace {
                archetype: archetype.id,
                palace: archetype.palace,
            });
        };
        let slot = &mut members[archetype.position.index()];
        if let Some(first) = *slot {
            return Err(ReferenceDataError::PalaceSlotCollision {
                palace: archetype.palace,
                position: archetype.position,
                first,
                second: archetype.id,
            });
        }
        *slot = Some(archetype.id);
    }

    names
        .into_iter()
        .map(|(id, name)| {
            let filled = slots.get(&id).copied().unwrap_or([None; PALACE_SIZE]);
            let size = filled.iter().flatten().count();
            if size != PALACE_SIZE {
                return Err(ReferenceDataError::PalaceSize { palace: id, size });
            }
            let members = filled.map(|slot| slot.unwrap_or(ArchetypeId::FIRST));
            Ok(Palace { id, name, members })
        })
        .collect()
}

fn validate_stages(
    raw: Vec<RawStage>,
) -> Result<[SequenceStage; STAGE_COUNT], ReferenceDataError> {
    if raw.len() != STAGE_COUNT {
        return Err(ReferenceDataError::StageCount(raw.len()));
    }
    let mut by_ordinal: BTreeMap<StageOrdinal, SequenceStage> = BTreeMap::new();
    for entry in raw {
        if entry.first > entry.last {
            return Err(ReferenceDataError::InvertedStageRange {
                ordinal: entry.ordinal,
                first: entry.first,
                last: entry.last,
            });
        }
        let stage = SequenceStage {
            ordinal: entry.ordinal,
            name: entry.name,
            first: entry.first,
            last: entry.last,
            tags: entry.tags,
        };
        if by_ordinal.insert(entry.ordinal, stage).is_some() {
            return Err(ReferenceDataError::DuplicateStage(entry.ordinal));
        }
    }

    let mut owner: [Option<StageOrdinal>; ARCHETYPE_COUNT] = [None; ARCHETYPE_COUNT];
    for stage in by_ordinal.values() {
        for id in ArchetypeId::all().filter(|id| stage.contains(*id)) {
            let slot = &mut owner[id.index()];
            if let Some(first) = *slot {
                return Err(ReferenceDataError::StageOverlap {
                    first,
                    second: stage.ordinal,
                    archetype: id,
                });
            }
            *slot = Some(stage.ordinal);
        }
    }

    let uncovered: Vec<u8> = ArchetypeId::all()
        .filter(|id| owner[id.index()].is_none())
        .map(ArchetypeId::get)
        .collect();
    if !uncovered.is_empty() {
        tracing::warn!(
            ?uncovered,
            "Stage ranges leave archetypes uncovered; tag fallback will resolve them"
        );
    }

    let stages: Vec<SequenceStage> = by_ordinal.into_values().collect();
    stages
        .try_into()
        .map_err(|stages: Vec<SequenceStage>| ReferenceDataError::StageCount(stages.len()))
}

fn validate_facet(facet: Facet, profile: &FacetProfile) -> Result<(), ReferenceDataError> {
    for weighted in profile.weights() {
        if !weighted.weight.is_finite() || weighted.weight <= 0.0 {
            return Err(ReferenceDataError::InvalidWeight {
                facet,
                dimension: weighted.dimension,
                weight: weighted.weight,
            });
        }
    }
    if profile.candidates.is_empty() {
        return Err(ReferenceDataError::EmptyPool(facet));
    }
    let mut seen = BTreeSet::new();
    for candidate in &profile.candidates {
        if !seen.insert(candidate.archetype) {
            return Err(ReferenceDataError::DuplicateCandidate {
                facet,
                archetype: candidate.archetype,
            });
        }
        if !candidate.anchor.is_finite() || !(0.0..=100.0).contains(&candidate.anchor) {
            return Err(ReferenceDataError::AnchorRange {
                facet,
                archetype: candidate.archetype,
                anchor: candidate.anchor,
            });
        }
    }
    Ok(())
}

fn fingerprint(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hex_encode(&hasher.finalize())
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
