//! Structural properties that must hold across the whole domain.

use std::collections::HashMap;

use hexaprofile_types::{ArchetypeId, Facet, LinePosition, PatternId, TraitVector};

use crate::common::{engine, vector};

#[test]
fn every_archetype_is_reached_by_four_patterns() {
    let engine = engine();
    let mut hits: HashMap<ArchetypeId, usize> = HashMap::new();
    for pattern in PatternId::all() {
        *hits.entry(engine.classify_pattern(pattern).archetype).or_default() += 1;
    }
    assert_eq!(hits.len(), 64);
    assert!(hits.values().all(|&count| count == 4));
}

#[test]
fn settled_auxiliary_reads_low_bits_directly() {
    let engine = engine();
    for pattern in PatternId::all().filter(|p| !p.auxiliary_unsettled()) {
        let classification = engine.classify_pattern(pattern);
        assert_eq!(classification.lines.bits(), pattern.value() & 0b11_1111);
    }
}

#[test]
fn unsettled_auxiliary_flips_top_line() {
    let engine = engine();
    for pattern in PatternId::all().filter(|p| p.auxiliary_unsettled()) {
        let classification = engine.classify_pattern(pattern);
        assert_eq!(
            classification.lines.bits(),
            (pattern.value() & 0b11_1111) ^ 0b10_0000
        );
    }
}

#[test]
fn out_of_domain_values_are_rejected() {
    let engine = engine();
    assert!(engine.classify_value(255).is_ok());
    for value in [256, 1_000, u64::MAX] {
        let err = engine.classify_value(value).unwrap_err();
        assert_eq!(err.value, value);
    }
}

#[test]
fn palace_and_position_agree_with_reference() {
    let engine = engine();
    let reference = engine.reference();
    for pattern in PatternId::all() {
        let classification = engine.classify_pattern(pattern);
        let palace = reference.palace(classification.palace);
        assert_eq!(palace.at(classification.position), classification.archetype);
    }
}

#[test]
fn relations_are_involutive() {
    let engine = engine();
    for archetype in ArchetypeId::all() {
        let set = engine.derive_relations(archetype);
        assert_eq!(engine.derive_relations(set.complement).complement, archetype);
        assert_eq!(engine.derive_relations(set.inverse).inverse, archetype);
        assert_eq!(engine.derive_relations(set.opposite).opposite, archetype);
        assert_eq!(u32::from(set.opposite.get()), 65 - u32::from(archetype.get()));
    }
}

#[test]
fn flipping_a_line_twice_returns_home() {
    let engine = engine();
    for archetype in ArchetypeId::all() {
        for line in LinePosition::all() {
            let once = engine.transform_line(archetype, line);
            assert_ne!(once.resulting, archetype);
            let twice = engine.transform_line(once.resulting, line);
            assert_eq!(twice.resulting, archetype);
        }
    }
}

#[test]
fn every_archetype_has_a_declared_stage() {
    let engine = engine();
    let mut per_stage = [0usize; 8];
    for archetype in ArchetypeId::all() {
        let resolution = engine.resolve_stage(archetype);
        assert!(!resolution.is_fallback());
        per_stage[resolution.stage.index()] += 1;
    }
    assert_eq!(per_stage, [8; 8]);
}

#[test]
fn relate_is_symmetric() {
    let engine = engine();
    for a in ArchetypeId::all() {
        for b in ArchetypeId::all() {
            let forward = engine.relate(a, b);
            let backward = engine.relate(b, a);
            assert_eq!(forward.distance, backward.distance);
            assert_eq!(forward.kind, backward.kind, "{a} <-> {b}");
        }
    }
}

#[test]
fn consistency_and_composite_stay_in_range() {
    let engine = engine();
    let samples = [
        TraitVector::neutral(),
        vector([0.0; 8]),
        vector([100.0; 8]),
        vector([10.0, 90.0, 30.0, 70.0, 50.0, 20.0, 80.0, 40.0]),
        vector([100.0, 0.0, 100.0, 0.0, 100.0, 0.0, 100.0, 0.0]),
    ];
    for engine_vector in samples {
        for interface_vector in samples {
            let result = engine.classify_vectors(&[engine_vector, interface_vector, samples[3]]);
            let consistency = result.consistency;
            for score in [
                consistency.engine_interface,
                consistency.engine_safe_mode,
                consistency.interface_safe_mode,
                consistency.overall,
            ] {
                assert!((0.0..=100.0).contains(&score));
            }
            for facet in Facet::ALL {
                let classification = result.get(facet);
                assert!((0.0..=100.0).contains(&classification.composite));
                let pool = &engine.reference().facet(facet).candidates;
                assert!(
                    pool.iter()
                        .any(|candidate| candidate.archetype == classification.pool_archetype)
                );
            }
        }
    }
}

#[test]
fn single_bit_flip_from_all_positive_changes_archetype() {
    let engine = engine();
    let all_positive = engine.classify_pattern(PatternId::MAX).archetype;
    for bit in 0..8 {
        let flipped = PatternId::from_u8(u8::MAX ^ (1 << bit));
        let first = engine.classify_pattern(flipped).archetype;
        assert_ne!(first, all_positive, "bit {bit}");
        assert_eq!(engine.classify_pattern(flipped).archetype, first);
    }
}

#[test]
fn palaces_partition_the_archetypes() {
    let engine = engine();
    let mut seen: Vec<ArchetypeId> = engine
        .reference()
        .palaces()
        .iter()
        .flat_map(|palace| palace.members().iter().copied())
        .collect();
    seen.sort();
    assert_eq!(seen, ArchetypeId::all().collect::<Vec<_>>());
}
