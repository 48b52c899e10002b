//! Golden tables for the full pattern domain and every archetype's relations.

use hexaprofile_types::PatternId;

use crate::common::{engine, golden_patterns, golden_relations, id};

#[test]
fn every_pattern_matches_golden_archetype() {
    let engine = engine();
    let golden = golden_patterns();
    assert_eq!(golden.len(), 256);

    for row in golden {
        let classification = engine
            .classify_value(row.pattern)
            .expect("golden patterns are in domain");
        assert_eq!(
            classification.archetype.get(),
            row.archetype,
            "pattern {}",
            row.pattern
        );

        let pattern = classification.pattern;
        assert_eq!(pattern.to_binary(), row.binary);
        assert_eq!(pattern.to_octal(), row.octal);
        assert_eq!(PatternId::parse_binary(&row.binary), Ok(pattern));
        assert_eq!(PatternId::parse_octal(&row.octal), Ok(pattern));
    }
}

#[test]
fn every_archetype_matches_golden_relations() {
    let engine = engine();
    let golden = golden_relations();
    assert_eq!(golden.len(), 64);

    for row in golden {
        let set = engine.derive_relations(id(u32::from(row.id)));
        assert_eq!(
            (
                set.complement.get(),
                set.inverse.get(),
                set.opposite.get(),
                set.nuclear.get()
            ),
            (row.complement, row.inverse, row.opposite, row.nuclear),
            "archetype {}",
            row.id
        );
    }
}

#[test]
fn neutral_pattern_is_after_completion() {
    let engine = engine();
    let classification = engine.classify_pattern(PatternId::NEUTRAL);
    assert_eq!(classification.archetype.get(), 63);
    assert_eq!(
        engine.reference().archetype(classification.archetype).name(),
        "After Completion"
    );
}
