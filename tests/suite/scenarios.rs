//! End-to-end profiles: answers in, report out.

use std::fs;
use std::sync::Arc;

use hexaprofile_config::HexaConfig;
use hexaprofile_core::{
    FacetAnswers, ProfileEngine, ReferenceData, ReferenceDataError, RelationKind, RiskLevel,
};
use hexaprofile_types::{
    AnswerScale, EngineSettings, Facet, InputShapeWarning, LinePosition, PatternId, TraitVector,
};
use tempfile::tempdir;

use crate::common::{BUILTIN_REFERENCE, answers, edited_reference, engine, id, vector};

#[test]
fn polarized_profile() {
    let engine = engine();
    let report = engine.report(&FacetAnswers {
        engine: answers("11111111"),
        interface: answers("00000000"),
        safe_mode: answers("10101000"),
    });
    let classification = &report.classification;

    assert_eq!(classification.engine.archetype, id(1));
    assert_eq!(classification.interface.archetype, id(2));
    assert_eq!(classification.safe_mode.pattern, PatternId::NEUTRAL);
    assert_eq!(classification.safe_mode.archetype, id(63));
    assert!(!classification.is_degraded());

    // Top anchor for a maxed-out engine, bottom anchor for a flat interface.
    assert_eq!(classification.engine.composite, 100.0);
    assert_eq!(classification.engine.pool_archetype, id(1));
    assert_eq!(classification.interface.composite, 0.0);
    assert_eq!(classification.interface.pool_archetype, id(16));

    let consistency = classification.consistency;
    assert_eq!(consistency.engine_interface, 98.0);
    assert_eq!(consistency.engine_safe_mode, 0.0);
    assert_eq!(consistency.interface_safe_mode, 0.0);
    assert_eq!(consistency.risk, RiskLevel::Severe);

    let kinds: Vec<_> = report.sequence.iter().map(|relation| relation.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RelationKind::Adjacent,
            RelationKind::Opposite,
            RelationKind::Opposite
        ]
    );

    let engine_detail = &report.details[0];
    assert_eq!(engine_detail.facet, Facet::Engine);
    assert_eq!(engine_detail.relations.complement, id(2));
    assert_eq!(engine_detail.stage.name, "Genesis");
    assert!(engine_detail.transformation.is_stable());
}

#[test]
fn aligned_profile_is_low_risk() {
    let engine = engine();
    let result = engine.classify(&FacetAnswers {
        engine: answers("11111111"),
        interface: answers("11111111"),
        safe_mode: answers("11111100"),
    });
    assert_eq!(result.engine.archetype, result.interface.archetype);
    assert_eq!(result.safe_mode.archetype, id(1));
    assert_eq!(result.consistency.overall, 100.0);
    assert_eq!(result.consistency.risk, RiskLevel::Low);
}

#[test]
fn malformed_facets_degrade_independently() {
    let engine = engine();
    let result = engine.classify(&FacetAnswers {
        engine: answers("1111"),
        interface: answers("11x11111"),
        safe_mode: vec![Some(1), Some(0), Some(7), Some(1), Some(0), Some(1), Some(0), Some(1)],
    });

    assert!(result.is_degraded());
    for facet in result.facets() {
        assert!(facet.degraded);
        assert_eq!(facet.pattern, PatternId::NEUTRAL);
        assert_eq!(facet.archetype, id(63));
        assert_eq!(facet.dimension_scores, TraitVector::neutral());
        // Midpoint scores would project to all-positive, not the neutral id.
        assert_ne!(
            PatternId::encode(&facet.dimension_scores.bits(50.0)),
            facet.pattern
        );
    }

    let warnings = result.warnings();
    assert_eq!(
        warnings,
        vec![
            (
                Facet::Engine,
                InputShapeWarning::LengthMismatch {
                    expected: 8,
                    actual: 4
                }
            ),
            (Facet::Interface, InputShapeWarning::UndefinedEntry { index: 2 }),
            (
                Facet::SafeMode,
                InputShapeWarning::OutOfScale {
                    index: 2,
                    value: 7,
                    min: 0,
                    max: 1
                }
            ),
        ]
    );

    let json = serde_json::to_value(result).unwrap();
    assert_eq!(json["engine"]["warning"]["kind"], "length_mismatch");
}

#[test]
fn empty_answers_are_neutral() {
    let result = engine().classify(&FacetAnswers::default());
    assert!(result.facets().iter().all(|facet| facet.degraded));
    assert_eq!(result.consistency.overall, 100.0);
}

#[test]
fn score_vectors_skip_answer_normalization() {
    let engine = engine();
    let result = engine.classify_vectors(&[
        vector([50.0; 8]),
        vector([49.9; 8]),
        vector([80.0, 20.0, 80.0, 20.0, 80.0, 20.0, 20.0, 20.0]),
    ]);
    // The cutoff is inclusive.
    assert_eq!(result.engine.archetype, id(1));
    assert_eq!(result.interface.archetype, id(2));
    assert_eq!(result.safe_mode.pattern, PatternId::NEUTRAL);
    assert!(!result.is_degraded());
}

#[test]
fn custom_scale_and_cutoff() {
    let reference = Arc::new(ReferenceData::builtin().unwrap());
    let settings = EngineSettings::new(AnswerScale::new(1, 7).unwrap(), 75.0, 20.0).unwrap();
    let engine = ProfileEngine::new(reference, settings);

    // 1..=7 maps 6 -> 83.3 and 5 -> 66.7; only the former clears 75.
    let result = engine.classify(&FacetAnswers {
        engine: vec![Some(6); 8],
        interface: vec![Some(5); 8],
        safe_mode: vec![Some(7); 8],
    });
    assert_eq!(result.engine.archetype, id(1));
    assert_eq!(result.interface.archetype, id(2));
    assert_eq!(result.safe_mode.archetype, id(1));
}

#[test]
fn config_file_drives_engine() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "[answers]\nmin = 1\nmax = 5\n\n[classification]\nchanging_line_threshold = 10.0\n",
    )
    .unwrap();

    let config = HexaConfig::load_from(&path).unwrap().unwrap();
    let engine = ProfileEngine::from_config(&config).unwrap();
    assert_eq!(engine.settings().changing_line_threshold(), 10.0);

    let report = engine.report(&FacetAnswers {
        engine: vec![Some(5), Some(4), Some(3), Some(2), Some(1), Some(3), Some(3), Some(3)],
        interface: vec![Some(3); 8],
        safe_mode: vec![Some(1); 8],
    });
    let engine_detail = &report.details[0];
    assert!(!engine_detail.transformation.is_stable());
    assert!(report.details[1].transformation.is_stable());
}

#[test]
fn config_points_at_alternate_reference() {
    let dir = tempdir().unwrap();
    let reference_path = dir.path().join("reference.json");
    fs::write(
        &reference_path,
        edited_reference(|value| {
            value["archetypes"][0]["name"] = "Heaven".into();
        }),
    )
    .unwrap();

    let config = HexaConfig::parse(&format!(
        "[reference]\npath = {:?}\n",
        reference_path.to_string_lossy()
    ))
    .unwrap();
    let engine = ProfileEngine::from_config(&config).unwrap();
    assert_eq!(engine.reference().archetype(id(1)).name(), "Heaven");

    let builtin = ReferenceData::from_json_str(BUILTIN_REFERENCE).unwrap();
    assert_ne!(engine.reference().fingerprint(), builtin.fingerprint());
}

#[test]
fn invalid_reference_is_rejected_at_load() {
    let truncated = edited_reference(|value| {
        value["archetypes"].as_array_mut().unwrap().pop();
    });
    assert!(matches!(
        ReferenceData::from_json_str(&truncated),
        Err(ReferenceDataError::ArchetypeCount(63))
    ));

    let empty_pool = edited_reference(|value| {
        value["facets"]["interface"]["candidates"] = serde_json::json!([]);
    });
    assert!(matches!(
        ReferenceData::from_json_str(&empty_pool),
        Err(ReferenceDataError::EmptyPool(Facet::Interface))
    ));
}

#[test]
fn guided_line_change() {
    let engine = engine();
    let top = LinePosition::try_new(6).unwrap();
    // After Completion with a solid top line: Wind over Fire.
    let result = engine.transform_line(id(63), top);
    assert_eq!(result.changing_lines, vec![top]);
    assert_eq!(result.resulting, id(37));
}
