//! One engine shared across threads gives the same answers as a single thread.

use std::thread;

use hexaprofile_core::FacetAnswers;
use hexaprofile_types::PatternId;

use crate::common::engine;

fn profile(seed: u8) -> FacetAnswers {
    let bits = |shift: u8| -> Vec<Option<i32>> {
        (0..8)
            .map(|dimension| Some(i32::from((seed.rotate_left(u32::from(shift)) >> dimension) & 1)))
            .collect()
    };
    FacetAnswers {
        engine: bits(0),
        interface: bits(3),
        safe_mode: bits(5),
    }
}

#[test]
fn shared_engine_reports_match_serial_reports() {
    let engine = engine();
    let serial: Vec<_> = (0..=u8::MAX).map(|seed| engine.report(&profile(seed))).collect();

    let parallel: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8u8)
            .map(|worker| {
                let engine = engine.clone();
                scope.spawn(move || {
                    (0..=u8::MAX)
                        .filter(|seed| seed % 8 == worker)
                        .map(|seed| (seed, engine.report(&profile(seed))))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let mut results: Vec<_> = handles
            .into_iter()
            .flat_map(|handle| handle.join().expect("worker panicked"))
            .collect();
        results.sort_by_key(|(seed, _)| *seed);
        results.into_iter().map(|(_, report)| report).collect()
    });

    assert_eq!(serial, parallel);
}

#[test]
fn concurrent_pattern_classification() {
    let engine = engine();
    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for pattern in PatternId::all() {
                    let classification = engine.classify_pattern(pattern);
                    assert_eq!(classification.pattern, pattern);
                }
            });
        }
    });
}
