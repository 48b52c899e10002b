//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use hexaprofile_core::ProfileEngine;
use hexaprofile_types::{ArchetypeId, TraitVector};
use serde::Deserialize;

pub const BUILTIN_REFERENCE: &str = include_str!("../../core/assets/reference.json");

/// One row of `fixtures/golden_patterns.json`.
#[derive(Debug, Deserialize)]
pub struct GoldenPattern {
    pub pattern: u64,
    pub binary: String,
    pub octal: String,
    pub archetype: u8,
}

/// One row of `fixtures/golden_relations.json`.
#[derive(Debug, Deserialize)]
pub struct GoldenRelation {
    pub id: u8,
    pub complement: u8,
    pub inverse: u8,
    pub opposite: u8,
    pub nuclear: u8,
}

pub fn golden_patterns() -> Vec<GoldenPattern> {
    serde_json::from_str(include_str!("../fixtures/golden_patterns.json"))
        .expect("golden_patterns.json should parse")
}

pub fn golden_relations() -> Vec<GoldenRelation> {
    serde_json::from_str(include_str!("../fixtures/golden_relations.json"))
        .expect("golden_relations.json should parse")
}

pub fn engine() -> ProfileEngine {
    ProfileEngine::builtin().expect("built-in reference data should validate")
}

pub fn id(n: u32) -> ArchetypeId {
    ArchetypeId::try_new(n).expect("archetype id in range")
}

pub fn vector(scores: [f64; 8]) -> TraitVector {
    TraitVector::new(scores).expect("scores in range")
}

/// Binary answers from a bit string written dimension 0 first.
pub fn answers(bits: &str) -> Vec<Option<i32>> {
    bits.chars()
        .map(|c| match c {
            '1' => Some(1),
            '0' => Some(0),
            _ => None,
        })
        .collect()
}

/// Built-in reference JSON with an in-place edit applied.
pub fn edited_reference(edit: impl FnOnce(&mut serde_json::Value)) -> String {
    let mut value: serde_json::Value =
        serde_json::from_str(BUILTIN_REFERENCE).expect("built-in reference is JSON");
    edit(&mut value);
    value.to_string()
}
