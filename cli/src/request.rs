//! JSON request handling.
//!
//! A request is a single externally tagged object:
//!
//! ```text
//! {"answers": {"engine": [1,0,...], "interface": [...], "safe_mode": [...]}}
//! {"scores": [[80.0, ...], [...], [...]]}
//! {"pattern": "0o025"}
//! {"transform": {"archetype": 1, "line": 3}}
//! ```

use anyhow::{Context, Result};
use hexaprofile_core::{FacetAnswers, ProfileEngine};
use hexaprofile_types::{ArchetypeId, LinePosition, PatternId, TraitVector};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum Request {
    Answers(FacetAnswers),
    Scores([TraitVector; 3]),
    /// Decimal, `0b` binary, or `0o` octal.
    Pattern(String),
    Transform {
        archetype: ArchetypeId,
        line: LinePosition,
    },
}

impl Request {
    pub fn parse(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("invalid request JSON")
    }

    pub fn handle(&self, engine: &ProfileEngine) -> Result<Value> {
        match self {
            Request::Answers(answers) => {
                let report = engine.report(answers);
                Ok(serde_json::to_value(report)?)
            }
            Request::Scores(vectors) => {
                let report = engine.report_for(engine.classify_vectors(vectors));
                Ok(serde_json::to_value(report)?)
            }
            Request::Pattern(raw) => {
                let pattern: PatternId = raw
                    .parse()
                    .with_context(|| format!("invalid pattern id {raw:?}"))?;
                let classification = engine.classify_pattern(pattern);
                let archetype = engine.reference().archetype(classification.archetype);
                Ok(json!({
                    "classification": classification,
                    "name": archetype.name(),
                    "binary": pattern.to_binary(),
                    "octal": pattern.to_octal(),
                    "relations": engine.derive_relations(classification.archetype),
                    "stage": engine.resolve_stage(classification.archetype),
                }))
            }
            Request::Transform { archetype, line } => {
                let transformation = engine.transform_line(*archetype, *line);
                Ok(serde_json::to_value(transformation)?)
            }
        }
    }
}
