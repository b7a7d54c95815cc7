// The assembled analysis: one immutable snapshot per analysis run.
//
// `PoemAnalysis` is the single value callers hold on to. It serializes
// to a fixed JSON shape with exactly seven top-level properties, and
// deserialization is the one place in the crate that raises errors:
// a missing property, a mis-typed `problems`, or a non-object payload
// each fail with a named error instead of a mangled struct. Scoring
// functions elsewhere degrade; the serialization boundary validates.
//
// Editing never mutates an analysis in place. `merge` builds a new
// value from a base plus a patch, replacing whole sub-objects per
// top-level key. `meta` alone merges shallowly so a caller can set a
// title without restating the counts.

use crate::emotion::EmotionAnalysis;
use crate::form::FormAnalysis;
use crate::melody::MelodySuggestions;
use crate::meter::MeterAnalysis;
use crate::report::ProblemReport;
use crate::rhyme::RhymeAnalysis;
use crate::sound_patterns::SoundPatternAnalysis;
use crate::structure::{PoemMeta, PoemStructure};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Every property a serialized analysis must carry, in wire order.
pub const REQUIRED_PROPERTIES: [&str; 7] = [
    "meta",
    "structure",
    "prosody",
    "emotion",
    "form",
    "problems",
    "melodySuggestions",
];

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("missing required property '{0}'")]
    MissingProperty(&'static str),
    #[error("property '{property}' has the wrong type: expected {expected}")]
    WrongType {
        property: &'static str,
        expected: &'static str,
    },
    #[error("analysis JSON must be an object")]
    NotAnObject,
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Rhythm and rhyme findings side by side.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProsodyAnalysis {
    pub meter: MeterAnalysis,
    pub rhyme: RhymeAnalysis,
    pub sound_patterns: SoundPatternAnalysis,
    /// Meter confidence and rhyme consistency folded into one score.
    pub regularity: f64,
}

/// The complete analysis of one poem.
///
/// Cloning is deep: a clone shares no state with its source, so callers
/// can hand copies across threads or mutate a draft freely.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoemAnalysis {
    pub meta: PoemMeta,
    pub structure: PoemStructure,
    pub prosody: ProsodyAnalysis,
    pub emotion: EmotionAnalysis,
    pub form: FormAnalysis,
    pub problems: Vec<ProblemReport>,
    pub melody_suggestions: MelodySuggestions,
}

impl PoemAnalysis {
    /// Compact JSON.
    pub fn to_json(&self) -> Result<String, AnalysisError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Pretty-printed JSON for display and fixtures.
    pub fn to_json_pretty(&self) -> Result<String, AnalysisError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a serialized analysis.
    ///
    /// Validation happens before typed decoding so the error names the
    /// first offending property instead of surfacing a serde path.
    pub fn from_json(json: &str) -> Result<PoemAnalysis, AnalysisError> {
        let value: Value = serde_json::from_str(json)?;
        let map = value.as_object().ok_or(AnalysisError::NotAnObject)?;
        for &property in REQUIRED_PROPERTIES.iter() {
            if !map.contains_key(property) {
                return Err(AnalysisError::MissingProperty(property));
            }
        }
        if !map["problems"].is_array() {
            return Err(AnalysisError::WrongType {
                property: "problems",
                expected: "array",
            });
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// True when a JSON value has the shape of a serialized analysis.
/// Never raises; any foreign value is simply false.
pub fn matches_shape(value: &Value) -> bool {
    let Some(map) = value.as_object() else {
        return false;
    };
    REQUIRED_PROPERTIES.iter().all(|&property| {
        map.get(property).is_some_and(|v| match property {
            "problems" => v.is_array(),
            _ => v.is_object(),
        })
    })
}

/// Shallow patch for `meta`. Fields left unset keep the base value;
/// the title can be set but not cleared through a merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetaPatch {
    pub title: Option<String>,
    pub line_count: Option<usize>,
    pub stanza_count: Option<usize>,
    pub word_count: Option<usize>,
    pub syllable_count: Option<usize>,
}

/// Partial analysis for `merge`. Every present top-level key replaces
/// the base's sub-object wholesale, except `meta` which merges field by
/// field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisPatch {
    pub meta: Option<MetaPatch>,
    pub structure: Option<PoemStructure>,
    pub prosody: Option<ProsodyAnalysis>,
    pub emotion: Option<EmotionAnalysis>,
    pub form: Option<FormAnalysis>,
    pub problems: Option<Vec<ProblemReport>>,
    pub melody_suggestions: Option<MelodySuggestions>,
}

impl AnalysisPatch {
    /// Parse a patch, insisting on a JSON object.
    pub fn from_json(json: &str) -> Result<AnalysisPatch, AnalysisError> {
        let value: Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(AnalysisError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Build a new analysis from `base` with `patch` applied. `base` is
/// untouched.
pub fn merge(base: &PoemAnalysis, patch: AnalysisPatch) -> PoemAnalysis {
    let mut merged = base.clone();
    if let Some(meta) = patch.meta {
        if meta.title.is_some() {
            merged.meta.title = meta.title;
        }
        if let Some(n) = meta.line_count {
            merged.meta.line_count = n;
        }
        if let Some(n) = meta.stanza_count {
            merged.meta.stanza_count = n;
        }
        if let Some(n) = meta.word_count {
            merged.meta.word_count = n;
        }
        if let Some(n) = meta.syllable_count {
            merged.meta.syllable_count = n;
        }
    }
    if let Some(structure) = patch.structure {
        merged.structure = structure;
    }
    if let Some(prosody) = patch.prosody {
        merged.prosody = prosody;
    }
    if let Some(emotion) = patch.emotion {
        merged.emotion = emotion;
    }
    if let Some(form) = patch.form {
        merged.form = form;
    }
    if let Some(problems) = patch.problems {
        merged.problems = problems;
    }
    if let Some(melody) = patch.melody_suggestions {
        merged.melody_suggestions = melody;
    }
    merged
}
