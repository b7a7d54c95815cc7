// Analysis configuration.
//
// All tunable analysis parameters live in `AnalysisConfig`, built in
// code or loaded from JSON and passed to `analyze_poem_with_config`.
// Every field has a sensible default, and `analyze_poem` is simply
// `analyze_poem_with_config` with `AnalysisConfig::default()`.
//
// Parameter groups live next to the code that reads them: the
// singability weights in `singability.rs` and the form thresholds in
// `form.rs`. This module owns the top-level struct and the scalar
// tunables that belong to no group.
//
// Fixed linguistic data (phoneme classes, vowel openness, sentiment
// vocabulary, rhyme rules) is deliberately not configurable. Those
// tables describe English, not taste.

use crate::form::FormConfig;
use crate::meter::METER_CONFIDENCE_FLOOR;
use crate::singability::SingabilityWeights;
use serde::{Deserialize, Serialize};

/// Top-level analysis configuration. Never mutated by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Best-template fit below this reads as irregular meter.
    pub meter_confidence_floor: f64,

    /// Form classification thresholds.
    pub form: FormConfig,

    /// Singability scoring weights and thresholds.
    pub singability: SingabilityWeights,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            meter_confidence_floor: METER_CONFIDENCE_FLOOR,
            form: FormConfig::default(),
            singability: SingabilityWeights::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = AnalysisConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let restored: AnalysisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(
            config.meter_confidence_floor,
            restored.meter_confidence_floor
        );
        assert_eq!(config.form.form_threshold, restored.form.form_threshold);
        assert_eq!(
            config.form.free_verse_confidence,
            restored.form.free_verse_confidence
        );
        assert_eq!(config.singability.cluster_two, restored.singability.cluster_two);
        assert_eq!(
            config.singability.closed_vowel_threshold,
            restored.singability.closed_vowel_threshold
        );
    }

    #[test]
    fn test_config_loads_from_json_string() {
        let json = r#"{
            "meter_confidence_floor": 0.8,
            "form": {
                "form_threshold": 0.7,
                "free_verse_confidence": 0.5
            },
            "singability": {
                "cluster_two": 0.2,
                "cluster_three": 0.5,
                "cluster_four_plus": 0.7,
                "difficult_cluster_bonus": 0.1,
                "closed_vowel_threshold": 0.35,
                "onset_pair_factor": 0.85,
                "onset_cluster_factor": 0.6,
                "cluster_weight": 0.4
            }
        }"#;
        let config: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.meter_confidence_floor, 0.8);
        assert_eq!(config.form.form_threshold, 0.7);
        assert_eq!(config.form.free_verse_confidence, 0.5);
        assert_eq!(config.singability.closed_vowel_threshold, 0.35);
        assert_eq!(config.singability.cluster_weight, 0.4);
    }
}
