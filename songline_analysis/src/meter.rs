// Meter detection: name the foot that organizes a poem's rhythm.
//
// The raw stress pattern recorded on each line reflects dictionary
// stress, which overstates how verse is actually scanned: "shall",
// "thou", "more" carry a stress digit in the lexicon but sit on weak
// beats in practice. Meter detection therefore rebuilds each line's
// pattern with monosyllabic function words demoted to unstressed before
// matching against the canonical foot templates.
//
// Matching is a straight tiled comparison: repeat the foot template to
// the line's length and count agreeing positions. The template with the
// best average across lines wins; below a fixed floor the poem is
// called irregular. Confidence is always the best template's fit, even
// when that fit was too weak to name a meter.

use crate::structure::{AnalyzedLine, PoemStructure};
use serde::{Deserialize, Serialize};
use songline_phonetics::normalize;
use std::collections::BTreeMap;

/// A named meter below this average fit is reported as irregular.
pub const METER_CONFIDENCE_FLOOR: f64 = 0.6;

/// Canonical foot templates, one stress digit per syllable.
pub const FOOT_TEMPLATES: &[(MeterType, &str)] = &[
    (MeterType::Iambic, "01"),
    (MeterType::Trochaic, "10"),
    (MeterType::Anapestic, "001"),
    (MeterType::Dactylic, "100"),
];

/// Monosyllabic function words demoted to unstressed when scanning.
/// Sorted; looked up via binary search.
const FUNCTION_WORDS: &[&str] = &[
    "a", "all", "am", "an", "and", "are", "art", "as", "at", "be", "been", "but", "by", "can",
    "could", "did", "do", "does", "for", "from", "had", "has", "hath", "have", "he", "her", "him",
    "his", "i", "if", "in", "is", "it", "its", "may", "me", "more", "must", "my", "nor", "not",
    "of", "on", "or", "our", "shall", "she", "should", "so", "some", "than", "that", "the", "thee",
    "their", "them", "then", "there", "they", "this", "thou", "thy", "to", "too", "up", "us",
    "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "will", "with",
    "would", "ye", "yet", "you", "your",
];

fn is_function_word(word: &str) -> bool {
    FUNCTION_WORDS.binary_search(&normalize(word).as_str()).is_ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeterType {
    Iambic,
    Trochaic,
    Anapestic,
    Dactylic,
    #[default]
    Irregular,
}

impl MeterType {
    pub fn name(self) -> &'static str {
        match self {
            MeterType::Iambic => "iambic",
            MeterType::Trochaic => "trochaic",
            MeterType::Anapestic => "anapestic",
            MeterType::Dactylic => "dactylic",
            MeterType::Irregular => "irregular",
        }
    }
}

/// One line's departure from the detected meter. `positions` are
/// syllable indices where the line's scanned stress disagrees with the
/// tiled foot template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterDeviation {
    pub line: usize,
    pub positions: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterAnalysis {
    #[serde(rename = "type")]
    pub meter_type: MeterType,
    pub feet_per_line: usize,
    /// Average fit of the best template across lines, 0.0 to 1.0.
    pub confidence: f64,
    pub deviations: Vec<MeterDeviation>,
}

/// A line's stress pattern as scanned for meter: the lexicon digits with
/// monosyllabic function words demoted to '0'.
pub fn meter_pattern(line: &AnalyzedLine) -> String {
    let mut pattern = String::with_capacity(line.syllable_count);
    for word in &line.words {
        if word.syllable_count() == 1 && is_function_word(&word.text) {
            pattern.push('0');
        } else {
            for syl in &word.syllables {
                pattern.push(syl.stress.pattern_digit());
            }
        }
    }
    pattern
}

/// Fraction of positions where `pattern` agrees with `template` tiled to
/// its length, plus the disagreeing positions.
fn tiled_match(pattern: &str, template: &str) -> (f64, Vec<usize>) {
    let mismatches: Vec<usize> = pattern
        .chars()
        .zip(template.chars().cycle())
        .enumerate()
        .filter(|(_, (got, want))| got != want)
        .map(|(i, _)| i)
        .collect();
    let len = pattern.chars().count();
    let score = (len - mismatches.len()) as f64 / len as f64;
    (score, mismatches)
}

/// Classify the dominant meter across a poem's lines.
pub fn detect_meter(structure: &PoemStructure) -> MeterAnalysis {
    detect_meter_with(METER_CONFIDENCE_FLOOR, structure)
}

pub fn detect_meter_with(confidence_floor: f64, structure: &PoemStructure) -> MeterAnalysis {
    // Global line index -> scanned pattern, keeping only scannable lines.
    let patterns: Vec<(usize, String)> = structure
        .lines()
        .enumerate()
        .map(|(i, line)| (i, meter_pattern(line)))
        .filter(|(_, p)| !p.is_empty())
        .collect();
    if patterns.is_empty() {
        return MeterAnalysis::default();
    }

    let mut best: Option<(MeterType, &str, f64)> = None;
    for &(meter, template) in FOOT_TEMPLATES {
        let avg = patterns
            .iter()
            .map(|(_, p)| tiled_match(p, template).0)
            .sum::<f64>()
            / patterns.len() as f64;
        if best.is_none_or(|(_, _, score)| avg > score) {
            best = Some((meter, template, avg));
        }
    }
    let (meter, template, confidence) = best.unwrap_or((MeterType::Irregular, "01", 0.0));

    if confidence < confidence_floor {
        return MeterAnalysis {
            meter_type: MeterType::Irregular,
            feet_per_line: 0,
            confidence,
            deviations: Vec::new(),
        };
    }

    let deviations = patterns
        .iter()
        .filter_map(|(line, p)| {
            let (_, positions) = tiled_match(p, template);
            (!positions.is_empty()).then(|| MeterDeviation {
                line: *line,
                positions,
            })
        })
        .collect();

    // Dominant foot count: the most common rounded feet-per-line value.
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for (_, p) in &patterns {
        let feet = (p.chars().count() as f64 / template.len() as f64).round() as usize;
        *counts.entry(feet).or_insert(0) += 1;
    }
    let feet_per_line = counts
        .iter()
        .max_by_key(|(_, n)| **n)
        .map(|(feet, _)| *feet)
        .unwrap_or(0);

    MeterAnalysis {
        meter_type: meter,
        feet_per_line,
        confidence,
        deviations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::analyze_structure;
    use songline_phonetics::default_lexicon;

    const SONNET_QUATRAIN: &str = "\
Shall I compare thee to a summer's day?
Thou art more lovely and more temperate:
Rough winds do shake the darling buds of May,
And summer's lease hath all too short a date:";

    #[test]
    fn test_function_words_sorted_for_binary_search() {
        for pair in FUNCTION_WORDS.windows(2) {
            assert!(pair[0] < pair[1], "{:?} out of order", pair);
        }
    }

    #[test]
    fn test_meter_pattern_demotes_function_words() {
        let lexicon = default_lexicon();
        let (_, structure) =
            analyze_structure(&lexicon, "Rough winds do shake the darling buds of May,");
        let line = structure.lines().next().unwrap();
        assert_eq!(line.stress_pattern, "1111010101");
        assert_eq!(meter_pattern(line), "1101010100");
    }

    #[test]
    fn test_sonnet_quatrain_is_iambic_pentameter() {
        let lexicon = default_lexicon();
        let (_, structure) = analyze_structure(&lexicon, SONNET_QUATRAIN);
        let meter = detect_meter(&structure);
        assert_eq!(meter.meter_type, MeterType::Iambic);
        assert_eq!(meter.feet_per_line, 5);
        assert!(
            (meter.confidence - 0.8).abs() < 1e-9,
            "confidence was {}",
            meter.confidence
        );
    }

    #[test]
    fn test_trochaic_lines() {
        let lexicon = default_lexicon();
        let text = "golden morning silent winter\nbitter sorrow weary summer";
        let (_, structure) = analyze_structure(&lexicon, text);
        let meter = detect_meter(&structure);
        assert_eq!(meter.meter_type, MeterType::Trochaic);
        assert_eq!(meter.feet_per_line, 4);
        assert!((meter.confidence - 1.0).abs() < 1e-9);
        assert!(meter.deviations.is_empty());
    }

    #[test]
    fn test_anapestic_line() {
        let lexicon = default_lexicon();
        let (_, structure) = analyze_structure(&lexicon, "and the sound of a light in the night");
        let meter = detect_meter(&structure);
        assert_eq!(meter.meter_type, MeterType::Anapestic);
        assert_eq!(meter.feet_per_line, 3);
        assert!((meter.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sonnet_deviations_name_real_positions() {
        let lexicon = default_lexicon();
        let (_, structure) = analyze_structure(&lexicon, SONNET_QUATRAIN);
        let meter = detect_meter(&structure);
        assert!(!meter.deviations.is_empty());
        for dev in &meter.deviations {
            assert!(dev.line < 4);
            assert!(!dev.positions.is_empty());
            assert!(dev.positions.iter().all(|&p| p < 10));
        }
    }

    #[test]
    fn test_uniform_stress_is_irregular() {
        let lexicon = default_lexicon();
        let (_, structure) = analyze_structure(&lexicon, "splash splash splash splash");
        let meter = detect_meter(&structure);
        assert_eq!(meter.meter_type, MeterType::Irregular);
        assert_eq!(meter.feet_per_line, 0);
        assert!(meter.deviations.is_empty());
    }

    #[test]
    fn test_empty_structure_defaults() {
        let meter = detect_meter(&PoemStructure::default());
        assert_eq!(meter, MeterAnalysis::default());
    }

    #[test]
    fn test_raised_floor_reads_as_irregular() {
        let lexicon = default_lexicon();
        let (_, structure) = analyze_structure(&lexicon, SONNET_QUATRAIN);
        let meter = detect_meter_with(0.95, &structure);
        assert_eq!(meter.meter_type, MeterType::Irregular);
        assert_eq!(meter.feet_per_line, 0);
        // The best fit is still reported so the caller can see how close it was.
        assert!((meter.confidence - 0.8).abs() < 1e-9);
    }
}
