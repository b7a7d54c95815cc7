// Problem reports: the flat, user-facing issue list for a poem.
//
// Four passes feed it:
//
// - singability spots from each line (clusters, pinched vowels)
// - stress mismatches from the meter deviations
// - syllable variance against the poem's dominant line length
// - lines left out of an otherwise consistent rhyme scheme
//
// Reports carry a line index, a syllable position within the line, and
// a short human description with an optional suggested fix. The list is
// sorted by line, then position, then type, so repeated analyses of the
// same text produce byte-identical output.

use crate::meter::MeterAnalysis;
use crate::rhyme::RhymeAnalysis;
use crate::singability::SingabilityIssue;
use crate::structure::{AnalyzedLine, PoemStructure};
use serde::{Deserialize, Serialize};
use songline_phonetics::{SyllabifiedWord, normalize};
use std::collections::BTreeMap;

/// Meter deviations on this many positions or more escalate to medium.
const STRESS_MEDIUM_POSITIONS: usize = 3;
/// Syllable-count distance from the dominant length worth flagging.
const VARIANCE_LOW: usize = 3;
const VARIANCE_MEDIUM: usize = 5;
/// Fewest rhyme-bearing lines before missing rhymes are reported.
const MIN_RHYMED_POEM: usize = 4;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    StressMismatch,
    SyllableVariance,
    Singability,
    RhymeBreak,
}

/// One actionable issue at a specific place in the poem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemReport {
    pub line: usize,
    /// Syllable index within the line.
    pub position: usize,
    #[serde(rename = "type")]
    pub kind: ProblemType,
    pub severity: Severity,
    pub description: String,
    #[serde(default)]
    pub suggested_fix: Option<String>,
}

/// The word containing a line's nth syllable.
fn word_at(line: &AnalyzedLine, syllable: usize) -> Option<&SyllabifiedWord> {
    let mut base = 0;
    for word in &line.words {
        let count = word.syllable_count();
        if count > 0 && syllable < base + count {
            return Some(word);
        }
        base += count;
    }
    None
}

fn ending_word(line: &AnalyzedLine) -> Option<&SyllabifiedWord> {
    line.words.iter().rev().find(|w| !w.syllables.is_empty())
}

/// Assemble the problem list from the per-stage analyses.
pub fn build_problem_reports(
    structure: &PoemStructure,
    meter: &MeterAnalysis,
    rhyme: &RhymeAnalysis,
) -> Vec<ProblemReport> {
    let lines: Vec<&AnalyzedLine> = structure.lines().collect();
    let mut reports = Vec::new();

    // Singability spots, re-expressed with word context.
    for (line_idx, line) in lines.iter().enumerate() {
        for spot in &line.singability.problem_spots {
            let word = word_at(line, spot.position)
                .map(|w| normalize(&w.text))
                .unwrap_or_default();
            let (description, fix) = match spot.issue {
                SingabilityIssue::ConsonantCluster => (
                    format!("dense consonant run around '{}'", word),
                    "break up the consonants or swap in a smoother word",
                ),
                SingabilityIssue::ClosedVowel => (
                    format!("'{}' sits on a pinched vowel that is hard to hold", word),
                    "consider a word with a more open vowel",
                ),
            };
            reports.push(ProblemReport {
                line: line_idx,
                position: spot.position,
                kind: ProblemType::Singability,
                severity: spot.severity,
                description,
                suggested_fix: Some(fix.to_string()),
            });
        }
    }

    // Meter deviations. Empty for irregular poems.
    for dev in &meter.deviations {
        let severity = if dev.positions.len() >= STRESS_MEDIUM_POSITIONS {
            Severity::Medium
        } else {
            Severity::Low
        };
        reports.push(ProblemReport {
            line: dev.line,
            position: dev.positions.first().copied().unwrap_or(0),
            kind: ProblemType::StressMismatch,
            severity,
            description: format!(
                "{} syllables fall off the {} beat",
                dev.positions.len(),
                meter.meter_type.name()
            ),
            suggested_fix: Some("shift the stressed words to land on the beat".to_string()),
        });
    }

    // Lines far from the dominant syllable count. Lines that produced
    // no syllables at all are unknown-word artifacts, not variance.
    let mut frequency: BTreeMap<usize, usize> = BTreeMap::new();
    for line in &lines {
        if line.syllable_count > 0 {
            *frequency.entry(line.syllable_count).or_insert(0) += 1;
        }
    }
    let counted: usize = frequency.values().sum();
    let dominant = frequency
        .iter()
        .max_by_key(|(_, n)| **n)
        .filter(|(_, n)| **n >= 2 && **n * 2 >= counted)
        .map(|(count, _)| *count);
    if let Some(dominant) = dominant {
        for (line_idx, line) in lines.iter().enumerate() {
            if line.syllable_count == 0 {
                continue;
            }
            let diff = line.syllable_count.abs_diff(dominant);
            let severity = if diff >= VARIANCE_MEDIUM {
                Severity::Medium
            } else if diff >= VARIANCE_LOW {
                Severity::Low
            } else {
                continue;
            };
            reports.push(ProblemReport {
                line: line_idx,
                position: 0,
                kind: ProblemType::SyllableVariance,
                severity,
                description: format!(
                    "line runs {} syllables against the poem's usual {}",
                    line.syllable_count, dominant
                ),
                suggested_fix: Some(
                    "trim or extend the line toward the poem's prevailing length".to_string(),
                ),
            });
        }
    }

    // Unrhymed lines in a poem that otherwise rhymes.
    let rhymed: std::collections::BTreeSet<usize> = rhyme
        .groups
        .iter()
        .flat_map(|g| g.lines.iter().copied())
        .collect();
    let ending_lines: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| ending_word(l).is_some())
        .map(|(i, _)| i)
        .collect();
    if ending_lines.len() >= MIN_RHYMED_POEM && rhymed.len() * 2 >= ending_lines.len() {
        for &line_idx in &ending_lines {
            if rhymed.contains(&line_idx) {
                continue;
            }
            let line = lines[line_idx];
            let word = ending_word(line).map(|w| normalize(&w.text)).unwrap_or_default();
            reports.push(ProblemReport {
                line: line_idx,
                position: line.syllable_count.saturating_sub(1),
                kind: ProblemType::RhymeBreak,
                severity: Severity::Low,
                description: format!("'{}' stands outside the rhyme scheme", word),
                suggested_fix: Some("end the line on a rhyming word".to_string()),
            });
        }
    }

    reports.sort_by_key(|r| (r.line, r.position, r.kind as u8));
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meter::detect_meter;
    use crate::rhyme::detect_rhyme;
    use crate::structure::analyze_structure;
    use songline_phonetics::default_lexicon;

    fn reports_for(text: &str) -> Vec<ProblemReport> {
        let lexicon = default_lexicon();
        let (_, structure) = analyze_structure(&lexicon, text);
        let meter = detect_meter(&structure);
        let rhyme = detect_rhyme(&structure);
        build_problem_reports(&structure, &meter, &rhyme)
    }

    const SONNET_QUATRAIN: &str = "\
Shall I compare thee to a summer's day?
Thou art more lovely and more temperate:
Rough winds do shake the darling buds of May,
And summer's lease hath all too short a date:";

    #[test]
    fn test_sonnet_has_no_high_severity() {
        let reports = reports_for(SONNET_QUATRAIN);
        assert!(!reports.is_empty());
        assert!(
            reports.iter().all(|r| r.severity < Severity::High),
            "unexpected high severity: {:?}",
            reports
                .iter()
                .filter(|r| r.severity == Severity::High)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_sonnet_reports_stress_mismatches() {
        let reports = reports_for(SONNET_QUATRAIN);
        let stress: Vec<_> = reports
            .iter()
            .filter(|r| r.kind == ProblemType::StressMismatch)
            .collect();
        assert_eq!(stress.len(), 4);
        assert!(
            stress
                .iter()
                .any(|r| r.line == 1 && r.severity == Severity::Medium),
            "line 1 drifts on three beats: {:?}",
            stress
        );
        assert!(stress.iter().all(|r| r.description.contains("iambic")));
    }

    #[test]
    fn test_twister_reports_high_cluster_problems() {
        let reports = reports_for(
            "she sells seashells by the seashore\n\
             the shells she sells are surely seashells\n\
             so if she sells shells on the seashore\n\
             i'm sure she sells seashore shells",
        );
        let high: Vec<_> = reports
            .iter()
            .filter(|r| r.severity == Severity::High)
            .collect();
        assert!(high.len() >= 2, "expected several highs, got {:?}", high);
        assert!(
            high.iter().all(|r| r.kind == ProblemType::Singability
                && r.description.contains("consonant"))
        );
    }

    #[test]
    fn test_variance_and_rhyme_break() {
        let reports = reports_for("day\nmay\nnight\nthe golden morning light of day");
        let variance: Vec<_> = reports
            .iter()
            .filter(|r| r.kind == ProblemType::SyllableVariance)
            .collect();
        assert_eq!(variance.len(), 1);
        assert_eq!(variance[0].line, 3);
        assert_eq!(variance[0].severity, Severity::Medium);

        let breaks: Vec<_> = reports
            .iter()
            .filter(|r| r.kind == ProblemType::RhymeBreak)
            .collect();
        assert_eq!(breaks.len(), 1);
        assert_eq!(breaks[0].line, 2);
        assert!(breaks[0].description.contains("night"));
    }

    #[test]
    fn test_no_dominant_length_no_variance() {
        let reports = reports_for("day\nthe golden morning light of day");
        assert!(
            reports
                .iter()
                .all(|r| r.kind != ProblemType::SyllableVariance)
        );
    }

    #[test]
    fn test_reports_sorted() {
        let reports = reports_for(SONNET_QUATRAIN);
        for pair in reports.windows(2) {
            let a = (pair[0].line, pair[0].position, pair[0].kind as u8);
            let b = (pair[1].line, pair[1].position, pair[1].kind as u8);
            assert!(a <= b, "{:?} sorted after {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_empty_structure_no_reports() {
        let lexicon = default_lexicon();
        let (_, structure) = analyze_structure(&lexicon, "");
        let meter = detect_meter(&structure);
        let rhyme = detect_rhyme(&structure);
        assert!(build_problem_reports(&structure, &meter, &rhyme).is_empty());
    }
}
