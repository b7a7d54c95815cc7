// Poem structure: raw text in, syllabified lines and stanzas out.
//
// Stanzas split on blank lines. Each kept line is tokenized on
// whitespace; tokens that are pure punctuation are dropped, everything
// else stays in the line's word list even when the lexicon has no
// pronunciation for it. An unknown word keeps its text with an empty
// syllable list, so downstream scorers skip its contribution while the
// line text survives intact.
//
// The stress pattern recorded here is the raw fold of per-syllable
// stress digits (secondary stress counts as stressed). Meter detection
// applies its own function-word demotion on top, so this string stays a
// faithful record of what the lexicon said.

use crate::singability::{SingabilityScore, SingabilityWeights, analyze_line_singability_with};
use serde::{Deserialize, Serialize};
use songline_phonetics::{Lexicon, SyllabifiedWord, normalize, syllabify_word};

/// Counts and optional title for a whole poem.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoemMeta {
    #[serde(default)]
    pub title: Option<String>,
    pub line_count: usize,
    pub stanza_count: usize,
    pub word_count: usize,
    pub syllable_count: usize,
}

/// One line of the poem with everything known about it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedLine {
    pub text: String,
    pub words: Vec<SyllabifiedWord>,
    /// '0'/'1' per syllable, secondary stress folded to '1'.
    pub stress_pattern: String,
    pub syllable_count: usize,
    pub singability: SingabilityScore,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedStanza {
    pub lines: Vec<AnalyzedLine>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoemStructure {
    pub stanzas: Vec<AnalyzedStanza>,
}

impl PoemStructure {
    /// All lines across stanzas, in poem order.
    pub fn lines(&self) -> impl Iterator<Item = &AnalyzedLine> {
        self.stanzas.iter().flat_map(|s| s.lines.iter())
    }

    pub fn line_count(&self) -> usize {
        self.stanzas.iter().map(|s| s.lines.len()).sum()
    }
}

/// Syllabify every word token of a raw line. Punctuation-only tokens
/// are dropped; unknown words come back with empty syllables.
pub fn syllabify_line(lexicon: &Lexicon, line: &str) -> Vec<SyllabifiedWord> {
    line.split_whitespace()
        .filter(|token| !normalize(token).is_empty())
        .map(|token| {
            syllabify_word(lexicon, token).unwrap_or_else(|| SyllabifiedWord {
                text: token.to_string(),
                syllables: Vec::new(),
            })
        })
        .collect()
}

/// The line's stress digits, one per syllable in word order.
pub fn stress_pattern(words: &[SyllabifiedWord]) -> String {
    words
        .iter()
        .flat_map(|w| w.syllables.iter())
        .map(|s| s.stress.pattern_digit())
        .collect()
}

/// Analyze one line of text in isolation.
pub fn analyze_line(lexicon: &Lexicon, text: &str) -> AnalyzedLine {
    analyze_line_with(&SingabilityWeights::default(), lexicon, text)
}

pub fn analyze_line_with(
    weights: &SingabilityWeights,
    lexicon: &Lexicon,
    text: &str,
) -> AnalyzedLine {
    let words = syllabify_line(lexicon, text);
    let syllable_count = words.iter().map(|w| w.syllable_count()).sum();
    let stress_pattern = stress_pattern(&words);
    let singability = analyze_line_singability_with(weights, &words);
    AnalyzedLine {
        text: text.to_string(),
        words,
        stress_pattern,
        syllable_count,
        singability,
    }
}

/// Split a poem into stanzas of analyzed lines and compute the meta
/// counts. Stanzas are separated by one or more blank lines.
pub fn analyze_structure(lexicon: &Lexicon, text: &str) -> (PoemMeta, PoemStructure) {
    analyze_structure_with(&SingabilityWeights::default(), lexicon, text)
}

pub fn analyze_structure_with(
    weights: &SingabilityWeights,
    lexicon: &Lexicon,
    text: &str,
) -> (PoemMeta, PoemStructure) {
    let mut stanzas = Vec::new();
    let mut current: Vec<AnalyzedLine> = Vec::new();

    for raw in text.lines() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            if !current.is_empty() {
                stanzas.push(AnalyzedStanza {
                    lines: std::mem::take(&mut current),
                });
            }
        } else {
            current.push(analyze_line_with(weights, lexicon, trimmed));
        }
    }
    if !current.is_empty() {
        stanzas.push(AnalyzedStanza { lines: current });
    }

    let structure = PoemStructure { stanzas };
    let meta = PoemMeta {
        title: None,
        line_count: structure.line_count(),
        stanza_count: structure.stanzas.len(),
        word_count: structure.lines().map(|l| l.words.len()).sum(),
        syllable_count: structure.lines().map(|l| l.syllable_count).sum(),
    };
    (meta, structure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use songline_phonetics::default_lexicon;

    const SONNET_QUATRAIN: &str = "\
Shall I compare thee to a summer's day?
Thou art more lovely and more temperate:
Rough winds do shake the darling buds of May,
And summer's lease hath all too short a date:";

    #[test]
    fn test_sonnet_lines_have_ten_syllables() {
        let lexicon = default_lexicon();
        let (_, structure) = analyze_structure(&lexicon, SONNET_QUATRAIN);
        for line in structure.lines() {
            assert_eq!(
                line.syllable_count, 10,
                "line {:?} counted {} syllables",
                line.text, line.syllable_count
            );
        }
    }

    #[test]
    fn test_stanza_split_on_blank_lines() {
        let lexicon = default_lexicon();
        let text = "the sun is bright\n\nthe moon is cold\n\n\nthe night is long";
        let (meta, structure) = analyze_structure(&lexicon, text);
        assert_eq!(structure.stanzas.len(), 3);
        assert_eq!(meta.stanza_count, 3);
        assert_eq!(meta.line_count, 3);
    }

    #[test]
    fn test_unknown_word_kept_without_syllables() {
        let lexicon = default_lexicon();
        let words = syllabify_line(&lexicon, "the xylograph sings");
        assert_eq!(words.len(), 3);
        assert_eq!(words[1].text, "xylograph");
        assert!(words[1].syllables.is_empty());
        assert!(!words[2].syllables.is_empty());
    }

    #[test]
    fn test_punctuation_token_dropped() {
        let lexicon = default_lexicon();
        let words = syllabify_line(&lexicon, "day — night");
        assert_eq!(words.len(), 2);
    }

    #[test]
    fn test_stress_pattern_raw_fold() {
        let lexicon = default_lexicon();
        let words = syllabify_line(&lexicon, "shall i compare thee");
        assert_eq!(stress_pattern(&words), "11011");
    }

    #[test]
    fn test_line_counts_sum_bottom_up() {
        let lexicon = default_lexicon();
        let (meta, structure) = analyze_structure(&lexicon, SONNET_QUATRAIN);
        let from_lines: usize = structure.lines().map(|l| l.syllable_count).sum();
        assert_eq!(meta.syllable_count, from_lines);
        let per_word: usize = structure
            .lines()
            .flat_map(|l| l.words.iter())
            .map(|w| w.syllable_count())
            .sum();
        assert_eq!(meta.syllable_count, per_word);
        assert_eq!(meta.line_count, 4);
        assert_eq!(meta.word_count, 33);
    }

    #[test]
    fn test_empty_poem() {
        let lexicon = default_lexicon();
        let (meta, structure) = analyze_structure(&lexicon, "");
        assert_eq!(meta, PoemMeta::default());
        assert!(structure.stanzas.is_empty());
    }

    #[test]
    fn test_line_singability_populated() {
        let lexicon = default_lexicon();
        let line = analyze_line(&lexicon, "rough winds do shake");
        assert_eq!(line.singability.syllable_scores.len(), line.syllable_count);
        assert!(line.singability.line_score > 0.0);
    }
}
