// Singability scoring: how comfortably a line sits in a singer's mouth.
//
// Three phoneme-level heuristics feed everything else:
//
// - vowel openness: open vowels (AA, AE) sustain on pitch, close vowels
//   (IH, IY) pinch; scored through the fixed table in the phonetics crate
// - consonant clusters: penalty grows with the length of a consonant run
//   and with known-difficult shapes (stop-fricative-stop, back-to-back
//   sibilants)
// - sustainability: per-syllable score from the syllable shape (open,
//   sonorant coda, stop coda) scaled down for heavy onsets
//
// Line scores are a stress-weighted mean of syllable sustainability.
// Problem spots flag the places a lyricist should rework: dense clusters
// (within a word, or at a word junction a singer cannot re-articulate
// around) and hard-to-hold closed vowels.
//
// Cluster severity is judged differently inside a word and across a word
// boundary. Word-internal runs cannot be broken up, so 3 consonants is
// already a medium problem and 4+ is high. At a junction the singer can
// re-attack the next word, so length alone caps at medium; only a
// sibilant meeting another sibilant ("sells seashells") stays high.
//
// All thresholds live in `SingabilityWeights` so tests pin them down and
// callers can retune without touching the algorithms.

use crate::report::Severity;
use serde::{Deserialize, Serialize};
use songline_phonetics::{
    Lexicon, Syllable, SyllabifiedWord, phoneme, syllabify,
};

// Sustainability bases by syllable shape: base + span * openness.
const OPEN_BASE: f64 = 0.55;
const OPEN_SPAN: f64 = 0.45;
const SONORANT_BASE: f64 = 0.8;
const SONORANT_SPAN: f64 = 0.15;
const STOP_BASE: f64 = 0.5;
const STOP_SPAN: f64 = 0.3;
const OBSTRUENT_BASE: f64 = 0.55;
const OBSTRUENT_SPAN: f64 = 0.25;

/// Extra weight a stressed syllable carries in the line mean. Stressed
/// syllables land on strong beats, so their comfort matters more.
const STRESS_WEIGHT: f64 = 1.5;

/// Tunable thresholds for the singability heuristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingabilityWeights {
    /// Cluster penalty for a run of exactly 2 consonants.
    pub cluster_two: f64,
    /// Penalty for a run of 3.
    pub cluster_three: f64,
    /// Penalty for a run of 4 or more.
    pub cluster_four_plus: f64,
    /// Added on top when the run contains a difficult shape.
    pub difficult_cluster_bonus: f64,
    /// Openness below this flags a closed-vowel problem spot.
    pub closed_vowel_threshold: f64,
    /// Sustainability factor for a 2-consonant onset.
    pub onset_pair_factor: f64,
    /// Sustainability factor for a 3+ consonant onset.
    pub onset_cluster_factor: f64,
    /// How strongly the word cluster penalty drags a word score.
    pub cluster_weight: f64,
}

impl Default for SingabilityWeights {
    fn default() -> Self {
        SingabilityWeights {
            cluster_two: 0.25,
            cluster_three: 0.55,
            cluster_four_plus: 0.75,
            difficult_cluster_bonus: 0.15,
            closed_vowel_threshold: 0.4,
            onset_pair_factor: 0.9,
            onset_cluster_factor: 0.65,
            cluster_weight: 0.5,
        }
    }
}

/// What a problem spot is complaining about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingabilityIssue {
    ConsonantCluster,
    ClosedVowel,
}

/// One flagged position within a line. `position` indexes the line's
/// flattened syllable sequence, matching `SingabilityScore::syllable_scores`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSpot {
    pub position: usize,
    pub issue: SingabilityIssue,
    pub severity: Severity,
}

/// Singability result for one line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingabilityScore {
    /// Per-syllable sustainability, 1:1 with the line's syllables.
    pub syllable_scores: Vec<f64>,
    /// Stress-weighted mean of the syllable scores.
    pub line_score: f64,
    pub problem_spots: Vec<ProblemSpot>,
}

// ── Phoneme-level scores ──

/// Openness of the first vowel in a phoneme sequence. 0.0 when the
/// sequence is empty or contains no vowel.
pub fn score_vowel_openness(phonemes: &[String]) -> f64 {
    phonemes
        .iter()
        .find_map(|p| phoneme::vowel_openness(p))
        .unwrap_or(0.0)
}

/// True when a consonant run contains a shape singers stumble on:
/// two sibilants in a row, or a stop-fricative-stop sandwich (/kst/).
pub fn is_difficult_run(run: &[String]) -> bool {
    let sibilant_pair = run
        .windows(2)
        .any(|w| phoneme::is_sibilant(&w[0]) && phoneme::is_sibilant(&w[1]));
    let stop_sandwich = run.windows(3).any(|w| {
        phoneme::is_stop(&w[0]) && phoneme::is_fricative(&w[1]) && phoneme::is_stop(&w[2])
    });
    sibilant_pair || stop_sandwich
}

fn run_penalty(weights: &SingabilityWeights, run: &[String]) -> f64 {
    let base = match run.len() {
        0 | 1 => return 0.0,
        2 => weights.cluster_two,
        3 => weights.cluster_three,
        _ => weights.cluster_four_plus,
    };
    let bonus = if is_difficult_run(run) {
        weights.difficult_cluster_bonus
    } else {
        0.0
    };
    (base + bonus).min(1.0)
}

/// Maximal consonant runs in a phoneme sequence, as (start, length).
fn consonant_runs(phonemes: &[String]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, p) in phonemes.iter().enumerate() {
        if phoneme::is_consonant(p) {
            start.get_or_insert(i);
        } else if let Some(s) = start.take() {
            runs.push((s, i - s));
        }
    }
    if let Some(s) = start {
        runs.push((s, phonemes.len() - s));
    }
    runs
}

/// Worst consonant-cluster penalty in a phoneme sequence, 0.0 to 1.0.
/// 0.0 when no run exceeds a single consonant.
pub fn score_consonant_clusters(phonemes: &[String]) -> f64 {
    score_consonant_clusters_with(&SingabilityWeights::default(), phonemes)
}

pub fn score_consonant_clusters_with(weights: &SingabilityWeights, phonemes: &[String]) -> f64 {
    consonant_runs(phonemes)
        .iter()
        .map(|&(start, len)| run_penalty(weights, &phonemes[start..start + len]))
        .fold(0.0, f64::max)
}

// ── Syllable sustainability ──

/// How well one syllable can be held on a long note, 0.0 to 1.0.
pub fn score_sustainability(syllable: &Syllable) -> f64 {
    score_sustainability_with(&SingabilityWeights::default(), syllable)
}

pub fn score_sustainability_with(weights: &SingabilityWeights, syllable: &Syllable) -> f64 {
    if syllable.phonemes.is_empty() {
        return 0.0;
    }
    let openness = phoneme::vowel_openness(&syllable.vowel_phoneme).unwrap_or(0.0);

    let base = if syllable.is_open {
        OPEN_BASE + OPEN_SPAN * openness
    } else {
        match syllable.coda().last() {
            Some(last) if phoneme::is_sonorant(last) => SONORANT_BASE + SONORANT_SPAN * openness,
            Some(last) if phoneme::is_stop(last) => STOP_BASE + STOP_SPAN * openness,
            _ => OBSTRUENT_BASE + OBSTRUENT_SPAN * openness,
        }
    };

    let onset_factor = match syllable.onset().len() {
        0 | 1 => 1.0,
        2 => weights.onset_pair_factor,
        _ => weights.onset_cluster_factor,
    };

    (base * onset_factor).clamp(0.0, 1.0)
}

// ── Problem spots ──

/// Flag cluster and closed-vowel trouble across a line's words.
/// `position` is the syllable index within the flattened line.
pub fn identify_problem_spots(words: &[SyllabifiedWord]) -> Vec<ProblemSpot> {
    identify_problem_spots_with(&SingabilityWeights::default(), words)
}

pub fn identify_problem_spots_with(
    weights: &SingabilityWeights,
    words: &[SyllabifiedWord],
) -> Vec<ProblemSpot> {
    let mut spots: Vec<ProblemSpot> = Vec::new();

    // Word-internal clusters and closed vowels.
    let mut base = 0;
    for word in words {
        let phonemes = word.phonemes();

        // Map each flat phoneme index to its syllable index so a run can
        // be pinned to the syllable where it starts.
        let mut syllable_of = Vec::with_capacity(phonemes.len());
        for (i, syl) in word.syllables.iter().enumerate() {
            syllable_of.extend(std::iter::repeat_n(i, syl.phonemes.len()));
        }

        for (start, len) in consonant_runs(&phonemes) {
            let severity = match len {
                0..=2 => continue,
                3 => Severity::Medium,
                _ => Severity::High,
            };
            spots.push(ProblemSpot {
                position: base + syllable_of[start],
                issue: SingabilityIssue::ConsonantCluster,
                severity,
            });
        }

        for (i, syl) in word.syllables.iter().enumerate() {
            let openness = phoneme::vowel_openness(&syl.vowel_phoneme).unwrap_or(0.0);
            if openness < weights.closed_vowel_threshold {
                spots.push(ProblemSpot {
                    position: base + i,
                    issue: SingabilityIssue::ClosedVowel,
                    severity: Severity::Low,
                });
            }
        }

        base += word.syllable_count();
    }

    // Word junctions: coda meeting the next word's onset.
    let mut base = 0;
    for pair in words.windows(2) {
        let (left, right) = (&pair[0], &pair[1]);
        base += left.syllable_count();
        let (Some(last), Some(first)) = (left.syllables.last(), right.syllables.first()) else {
            continue;
        };
        let coda = last.coda();
        let onset = first.onset();
        if coda.is_empty() || onset.is_empty() {
            continue;
        }
        let sibilant_boundary = phoneme::is_sibilant(coda.last().map(String::as_str).unwrap_or(""))
            && phoneme::is_sibilant(onset.first().map(String::as_str).unwrap_or(""));
        let severity = if sibilant_boundary {
            Severity::High
        } else if coda.len() + onset.len() >= 3 {
            Severity::Medium
        } else {
            continue;
        };
        spots.push(ProblemSpot {
            position: base - 1,
            issue: SingabilityIssue::ConsonantCluster,
            severity,
        });
    }

    // Collapse duplicates at the same position, keeping the worst.
    spots.sort_by_key(|s| (s.position, s.issue as u8, std::cmp::Reverse(s.severity)));
    spots.dedup_by_key(|s| (s.position, s.issue));
    spots
}

// ── Line aggregation ──

/// Stress-weighted mean sustainability across a line's words. 0.0 for a
/// line with no syllabified words.
pub fn calculate_line_singability(words: &[SyllabifiedWord]) -> f64 {
    calculate_line_singability_with(&SingabilityWeights::default(), words)
}

pub fn calculate_line_singability_with(
    weights: &SingabilityWeights,
    words: &[SyllabifiedWord],
) -> f64 {
    let mut total = 0.0;
    let mut weight_sum = 0.0;
    for word in words {
        for syl in &word.syllables {
            let w = if syl.stress.is_stressed() {
                STRESS_WEIGHT
            } else {
                1.0
            };
            total += w * score_sustainability_with(weights, syl);
            weight_sum += w;
        }
    }
    if weight_sum == 0.0 {
        0.0
    } else {
        total / weight_sum
    }
}

/// Full singability bundle for one line: per-syllable scores, the
/// weighted line score, and problem spots.
pub fn analyze_line_singability(words: &[SyllabifiedWord]) -> SingabilityScore {
    analyze_line_singability_with(&SingabilityWeights::default(), words)
}

pub fn analyze_line_singability_with(
    weights: &SingabilityWeights,
    words: &[SyllabifiedWord],
) -> SingabilityScore {
    let syllable_scores = words
        .iter()
        .flat_map(|w| w.syllables.iter())
        .map(|s| score_sustainability_with(weights, s))
        .collect();
    SingabilityScore {
        syllable_scores,
        line_score: calculate_line_singability_with(weights, words),
        problem_spots: identify_problem_spots_with(weights, words),
    }
}

// ── Word-level conveniences ──

/// Singability of a single dictionary word: mean syllable sustainability
/// discounted by the word's worst cluster. None for unknown words.
pub fn score_word_singability(lexicon: &Lexicon, word: &str) -> Option<f64> {
    score_word_singability_with(&SingabilityWeights::default(), lexicon, word)
}

pub fn score_word_singability_with(
    weights: &SingabilityWeights,
    lexicon: &Lexicon,
    word: &str,
) -> Option<f64> {
    let syllabified = syllabify(word, lexicon.primary(word)?)?;
    let mean = syllabified
        .syllables
        .iter()
        .map(|s| score_sustainability_with(weights, s))
        .sum::<f64>()
        / syllabified.syllable_count() as f64;
    let penalty = score_consonant_clusters_with(weights, &syllabified.phonemes());
    Some((mean * (1.0 - weights.cluster_weight * penalty)).clamp(0.0, 1.0))
}

/// The first vowel of a word's primary pronunciation, stress stripped.
pub fn get_primary_vowel(lexicon: &Lexicon, word: &str) -> Option<String> {
    lexicon
        .primary(word)?
        .iter()
        .find(|p| phoneme::is_vowel(p))
        .map(|p| phoneme::strip_stress(p).to_string())
}

/// True when a word carries a 3+ consonant run or a difficult 2-run.
pub fn has_difficult_clusters(lexicon: &Lexicon, word: &str) -> bool {
    let Some(phonemes) = lexicon.primary(word) else {
        return false;
    };
    let owned: Vec<String> = phonemes.to_vec();
    consonant_runs(&owned).iter().any(|&(start, len)| {
        let run = &owned[start..start + len];
        len >= 3 || (len >= 2 && is_difficult_run(run))
    })
}

// ── Batch helpers ──

/// Score several raw text lines at once.
pub fn analyze_multiple_lines(lexicon: &Lexicon, lines: &[&str]) -> Vec<SingabilityScore> {
    lines
        .iter()
        .map(|line| analyze_line_singability(&crate::structure::syllabify_line(lexicon, line)))
        .collect()
}

/// Mean of line scores. 0.0 for empty input.
pub fn calculate_average_singability(scores: &[SingabilityScore]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().map(|s| s.line_score).sum::<f64>() / scores.len() as f64
}

/// Flatten problem spots across lines, tagged with the line index, and
/// optionally filtered to a minimum severity.
pub fn collect_problem_spots(
    scores: &[SingabilityScore],
    min_severity: Option<Severity>,
) -> Vec<(usize, ProblemSpot)> {
    scores
        .iter()
        .enumerate()
        .flat_map(|(line, score)| {
            score
                .problem_spots
                .iter()
                .filter(|spot| min_severity.is_none_or(|min| spot.severity >= min))
                .map(move |spot| (line, spot.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::syllabify_line;
    use songline_phonetics::default_lexicon;

    fn toks(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_vowel_openness_extremes() {
        assert_eq!(score_vowel_openness(&toks(&["AA1"])), 1.0);
        assert_eq!(score_vowel_openness(&toks(&["IH0"])), 0.3);
        assert_eq!(score_vowel_openness(&toks(&["K", "S", "T"])), 0.0);
        assert_eq!(score_vowel_openness(&[]), 0.0);
    }

    #[test]
    fn test_vowel_openness_uses_first_vowel() {
        // strengths: onset consonants are skipped over, EH found.
        let score = score_vowel_openness(&toks(&["S", "T", "R", "EH1", "NG", "K", "TH", "S"]));
        assert!((score - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_cluster_penalty_monotonic_in_run_length() {
        let single = score_consonant_clusters(&toks(&["T", "AA1"]));
        let two = score_consonant_clusters(&toks(&["S", "T", "AA1"]));
        let three = score_consonant_clusters(&toks(&["S", "T", "R", "AA1"]));
        let four = score_consonant_clusters(&toks(&["AA1", "NG", "K", "TH", "S"]));
        assert_eq!(single, 0.0);
        assert!(two > single, "2-run {} should beat {}", two, single);
        assert!(three >= two);
        assert!(four >= three);
    }

    #[test]
    fn test_cluster_difficult_bonus() {
        // K-S-T is a stop-fricative-stop sandwich; S-T-R is a plain run.
        let sandwich = score_consonant_clusters(&toks(&["AA1", "K", "S", "T"]));
        let plain = score_consonant_clusters(&toks(&["S", "T", "R", "AA1"]));
        assert!(
            sandwich > plain,
            "difficult run {} should outscore plain {}",
            sandwich,
            plain
        );
    }

    #[test]
    fn test_difficult_run_shapes() {
        assert!(is_difficult_run(&toks(&["Z", "S"])));
        assert!(is_difficult_run(&toks(&["L", "Z", "SH"])));
        assert!(is_difficult_run(&toks(&["K", "S", "T"])));
        assert!(!is_difficult_run(&toks(&["S", "T", "R"])));
        assert!(!is_difficult_run(&toks(&["N", "D"])));
    }

    #[test]
    fn test_sustainability_open_syllable_open_vowel() {
        let word = syllabify("la", &toks(&["L", "AA1"])).unwrap();
        assert!(score_sustainability(&word.syllables[0]) >= 0.9);
    }

    #[test]
    fn test_sustainability_sonorant_coda_near_open() {
        let word = syllabify("moon", &toks(&["M", "UW1", "N"])).unwrap();
        let score = score_sustainability(&word.syllables[0]);
        assert!(score >= 0.8, "sonorant coda scored {}", score);
    }

    #[test]
    fn test_sustainability_stop_coda_middling() {
        let word = syllabify("date", &toks(&["D", "EY1", "T"])).unwrap();
        let score = score_sustainability(&word.syllables[0]);
        assert!((0.5..=0.9).contains(&score), "stop coda scored {}", score);
    }

    #[test]
    fn test_sustainability_heavy_onset_depressed() {
        let word = syllabify("spring", &toks(&["S", "P", "R", "IH1", "NG"])).unwrap();
        assert!(score_sustainability(&word.syllables[0]) < 0.7);
    }

    #[test]
    fn test_problem_spots_strengths_high() {
        let lexicon = default_lexicon();
        let words = syllabify_line(&lexicon, "strengths");
        let spots = identify_problem_spots(&words);
        assert!(
            spots
                .iter()
                .any(|s| s.issue == SingabilityIssue::ConsonantCluster
                    && s.severity == Severity::High),
            "expected a high cluster spot, got {:?}",
            spots
        );
    }

    #[test]
    fn test_problem_spots_love_clean() {
        let lexicon = default_lexicon();
        let words = syllabify_line(&lexicon, "love");
        let spots = identify_problem_spots(&words);
        assert!(
            spots
                .iter()
                .all(|s| s.issue != SingabilityIssue::ConsonantCluster),
            "love should have no cluster spots: {:?}",
            spots
        );
    }

    #[test]
    fn test_junction_sibilants_flagged_high() {
        let lexicon = default_lexicon();
        let words = syllabify_line(&lexicon, "sells seashells");
        let spots = identify_problem_spots(&words);
        assert!(
            spots
                .iter()
                .any(|s| s.issue == SingabilityIssue::ConsonantCluster
                    && s.severity == Severity::High),
            "Z meeting S across the junction should be high: {:?}",
            spots
        );
    }

    #[test]
    fn test_junction_plain_cluster_caps_at_medium() {
        // "winds do" piles up N-D-Z-D but the boundary is not
        // sibilant-on-sibilant, so a singer can re-attack the D.
        let lexicon = default_lexicon();
        let words = syllabify_line(&lexicon, "winds do");
        let spots = identify_problem_spots(&words);
        assert!(!spots.is_empty());
        assert!(
            spots.iter().all(|s| s.severity <= Severity::Medium),
            "junction without sibilants should cap at medium: {:?}",
            spots
        );
    }

    #[test]
    fn test_closed_vowel_spot() {
        let lexicon = default_lexicon();
        let words = syllabify_line(&lexicon, "kiss");
        let spots = identify_problem_spots(&words);
        assert!(
            spots
                .iter()
                .any(|s| s.issue == SingabilityIssue::ClosedVowel),
            "IH should flag as a closed vowel: {:?}",
            spots
        );
    }

    #[test]
    fn test_word_singability_rankings() {
        let lexicon = default_lexicon();
        let love = score_word_singability(&lexicon, "love").unwrap();
        let strengths = score_word_singability(&lexicon, "strengths").unwrap();
        let heart = score_word_singability(&lexicon, "heart").unwrap();
        let glimpsed = score_word_singability(&lexicon, "glimpsed").unwrap();
        assert!(love > strengths, "love {} vs strengths {}", love, strengths);
        assert!(heart > glimpsed, "heart {} vs glimpsed {}", heart, glimpsed);
    }

    #[test]
    fn test_word_singability_unknown_is_none() {
        let lexicon = default_lexicon();
        assert!(score_word_singability(&lexicon, "zzznotaword").is_none());
    }

    #[test]
    fn test_primary_vowel() {
        let lexicon = default_lexicon();
        assert_eq!(get_primary_vowel(&lexicon, "love").as_deref(), Some("AH"));
        assert_eq!(
            get_primary_vowel(&lexicon, "strengths").as_deref(),
            Some("EH")
        );
        assert!(get_primary_vowel(&lexicon, "zzznotaword").is_none());
    }

    #[test]
    fn test_has_difficult_clusters() {
        let lexicon = default_lexicon();
        assert!(has_difficult_clusters(&lexicon, "strengths"));
        assert!(has_difficult_clusters(&lexicon, "glimpsed"));
        assert!(!has_difficult_clusters(&lexicon, "love"));
        assert!(!has_difficult_clusters(&lexicon, "zzznotaword"));
    }

    #[test]
    fn test_line_singability_empty() {
        assert_eq!(calculate_line_singability(&[]), 0.0);
        let score = analyze_line_singability(&[]);
        assert_eq!(score.line_score, 0.0);
        assert!(score.syllable_scores.is_empty());
        assert!(score.problem_spots.is_empty());
    }

    #[test]
    fn test_syllable_scores_align_with_count() {
        let lexicon = default_lexicon();
        let words = syllabify_line(&lexicon, "shall i compare thee");
        let total: usize = words.iter().map(|w| w.syllable_count()).sum();
        let score = analyze_line_singability(&words);
        assert_eq!(score.syllable_scores.len(), total);
    }

    #[test]
    fn test_average_singability() {
        assert_eq!(calculate_average_singability(&[]), 0.0);
        let scores = vec![
            SingabilityScore {
                line_score: 0.8,
                ..Default::default()
            },
            SingabilityScore {
                line_score: 0.6,
                ..Default::default()
            },
        ];
        let avg = calculate_average_singability(&scores);
        assert!((avg - 0.7).abs() < 1e-12, "average was {}", avg);
    }

    #[test]
    fn test_collect_problem_spots_filters_and_tags() {
        let lexicon = default_lexicon();
        let scores = analyze_multiple_lines(&lexicon, &["love and light", "strengths"]);
        let all = collect_problem_spots(&scores, None);
        let high = collect_problem_spots(&scores, Some(Severity::High));
        assert!(all.len() >= high.len());
        assert!(high.iter().all(|(line, _)| *line == 1));
        assert!(
            high.iter()
                .all(|(_, spot)| spot.severity == Severity::High)
        );
    }
}
