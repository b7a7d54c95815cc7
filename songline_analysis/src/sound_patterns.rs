// Sound-pattern detection: alliteration, assonance, consonance.
//
// Each line is scanned word by word for three kinds of shared sound:
//
// - alliteration: the same word-initial consonant
// - assonance:    the same vowel nucleus anywhere in the word
// - consonance:   the same non-initial consonant
//
// Words sharing a sound form an occurrence only while they stay close:
// a run breaks when more than PROXIMITY_WINDOW words sit between two
// participants. Occurrence strength starts at a base for a pair, grows
// with each further participant, and loses a little for every skipped
// word, so "sells seashells seashore" beats "sells ... seashore".
//
// Occurrences never span lines. Aggregates are counts by kind, a
// density (occurrences per word), and the most frequent alliterative
// and assonant sounds across the poem.

use crate::structure::PoemStructure;
use serde::{Deserialize, Serialize};
use songline_phonetics::{SyllabifiedWord, normalize, phoneme};
use std::collections::BTreeMap;

/// Most words allowed between two participants of one occurrence.
const PROXIMITY_WINDOW: usize = 2;
/// Strength of a bare adjacent pair.
const BASE_STRENGTH: f64 = 0.4;
/// Strength added per participant beyond the first pair.
const PER_WORD_BONUS: f64 = 0.2;
/// Strength lost per skipped word inside the run.
const GAP_PENALTY: f64 = 0.1;
/// How many top sounds to report per kind.
const TOP_SOUNDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Alliteration,
    Assonance,
    Consonance,
}

/// A group of nearby words in one line sharing a sound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundOccurrence {
    #[serde(rename = "type")]
    pub kind: PatternKind,
    /// The shared phoneme, stress stripped ("S", "AY").
    pub sound: String,
    /// Participating words in line order, normalized.
    pub words: Vec<String>,
    pub strength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundPatternCounts {
    pub alliteration: usize,
    pub assonance: usize,
    pub consonance: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundPatternAnalysis {
    pub occurrences: Vec<SoundOccurrence>,
    pub counts: SoundPatternCounts,
    /// Occurrences per word across the poem.
    pub density: f64,
    /// Most frequent alliterative sounds, up to TOP_SOUNDS.
    pub top_alliteration: Vec<String>,
    /// Most frequent assonant sounds, up to TOP_SOUNDS.
    pub top_assonance: Vec<String>,
}

/// The sounds one word contributes: its initial consonant, its vowel
/// nuclei, and its non-initial consonants. Duplicates within the word
/// collapse, so a word joins each sound's run once.
fn word_sounds(
    word: &SyllabifiedWord,
) -> (Option<String>, Vec<String>, Vec<String>) {
    let phonemes = word.phonemes();
    if phonemes.is_empty() {
        return (None, Vec::new(), Vec::new());
    }

    let initial = phoneme::is_consonant(&phonemes[0]).then(|| phonemes[0].clone());

    let mut vowels: Vec<String> = word
        .syllables
        .iter()
        .map(|s| s.vowel_phoneme.clone())
        .collect();
    vowels.sort();
    vowels.dedup();

    let skip = usize::from(initial.is_some());
    let mut internal: Vec<String> = phonemes[skip..]
        .iter()
        .filter(|p| phoneme::is_consonant(p))
        .cloned()
        .collect();
    internal.sort();
    internal.dedup();

    (initial, vowels, internal)
}

/// Split sorted word positions into runs where consecutive participants
/// are at most PROXIMITY_WINDOW words apart.
fn proximity_runs(positions: &[usize]) -> Vec<&[usize]> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..positions.len() {
        if positions[i] - positions[i - 1] > PROXIMITY_WINDOW + 1 {
            runs.push(&positions[start..i]);
            start = i;
        }
    }
    if start < positions.len() {
        runs.push(&positions[start..]);
    }
    runs
}

// Callers only pass runs of two or more participants.
fn run_strength(run: &[usize]) -> f64 {
    let gaps: usize = run.windows(2).map(|w| w[1] - w[0] - 1).sum();
    (BASE_STRENGTH + PER_WORD_BONUS * (run.len() - 2) as f64 - GAP_PENALTY * gaps as f64)
        .clamp(0.0, 1.0)
}

fn line_occurrences(words: &[SyllabifiedWord]) -> Vec<SoundOccurrence> {
    let mut initial: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    let mut nuclei: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    let mut internal: BTreeMap<String, Vec<usize>> = BTreeMap::new();

    for (pos, word) in words.iter().enumerate() {
        let (first, vowels, rest) = word_sounds(word);
        if let Some(sound) = first {
            initial.entry(sound).or_default().push(pos);
        }
        for sound in vowels {
            nuclei.entry(sound).or_default().push(pos);
        }
        for sound in rest {
            internal.entry(sound).or_default().push(pos);
        }
    }

    let mut occurrences = Vec::new();
    for (kind, map) in [
        (PatternKind::Alliteration, &initial),
        (PatternKind::Assonance, &nuclei),
        (PatternKind::Consonance, &internal),
    ] {
        for (sound, positions) in map {
            for run in proximity_runs(positions) {
                if run.len() < 2 {
                    continue;
                }
                occurrences.push(SoundOccurrence {
                    kind,
                    sound: sound.clone(),
                    words: run.iter().map(|&p| normalize(&words[p].text)).collect(),
                    strength: run_strength(run),
                });
            }
        }
    }
    occurrences
}

/// Detect sound patterns across a whole poem.
pub fn detect_sound_patterns(structure: &PoemStructure) -> SoundPatternAnalysis {
    let mut occurrences = Vec::new();
    let mut word_total = 0;
    for line in structure.lines() {
        word_total += line.words.len();
        occurrences.extend(line_occurrences(&line.words));
    }

    let mut counts = SoundPatternCounts::default();
    for occ in &occurrences {
        match occ.kind {
            PatternKind::Alliteration => counts.alliteration += 1,
            PatternKind::Assonance => counts.assonance += 1,
            PatternKind::Consonance => counts.consonance += 1,
        }
    }

    let density = if word_total == 0 {
        0.0
    } else {
        occurrences.len() as f64 / word_total as f64
    };

    SoundPatternAnalysis {
        top_alliteration: top_sounds(&occurrences, PatternKind::Alliteration),
        top_assonance: top_sounds(&occurrences, PatternKind::Assonance),
        occurrences,
        counts,
        density,
    }
}

/// The most frequent sounds for one kind, ordered by occurrence count
/// then alphabetically.
fn top_sounds(occurrences: &[SoundOccurrence], kind: PatternKind) -> Vec<String> {
    let mut freq: BTreeMap<&str, usize> = BTreeMap::new();
    for occ in occurrences.iter().filter(|o| o.kind == kind) {
        *freq.entry(&occ.sound).or_insert(0) += 1;
    }
    let mut ranked: Vec<(&str, usize)> = freq.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(TOP_SOUNDS)
        .map(|(sound, _)| sound.to_string())
        .collect()
}
