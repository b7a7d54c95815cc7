// Rhyme detection: end-rhyme scheme, rhyme groups, internal rhymes.
//
// A line's rhyming material is its tail: the stress-stripped phonemes
// from the last stressed syllable's nucleus to the end of the line's
// final pronounceable word. "delight" and "light" share the tail AY-T
// even though their onsets differ.
//
// Classification, strongest first:
//
// - perfect:    tails identical
// - assonance:  same nucleus, different non-empty continuations
// - consonance: different nucleus, identical non-empty final codas
// - slant:      different nucleus, codas differ but share their final
//               consonant
// - none otherwise ("day" vs "date" does not rhyme: the shared vowel is
//   followed by nothing on one side)
//
// Scheme letters are assigned by first occurrence: each line joins the
// earliest group whose founding line it classifies against, otherwise it
// founds a new letter. A group's reported type is its weakest observed
// link, so a perfect pair diluted by a slant member reads as slant.

use crate::structure::{AnalyzedLine, PoemStructure};
use serde::{Deserialize, Serialize};
use songline_phonetics::{SyllabifiedWord, normalize, phoneme};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RhymeType {
    Perfect,
    Slant,
    Assonance,
    Consonance,
}

impl RhymeType {
    /// Rank for weakest-link comparisons; higher is weaker.
    fn weakness(self) -> u8 {
        match self {
            RhymeType::Perfect => 0,
            RhymeType::Assonance => 1,
            RhymeType::Consonance => 2,
            RhymeType::Slant => 3,
        }
    }
}

/// Lines sharing one rhyme letter. Only groups with two or more member
/// lines are reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RhymeGroup {
    pub lines: Vec<usize>,
    pub rhyme_type: RhymeType,
    pub end_words: Vec<String>,
}

/// Words inside a single line sharing an exact tail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalRhyme {
    pub line: usize,
    /// Word indices within the line.
    pub positions: Vec<usize>,
    pub words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RhymeAnalysis {
    /// One character per line, "ABAB" style. Unrhymed lines get fresh
    /// letters, 'A' through 'Z' and then 'a' through 'z'; a poem with
    /// more than 52 groups shows '?' for the rest.
    pub scheme: String,
    pub groups: Vec<RhymeGroup>,
    pub internal_rhymes: Vec<InternalRhyme>,
}

// ── Tails ──

/// The rhyming tail of one word: nucleus of its last stressed syllable
/// (last syllable when none is stressed), every phoneme from there to
/// the end, and the final syllable's coda. All stress-stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailInfo {
    pub nucleus: String,
    pub tail: Vec<String>,
    pub final_coda: Vec<String>,
}

impl TailInfo {
    pub fn from_word(word: &SyllabifiedWord) -> Option<TailInfo> {
        let syllables = &word.syllables;
        if syllables.is_empty() {
            return None;
        }
        let anchor = syllables
            .iter()
            .rposition(|s| s.stress.is_stressed())
            .unwrap_or(syllables.len() - 1);

        let mut tail = Vec::new();
        let first = &syllables[anchor];
        for p in &first.phonemes[first.onset().len()..] {
            tail.push(phoneme::strip_stress(p).to_string());
        }
        for syl in &syllables[anchor + 1..] {
            for p in &syl.phonemes {
                tail.push(phoneme::strip_stress(p).to_string());
            }
        }

        let last = syllables.last()?;
        let final_coda = last
            .coda()
            .iter()
            .map(|p| phoneme::strip_stress(p).to_string())
            .collect();

        Some(TailInfo {
            nucleus: first.vowel_phoneme.clone(),
            tail,
            final_coda,
        })
    }

    /// Tail of a line's last pronounceable word.
    pub fn from_line(line: &AnalyzedLine) -> Option<TailInfo> {
        line.words
            .iter()
            .rev()
            .find(|w| !w.syllables.is_empty())
            .and_then(TailInfo::from_word)
    }
}

/// How two tails rhyme, or None when they do not.
pub fn classify_rhyme(a: &TailInfo, b: &TailInfo) -> Option<RhymeType> {
    if a.tail == b.tail {
        return Some(RhymeType::Perfect);
    }
    if a.nucleus == b.nucleus {
        // Vowel-only rhyme needs material after the vowel on both sides;
        // otherwise one word simply ends where the other keeps going.
        return (a.tail.len() > 1 && b.tail.len() > 1).then_some(RhymeType::Assonance);
    }
    if !a.final_coda.is_empty() && a.final_coda == b.final_coda {
        return Some(RhymeType::Consonance);
    }
    if !a.final_coda.is_empty()
        && !b.final_coda.is_empty()
        && a.final_coda.last() == b.final_coda.last()
    {
        return Some(RhymeType::Slant);
    }
    None
}

// ── Scheme detection ──

struct Group {
    founder: Option<TailInfo>,
    members: Vec<usize>,
    end_words: Vec<String>,
    weakest: Option<RhymeType>,
}

/// Detect the end-rhyme scheme and inline rhymes for a whole poem.
pub fn detect_rhyme(structure: &PoemStructure) -> RhymeAnalysis {
    let mut groups: Vec<Group> = Vec::new();
    let mut scheme = String::new();

    for (line_idx, line) in structure.lines().enumerate() {
        let tail = TailInfo::from_line(line);
        let end_word = line
            .words
            .iter()
            .rev()
            .find(|w| !w.syllables.is_empty())
            .map(|w| normalize(&w.text));

        let mut joined = None;
        if let Some(ref tail) = tail {
            for (idx, group) in groups.iter_mut().enumerate() {
                let Some(ref founder) = group.founder else {
                    continue;
                };
                if let Some(kind) = classify_rhyme(tail, founder) {
                    group.members.push(line_idx);
                    if let Some(word) = end_word.clone() {
                        group.end_words.push(word);
                    }
                    group.weakest = Some(match group.weakest {
                        Some(prev) if prev.weakness() >= kind.weakness() => prev,
                        _ => kind,
                    });
                    joined = Some(idx);
                    break;
                }
            }
        }

        let idx = joined.unwrap_or_else(|| {
            groups.push(Group {
                founder: tail,
                members: vec![line_idx],
                end_words: end_word.into_iter().collect(),
                weakest: None,
            });
            groups.len() - 1
        });
        scheme.push(letter_for(idx));
    }

    let groups = groups
        .into_iter()
        .filter(|g| g.members.len() >= 2)
        .map(|g| RhymeGroup {
            lines: g.members,
            rhyme_type: g.weakest.unwrap_or(RhymeType::Perfect),
            end_words: g.end_words,
        })
        .collect();

    RhymeAnalysis {
        scheme,
        groups,
        internal_rhymes: detect_internal_rhymes(structure),
    }
}

/// Scheme label for the nth founded group. Uppercase letters first,
/// then lowercase, so 52 groups stay distinct; past that every further
/// group shows '?' rather than aliasing an earlier letter.
fn letter_for(idx: usize) -> char {
    match idx {
        0..=25 => (b'A' + idx as u8) as char,
        26..=51 => (b'a' + (idx - 26) as u8) as char,
        _ => '?',
    }
}

/// Fraction of lines that belong to some rhyme group. 0.0 for an empty
/// poem.
pub fn rhymed_fraction(analysis: &RhymeAnalysis) -> f64 {
    let total = analysis.scheme.chars().count();
    if total == 0 {
        return 0.0;
    }
    let rhymed: usize = analysis.groups.iter().map(|g| g.lines.len()).sum();
    rhymed as f64 / total as f64
}

// ── Internal rhymes ──

/// Exact-tail matches between words inside one line. Repeats of the same
/// word ("the ... the") do not count; at least two distinct words must
/// share the tail.
fn detect_internal_rhymes(structure: &PoemStructure) -> Vec<InternalRhyme> {
    let mut found = Vec::new();
    for (line_idx, line) in structure.lines().enumerate() {
        let mut by_tail: BTreeMap<String, Vec<(usize, String)>> = BTreeMap::new();
        for (pos, word) in line.words.iter().enumerate() {
            let Some(info) = TailInfo::from_word(word) else {
                continue;
            };
            by_tail
                .entry(info.tail.join("-"))
                .or_default()
                .push((pos, normalize(&word.text)));
        }
        for entries in by_tail.into_values() {
            if entries.len() < 2 {
                continue;
            }
            let mut distinct: Vec<&String> = entries.iter().map(|(_, w)| w).collect();
            distinct.sort();
            distinct.dedup();
            if distinct.len() < 2 {
                continue;
            }
            found.push(InternalRhyme {
                line: line_idx,
                positions: entries.iter().map(|(p, _)| *p).collect(),
                words: entries.into_iter().map(|(_, w)| w).collect(),
            });
        }
    }
    found.sort_by_key(|r| (r.line, r.positions.first().copied().unwrap_or(0)));
    found
}
