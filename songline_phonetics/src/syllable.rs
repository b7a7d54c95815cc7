// Syllabification: grouping a word's phonemes into syllables.
//
// Each vowel phoneme is a syllable nucleus. Consonants between two nuclei
// are split by a simplified maximal-onset rule: a single consonant opens
// the following syllable; of a longer run, the first consonant closes the
// preceding syllable and the rest open the next. Consonants before the
// first nucleus are the initial onset, consonants after the last are the
// final coda.
//
// A syllable is "open" exactly when its last phoneme is its own nucleus.
// Open syllables sustain best when sung, which is why the singability
// scorer cares about the flag.
//
// Words whose pronunciation contains no vowel at all cannot be
// syllabified and yield None; the analysis pipeline keeps such words in
// the line text but skips their scoring contribution.

use crate::phoneme::{self, Stress};
use serde::{Deserialize, Serialize};

/// One syllable of a pronounced word. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Syllable {
    /// The phoneme tokens of this syllable, stress digits intact.
    pub phonemes: Vec<String>,
    /// Stress level from the nucleus vowel's digit.
    pub stress: Stress,
    /// The nucleus vowel, stress digit stripped ("AA", "IH").
    pub vowel_phoneme: String,
    /// True when the final phoneme is the nucleus itself.
    pub is_open: bool,
}

impl Syllable {
    /// Consonants before the nucleus.
    pub fn onset(&self) -> &[String] {
        let nucleus = self.nucleus_index();
        &self.phonemes[..nucleus]
    }

    /// Consonants after the nucleus. Empty for open syllables.
    pub fn coda(&self) -> &[String] {
        let nucleus = self.nucleus_index();
        &self.phonemes[nucleus + 1..]
    }

    fn nucleus_index(&self) -> usize {
        self.phonemes
            .iter()
            .position(|p| phoneme::is_vowel(p))
            .unwrap_or(0)
    }
}

/// A word with its syllable breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyllabifiedWord {
    /// The word as written (original casing preserved).
    pub text: String,
    /// Syllables in order.
    pub syllables: Vec<Syllable>,
}

impl SyllabifiedWord {
    pub fn syllable_count(&self) -> usize {
        self.syllables.len()
    }

    /// All phonemes of the word in order, flattened across syllables.
    pub fn phonemes(&self) -> Vec<String> {
        self.syllables
            .iter()
            .flat_map(|s| s.phonemes.iter().cloned())
            .collect()
    }
}

/// Group a pronunciation's phonemes into syllables.
///
/// Returns None when the sequence contains no vowel nucleus (malformed or
/// purely consonantal input); callers treat that like a missing
/// pronunciation rather than an error.
pub fn syllabify(text: &str, phonemes: &[String]) -> Option<SyllabifiedWord> {
    let nuclei: Vec<usize> = phonemes
        .iter()
        .enumerate()
        .filter(|(_, p)| phoneme::is_vowel(p))
        .map(|(i, _)| i)
        .collect();

    if nuclei.is_empty() {
        return None;
    }

    // Boundary before each syllable: the first starts at 0; between two
    // nuclei the cut falls after the first consonant of a 2+ run, or
    // directly after the previous nucleus for runs of 0-1 consonants.
    let mut starts = Vec::with_capacity(nuclei.len());
    starts.push(0);
    for window in nuclei.windows(2) {
        let (prev, next) = (window[0], window[1]);
        let run = next - prev - 1;
        let cut = if run >= 2 { prev + 2 } else { next - run };
        starts.push(cut);
    }

    let mut syllables = Vec::with_capacity(nuclei.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(phonemes.len());
        let chunk = &phonemes[start..end];
        let nucleus = &phonemes[nuclei[i]];

        let stress = phoneme::stress_of(nucleus).unwrap_or(Stress::Unstressed);
        let is_open = chunk
            .last()
            .is_some_and(|last| phoneme::is_vowel(last));

        syllables.push(Syllable {
            phonemes: chunk.to_vec(),
            stress,
            vowel_phoneme: phoneme::strip_stress(nucleus).to_string(),
            is_open,
        });
    }

    Some(SyllabifiedWord {
        text: text.to_string(),
        syllables,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_monosyllable_closed() {
        let word = syllabify("love", &toks(&["L", "AH1", "V"])).unwrap();
        assert_eq!(word.syllable_count(), 1);
        let syl = &word.syllables[0];
        assert_eq!(syl.stress, Stress::Primary);
        assert_eq!(syl.vowel_phoneme, "AH");
        assert!(!syl.is_open);
        assert_eq!(syl.onset(), &["L".to_string()]);
        assert_eq!(syl.coda(), &["V".to_string()]);
    }

    #[test]
    fn test_monosyllable_open() {
        let word = syllabify("day", &toks(&["D", "EY1"])).unwrap();
        assert_eq!(word.syllable_count(), 1);
        assert!(word.syllables[0].is_open);
        assert!(word.syllables[0].coda().is_empty());
    }

    #[test]
    fn test_single_intervocalic_consonant_opens_next() {
        // "summer's" S AH1 M ER0 Z: the M belongs to the second syllable,
        // leaving the first open.
        let word = syllabify("summer's", &toks(&["S", "AH1", "M", "ER0", "Z"])).unwrap();
        assert_eq!(word.syllable_count(), 2);
        assert!(word.syllables[0].is_open);
        assert_eq!(word.syllables[0].phonemes, toks(&["S", "AH1"]));
        assert_eq!(word.syllables[1].phonemes, toks(&["M", "ER0", "Z"]));
        assert!(!word.syllables[1].is_open);
    }

    #[test]
    fn test_cluster_splits_after_first_consonant() {
        // "compare" K AH0 M P EH1 R: M closes the first syllable, P opens
        // the second.
        let word = syllabify("compare", &toks(&["K", "AH0", "M", "P", "EH1", "R"])).unwrap();
        assert_eq!(word.syllable_count(), 2);
        assert_eq!(word.syllables[0].phonemes, toks(&["K", "AH0", "M"]));
        assert!(!word.syllables[0].is_open);
        assert_eq!(word.syllables[1].phonemes, toks(&["P", "EH1", "R"]));
        assert_eq!(word.syllables[1].stress, Stress::Primary);
    }

    #[test]
    fn test_three_syllables() {
        // "temperate" T EH1 M P ER0 AH0 T
        let word = syllabify(
            "temperate",
            &toks(&["T", "EH1", "M", "P", "ER0", "AH0", "T"]),
        )
        .unwrap();
        assert_eq!(word.syllable_count(), 3);
        assert_eq!(word.syllables[0].phonemes, toks(&["T", "EH1", "M"]));
        assert_eq!(word.syllables[1].phonemes, toks(&["P", "ER0"]));
        assert!(word.syllables[1].is_open);
        assert_eq!(word.syllables[2].phonemes, toks(&["AH0", "T"]));
        assert!(word.syllables[2].onset().is_empty());
    }

    #[test]
    fn test_heavy_coda_stays_with_final_syllable() {
        // "strengths" S T R EH1 NG K TH S
        let word = syllabify(
            "strengths",
            &toks(&["S", "T", "R", "EH1", "NG", "K", "TH", "S"]),
        )
        .unwrap();
        assert_eq!(word.syllable_count(), 1);
        let syl = &word.syllables[0];
        assert_eq!(syl.onset().len(), 3);
        assert_eq!(syl.coda().len(), 4);
        assert!(!syl.is_open);
    }

    #[test]
    fn test_no_vowel_yields_none() {
        assert!(syllabify("hmm", &toks(&["HH", "M"])).is_none());
        assert!(syllabify("", &[]).is_none());
    }

    #[test]
    fn test_counts_sum_to_word_phonemes() {
        let raw = toks(&["G", "L", "IH1", "M", "P", "S", "T"]);
        let word = syllabify("glimpsed", &raw).unwrap();
        assert_eq!(word.phonemes(), raw);
        let total: usize = word.syllables.iter().map(|s| s.phonemes.len()).sum();
        assert_eq!(total, raw.len());
    }

    #[test]
    fn test_serde_camel_case_shape() {
        let word = syllabify("day", &toks(&["D", "EY1"])).unwrap();
        let json = serde_json::to_value(&word).unwrap();
        let syl = &json["syllables"][0];
        assert!(syl.get("vowelPhoneme").is_some());
        assert!(syl.get("isOpen").is_some());
        assert_eq!(syl["stress"], 1);

        let back: SyllabifiedWord = serde_json::from_value(json).unwrap();
        assert_eq!(back, word);
    }
}
