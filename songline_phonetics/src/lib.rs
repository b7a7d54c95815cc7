// Songline phonetics crate: pronunciations in, syllables out.
//
// Provides the phoneme-level foundation for the analysis crate:
//
// - `phoneme.rs`: ARPAbet token classification tables and predicates
// - `syllable.rs`: `Syllable`/`SyllabifiedWord` and the syllabifier
// - `lib.rs` (this file): `Lexicon`, the word -> pronunciation lookup
//
// The lexicon is a plain JSON map loaded once ("love" -> ["L AH1 V"]).
// `default_lexicon()` embeds a curated
// general-English dictionary at compile time via `include_str!`; callers
// with a bigger dictionary load their own JSON and pass the lexicon by
// reference into every analysis entry point.
//
// Lookups never fail loudly: an unknown word is None, and the analysis
// pipeline keeps the word in the text while skipping its scored
// contributions.
//
// Determinism constraint: identical text + identical lexicon must give
// identical analysis, so entries live in a BTreeMap and iteration order
// is stable.

pub mod phoneme;
pub mod syllable;

// Re-export the types nearly every consumer wants.
pub use phoneme::Stress;
pub use syllable::{Syllable, SyllabifiedWord, syllabify};

use std::collections::BTreeMap;

/// The top-level JSON structure for a lexicon file.
///
/// Each value is a list of pronunciation variants, one space-separated
/// string of stressed ARPAbet tokens per variant; the first variant is
/// the primary pronunciation.
#[derive(Debug, serde::Deserialize)]
struct LexiconFile {
    words: BTreeMap<String, Vec<String>>,
}

/// A loaded pronunciation dictionary.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: BTreeMap<String, Vec<Vec<String>>>,
}

impl Lexicon {
    /// Parse a lexicon from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: LexiconFile = serde_json::from_str(json)?;
        let entries = file
            .words
            .into_iter()
            .map(|(word, variants)| {
                let parsed = variants
                    .iter()
                    .map(|v| v.split_whitespace().map(str::to_string).collect())
                    .collect();
                (word, parsed)
            })
            .collect();
        Ok(Lexicon { entries })
    }

    /// All pronunciation variants for a word, or None for unknown words.
    ///
    /// The word is normalized first: lowercased, surrounding punctuation
    /// stripped, internal apostrophes and hyphens kept ("Summer's," finds
    /// the "summer's" entry).
    pub fn lookup(&self, word: &str) -> Option<&[Vec<String>]> {
        let key = normalize(word);
        self.entries.get(&key).map(Vec::as_slice)
    }

    /// The primary (first) pronunciation variant for a word.
    pub fn primary(&self, word: &str) -> Option<&[String]> {
        self.lookup(word)?.first().map(Vec::as_slice)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(&normalize(word))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add or replace a word's pronunciations. Used by tests for small
    /// fake dictionaries and by callers layering domain words over the
    /// default lexicon.
    pub fn insert(&mut self, word: &str, variants: &[&[&str]]) {
        let parsed = variants
            .iter()
            .map(|v| v.iter().map(|s| s.to_string()).collect())
            .collect();
        self.entries.insert(normalize(word), parsed);
    }
}

/// Normalize a word for lookup: lowercase, strip surrounding
/// non-alphanumeric characters, keep internal apostrophes/hyphens.
pub fn normalize(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_ascii_alphanumeric())
        .to_lowercase()
}

/// Load the default lexicon embedded at compile time.
///
/// Uses `include_str!` to embed `data/phonetic_lexicon.json`. Panics if
/// the embedded JSON is malformed, which the data-file tests rule out
/// for released builds.
pub fn default_lexicon() -> Lexicon {
    let json = include_str!("../../data/phonetic_lexicon.json");
    Lexicon::from_json(json).expect("embedded phonetic_lexicon.json is malformed")
}

/// Syllabify a word through a lexicon, using its primary pronunciation.
/// None when the word is unknown or its pronunciation has no vowel.
pub fn syllabify_word(lexicon: &Lexicon, word: &str) -> Option<SyllabifiedWord> {
    let phonemes = lexicon.primary(word)?;
    syllabify(word, phonemes)
}
