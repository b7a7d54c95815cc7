// ARPAbet phoneme classification: stress digits, manner classes, openness.
//
// Phonemes are carried as their string tokens throughout the engine
// ("K", "AA1", "NG"). Vowel tokens end in a stress digit (0 unstressed,
// 1 primary, 2 secondary); consonant tokens never do. This module owns
// the classification tables that every scoring heuristic reads:
//
// - manner-of-articulation classes (stops, fricatives, nasals, ...)
// - the sonorant set used for coda sustainability
// - the sibilant set used for difficult-cluster detection
// - the vowel openness table used for singability scoring
//
// The tables are fixed data, not tunables: they encode how English
// phonemes behave, while the numeric thresholds that interpret them live
// with the analysis crate's scoring weights.
//
// Used by `syllable.rs` for nucleus detection and by the analysis crate
// for every phoneme-level judgement.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stress level attached to a vowel phoneme's trailing digit.
///
/// Serialized as its digit (0/1/2) so the wire shape matches the
/// ARPAbet convention callers already know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Stress {
    Unstressed,
    Primary,
    Secondary,
}

impl Stress {
    /// Parse a stress digit character ('0', '1', '2').
    pub fn from_digit(digit: char) -> Option<Stress> {
        match digit {
            '0' => Some(Stress::Unstressed),
            '1' => Some(Stress::Primary),
            '2' => Some(Stress::Secondary),
            _ => None,
        }
    }

    /// True for primary or secondary stress.
    pub fn is_stressed(self) -> bool {
        !matches!(self, Stress::Unstressed)
    }

    /// Fold to the binary digit used in line stress patterns:
    /// secondary counts as stressed.
    pub fn pattern_digit(self) -> char {
        if self.is_stressed() { '1' } else { '0' }
    }
}

impl From<Stress> for u8 {
    fn from(stress: Stress) -> u8 {
        match stress {
            Stress::Unstressed => 0,
            Stress::Primary => 1,
            Stress::Secondary => 2,
        }
    }
}

#[derive(Debug)]
pub struct InvalidStress(u8);

impl fmt::Display for InvalidStress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid stress level {} (expected 0, 1, or 2)", self.0)
    }
}

impl TryFrom<u8> for Stress {
    type Error = InvalidStress;

    fn try_from(value: u8) -> Result<Stress, InvalidStress> {
        match value {
            0 => Ok(Stress::Unstressed),
            1 => Ok(Stress::Primary),
            2 => Ok(Stress::Secondary),
            other => Err(InvalidStress(other)),
        }
    }
}

/// The fifteen ARPAbet vowel symbols (stress digit stripped).
pub const VOWELS: &[&str] = &[
    "AA", "AE", "AH", "AO", "AW", "AY", "EH", "ER", "EY", "IH", "IY", "OW", "OY", "UH", "UW",
];

/// Plosives: airflow fully blocked then released. The least sustainable
/// codas when sung.
pub const STOPS: &[&str] = &["B", "D", "G", "K", "P", "T"];

/// Affricates: stop onset with fricative release.
pub const AFFRICATES: &[&str] = &["CH", "JH"];

/// Fricatives: continuous turbulent airflow.
pub const FRICATIVES: &[&str] = &["DH", "F", "HH", "S", "SH", "TH", "V", "Z", "ZH"];

/// Nasals.
pub const NASALS: &[&str] = &["M", "N", "NG"];

/// Liquids.
pub const LIQUIDS: &[&str] = &["L", "R"];

/// Glides (semivowels).
pub const GLIDES: &[&str] = &["W", "Y"];

/// Sonorant consonants: continuous voiced airflow (l, m, n, ng, r).
/// A sonorant coda can be held on pitch, so it scores close to an open
/// syllable for sustainability.
pub const SONORANTS: &[&str] = &["L", "M", "N", "NG", "R"];

/// Sibilants, the hissing obstruents. Adjacent sibilants across a
/// cluster ("sells seashells") are a classic articulation hazard.
pub const SIBILANTS: &[&str] = &["CH", "JH", "S", "SH", "Z", "ZH"];

/// Openness of each vowel, 1.0 (fully open, best sung sustain) down to
/// 0.3 (close/near-close). AA is the ceiling and IH the floor by
/// construction; diphthongs are rated by their opening element.
pub const VOWEL_OPENNESS: &[(&str, f64)] = &[
    ("AA", 1.0),
    ("AE", 0.85),
    ("AW", 0.85),
    ("AO", 0.8),
    ("AY", 0.8),
    ("AH", 0.7),
    ("OY", 0.7),
    ("OW", 0.65),
    ("EH", 0.6),
    ("EY", 0.55),
    ("ER", 0.45),
    ("UW", 0.45),
    ("UH", 0.4),
    ("IY", 0.35),
    ("IH", 0.3),
];

/// Strip the trailing stress digit, if any: "AA1" -> "AA", "K" -> "K".
pub fn strip_stress(token: &str) -> &str {
    token.trim_end_matches(|c: char| c.is_ascii_digit())
}

/// The stress level of a vowel token, or None for consonants and
/// digit-less tokens.
pub fn stress_of(token: &str) -> Option<Stress> {
    let digit = token.chars().next_back()?;
    if !is_vowel(token) {
        return None;
    }
    // A vowel written without a digit scans as unstressed.
    Some(Stress::from_digit(digit).unwrap_or(Stress::Unstressed))
}

/// True if the token (with or without stress digit) is a vowel.
pub fn is_vowel(token: &str) -> bool {
    VOWELS.contains(&strip_stress(token))
}

/// True if the token is a consonant (any non-vowel ARPAbet symbol).
pub fn is_consonant(token: &str) -> bool {
    !token.is_empty() && !is_vowel(token)
}

pub fn is_stop(token: &str) -> bool {
    STOPS.contains(&strip_stress(token))
}

pub fn is_fricative(token: &str) -> bool {
    FRICATIVES.contains(&strip_stress(token))
}

pub fn is_nasal(token: &str) -> bool {
    NASALS.contains(&strip_stress(token))
}

pub fn is_sonorant(token: &str) -> bool {
    SONORANTS.contains(&strip_stress(token))
}

pub fn is_sibilant(token: &str) -> bool {
    SIBILANTS.contains(&strip_stress(token))
}

/// Openness of a vowel token (stress digit ignored), or None for
/// consonants.
pub fn vowel_openness(token: &str) -> Option<f64> {
    let bare = strip_stress(token);
    VOWEL_OPENNESS
        .iter()
        .find(|(v, _)| *v == bare)
        .map(|&(_, openness)| openness)
}
