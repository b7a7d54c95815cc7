// Melody suggestions: a starting point for setting the poem to music.
//
// Everything here is a pure function of analyses computed earlier.
// Triple-time feet get compound or triple signatures, everything else
// defaults to 4/4. Tempo is the midpoint of the emotion-derived range.
// The key is picked from a small table keyed by mode and register, so
// a dark low poem lands on D minor and a bright high one on G major.
//
// Phrase breaks are the line indices where a singer would breathe: the
// start of each new stanza, plus the points where a rhyme closes and
// the scheme turns over completely (no letter before the point recurs
// after it, as between the quatrains of a Shakespearean sonnet).

use crate::emotion::{EmotionAnalysis, Mode, MusicParams, Register};
use crate::meter::{MeterAnalysis, MeterType};
use crate::rhyme::RhymeAnalysis;
use crate::structure::PoemStructure;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeSignature {
    #[default]
    #[serde(rename = "4/4")]
    FourFour,
    #[serde(rename = "3/4")]
    ThreeFour,
    #[serde(rename = "6/8")]
    SixEight,
}

impl TimeSignature {
    pub fn name(self) -> &'static str {
        match self {
            TimeSignature::FourFour => "4/4",
            TimeSignature::ThreeFour => "3/4",
            TimeSignature::SixEight => "6/8",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MelodySuggestions {
    pub time_signature: TimeSignature,
    pub tempo_bpm: u32,
    /// Tonic note name, e.g. "C".
    pub key: String,
    pub mode: Mode,
    /// Line indices where a new phrase should start.
    pub phrase_breaks: Vec<usize>,
}

impl Default for MelodySuggestions {
    fn default() -> Self {
        let params = MusicParams::default();
        MelodySuggestions {
            time_signature: TimeSignature::default(),
            tempo_bpm: midpoint(&params),
            key: key_for(params.mode, params.register).to_string(),
            mode: params.mode,
            phrase_breaks: Vec::new(),
        }
    }
}

fn midpoint(params: &MusicParams) -> u32 {
    (params.tempo_range.min + params.tempo_range.max) / 2
}

fn key_for(mode: Mode, register: Register) -> &'static str {
    match (mode, register) {
        (Mode::Major, Register::High) => "G",
        (Mode::Major, Register::Mid) => "C",
        (Mode::Major, Register::Low) => "F",
        (Mode::Minor, Register::High) => "E",
        (Mode::Minor, Register::Mid) => "A",
        (Mode::Minor, Register::Low) => "D",
    }
}

fn time_signature_for(meter: MeterType) -> TimeSignature {
    match meter {
        MeterType::Anapestic => TimeSignature::SixEight,
        MeterType::Dactylic => TimeSignature::ThreeFour,
        _ => TimeSignature::FourFour,
    }
}

/// Line indices opening a new phrase: stanza starts plus full rhyme
/// turnovers. A run of nothing but fresh letters is not a turnover, so
/// free verse breaks only at stanzas. Index 0 is never a break.
fn phrase_breaks(structure: &PoemStructure, scheme: &str) -> Vec<usize> {
    let mut breaks = BTreeSet::new();

    let mut start = 0;
    for stanza in &structure.stanzas[..structure.stanzas.len().saturating_sub(1)] {
        start += stanza.lines.len();
        breaks.insert(start);
    }

    let letters: Vec<char> = scheme.chars().collect();
    for i in 1..letters.len() {
        // A turnover needs a rhyme to close: the line before the break
        // must rhyme with an earlier line, and no letter carries over.
        if !letters[..i - 1].contains(&letters[i - 1]) {
            continue;
        }
        let before: BTreeSet<char> = letters[..i].iter().copied().collect();
        if letters[i..].iter().all(|c| !before.contains(c)) {
            breaks.insert(i);
        }
    }

    breaks.into_iter().collect()
}

/// Derive melody parameters from the finished analyses.
pub fn synthesize_melody(
    structure: &PoemStructure,
    meter: &MeterAnalysis,
    rhyme: &RhymeAnalysis,
    emotion: &EmotionAnalysis,
) -> MelodySuggestions {
    let params = &emotion.suggested_music_params;
    MelodySuggestions {
        time_signature: time_signature_for(meter.meter_type),
        tempo_bpm: midpoint(params),
        key: key_for(params.mode, params.register).to_string(),
        mode: params.mode,
        phrase_breaks: phrase_breaks(structure, &rhyme.scheme),
    }
}
