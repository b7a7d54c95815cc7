// Emotion estimation: keyword-driven sentiment and arousal, plus the
// music parameters they suggest.
//
// No language model here. A fixed lexicon maps emotionally loaded words
// to a valence in [-1, 1], an arousal in [0, 1], and an emotion label.
// Stanza sentiment is the mean valence of the stanza's matched words;
// poem-wide sentiment and arousal average over every matched word, so a
// long dark stanza outweighs a short bright one.
//
// A poem with no matched words reads as neutral: sentiment 0, arousal
// 0.5, mid-register major at a walking tempo.

use crate::structure::PoemStructure;
use serde::{Deserialize, Serialize};
use songline_phonetics::normalize;
use std::collections::BTreeMap;

/// How many dominant emotion labels to report.
const DOMINANT_LIMIT: usize = 3;

/// Sentiment magnitude below this is considered neutral for mode choice.
const MODE_SENTIMENT_THRESHOLD: f64 = 0.15;

/// (word, valence, arousal, label)
const EMOTION_LEXICON: &[(&str, f64, f64, &str)] = &[
    // joy
    ("bloom", 0.5, 0.4, "joy"),
    ("bright", 0.5, 0.6, "joy"),
    ("dance", 0.7, 0.8, "joy"),
    ("delight", 0.8, 0.7, "joy"),
    ("glad", 0.7, 0.6, "joy"),
    ("happy", 0.8, 0.7, "joy"),
    ("joy", 0.9, 0.8, "joy"),
    ("laugh", 0.8, 0.8, "joy"),
    ("light", 0.4, 0.5, "joy"),
    ("merry", 0.7, 0.7, "joy"),
    ("play", 0.5, 0.7, "joy"),
    ("shine", 0.5, 0.6, "joy"),
    ("sing", 0.6, 0.7, "joy"),
    ("smile", 0.7, 0.6, "joy"),
    ("song", 0.5, 0.5, "joy"),
    ("spring", 0.4, 0.6, "joy"),
    ("summer", 0.4, 0.5, "joy"),
    ("sun", 0.5, 0.5, "joy"),
    ("warm", 0.5, 0.3, "joy"),
    // love
    ("adore", 0.8, 0.6, "love"),
    ("beloved", 0.8, 0.5, "love"),
    ("darling", 0.7, 0.5, "love"),
    ("dear", 0.6, 0.4, "love"),
    ("embrace", 0.6, 0.5, "love"),
    ("heart", 0.4, 0.5, "love"),
    ("kiss", 0.7, 0.6, "love"),
    ("love", 0.9, 0.6, "love"),
    ("lover", 0.7, 0.6, "love"),
    ("rose", 0.4, 0.4, "love"),
    ("sweet", 0.6, 0.4, "love"),
    ("tender", 0.5, 0.3, "love"),
    ("true", 0.4, 0.4, "love"),
    // peace
    ("calm", 0.5, 0.1, "peace"),
    ("gentle", 0.5, 0.2, "peace"),
    ("home", 0.4, 0.3, "peace"),
    ("moon", 0.2, 0.2, "peace"),
    ("morning", 0.3, 0.4, "peace"),
    ("peace", 0.7, 0.1, "peace"),
    ("quiet", 0.3, 0.1, "peace"),
    ("rest", 0.4, 0.1, "peace"),
    ("silent", 0.1, 0.1, "peace"),
    ("sleep", 0.3, 0.1, "peace"),
    ("soft", 0.4, 0.2, "peace"),
    ("still", 0.2, 0.1, "peace"),
    // sadness
    ("alone", -0.5, 0.2, "sadness"),
    ("ashes", -0.5, 0.3, "sadness"),
    ("autumn", -0.1, 0.2, "sadness"),
    ("cold", -0.4, 0.3, "sadness"),
    ("cry", -0.7, 0.6, "sadness"),
    ("dark", -0.4, 0.3, "sadness"),
    ("dead", -0.8, 0.3, "sadness"),
    ("death", -0.8, 0.4, "sadness"),
    ("empty", -0.5, 0.2, "sadness"),
    ("fade", -0.4, 0.2, "sadness"),
    ("farewell", -0.5, 0.3, "sadness"),
    ("gone", -0.4, 0.2, "sadness"),
    ("grave", -0.7, 0.3, "sadness"),
    ("grey", -0.3, 0.2, "sadness"),
    ("grief", -0.8, 0.5, "sadness"),
    ("lonely", -0.6, 0.2, "sadness"),
    ("lost", -0.5, 0.3, "sadness"),
    ("mourn", -0.7, 0.4, "sadness"),
    ("pale", -0.2, 0.2, "sadness"),
    ("rain", -0.2, 0.3, "sadness"),
    ("sad", -0.7, 0.4, "sadness"),
    ("sorrow", -0.8, 0.4, "sadness"),
    ("tears", -0.6, 0.5, "sadness"),
    ("weary", -0.5, 0.2, "sadness"),
    ("weep", -0.7, 0.5, "sadness"),
    ("winter", -0.2, 0.3, "sadness"),
    // fear
    ("afraid", -0.6, 0.7, "fear"),
    ("dread", -0.7, 0.7, "fear"),
    ("fear", -0.7, 0.7, "fear"),
    ("ghost", -0.4, 0.6, "fear"),
    ("grips", -0.3, 0.6, "fear"),
    ("night", -0.1, 0.3, "fear"),
    ("scream", -0.6, 0.9, "fear"),
    ("shadow", -0.3, 0.4, "fear"),
    ("storm", -0.3, 0.8, "fear"),
    ("terror", -0.8, 0.9, "fear"),
    ("tremble", -0.5, 0.7, "fear"),
    // anger
    ("bitter", -0.6, 0.5, "anger"),
    ("burn", -0.3, 0.8, "anger"),
    ("fire", -0.1, 0.8, "anger"),
    ("fury", -0.7, 0.9, "anger"),
    ("hate", -0.8, 0.8, "anger"),
    ("rage", -0.7, 0.9, "anger"),
    ("war", -0.7, 0.8, "anger"),
    // longing
    ("ache", -0.5, 0.4, "longing"),
    ("dream", 0.3, 0.3, "longing"),
    ("forever", 0.2, 0.3, "longing"),
    ("hope", 0.6, 0.5, "longing"),
    ("memory", 0.0, 0.2, "longing"),
    ("miss", -0.4, 0.3, "longing"),
    ("remember", 0.0, 0.3, "longing"),
    ("soul", 0.1, 0.3, "longing"),
    ("wish", 0.3, 0.4, "longing"),
    ("yearn", -0.2, 0.5, "longing"),
    // wonder
    ("bird", 0.3, 0.4, "wonder"),
    ("flower", 0.4, 0.3, "wonder"),
    ("golden", 0.5, 0.4, "wonder"),
    ("magic", 0.5, 0.6, "wonder"),
    ("mountain", 0.3, 0.4, "wonder"),
    ("mystery", 0.2, 0.4, "wonder"),
    ("ocean", 0.2, 0.4, "wonder"),
    ("river", 0.2, 0.3, "wonder"),
    ("sea", 0.2, 0.4, "wonder"),
    ("silver", 0.3, 0.3, "wonder"),
    ("sky", 0.3, 0.4, "wonder"),
    ("star", 0.4, 0.4, "wonder"),
    ("stars", 0.4, 0.4, "wonder"),
    ("wild", 0.2, 0.7, "wonder"),
    ("wind", 0.0, 0.5, "wonder"),
    ("wonder", 0.6, 0.6, "wonder"),
];

fn emotion_entry(word: &str) -> Option<(f64, f64, &'static str)> {
    EMOTION_LEXICON
        .iter()
        .find(|(w, _, _, _)| *w == word)
        .map(|&(_, valence, arousal, label)| (valence, arousal, label))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Major,
    Minor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Register {
    Low,
    #[default]
    Mid,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempoRange {
    pub min: u32,
    pub max: u32,
}

/// Musical coloring suggested by the poem's emotional read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicParams {
    pub mode: Mode,
    pub tempo_range: TempoRange,
    pub register: Register,
}

impl Default for MusicParams {
    fn default() -> Self {
        music_params(0.0, 0.5)
    }
}

/// Sentiment of one stanza with the words that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StanzaSentiment {
    pub stanza: usize,
    /// Mean valence of matched words, -1.0 to 1.0. 0.0 when nothing
    /// matched.
    pub sentiment: f64,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionAnalysis {
    pub overall_sentiment: f64,
    pub arousal: f64,
    pub dominant_emotions: Vec<String>,
    pub emotional_arc: Vec<StanzaSentiment>,
    pub suggested_music_params: MusicParams,
}

impl Default for EmotionAnalysis {
    fn default() -> Self {
        EmotionAnalysis {
            overall_sentiment: 0.0,
            arousal: 0.5,
            dominant_emotions: Vec::new(),
            emotional_arc: Vec::new(),
            suggested_music_params: MusicParams::default(),
        }
    }
}

/// Map sentiment and arousal to mode, tempo range, and register.
pub fn music_params(sentiment: f64, arousal: f64) -> MusicParams {
    let mode = if sentiment > MODE_SENTIMENT_THRESHOLD {
        Mode::Major
    } else if sentiment < -MODE_SENTIMENT_THRESHOLD {
        Mode::Minor
    } else if arousal >= 0.5 {
        Mode::Major
    } else {
        Mode::Minor
    };

    let tempo_range = if arousal >= 0.65 {
        TempoRange { min: 100, max: 140 }
    } else if arousal >= 0.4 {
        TempoRange { min: 80, max: 110 }
    } else {
        TempoRange { min: 60, max: 90 }
    };

    let register = if sentiment > 0.3 && arousal > 0.5 {
        Register::High
    } else if sentiment < -0.3 {
        Register::Low
    } else {
        Register::Mid
    };

    MusicParams {
        mode,
        tempo_range,
        register,
    }
}

/// Estimate the emotional arc of a poem from its matched keywords.
pub fn analyze_emotion(structure: &PoemStructure) -> EmotionAnalysis {
    let mut arc = Vec::with_capacity(structure.stanzas.len());
    let mut valence_sum = 0.0;
    let mut arousal_sum = 0.0;
    let mut matched = 0usize;
    let mut label_counts: BTreeMap<&'static str, usize> = BTreeMap::new();

    for (stanza_idx, stanza) in structure.stanzas.iter().enumerate() {
        let mut stanza_sum = 0.0;
        let mut stanza_matches = 0usize;
        let mut keywords: Vec<String> = Vec::new();
        for word in stanza.lines.iter().flat_map(|l| l.words.iter()) {
            let text = normalize(&word.text);
            let Some((valence, arousal, label)) = emotion_entry(&text) else {
                continue;
            };
            // Stanza mean counts every match, repeats included; the
            // keyword list stays deduplicated for display.
            stanza_sum += valence;
            stanza_matches += 1;
            valence_sum += valence;
            arousal_sum += arousal;
            matched += 1;
            *label_counts.entry(label).or_insert(0) += 1;
            if !keywords.contains(&text) {
                keywords.push(text);
            }
        }
        arc.push(StanzaSentiment {
            stanza: stanza_idx,
            sentiment: if stanza_matches == 0 {
                0.0
            } else {
                stanza_sum / stanza_matches as f64
            },
            keywords,
        });
    }

    let (overall_sentiment, arousal) = if matched == 0 {
        (0.0, 0.5)
    } else {
        (
            valence_sum / matched as f64,
            arousal_sum / matched as f64,
        )
    };

    let mut ranked: Vec<(&str, usize)> = label_counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    let dominant_emotions = ranked
        .into_iter()
        .take(DOMINANT_LIMIT)
        .map(|(label, _)| label.to_string())
        .collect();

    EmotionAnalysis {
        overall_sentiment,
        arousal,
        dominant_emotions,
        emotional_arc: arc,
        suggested_music_params: music_params(overall_sentiment, arousal),
    }
}
