// Songline Analysis
//
// A prosody and singability analyzer for English poems. Given a poem as
// plain text and a pronunciation lexicon, it produces one `PoemAnalysis`
// covering structure, rhythm, rhyme, sound patterning, emotional tone,
// poetic form, craft problems, and melody suggestions for setting the
// text to music.
//
// Architecture:
// - structure.rs: line/stanza splitting, per-word syllabification,
//   stress patterns, poem metadata
// - singability.rs: vowel openness + consonant cluster scoring, per-line
//   problem spots
// - meter.rs: foot template matching (iamb, trochee, anapest, dactyl)
//   with function-word stress demotion
// - rhyme.rs: end-rhyme scheme and groups, internal rhymes, tail-based
//   classification (perfect/slant/assonance/consonance)
// - sound_patterns.rs: alliteration/assonance/consonance runs with
//   proximity-weighted strengths
// - emotion.rs: lexicon-based sentiment/arousal, stanza arc, music
//   parameter mapping
// - form.rs: weighted-evidence form classification (haiku through
//   sonnet, free verse fallback)
// - report.rs: the consolidated problem list (stress mismatches,
//   syllable variance, singability, rhyme breaks)
// - melody.rs: time signature, tempo, key, and phrase breaks from the
//   finished analyses
// - analysis.rs: the assembled `PoemAnalysis` with its JSON wire shape,
//   validation, and merge
// - config.rs: `AnalysisConfig`, the tunable thresholds and weights
//   threaded through the pipeline
//
// The pipeline is deterministic: identical text, lexicon, and config
// give an identical analysis, bit for bit. Unknown words degrade scores
// but never fail the run; errors surface only at the serialization
// boundary.

pub mod analysis;
pub mod config;
pub mod emotion;
pub mod form;
pub mod melody;
pub mod meter;
pub mod report;
pub mod rhyme;
pub mod singability;
pub mod sound_patterns;
pub mod structure;

// Re-export the types nearly every consumer wants.
pub use analysis::{
    AnalysisError, AnalysisPatch, MetaPatch, PoemAnalysis, ProsodyAnalysis, matches_shape, merge,
};
pub use config::AnalysisConfig;
pub use emotion::EmotionAnalysis;
pub use form::{FormAnalysis, FormType};
pub use melody::MelodySuggestions;
pub use meter::{MeterAnalysis, MeterType};
pub use report::{ProblemReport, ProblemType, Severity};
pub use rhyme::{RhymeAnalysis, RhymeType};
pub use singability::SingabilityScore;
pub use sound_patterns::SoundPatternAnalysis;
pub use structure::{AnalyzedLine, PoemMeta, PoemStructure};

// Callers need a lexicon for every entry point; save them the extra
// dependency edge.
pub use songline_phonetics::{Lexicon, default_lexicon};

/// Run the full analysis pipeline over a poem.
///
/// Total over all inputs: an empty string or a poem of unknown words
/// yields a degraded but well-formed analysis, never an error.
pub fn analyze_poem(lexicon: &Lexicon, text: &str) -> PoemAnalysis {
    analyze_poem_with_config(&AnalysisConfig::default(), lexicon, text)
}

/// `analyze_poem` with caller-supplied thresholds and weights.
pub fn analyze_poem_with_config(
    config: &AnalysisConfig,
    lexicon: &Lexicon,
    text: &str,
) -> PoemAnalysis {
    let (meta, structure) = structure::analyze_structure_with(&config.singability, lexicon, text);
    log::debug!(
        "structure: {} lines in {} stanzas, {} syllables",
        meta.line_count,
        meta.stanza_count,
        meta.syllable_count
    );

    let meter = meter::detect_meter_with(config.meter_confidence_floor, &structure);
    let rhyme = rhyme::detect_rhyme(&structure);
    let sound_patterns = sound_patterns::detect_sound_patterns(&structure);
    let regularity = (meter.confidence + rhyme::rhymed_fraction(&rhyme)) / 2.0;
    log::debug!(
        "prosody: {} meter at {:.2}, scheme {}, regularity {:.2}",
        meter.meter_type.name(),
        meter.confidence,
        rhyme.scheme,
        regularity
    );

    let emotion = emotion::analyze_emotion(&structure);
    let form = form::detect_form_with(&config.form, &meta, &structure, &meter, &rhyme);
    let problems = report::build_problem_reports(&structure, &meter, &rhyme);
    let melody_suggestions = melody::synthesize_melody(&structure, &meter, &rhyme, &emotion);
    log::debug!(
        "form {} at {:.2}, {} problems",
        form.form_type.name(),
        form.confidence,
        problems.len()
    );

    PoemAnalysis {
        meta,
        structure,
        prosody: ProsodyAnalysis {
            meter,
            rhyme,
            sound_patterns,
            regularity,
        },
        emotion,
        form,
        problems,
        melody_suggestions,
    }
}
