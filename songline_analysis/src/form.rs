// Form classification: match a poem against a catalogue of named forms.
//
// Each form states up to four criteria: line/stanza shape, syllable
// counts, meter, and rhyme scheme. Criteria a form does not care about
// (a haiku has no rhyme requirement) are inapplicable rather than
// failed. Confidence is the weight of satisfied criteria over the
// weight of applicable ones, so a rhymeless haiku can still score 1.0.
//
// When no catalogue form reaches the naming floor the poem is free
// verse, reported with a fixed moderate confidence since free verse is
// the absence of evidence rather than a positive match. The best-scoring
// near misses are kept as ranked alternatives either way.

use crate::meter::{MeterAnalysis, MeterType};
use crate::rhyme::{RhymeAnalysis, rhymed_fraction};
use crate::structure::{PoemMeta, PoemStructure};
use serde::{Deserialize, Serialize};

const W_LINES: f64 = 0.35;
const W_SYLLABLES: f64 = 0.25;
const W_METER: f64 = 0.2;
const W_RHYME: f64 = 0.2;

/// How many ranked alternatives to keep.
const ALTERNATIVE_LIMIT: usize = 3;

/// Tunable thresholds for form classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// A named form below this score is not claimed.
    pub form_threshold: f64,
    /// Reported confidence for the free-verse fallback.
    pub free_verse_confidence: f64,
}

impl Default for FormConfig {
    fn default() -> Self {
        FormConfig {
            form_threshold: 0.5,
            free_verse_confidence: 0.6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormType {
    Haiku,
    Tanka,
    Couplet,
    Quatrain,
    Limerick,
    Ballad,
    Sonnet,
    #[default]
    FreeVerse,
}

impl FormType {
    pub fn name(self) -> &'static str {
        match self {
            FormType::Haiku => "haiku",
            FormType::Tanka => "tanka",
            FormType::Couplet => "couplet",
            FormType::Quatrain => "quatrain",
            FormType::Limerick => "limerick",
            FormType::Ballad => "ballad",
            FormType::Sonnet => "sonnet",
            FormType::FreeVerse => "free_verse",
        }
    }
}

const CATALOGUE: &[FormType] = &[
    FormType::Haiku,
    FormType::Tanka,
    FormType::Couplet,
    FormType::Quatrain,
    FormType::Limerick,
    FormType::Ballad,
    FormType::Sonnet,
];

/// Which criteria the winning form actually satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormEvidence {
    pub line_count_match: bool,
    pub syllable_match: bool,
    pub meter_match: bool,
    pub rhyme_scheme_match: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormAlternative {
    pub form_type: FormType,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormAnalysis {
    pub form_type: FormType,
    pub confidence: f64,
    pub evidence: FormEvidence,
    pub alternatives: Vec<FormAlternative>,
}

/// Per-criterion verdicts for one form. None means the form has no
/// requirement for that criterion.
#[derive(Debug, Clone, Copy, Default)]
struct Criteria {
    lines: Option<bool>,
    syllables: Option<bool>,
    meter: Option<bool>,
    rhyme: Option<bool>,
}

impl Criteria {
    fn score(self) -> f64 {
        let mut satisfied = 0.0;
        let mut applicable = 0.0;
        for (weight, verdict) in [
            (W_LINES, self.lines),
            (W_SYLLABLES, self.syllables),
            (W_METER, self.meter),
            (W_RHYME, self.rhyme),
        ] {
            if let Some(ok) = verdict {
                applicable += weight;
                if ok {
                    satisfied += weight;
                }
            }
        }
        if applicable == 0.0 {
            0.0
        } else {
            satisfied / applicable
        }
    }

    fn evidence(self) -> FormEvidence {
        FormEvidence {
            line_count_match: self.lines.unwrap_or(false),
            syllable_match: self.syllables.unwrap_or(false),
            meter_match: self.meter.unwrap_or(false),
            rhyme_scheme_match: self.rhyme.unwrap_or(false),
        }
    }
}

struct FormContext<'a> {
    line_count: usize,
    stanza_count: usize,
    stanza_sizes: Vec<usize>,
    syllables: Vec<usize>,
    meter: &'a MeterAnalysis,
    rhyme: &'a RhymeAnalysis,
}

fn near(value: usize, target: usize, tolerance: usize) -> bool {
    value.abs_diff(target) <= tolerance
}

fn criteria_for(form: FormType, ctx: &FormContext<'_>) -> Criteria {
    let syl = &ctx.syllables;
    match form {
        FormType::Haiku => Criteria {
            lines: Some(ctx.line_count == 3 && ctx.stanza_count == 1),
            syllables: Some(*syl == [5, 7, 5]),
            ..Criteria::default()
        },
        FormType::Tanka => Criteria {
            lines: Some(ctx.line_count == 5 && ctx.stanza_count == 1),
            syllables: Some(*syl == [5, 7, 5, 7, 7]),
            ..Criteria::default()
        },
        FormType::Couplet => Criteria {
            lines: Some(ctx.line_count == 2),
            // Unpronounceable lines count zero syllables; zero-zero is
            // not a match.
            syllables: Some(
                syl.len() == 2 && syl.iter().all(|&n| n > 0) && syl[0].abs_diff(syl[1]) <= 1,
            ),
            meter: None,
            rhyme: Some(ctx.rhyme.scheme == "AA"),
        },
        FormType::Quatrain => Criteria {
            lines: Some(ctx.line_count == 4 && ctx.stanza_count == 1),
            syllables: Some(
                !syl.is_empty()
                    && syl.iter().all(|&n| n > 0)
                    && syl.iter().max().unwrap() - syl.iter().min().unwrap() <= 2,
            ),
            meter: Some(ctx.meter.meter_type != MeterType::Irregular),
            rhyme: Some(matches!(
                ctx.rhyme.scheme.as_str(),
                "ABAB" | "AABB" | "ABBA" | "AAAA"
            )),
        },
        FormType::Limerick => Criteria {
            lines: Some(ctx.line_count == 5 && ctx.stanza_count == 1),
            syllables: Some(
                syl.len() == 5 && syl[2] + 2 <= syl[0] && syl[3] + 2 <= syl[4],
            ),
            meter: Some(ctx.meter.meter_type == MeterType::Anapestic),
            rhyme: Some(ctx.rhyme.scheme == "AABBA"),
        },
        FormType::Ballad => Criteria {
            lines: Some(ctx.line_count >= 4 && ctx.stanza_sizes.iter().all(|&n| n == 4)),
            syllables: Some(!syl.is_empty() && syl.iter().enumerate().all(|(i, &n)| {
                if i % 2 == 0 { near(n, 8, 1) } else { near(n, 6, 1) }
            })),
            meter: Some(ctx.meter.meter_type == MeterType::Iambic),
            rhyme: Some(rhymed_fraction(ctx.rhyme) >= 0.5),
        },
        FormType::Sonnet => Criteria {
            lines: Some(ctx.line_count == 14),
            syllables: Some(!syl.is_empty() && syl.iter().all(|&n| near(n, 10, 1))),
            meter: Some(ctx.meter.meter_type == MeterType::Iambic),
            rhyme: Some(ctx.rhyme.scheme.starts_with("ABAB")),
        },
        FormType::FreeVerse => Criteria::default(),
    }
}

/// Classify a poem's form from its structure, meter, and rhyme.
pub fn detect_form(
    meta: &PoemMeta,
    structure: &PoemStructure,
    meter: &MeterAnalysis,
    rhyme: &RhymeAnalysis,
) -> FormAnalysis {
    detect_form_with(&FormConfig::default(), meta, structure, meter, rhyme)
}

pub fn detect_form_with(
    config: &FormConfig,
    meta: &PoemMeta,
    structure: &PoemStructure,
    meter: &MeterAnalysis,
    rhyme: &RhymeAnalysis,
) -> FormAnalysis {
    if meta.line_count == 0 {
        return FormAnalysis {
            form_type: FormType::FreeVerse,
            confidence: 0.0,
            evidence: FormEvidence::default(),
            alternatives: Vec::new(),
        };
    }

    let ctx = FormContext {
        line_count: meta.line_count,
        stanza_count: meta.stanza_count,
        stanza_sizes: structure.stanzas.iter().map(|s| s.lines.len()).collect(),
        syllables: structure.lines().map(|l| l.syllable_count).collect(),
        meter,
        rhyme,
    };

    let mut scored: Vec<(FormType, Criteria, f64)> = CATALOGUE
        .iter()
        .map(|&form| {
            let criteria = criteria_for(form, &ctx);
            (form, criteria, criteria.score())
        })
        .collect();
    // Stable sort keeps catalogue order among equal scores.
    scored.sort_by(|a, b| b.2.total_cmp(&a.2));

    let (best_form, best_criteria, best_score) = scored[0];
    let runners_up = |from: usize| {
        scored[from..]
            .iter()
            .filter(|(_, _, score)| *score > 0.0)
            .take(ALTERNATIVE_LIMIT)
            .map(|&(form, _, score)| FormAlternative {
                form_type: form,
                confidence: score,
            })
            .collect()
    };

    if best_score < config.form_threshold {
        FormAnalysis {
            form_type: FormType::FreeVerse,
            confidence: config.free_verse_confidence,
            evidence: FormEvidence::default(),
            alternatives: runners_up(0),
        }
    } else {
        FormAnalysis {
            form_type: best_form,
            confidence: best_score,
            evidence: best_criteria.evidence(),
            alternatives: runners_up(1),
        }
    }
}
