use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::domain::{LifestyleQuestion, Rank, ToneEntry};
use super::rules::linear_divide_offset;

/// Complete description of one diagnosis variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub age_range: AgeRange,
    #[serde(default)]
    pub brightness: BrightnessDirection,
    pub tones: Vec<ToneEntry>,
    pub offset_policy: OffsetPolicy,
    #[serde(default)]
    pub questions: Vec<LifestyleQuestion>,
    pub sub_scores: Vec<SubScoreSpec>,
    #[serde(default = "RankInput::canonical")]
    pub rank_inputs: Vec<RankInput>,
    #[serde(default = "RankThreshold::standard")]
    pub rank_thresholds: Vec<RankThreshold>,
    pub advice: AdviceCatalog,
}

impl VariantConfig {
    pub fn tone(&self, code: &str) -> Option<&ToneEntry> {
        self.tones.iter().find(|tone| tone.code == code)
    }

    pub fn tone_codes(&self) -> impl Iterator<Item = &str> {
        self.tones.iter().map(|tone| tone.code.as_str())
    }

    pub fn sub_score_spec(&self, name: &str) -> Option<&SubScoreSpec> {
        self.sub_scores.iter().find(|spec| spec.name == name)
    }

    /// Number of positions on the brightness scale.
    pub fn tone_range(&self) -> u32 {
        self.tones.len() as u32
    }
}

/// Inclusive bound on the accepted real age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

impl AgeRange {
    pub const fn contains(&self, age: u32) -> bool {
        age >= self.min && age <= self.max
    }
}

impl Default for AgeRange {
    fn default() -> Self {
        Self { min: 10, max: 100 }
    }
}

/// Which end of the ordinal scale is the brighter shade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrightnessDirection {
    #[default]
    LowerIsBrighter,
    HigherIsBrighter,
}

/// Rule converting a tone into an age-perception adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum OffsetPolicy {
    StepBucket {
        buckets: Vec<StepBucket>,
        fallback: i32,
    },
    LinearDivide {
        center: i32,
        divisor: i32,
    },
    DirectLookup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepBucket {
    pub upper_bound: u32,
    pub offset: i32,
}

impl StepBucket {
    pub const fn new(upper_bound: u32, offset: i32) -> Self {
        Self {
            upper_bound,
            offset,
        }
    }
}

/// Declared inclusive bounds of a sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBounds {
    pub min: f64,
    pub max: f64,
}

impl ScoreBounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl Default for ScoreBounds {
    fn default() -> Self {
        Self::new(1.0, 10.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubScoreSpec {
    pub name: String,
    #[serde(default)]
    pub bounds: ScoreBounds,
    pub formula: SubScoreFormula,
}

impl SubScoreSpec {
    pub fn new(name: &str, formula: SubScoreFormula) -> Self {
        Self {
            name: name.to_string(),
            bounds: ScoreBounds::default(),
            formula,
        }
    }

    pub fn bounded(mut self, min: f64, max: f64) -> Self {
        self.bounds = ScoreBounds::new(min, max);
        self
    }
}

/// Reusable transforms producing a sub-score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "formula", rename_all = "snake_case")]
pub enum SubScoreFormula {
    /// `10 - ordinal * 10 / range`
    InverseLinearRescale,
    /// `ordinal * 10 / range`
    LinearRescale,
    /// `base + step * matches`, counting favorable answers.
    AnswerMatch {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        questions: Option<Vec<String>>,
        base: f64,
        step: f64,
    },
    /// `(mismatches + [ordinal > threshold]) * weight`
    AnswerMismatchThreshold {
        questions: Vec<String>,
        threshold: u32,
        weight: f64,
    },
    /// Value stored on the tone entry under `attribute`.
    ToneAttribute { attribute: String },
    /// `base - offset * per_year`
    OffsetRescale { base: f64, per_year: f64 },
}

/// One term of the rank average.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankInput {
    pub sub_score: String,
    /// Contributes `bounds.max - value` instead of `value`.
    #[serde(default)]
    pub inverted: bool,
}

impl RankInput {
    pub fn direct(sub_score: &str) -> Self {
        Self {
            sub_score: sub_score.to_string(),
            inverted: false,
        }
    }

    pub fn inverted(sub_score: &str) -> Self {
        Self {
            sub_score: sub_score.to_string(),
            inverted: true,
        }
    }

    /// Cleanliness, inverted urgency, inverted maintenance.
    pub fn canonical() -> Vec<Self> {
        vec![
            Self::direct("cleanliness"),
            Self::inverted("urgency"),
            Self::inverted("maintenance"),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankThreshold {
    pub min_average: i64,
    pub rank: Rank,
}

impl RankThreshold {
    pub const fn new(min_average: i64, rank: Rank) -> Self {
        Self { min_average, rank }
    }

    pub fn standard() -> Vec<Self> {
        vec![
            Self::new(9, Rank::S),
            Self::new(7, Rank::A),
            Self::new(5, Rank::B),
            Self::new(3, Rank::C),
            Self::new(0, Rank::D),
        ]
    }
}

/// Canned advice text keyed by rank.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdviceCatalog {
    pub entries: Vec<AdviceEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceEntry {
    pub rank: Rank,
    pub text: String,
}

impl AdviceCatalog {
    pub fn from_texts(texts: [&str; 5]) -> Self {
        let entries = Rank::ordered()
            .into_iter()
            .zip(texts)
            .map(|(rank, text)| AdviceEntry {
                rank,
                text: text.to_string(),
            })
            .collect();
        Self { entries }
    }

    pub fn text(&self, rank: Rank) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.rank == rank)
            .map(|entry| entry.text.as_str())
    }
}

/// Malformed variant configuration, raised when the engine is built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("tone table is empty")]
    EmptyToneTable,
    #[error("tone code {0} appears more than once")]
    DuplicateToneCode(String),
    #[error("tone {code} has ordinal {ordinal} outside 1..={range}")]
    OrdinalOutOfRange { code: String, ordinal: u32, range: u32 },
    #[error("ordinal {0} is assigned to more than one tone")]
    DuplicateOrdinal(u32),
    #[error("age range {min}..={max} is empty")]
    InvalidAgeRange { min: u32, max: u32 },
    #[error("step-bucket table is not monotonic at bucket {index}")]
    NonMonotonicStepBuckets { index: usize },
    #[error("step-bucket table has no buckets")]
    EmptyStepBuckets,
    #[error("linear-divide divisor must be positive (found {0})")]
    InvalidDivisor(i32),
    #[error("offset for tone {0} does not fit the age range arithmetic")]
    OffsetOutOfRange(String),
    #[error("tone {0} has no offset for the direct-lookup policy")]
    MissingDirectOffset(String),
    #[error("direct offsets are not monotonic with brightness at tone {0}")]
    NonMonotonicDirectOffsets(String),
    #[error("question {0} appears more than once")]
    DuplicateQuestion(String),
    #[error("sub-score {0} appears more than once")]
    DuplicateSubScore(String),
    #[error("no sub-scores configured")]
    NoSubScores,
    #[error("sub-score {name} has invalid bounds {min}..={max}")]
    InvalidBounds { name: String, min: f64, max: f64 },
    #[error("sub-score {sub_score} references unknown question {question}")]
    UnknownQuestion { sub_score: String, question: String },
    #[error("sub-score {0} counts answers over an empty question set")]
    EmptyQuestionSet(String),
    #[error("tone {code} is missing attribute {attribute}")]
    MissingToneAttribute { code: String, attribute: String },
    #[error("rank average has no inputs")]
    EmptyRankInputs,
    #[error("rank input references unknown sub-score {0}")]
    UnknownRankInput(String),
    #[error("rank thresholds must be strictly descending")]
    RankThresholdsNotDescending,
    #[error("rank thresholds must run from the best rank to the worst")]
    RankOrderInverted,
    #[error("rank thresholds do not cover averages down to 0")]
    RankThresholdsUncovered,
    #[error("advice catalog has no text for rank {0}")]
    MissingAdvice(Rank),
}

pub(crate) fn validate(config: &VariantConfig) -> Result<(), ConfigurationError> {
    validate_tones(config)?;

    if config.age_range.min > config.age_range.max {
        return Err(ConfigurationError::InvalidAgeRange {
            min: config.age_range.min,
            max: config.age_range.max,
        });
    }

    validate_offset_policy(config)?;
    validate_sub_scores(config)?;
    validate_rank(config)?;

    for rank in Rank::ordered() {
        if config.advice.text(rank).is_none() {
            return Err(ConfigurationError::MissingAdvice(rank));
        }
    }

    Ok(())
}

fn validate_tones(config: &VariantConfig) -> Result<(), ConfigurationError> {
    if config.tones.is_empty() {
        return Err(ConfigurationError::EmptyToneTable);
    }

    let range = config.tone_range();
    let mut codes = HashSet::new();
    let mut ordinals = HashSet::new();
    for tone in &config.tones {
        if !codes.insert(tone.code.as_str()) {
            return Err(ConfigurationError::DuplicateToneCode(tone.code.clone()));
        }
        if tone.ordinal == 0 || tone.ordinal > range {
            return Err(ConfigurationError::OrdinalOutOfRange {
                code: tone.code.clone(),
                ordinal: tone.ordinal,
                range,
            });
        }
        if !ordinals.insert(tone.ordinal) {
            return Err(ConfigurationError::DuplicateOrdinal(tone.ordinal));
        }
    }

    Ok(())
}

fn validate_offset_policy(config: &VariantConfig) -> Result<(), ConfigurationError> {
    match &config.offset_policy {
        OffsetPolicy::StepBucket { buckets, fallback } => {
            if buckets.is_empty() {
                return Err(ConfigurationError::EmptyStepBuckets);
            }
            for (index, pair) in buckets.windows(2).enumerate() {
                if pair[1].upper_bound <= pair[0].upper_bound || pair[1].offset < pair[0].offset {
                    return Err(ConfigurationError::NonMonotonicStepBuckets { index: index + 1 });
                }
            }
            if let Some(last) = buckets.last() {
                if *fallback < last.offset {
                    return Err(ConfigurationError::NonMonotonicStepBuckets {
                        index: buckets.len(),
                    });
                }
            }
        }
        OffsetPolicy::LinearDivide { center, divisor } => {
            if *divisor <= 0 {
                return Err(ConfigurationError::InvalidDivisor(*divisor));
            }
            if let Some(tone) = config
                .tones
                .iter()
                .find(|tone| linear_divide_offset(tone.ordinal, *center, *divisor).is_none())
            {
                return Err(ConfigurationError::OffsetOutOfRange(tone.code.clone()));
            }
        }
        OffsetPolicy::DirectLookup => {
            let mut by_brightness: Vec<(&ToneEntry, i32)> = Vec::with_capacity(config.tones.len());
            for tone in &config.tones {
                let offset = tone
                    .offset
                    .ok_or_else(|| ConfigurationError::MissingDirectOffset(tone.code.clone()))?;
                by_brightness.push((tone, offset));
            }

            // brightest first
            by_brightness.sort_by_key(|(tone, _)| tone.ordinal);
            if config.brightness == BrightnessDirection::HigherIsBrighter {
                by_brightness.reverse();
            }

            for pair in by_brightness.windows(2) {
                if pair[1].1 < pair[0].1 {
                    return Err(ConfigurationError::NonMonotonicDirectOffsets(
                        pair[1].0.code.clone(),
                    ));
                }
            }
        }
    }

    Ok(())
}

fn validate_sub_scores(config: &VariantConfig) -> Result<(), ConfigurationError> {
    let mut questions = HashSet::new();
    for question in &config.questions {
        if !questions.insert(question.id.as_str()) {
            return Err(ConfigurationError::DuplicateQuestion(question.id.clone()));
        }
    }

    if config.sub_scores.is_empty() {
        return Err(ConfigurationError::NoSubScores);
    }

    let mut names = HashSet::new();
    for spec in &config.sub_scores {
        if !names.insert(spec.name.as_str()) {
            return Err(ConfigurationError::DuplicateSubScore(spec.name.clone()));
        }

        let bounds = spec.bounds;
        let finite = bounds.min.is_finite() && bounds.max.is_finite();
        if !finite || bounds.min < 0.0 || bounds.min > bounds.max {
            return Err(ConfigurationError::InvalidBounds {
                name: spec.name.clone(),
                min: bounds.min,
                max: bounds.max,
            });
        }

        match &spec.formula {
            SubScoreFormula::AnswerMatch {
                questions: Some(subset),
                ..
            }
            | SubScoreFormula::AnswerMismatchThreshold {
                questions: subset, ..
            } => {
                if subset.is_empty() {
                    return Err(ConfigurationError::EmptyQuestionSet(spec.name.clone()));
                }
                if let Some(unknown) = subset.iter().find(|id| !questions.contains(id.as_str())) {
                    return Err(ConfigurationError::UnknownQuestion {
                        sub_score: spec.name.clone(),
                        question: unknown.clone(),
                    });
                }
            }
            SubScoreFormula::AnswerMatch {
                questions: None, ..
            } => {
                if config.questions.is_empty() {
                    return Err(ConfigurationError::EmptyQuestionSet(spec.name.clone()));
                }
            }
            SubScoreFormula::ToneAttribute { attribute } => {
                if let Some(tone) = config
                    .tones
                    .iter()
                    .find(|tone| !tone.attributes.contains_key(attribute))
                {
                    return Err(ConfigurationError::MissingToneAttribute {
                        code: tone.code.clone(),
                        attribute: attribute.clone(),
                    });
                }
            }
            SubScoreFormula::InverseLinearRescale
            | SubScoreFormula::LinearRescale
            | SubScoreFormula::OffsetRescale { .. } => {}
        }
    }

    Ok(())
}

fn validate_rank(config: &VariantConfig) -> Result<(), ConfigurationError> {
    if config.rank_inputs.is_empty() {
        return Err(ConfigurationError::EmptyRankInputs);
    }
    if let Some(input) = config
        .rank_inputs
        .iter()
        .find(|input| config.sub_score_spec(&input.sub_score).is_none())
    {
        return Err(ConfigurationError::UnknownRankInput(input.sub_score.clone()));
    }

    let thresholds = &config.rank_thresholds;
    if thresholds
        .windows(2)
        .any(|pair| pair[1].min_average >= pair[0].min_average)
    {
        return Err(ConfigurationError::RankThresholdsNotDescending);
    }
    if thresholds.windows(2).any(|pair| pair[1].rank < pair[0].rank) {
        return Err(ConfigurationError::RankOrderInverted);
    }

    // every term is non-negative, so the lowest reachable average is 0
    match thresholds.last() {
        Some(lowest) if lowest.min_average <= 0 => Ok(()),
        _ => Err(ConfigurationError::RankThresholdsUncovered),
    }
}
