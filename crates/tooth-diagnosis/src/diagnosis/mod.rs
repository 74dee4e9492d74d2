//! Tooth-tone impression scoring.
//!
//! A [`ScoringEngine`] is built once from an immutable [`VariantConfig`] and then turns each
//! [`SubmissionInput`] into a [`DiagnosisResult`]: visual age, named sub-scores, the rank
//! average, and the rank letter that doubles as the advice key. Advice text stays in the
//! configuration and is resolved by [`report::DiagnosisReport`].

pub mod batch;
mod config;
pub mod domain;
mod policy;
pub mod presets;
pub mod report;
mod rules;

#[cfg(test)]
mod tests;

pub use config::{
    AdviceCatalog, AdviceEntry, AgeRange, BrightnessDirection, ConfigurationError, OffsetPolicy,
    RankInput, RankThreshold, ScoreBounds, StepBucket, SubScoreFormula, SubScoreSpec,
    VariantConfig,
};
pub use domain::{
    Answer, DiagnosisResult, LifestyleQuestion, Rank, SubScore, SubmissionInput, ToneEntry,
};
pub use policy::resolve_rank;

use rules::ScoreSignals;

/// Stateless evaluator that applies a validated variant configuration to submissions.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: VariantConfig,
}

impl ScoringEngine {
    /// Validates the configuration up front so a bad variant fails before any evaluation.
    pub fn new(config: VariantConfig) -> Result<Self, ConfigurationError> {
        config::validate(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &VariantConfig {
        &self.config
    }

    pub fn evaluate(&self, input: &SubmissionInput) -> Result<DiagnosisResult, InvalidInputError> {
        let config = &self.config;

        let tone = config
            .tone(&input.tone)
            .ok_or_else(|| InvalidInputError::UnknownTone(input.tone.clone()))?;

        if !config.age_range.contains(input.age) {
            return Err(InvalidInputError::AgeOutOfRange {
                age: input.age,
                min: config.age_range.min,
                max: config.age_range.max,
            });
        }

        if let Some(question) = config
            .questions
            .iter()
            .find(|question| !input.answers.contains_key(&question.id))
        {
            return Err(InvalidInputError::MissingAnswer(question.id.clone()));
        }
        if let Some(extra) = input
            .answers
            .keys()
            .find(|id| !config.questions.iter().any(|question| &question.id == *id))
        {
            return Err(InvalidInputError::UnexpectedAnswer(extra.clone()));
        }

        let offset = rules::resolve_offset(&config.offset_policy, tone);
        let signals = ScoreSignals {
            tone,
            offset,
            range: config.tone_range(),
            questions: &config.questions,
            answers: &input.answers,
        };

        let sub_scores = rules::score_all(config, &signals);
        let average = policy::rank_average(config, &sub_scores);
        let rank = resolve_rank(&config.rank_thresholds, average);

        Ok(DiagnosisResult {
            tone: tone.code.clone(),
            age: input.age,
            offset,
            visual_age: i64::from(input.age) + i64::from(offset),
            sub_scores,
            average,
            rank,
            advice_key: rank,
        })
    }
}

/// One-shot evaluation against a configuration that has not been wrapped in an engine yet.
pub fn evaluate(
    input: &SubmissionInput,
    config: &VariantConfig,
) -> Result<DiagnosisResult, DiagnosisError> {
    let engine = ScoringEngine::new(config.clone())?;
    Ok(engine.evaluate(input)?)
}

/// Submission that cannot be scored against the active variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInputError {
    #[error("tone code {0} is not in the tone table")]
    UnknownTone(String),
    #[error("age {age} is outside the accepted range {min}..={max}")]
    AgeOutOfRange { age: u32, min: u32, max: u32 },
    #[error("missing answer for question {0}")]
    MissingAnswer(String),
    #[error("answer given for unknown question {0}")]
    UnexpectedAnswer(String),
    #[error("question {0} is answered more than once")]
    DuplicateAnswer(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiagnosisError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
}
