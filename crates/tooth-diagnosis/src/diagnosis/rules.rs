use std::collections::BTreeMap;

use super::config::{OffsetPolicy, SubScoreFormula, SubScoreSpec, VariantConfig};
use super::domain::{Answer, LifestyleQuestion, SubScore, ToneEntry};

/// Everything a formula may read for one submission.
pub(crate) struct ScoreSignals<'a> {
    pub tone: &'a ToneEntry,
    pub offset: i32,
    pub range: u32,
    pub questions: &'a [LifestyleQuestion],
    pub answers: &'a BTreeMap<String, Answer>,
}

/// Rounds half away from zero; every sub-score and the rank average go through here.
pub(crate) fn round_score(value: f64) -> f64 {
    value.round()
}

pub(crate) fn resolve_offset(policy: &OffsetPolicy, tone: &ToneEntry) -> i32 {
    match policy {
        OffsetPolicy::StepBucket { buckets, fallback } => buckets
            .iter()
            .find(|bucket| tone.ordinal <= bucket.upper_bound)
            .map(|bucket| bucket.offset)
            .unwrap_or(*fallback),
        // range and presence are checked when the engine is built
        OffsetPolicy::LinearDivide { center, divisor } => {
            linear_divide_offset(tone.ordinal, *center, *divisor).unwrap_or_default()
        }
        OffsetPolicy::DirectLookup => tone.offset.unwrap_or_default(),
    }
}

/// `floor((ordinal - center) / divisor)`, or `None` when the divisor is not positive or the
/// offset does not fit an `i32`.
pub(crate) fn linear_divide_offset(ordinal: u32, center: i32, divisor: i32) -> Option<i32> {
    if divisor <= 0 {
        return None;
    }
    let offset = (i64::from(ordinal) - i64::from(center)).div_euclid(i64::from(divisor));
    i32::try_from(offset).ok()
}

pub(crate) fn score_all(config: &VariantConfig, signals: &ScoreSignals<'_>) -> Vec<SubScore> {
    config
        .sub_scores
        .iter()
        .map(|spec| SubScore {
            name: spec.name.clone(),
            value: score_one(spec, signals),
        })
        .collect()
}

fn score_one(spec: &SubScoreSpec, signals: &ScoreSignals<'_>) -> f64 {
    let ordinal = f64::from(signals.tone.ordinal);
    let range = f64::from(signals.range);

    let raw = match &spec.formula {
        SubScoreFormula::InverseLinearRescale => round_score(10.0 - ordinal * 10.0 / range),
        SubScoreFormula::LinearRescale => round_score(ordinal * 10.0 / range),
        SubScoreFormula::AnswerMatch {
            questions,
            base,
            step,
        } => {
            let matches = count_answers(signals, questions.as_deref(), true);
            base + step * f64::from(matches)
        }
        SubScoreFormula::AnswerMismatchThreshold {
            questions,
            threshold,
            weight,
        } => {
            let mismatches = count_answers(signals, Some(questions.as_slice()), false);
            let bonus = u32::from(signals.tone.ordinal > *threshold);
            f64::from(mismatches + bonus) * weight
        }
        SubScoreFormula::ToneAttribute { attribute } => signals
            .tone
            .attributes
            .get(attribute)
            .copied()
            .unwrap_or(spec.bounds.min),
        SubScoreFormula::OffsetRescale { base, per_year } => {
            round_score(base - f64::from(signals.offset) * per_year)
        }
    };

    spec.bounds.clamp(raw)
}

/// Counts answers that agree (or disagree) with the favorable value.
fn count_answers(signals: &ScoreSignals<'_>, subset: Option<&[String]>, favorable: bool) -> u32 {
    signals
        .questions
        .iter()
        .filter(|question| subset.map_or(true, |ids| ids.contains(&question.id)))
        .filter(|question| {
            signals
                .answers
                .get(&question.id)
                .is_some_and(|answer| (*answer == question.favorable) == favorable)
        })
        .count() as u32
}
