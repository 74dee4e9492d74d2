use super::config::{RankInput, RankThreshold, VariantConfig};
use super::domain::{Rank, SubScore};
use super::rules::round_score;

/// Rounded mean of the configured rank inputs.
pub(crate) fn rank_average(config: &VariantConfig, scores: &[SubScore]) -> i64 {
    let terms: Vec<f64> = config
        .rank_inputs
        .iter()
        .filter_map(|input| rank_term(config, input, scores))
        .collect();

    if terms.is_empty() {
        return 0;
    }

    let sum: f64 = terms.iter().sum();
    round_score(sum / terms.len() as f64) as i64
}

fn rank_term(config: &VariantConfig, input: &RankInput, scores: &[SubScore]) -> Option<f64> {
    let spec = config.sub_score_spec(&input.sub_score)?;
    let value = scores
        .iter()
        .find(|score| score.name == input.sub_score)?
        .value;

    Some(if input.inverted {
        spec.bounds.max - value
    } else {
        value
    })
}

/// Walks the thresholds high to low; the first one the average reaches wins.
pub fn resolve_rank(thresholds: &[RankThreshold], average: i64) -> Rank {
    thresholds
        .iter()
        .find(|threshold| average >= threshold.min_average)
        .or_else(|| thresholds.last())
        .map(|threshold| threshold.rank)
        .unwrap_or(Rank::D)
}
