use clap::ValueEnum;
use tooth_diagnosis::config::{AppConfig, VariantSource};
use tooth_diagnosis::diagnosis::{Answer, ScoringEngine, VariantConfig};
use tooth_diagnosis::error::AppError;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Picks the variant: a `--variant` flag replaces the configured preset and ignores any
/// configured variant file.
pub(crate) fn resolve_variant(
    config: &AppConfig,
    preset: Option<&str>,
) -> Result<VariantConfig, AppError> {
    let variant = match preset {
        Some(name) => VariantSource {
            preset: name.to_string(),
            file: None,
        }
        .resolve()?,
        None => config.variant()?,
    };
    Ok(variant)
}

pub(crate) fn load_engine(
    config: &AppConfig,
    preset: Option<&str>,
) -> Result<ScoringEngine, AppError> {
    let variant = resolve_variant(config, preset)?;
    let engine = ScoringEngine::new(variant)?;
    info!(
        variant = %engine.config().name,
        environment = ?config.environment,
        tones = engine.config().tones.len(),
        "scoring engine ready"
    );
    Ok(engine)
}

/// Parses `question=answer` pairs such as `coffee=いいえ` or `smoking=no`.
pub(crate) fn parse_answer_pair(raw: &str) -> Result<(String, Answer), String> {
    let (question, answer) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected QUESTION=ANSWER, got '{raw}'"))?;
    let question = question.trim();
    if question.is_empty() {
        return Err(format!("missing question id in '{raw}'"));
    }
    let answer = Answer::parse(answer)
        .ok_or_else(|| format!("answer in '{raw}' must be はい/いいえ (or yes/no)"))?;
    Ok((question.to_string(), answer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_literal_and_english_answers() {
        assert_eq!(
            parse_answer_pair("coffee=いいえ"),
            Ok(("coffee".to_string(), Answer::No))
        );
        assert_eq!(
            parse_answer_pair(" smoking = Yes "),
            Ok(("smoking".to_string(), Answer::Yes))
        );
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert!(parse_answer_pair("coffee").is_err());
        assert!(parse_answer_pair("=yes").is_err());
        assert!(parse_answer_pair("coffee=sometimes").is_err());
    }
}
