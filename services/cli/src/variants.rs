use crate::infra::resolve_variant;
use clap::Args;
use tooth_diagnosis::config::AppConfig;
use tooth_diagnosis::diagnosis::presets;
use tooth_diagnosis::diagnosis::VariantConfig;
use tooth_diagnosis::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    /// Built-in variant to export (defaults to the configured one)
    #[arg(long)]
    pub(crate) variant: Option<String>,
}

pub(crate) fn run_list() -> Result<(), AppError> {
    for name in presets::names() {
        if let Some(config) = presets::by_name(name) {
            for line in describe(&config) {
                println!("{line}");
            }
            println!();
        }
    }
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs, config: &AppConfig) -> Result<(), AppError> {
    let variant = resolve_variant(config, args.variant.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&variant)?);
    Ok(())
}

fn describe(config: &VariantConfig) -> Vec<String> {
    let mut lines = vec![
        format!("{} - {}", config.name, config.description),
        format!(
            "  age range: {}..={}",
            config.age_range.min, config.age_range.max
        ),
        format!("  tones: {}", config.tone_codes().collect::<Vec<_>>().join(", ")),
    ];

    if config.questions.is_empty() {
        lines.push("  questions: none".to_string());
    } else {
        lines.push("  questions:".to_string());
        for question in &config.questions {
            lines.push(format!(
                "  - {} ({}; favorable {})",
                question.id, question.prompt, question.favorable
            ));
        }
    }

    let sub_scores: Vec<&str> = config
        .sub_scores
        .iter()
        .map(|spec| spec.name.as_str())
        .collect();
    lines.push(format!("  sub-scores: {}", sub_scores.join(", ")));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_tones_and_questions() {
        let lines = describe(&presets::standard());

        assert!(lines[0].starts_with("standard - "));
        assert!(lines.iter().any(|line| line.contains("1M-1, 1M-2")));
        assert!(lines
            .iter()
            .any(|line| line.contains("coffee") && line.contains("favorable いいえ")));
    }

    #[test]
    fn brand_variant_has_no_questions() {
        let lines = describe(&presets::brand());

        assert!(lines.contains(&"  questions: none".to_string()));
    }
}
