use crate::infra::{load_engine, parse_answer_pair, OutputFormat};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tooth_diagnosis::config::AppConfig;
use tooth_diagnosis::diagnosis::batch::{parse_submissions_from_path, BatchRow};
use tooth_diagnosis::diagnosis::report::DiagnosisReport;
use tooth_diagnosis::diagnosis::{Answer, ScoringEngine, SubmissionInput};
use tooth_diagnosis::error::AppError;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Tone code from the variant's tone table (e.g. 3M-1 or A2)
    #[arg(long)]
    pub(crate) tone: String,
    /// Real age in years
    #[arg(long)]
    pub(crate) age: u32,
    /// Lifestyle answer as QUESTION=ANSWER; repeat for every question
    #[arg(long = "answer", value_parser = parse_answer_pair)]
    pub(crate) answers: Vec<(String, Answer)>,
    /// Built-in variant to use instead of the configured one
    #[arg(long)]
    pub(crate) variant: Option<String>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV with a header of tone,age followed by question ids
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Built-in variant to use instead of the configured one
    #[arg(long)]
    pub(crate) variant: Option<String>,
}

pub(crate) fn run_evaluate(args: EvaluateArgs, config: &AppConfig) -> Result<(), AppError> {
    let EvaluateArgs {
        tone,
        age,
        answers,
        variant,
        format,
    } = args;

    let engine = load_engine(config, variant.as_deref())?;
    let input = SubmissionInput::from_answers(tone, age, answers)?;

    let result = engine.evaluate(&input)?;
    let report = DiagnosisReport::compose(result, engine.config());

    match format {
        OutputFormat::Text => {
            for line in report.render_lines() {
                println!("{line}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

/// Per-row outcome written as one JSON line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub(crate) enum BatchLine {
    Diagnosed {
        line: u64,
        report: Box<DiagnosisReport>,
    },
    Rejected {
        line: u64,
        error: String,
    },
}

pub(crate) fn diagnose_rows(engine: &ScoringEngine, rows: Vec<BatchRow>) -> Vec<BatchLine> {
    rows.into_iter()
        .map(|row| {
            let outcome = row
                .submission
                .and_then(|input| engine.evaluate(&input).map_err(|err| err.to_string()));

            match outcome {
                Ok(result) => BatchLine::Diagnosed {
                    line: row.line,
                    report: Box::new(DiagnosisReport::compose(result, engine.config())),
                },
                Err(error) => {
                    warn!(line = row.line, %error, "skipping submission");
                    BatchLine::Rejected {
                        line: row.line,
                        error,
                    }
                }
            }
        })
        .collect()
}

pub(crate) fn run_batch(args: BatchArgs, config: &AppConfig) -> Result<(), AppError> {
    let engine = load_engine(config, args.variant.as_deref())?;
    let rows = parse_submissions_from_path(&args.input)?;

    let lines = diagnose_rows(&engine, rows);
    let diagnosed = lines
        .iter()
        .filter(|line| matches!(line, BatchLine::Diagnosed { .. }))
        .count();

    for line in &lines {
        println!("{}", serde_json::to_string(line)?);
    }

    info!(
        input = %args.input.display(),
        diagnosed,
        rejected = lines.len() - diagnosed,
        "batch complete"
    );
    Ok(())
}
