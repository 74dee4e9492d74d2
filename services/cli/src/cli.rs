use crate::evaluate::{run_batch, run_evaluate, BatchArgs, EvaluateArgs};
use crate::variants::{run_export, run_list, ExportArgs};
use clap::{Parser, Subcommand};
use tooth_diagnosis::config::AppConfig;
use tooth_diagnosis::error::AppError;
use tooth_diagnosis::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "tooth-diagnosis",
    about = "Score tooth-tone impression diagnoses from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Diagnose a single submission
    Evaluate(EvaluateArgs),
    /// Diagnose every row of a CSV file, one JSON line per row
    Batch(BatchArgs),
    /// List the built-in variants with their tone codes and questions
    Variants,
    /// Print a variant as JSON so it can be edited and loaded via DIAGNOSIS_VARIANT_FILE
    ExportVariant(ExportArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Evaluate(args) => run_evaluate(args, &config),
        Command::Batch(args) => run_batch(args, &config),
        Command::Variants => run_list(),
        Command::ExportVariant(args) => run_export(args, &config),
    }
}
