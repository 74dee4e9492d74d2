mod cli;
mod evaluate;
mod infra;
mod variants;

use tooth_diagnosis::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
