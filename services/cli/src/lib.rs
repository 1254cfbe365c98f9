mod cli;
mod demo;
mod infra;
mod replay;

use proficiency_report::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
