//! Custsift CLI: validate a customer file, persist, and export valid/invalid batches.

use anyhow::Result;
use clap::Parser;
use custsift::RunOutcome;
use custsift::engine::arg_parser::Cli;
use custsift::engine::handle_run;
use std::process::ExitCode;
use std::time::Instant;

fn main() -> Result<ExitCode> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    let outcome = handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(match outcome {
        RunOutcome::Complete => ExitCode::SUCCESS,
        RunOutcome::Partial => ExitCode::from(2),
    })
}
