//! CLI command handler: layer config sources, run the pipeline, print the summary.

use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;

use crate::engine::arg_parser::Cli;
use crate::utils::custsift_toml::{apply_file_to_opts, load_custsift_toml, load_toml_file};
use crate::utils::{Colors, db_path_from_env, setup_logging};
use crate::{CustOpts, RunOutcome, RunReport, process_customers};

/// Build opts: defaults → env/.env store path → config file → CLI flags.
pub fn setup_opts(cli: &Cli) -> CustOpts {
    let mut opts = CustOpts::default();

    let input_dir = cli
        .input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    if let Some(p) = db_path_from_env(input_dir) {
        opts.db_path = Some(p);
    }

    let file = match &cli.config {
        Some(path) => load_toml_file(path),
        None => load_custsift_toml(Path::new(".")),
    };
    if let Some(ref f) = file {
        apply_file_to_opts(f, &mut opts);
    }

    if let Some(ref p) = cli.output_dir {
        opts.output_dir = p.clone();
    }
    if let Some(ref p) = cli.db {
        opts.db_path = Some(p.clone());
    }
    if let Some(v) = cli.chunk_size {
        opts.chunk_size = v;
    }
    if let Some(v) = cli.workers {
        opts.workers = v;
    }
    if let Some(v) = cli.batch_size {
        opts.export_batch_size = v;
    }
    if let Some(v) = cli.no_db {
        opts.no_db = v;
    }
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
    opts
}

/// Run one pipeline pass from CLI args. Returns the outcome so `main` can pick the exit code.
pub fn handle_run(cli: &Cli) -> Result<RunOutcome> {
    let opts = setup_opts(cli);
    setup_logging(opts.verbose);
    if opts.no_db {
        info!("Store disabled (--no-db); only exporting files.");
    }
    debug!("Processing {}", cli.input.display());
    let report = process_customers(&cli.input, &opts)?;
    if cli.json {
        let s = serde_json::to_string_pretty(&report).context("serialize run report")?;
        println!("{s}");
    } else {
        print_summary(&report);
    }
    Ok(report.outcome())
}

/// Print run summary
fn print_summary(report: &RunReport) {
    info!(
        "{} | {} | {}",
        Colors::Valid.colorize(&format!("Valid: {}", report.valid)),
        Colors::Invalid.colorize(&format!("Invalid: {}", report.invalid)),
        Colors::Failed.colorize(&format!("Failed lines: {}", report.failed_lines))
    );
    if report.malformed > 0 {
        info!("Malformed lines: {}", report.malformed);
    }
    debug!(
        "Distinct phones: {}, distinct emails: {}",
        report.distinct_phones, report.distinct_emails
    );
    info!(
        "{} valid file(s), export took {} ms",
        report.valid_files.len(),
        report.export_elapsed.as_millis()
    );
}
