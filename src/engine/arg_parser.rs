use clap::Parser;
use std::path::PathBuf;

/// Chunked parallel customer-record validator.
#[derive(Clone, Parser)]
#[command(name = "custsift")]
#[command(
    about = "Validate a customer file in parallel chunks; persist to SQLite and export valid/invalid files."
)]
pub struct Cli {
    /// Input file: one comma-delimited customer per line (7 or 8 fields).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory for valid_customers_<N>.txt and invalid_customers.txt. Default: current directory.
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// SQLite store path. Default: `.custsift` in the output directory (or CUSTSIFT_DB / .env).
    #[arg(long, short)]
    pub db: Option<PathBuf>,

    /// Config file. Default: `.custsift.toml` in the current directory, if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Lines per chunk task.
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub chunk_size: Option<usize>,

    /// Worker threads (max concurrent chunk tasks).
    #[arg(long, short = 'w', value_parser = clap::value_parser!(usize))]
    pub workers: Option<usize>,

    /// Max lines per valid export file.
    #[arg(long, short = 'b', value_parser = clap::value_parser!(usize))]
    pub batch_size: Option<usize>,

    /// Skip the SQLite store; only export files.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub no_db: Option<bool>,

    /// Verbose output (debug logging and a chunk progress bar).
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Print the run report as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}
