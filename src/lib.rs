//! Custsift: chunked parallel validation and partitioning of customer record files

pub mod engine;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use anyhow::Context;
use log::debug;
use std::path::Path;

use crate::engine::db_ops::{CustomerStore, SqliteStore};

/// Result alias used by public custsift API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: process the customer file at `input` with `opts` and return the run report.
///
/// Blocks until the run completes. The store (SQLite at [`CustOpts::resolved_db_path`]) is opened
/// here unless `opts.no_db`; to use your own store, call
/// [`run_pipeline`](crate::pipeline::run_pipeline) with any [`CustomerStore`].
///
/// ```ignore
/// let opts = custsift::CustOpts { output_dir: "out".into(), ..Default::default() };
/// let report = custsift::process_customers(Path::new("customers.txt"), &opts)?;
/// assert_eq!(report.outcome(), custsift::RunOutcome::Complete);
/// ```
pub fn process_customers(input: &Path, opts: &CustOpts) -> Result<RunReport> {
    let config_str = format!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    debug!("{}", config_str);

    std::fs::create_dir_all(&opts.output_dir)
        .with_context(|| format!("create output dir {}", opts.output_dir.display()))?;

    let mut store = if opts.no_db {
        None
    } else {
        Some(SqliteStore::open(&opts.resolved_db_path())?)
    };
    pipeline::run_pipeline(
        input,
        opts,
        store.as_mut().map(|s| s as &mut dyn CustomerStore),
    )
}
