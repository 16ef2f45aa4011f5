//! Public and internal types for the custsift API and pipeline.

use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// One parsed customer row. Field order matches the input schema.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub email: String,
    /// `None` when the line had only 7 fields once trailing empty fields are dropped.
    pub ip_address: Option<String>,
}

impl Customer {
    /// The eight output columns in input order. An absent IP is an empty token.
    pub fn fields(&self) -> [&str; 8] {
        [
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.zip_code.as_str(),
            self.phone.as_str(),
            self.email.as_str(),
            self.ip_address.as_deref().unwrap_or(""),
        ]
    }
}

/// A customer whose phone and email both passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidCustomer(pub Customer);

/// Why a record landed in the invalid partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// Line did not split into 7 or 8 fields.
    Malformed,
    Phone,
    Email,
    PhoneAndEmail,
}

impl InvalidReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidReason::Malformed => "malformed",
            InvalidReason::Phone => "phone",
            InvalidReason::Email => "email",
            InvalidReason::PhoneAndEmail => "phone_and_email",
        }
    }
}

/// A customer that failed validation. Keeps the original values for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidCustomer {
    pub customer: Customer,
    pub reason: InvalidReason,
    /// Input line as read, kept for [`InvalidReason::Malformed`] records whose fields don't fit the layout.
    pub raw_line: Option<String>,
}

impl InvalidCustomer {
    /// A well-formed record that failed validation.
    pub fn rejected(customer: Customer, reason: InvalidReason) -> Self {
        Self {
            customer,
            reason,
            raw_line: None,
        }
    }

    /// A line with the wrong field count.
    pub fn malformed(customer: Customer, line: &str) -> Self {
        Self {
            customer,
            reason: InvalidReason::Malformed,
            raw_line: Some(line.to_string()),
        }
    }
}

/// Output of one chunk. Built by exactly one worker, then handed to the aggregator.
#[derive(Debug, Default)]
pub struct PartitionedResult {
    pub valid: Vec<ValidCustomer>,
    pub invalid: Vec<InvalidCustomer>,
    /// Phones seen on valid records only.
    pub phones: HashSet<String>,
    /// Emails seen on valid records only.
    pub emails: HashSet<String>,
}

/// A chunk whose task did not produce a result (panicked or dropped its handle).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChunkFailure {
    /// 0-based submission index.
    pub index: usize,
    /// 1-based input line number of the chunk's first line.
    pub first_line: usize,
    pub line_count: usize,
    pub message: String,
}

/// All chunk results of one run, merged in submission order.
///
/// The phone/email sets are observations only: duplicate valid customers are kept.
#[derive(Debug, Default)]
pub struct CombinedResult {
    pub valid: Vec<ValidCustomer>,
    pub invalid: Vec<InvalidCustomer>,
    pub phones: HashSet<String>,
    pub emails: HashSet<String>,
    pub failures: Vec<ChunkFailure>,
}

impl CombinedResult {
    pub fn record_count(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    pub fn malformed_count(&self) -> usize {
        self.invalid
            .iter()
            .filter(|c| c.reason == InvalidReason::Malformed)
            .count()
    }

    pub fn failed_line_count(&self) -> usize {
        self.failures.iter().map(|f| f.line_count).sum()
    }
}

/// How a run ended when it returned a report. Hard failures are the `Err` side of the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Complete,
    /// At least one chunk failed; its lines are missing from every output.
    Partial,
}

/// Summary returned to the caller of [`process_customers`](crate::process_customers).
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub lines_read: usize,
    pub chunks: usize,
    pub valid: usize,
    pub invalid: usize,
    pub malformed: usize,
    pub failed_lines: usize,
    pub distinct_phones: usize,
    pub distinct_emails: usize,
    pub failed_chunks: Vec<ChunkFailure>,
    pub persisted: bool,
    pub valid_files: Vec<PathBuf>,
    pub invalid_file: Option<PathBuf>,
    #[serde(with = "duration_ms")]
    pub elapsed: Duration,
    #[serde(with = "duration_ms")]
    pub export_elapsed: Duration,
}

impl RunReport {
    pub fn outcome(&self) -> RunOutcome {
        if self.failed_chunks.is_empty() {
            RunOutcome::Complete
        } else {
            RunOutcome::Partial
        }
    }
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u128(d.as_millis())
    }
}

/// Lib options for [`process_customers`](crate::process_customers).
#[derive(Clone, Debug)]
pub struct CustOpts {
    /// Directory that receives `valid_customers_<N>.txt` and `invalid_customers.txt`. Created if missing.
    pub output_dir: PathBuf,
    /// SQLite store path. When None, uses `output_dir.join(<package db filename>)`.
    pub db_path: Option<PathBuf>,
    /// Lines per chunk handed to one worker task.
    pub chunk_size: usize,
    /// Worker pool size (max concurrent chunk tasks).
    pub workers: usize,
    /// Max lines per valid export file.
    pub export_batch_size: usize,
    /// Skip the SQLite store entirely.
    pub no_db: bool,
    /// Show a chunk progress bar.
    pub verbose: bool,
}

impl Default for CustOpts {
    fn default() -> Self {
        use crate::utils::config::PipelineDefaults;
        Self {
            output_dir: PathBuf::from("."),
            db_path: None,
            chunk_size: PipelineDefaults::CHUNK_SIZE,
            workers: PipelineDefaults::WORKERS,
            export_batch_size: PipelineDefaults::EXPORT_BATCH_SIZE,
            no_db: false,
            verbose: false,
        }
    }
}

impl CustOpts {
    /// Resolved store path (explicit or default inside the output dir).
    pub fn resolved_db_path(&self) -> PathBuf {
        use crate::utils::config::PackagePaths;
        self.db_path
            .clone()
            .unwrap_or_else(|| self.output_dir.join(PackagePaths::get().db_filename()))
    }
}
