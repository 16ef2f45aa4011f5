//! Application configuration constants.
//! Pipeline sizing, file names, and DB tuning in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    db_filename: String,
    config_filename: String,
    env_key_db: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                db_filename: format!(".{pkg}"),
                config_filename: format!(".{pkg}.toml"),
                env_key_db: format!("{}_DB", pkg.to_uppercase()),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Default SQLite store filename inside the output directory (e.g. `.custsift`).
    pub fn db_filename(&self) -> &str {
        &self.db_filename
    }

    /// Config file looked up in the working directory (e.g. `.custsift.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Env var that overrides the store path (e.g. `CUSTSIFT_DB`).
    pub fn env_key_db(&self) -> &str {
        &self.env_key_db
    }
}

// ---- Output files ----

/// Export file naming.
pub struct ExportFiles;

impl ExportFiles {
    pub const INVALID: &'static str = "invalid_customers.txt";

    /// `valid_customers_<index>.txt`, index is 1-based.
    pub fn valid(index: usize) -> String {
        format!("{}{index}{}", Self::VALID_PREFIX, Self::SUFFIX)
    }

    /// Inverse of [`ExportFiles::valid`]: the batch index of a valid export file name.
    pub fn valid_index(file_name: &str) -> Option<usize> {
        file_name
            .strip_prefix(Self::VALID_PREFIX)?
            .strip_suffix(Self::SUFFIX)?
            .parse()
            .ok()
    }

    const VALID_PREFIX: &'static str = "valid_customers_";
    const SUFFIX: &'static str = ".txt";
}

// ---- Pipeline sizing ----

/// Defaults for chunking, pool size and export batching.
pub struct PipelineDefaults;

impl PipelineDefaults {
    /// Lines per chunk task.
    pub const CHUNK_SIZE: usize = 100_000;
    /// Concurrent chunk tasks.
    pub const WORKERS: usize = 8;
    /// Max lines per `valid_customers_<N>.txt`.
    pub const EXPORT_BATCH_SIZE: usize = 100_000;
}

/// Fields per input line without and with the optional IP address.
pub const MIN_FIELDS: usize = 7;
pub const MAX_FIELDS: usize = 8;

// ---- Database ----

/// Batch size for DB insert chunks (balance transaction size vs progress granularity).
pub const DB_INSERT_BATCH_SIZE: usize = 1000;
