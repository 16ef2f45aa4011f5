//! Load `.custsift.toml` from a directory (CLI only). Lib callers pass config via CustOpts.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::CustOpts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CustsiftToml {
    #[serde(default)]
    settings: RunSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RunSection {
    output_dir: Option<String>,
    db_path: Option<String>,
    chunk_size: Option<usize>,
    workers: Option<usize>,
    export_batch_size: Option<usize>,
    no_db: Option<bool>,
    verbose: Option<bool>,
}

/// Load `.custsift.toml` from `dir` if present. Returns None if file missing or unparsable. CLI only.
pub(crate) fn load_custsift_toml(dir: &Path) -> Option<CustsiftToml> {
    load_toml_file(&dir.join(PackagePaths::get().config_filename()))
}

/// Load an explicit config file. Returns None if missing or unparsable (parse errors are warned).
pub(crate) fn load_toml_file(path: &Path) -> Option<CustsiftToml> {
    let s = std::fs::read_to_string(path).ok()?;
    parse_custsift_toml(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

pub(crate) fn parse_custsift_toml(s: &str) -> Result<CustsiftToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($idx:expr, $opts:expr, $idx_field:ident => $opts_field:ident) => {
        if let Some(v) = $idx.$idx_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only set fields present in the file). Call before applying CLI.
pub(crate) fn apply_file_to_opts(file: &CustsiftToml, opts: &mut CustOpts) {
    let idx = &file.settings;
    if let Some(ref p) = idx.output_dir {
        opts.output_dir = PathBuf::from(p);
    }
    if let Some(ref p) = idx.db_path {
        opts.db_path = Some(PathBuf::from(p));
    }
    apply_file_opt!(idx, opts, chunk_size => chunk_size);
    apply_file_opt!(idx, opts, workers => workers);
    apply_file_opt!(idx, opts, export_batch_size => export_batch_size);
    apply_file_opt!(idx, opts, no_db => no_db);
    apply_file_opt!(idx, opts, verbose => verbose);
}
