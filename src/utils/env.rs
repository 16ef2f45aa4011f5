//! Store path lookup: env var → .env in dir.

use log::debug;
use std::path::{Path, PathBuf};

use crate::utils::config::PackagePaths;

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Read the store path override: process env (`CUSTSIFT_DB`) → `.env` in `dir`.
/// Returns None when neither sets a non-empty value. Does not modify the process environment.
pub fn db_path_from_env(dir: &Path) -> Option<PathBuf> {
    let key = PackagePaths::get().env_key_db();
    if let Some(s) = std::env::var(key).ok().as_deref().and_then(non_empty) {
        debug!("Store path from environment ({key})");
        return Some(PathBuf::from(s));
    }
    let env_path = dir.join(".env");
    if !env_path.is_file() {
        return None;
    }
    let iter = match dotenvy::from_path_iter(&env_path) {
        Ok(iter) => iter,
        Err(e) => {
            log::warn!("{}: {}", env_path.display(), e);
            return None;
        }
    };
    iter.filter_map(|item| item.ok())
        .find(|(k, _)| k == key)
        .and_then(|(_, v)| non_empty(&v))
        .map(|s| {
            debug!("Store path from {}", env_path.display());
            PathBuf::from(s)
        })
}
