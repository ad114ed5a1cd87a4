//! Workflow file discovery.

use crate::error::DiscoveryError;
use glob::{glob, Pattern};
use std::path::{Path, PathBuf};

/// List `*.json` files directly under `dir`, sorted, skipping any whose name
/// ends with `backup_suffix`.
///
/// A missing directory or an empty match set is reported as an error so the
/// caller can abort the run with a reason.
pub fn discover_files(dir: &Path, backup_suffix: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !dir.is_dir() {
        return Err(DiscoveryError::MissingDirectory(dir.to_path_buf()));
    }
    let base = Pattern::escape(&dir.to_string_lossy());
    let pattern = format!("{}/*.json", base.trim_end_matches('/'));
    let mut files: Vec<PathBuf> = glob(&pattern)?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .filter(|p| !is_backup(p, backup_suffix))
        .collect();
    if files.is_empty() {
        return Err(DiscoveryError::Empty(dir.to_path_buf()));
    }
    files.sort();
    Ok(files)
}

fn is_backup(path: &Path, suffix: &str) -> bool {
    if suffix.is_empty() {
        return false;
    }
    path.file_name()
        .map(|n| n.to_string_lossy().ends_with(suffix))
        .unwrap_or(false)
}
