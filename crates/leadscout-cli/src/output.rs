//! Result files written at the end of a scrape.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use leadscout_core::Lead;

pub(crate) const LATEST_FILE_NAME: &str = "latest_results.json";

/// `leads_<UTC timestamp>.json`, sortable by name.
pub(crate) fn timestamped_file_name(at: DateTime<Utc>) -> String {
    format!("leads_{}.json", at.format("%Y%m%d_%H%M%S"))
}

/// Writes `leads` as pretty JSON to a timestamped file and to
/// [`LATEST_FILE_NAME`] under `dir`, creating `dir` if needed. Returns the
/// timestamped path.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file cannot be
/// written.
pub(crate) fn save_results(dir: &Path, leads: &[Lead], at: DateTime<Utc>) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output dir {}", dir.display()))?;

    let body = serde_json::to_string_pretty(leads)?;
    let path = dir.join(timestamped_file_name(at));
    std::fs::write(&path, &body).with_context(|| format!("failed to write {}", path.display()))?;

    let latest = dir.join(LATEST_FILE_NAME);
    std::fs::write(&latest, &body)
        .with_context(|| format!("failed to write {}", latest.display()))?;

    Ok(path)
}
