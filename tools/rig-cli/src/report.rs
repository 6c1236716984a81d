//! Force log summaries.

use std::path::Path;

use anyhow::{Context, Result};
use dataset_io::{ForceLog, ForceSummary};

/// Reads a force log and summarizes it.
///
/// # Errors
///
/// Fails if the log cannot be read, lacks `time` or `f_z`, or is empty.
pub fn summarize(path: &Path, threshold: f64) -> Result<ForceSummary> {
    let log = ForceLog::read(path)
        .with_context(|| format!("failed to load force log '{}'", path.display()))?;
    Ok(log.summary(threshold)?)
}

/// Prints a summary of `path` to stdout.
///
/// # Errors
///
/// See [`summarize`].
pub fn run(path: &Path, threshold: f64) -> Result<()> {
    let summary = summarize(path, threshold)?;
    println!("force log: {}", path.display());
    println!("{summary}");
    Ok(())
}
