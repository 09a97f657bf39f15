//! The dataset file: the only artifact shared between acquisition and reporting.
//!
//! Written once by `acquire`, read by every reporter. It is a plain JSON
//! array of [`SentimentResult`] in pipeline order.

use crate::sentiment::SentimentResult;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Serialize results as a pretty-printed JSON array.
pub fn to_json(results: &[SentimentResult]) -> Result<String> {
    serde_json::to_string_pretty(results).context("Failed to serialize sentiment dataset")
}

/// Parse a JSON array of results, preserving order.
pub fn from_json(json: &str) -> Result<Vec<SentimentResult>> {
    serde_json::from_str(json).context("Failed to parse sentiment dataset")
}

/// Write the dataset file, creating parent directories as needed.
pub fn write_dataset(path: &Path, results: &[SentimentResult]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = to_json(results)?;
    fs::write(path, &json).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), songs = results.len(), "Wrote sentiment dataset");
    Ok(())
}

/// Read a dataset file written by [`write_dataset`].
pub fn read_dataset(path: &Path) -> Result<Vec<SentimentResult>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let results = from_json(&contents)?;
    tracing::info!(path = %path.display(), songs = results.len(), "Loaded sentiment dataset");
    Ok(results)
}
