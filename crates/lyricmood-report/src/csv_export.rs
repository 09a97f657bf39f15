use anyhow::{Context, Result};
use lyricmood_model::SentimentResult;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One CSV row. Field order is the column order.
#[derive(Debug, Serialize)]
struct Row<'a> {
    line: &'a str,
    score: f64,
    magnitude: f64,
}

/// Write every song as a block: the overall row (titled with the song
/// name), one row per sentence, then an empty separator row.
pub fn write_csv<W: Write>(writer: W, results: &[SentimentResult]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    for song in results {
        wtr.serialize(Row {
            line: &song.title,
            score: song.score,
            magnitude: song.magnitude,
        })?;
        for line in &song.lines {
            wtr.serialize(Row {
                line: &line.text,
                score: line.score,
                magnitude: line.magnitude,
            })?;
        }
        wtr.write_record(["", "", ""])?;
    }

    // Header normally comes from the first serialized row.
    if results.is_empty() {
        wtr.write_record(["line", "score", "magnitude"])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn export_csv(path: &Path, results: &[SentimentResult]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(file, results)?;

    let rows: usize = results.iter().map(|s| s.lines.len() + 2).sum();
    tracing::info!(path = %path.display(), songs = results.len(), rows, "Wrote CSV");
    Ok(())
}
