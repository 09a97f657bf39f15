use crate::lyrics::SongLyrics;
use crate::normalize;
use anyhow::Result;
use lyricmood_model::naming::file_stem;
use std::fs;
use std::path::Path;

/// Archive fetched lyrics as one `{title}.txt` per song.
///
/// These files are for inspection only; nothing downstream reads them.
pub fn write_lyrics_archive(songs: &[SongLyrics], output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir)?;

    for song in songs {
        let text = normalize::normalize_text(&song.lyrics);
        let text = normalize::collapse_blank_lines(&text);
        let path = output_dir.join(format!("{}.txt", file_stem(&song.title)));
        fs::write(&path, &text)?;
        tracing::debug!(path = %path.display(), lines = text.lines().count(), "Wrote lyrics");
    }

    tracing::info!(path = %output_dir.display(), songs = songs.len(), "Archived raw lyrics");
    Ok(())
}
