//! Pipeline stages wired together: harvest → fetch → normalize → analyze
//! for acquisition, then dataset → reports.

use anyhow::{Context, Result};
use lyricmood_acquire::{harvest, lyrics, normalize, output, PageFetcher, SlugOverrides, SongLyrics};
use lyricmood_model::SentimentResult;
use lyricmood_report::{charts, csv_export, readme, ChartOptions, ReadmeOptions};
use lyricmood_sentiment::SentimentAnalyzer;
use std::path::{Path, PathBuf};

/// Inputs to the acquisition half of the pipeline.
#[derive(Debug, Clone)]
pub struct AcquirePlan {
    pub category_url: String,
    pub url_template: String,
    pub overrides: SlugOverrides,
    pub lyrics_dir: Option<PathBuf>,
}

/// Harvest titles, fetch their lyrics, and score each song.
///
/// Songs whose lyrics page can't be fetched are left out. Any other
/// failure, including a sentiment service error, ends the run.
pub async fn acquire<F, A>(fetcher: &F, analyzer: &A, plan: &AcquirePlan) -> Result<Vec<SentimentResult>>
where
    F: PageFetcher,
    A: SentimentAnalyzer,
{
    let titles = harvest::harvest_titles(fetcher, &plan.category_url).await?;
    let songs = lyrics::fetch_all(fetcher, &plan.url_template, &plan.overrides, &titles).await?;

    if let Some(dir) = &plan.lyrics_dir {
        output::write_lyrics_archive(&songs, dir)?;
    }

    analyze_all(analyzer, &songs).await
}

/// Normalize and score every song, in order.
pub async fn analyze_all<A: SentimentAnalyzer>(
    analyzer: &A,
    songs: &[SongLyrics],
) -> Result<Vec<SentimentResult>> {
    let mut results = Vec::with_capacity(songs.len());

    for song in songs {
        let text = normalize::normalize_lyrics(&song.lyrics);
        let response = analyzer
            .analyze(&text)
            .await
            .with_context(|| format!("Sentiment analysis failed for \"{}\"", song.title))?;
        let result = response.into_result(&song.title);

        tracing::info!(
            title = %result.title,
            score = result.score,
            magnitude = result.magnitude,
            sentences = result.lines.len(),
            "Analyzed"
        );
        if let Some((low, high)) = result.extremes() {
            tracing::debug!(low = %low.text, low_score = low.score, high = %high.text, high_score = high.score, "Extremes");
        }
        results.push(result);
    }

    Ok(results)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportKind {
    Csv,
    Charts,
    Readme,
}

/// Output locations and options for the reporters.
#[derive(Debug, Clone)]
pub struct ReportPlan {
    pub csv: PathBuf,
    pub charts_dir: PathBuf,
    pub readme: PathBuf,
    pub chart_options: ChartOptions,
    pub readme_options: ReadmeOptions,
}

/// Run the selected reporters (all of them when `only` is `None`).
pub fn report(results: &[SentimentResult], plan: &ReportPlan, only: Option<ReportKind>) -> Result<()> {
    let wants = |kind: ReportKind| only.map_or(true, |k| k == kind);

    if wants(ReportKind::Csv) {
        csv_export::export_csv(&plan.csv, results)?;
    }
    if wants(ReportKind::Charts) {
        charts::write_charts(results, &plan.charts_dir, &plan.chart_options)?;
    }
    if wants(ReportKind::Readme) {
        readme::write_readme(&plan.readme, results, &plan.readme_options)?;
    }
    Ok(())
}

/// Read the dataset and run the reporters over it.
pub fn report_from_dataset(dataset: &Path, plan: &ReportPlan, only: Option<ReportKind>) -> Result<()> {
    let results = lyricmood_model::store::read_dataset(dataset)?;
    report(&results, plan, only)
}
