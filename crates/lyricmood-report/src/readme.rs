use crate::charts::{chart_dir_name, HTML_FILE, PNG_FILE};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use lyricmood_model::SentimentResult;
use std::fmt::Write as _;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ReadmeOptions {
    /// Top-level heading.
    pub heading: String,
    /// Where the interactive charts are hosted.
    pub chart_base_url: String,
    /// Where the static chart images are hosted.
    pub image_base_url: String,
    pub generated_on: Option<NaiveDate>,
}

impl Default for ReadmeOptions {
    fn default() -> Self {
        Self {
            heading: "Song lyrics sentiment".to_string(),
            chart_base_url: "charts".to_string(),
            image_base_url: "charts".to_string(),
            generated_on: None,
        }
    }
}

/// Songs at the top and bottom of the score table.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking<'a> {
    pub highest: Vec<&'a SentimentResult>,
    pub lowest: Vec<&'a SentimentResult>,
}

/// Rank songs by overall score.
///
/// `lowest` is every song at the minimum score. `highest` is every song
/// whose score equals that of one of the two top-ranked songs, so ties are
/// never split. Both lists are ordered by score (best first for `highest`),
/// then by title.
pub fn rank(results: &[SentimentResult]) -> Ranking<'_> {
    let mut by_score: Vec<&SentimentResult> = results.iter().collect();
    by_score.sort_by(|a, b| score_key(b).total_cmp(&score_key(a)).then_with(|| a.title.cmp(&b.title)));

    let top_scores: Vec<f64> = by_score.iter().take(2).map(|s| score_key(s)).collect();
    let highest = by_score
        .iter()
        .copied()
        .filter(|s| top_scores.contains(&score_key(s)))
        .collect();

    let lowest = match by_score.last() {
        Some(min) => {
            let mut lowest: Vec<&SentimentResult> = by_score
                .iter()
                .copied()
                .filter(|s| score_key(s) == score_key(min))
                .collect();
            lowest.sort_by(|a, b| a.title.cmp(&b.title));
            lowest
        }
        None => Vec::new(),
    };

    Ranking { highest, lowest }
}

/// Score used for ordering and ties; `-0.0` folds into `0.0`.
fn score_key(song: &SentimentResult) -> f64 {
    song.score + 0.0
}

/// Percent-encode a single URL path segment.
fn encode_segment(segment: &str) -> String {
    let mut url = url::Url::parse("file:///").expect("valid base url");
    url.path_segments_mut()
        .expect("file urls have a path")
        .pop_if_empty()
        .push(segment);
    url.path().trim_start_matches('/').to_string()
}

fn chart_link(base: &str, title: &str, file: &str) -> String {
    format!(
        "{}/{}/{file}",
        base.trim_end_matches('/'),
        encode_segment(&chart_dir_name(title))
    )
}

pub fn render_readme(results: &[SentimentResult], options: &ReadmeOptions) -> String {
    let ranking = rank(results);
    let mut md = String::new();

    let _ = writeln!(md, "# {}\n", options.heading);
    let _ = writeln!(
        md,
        "Sentiment of each song's lyrics as scored by Google Cloud Natural Language. \
         Scores run from -1.0 (negative) to 1.0 (positive); magnitude is the overall \
         strength of emotion regardless of sign.\n"
    );

    let _ = writeln!(md, "## Songs with highest sentiment score\n");
    for song in &ranking.highest {
        let _ = writeln!(md, "- {} ({:.2})", song.title, song.score);
    }
    let _ = writeln!(md, "\n## Songs with lowest sentiment score\n");
    for song in &ranking.lowest {
        let _ = writeln!(md, "- {} ({:.2})", song.title, song.score);
    }

    let _ = writeln!(md, "\n## Charts\n");
    for song in results {
        let _ = writeln!(md, "### {}\n", song.title);
        let _ = writeln!(
            md,
            "[![{}]({})]({})\n",
            song.title,
            chart_link(&options.image_base_url, &song.title, PNG_FILE),
            chart_link(&options.chart_base_url, &song.title, HTML_FILE),
        );
    }

    if let Some(date) = options.generated_on {
        let _ = writeln!(md, "_Generated on {} by lyricmood._", date.format("%Y-%m-%d"));
    }
    md
}

pub fn write_readme(path: &Path, results: &[SentimentResult], options: &ReadmeOptions) -> Result<()> {
    let md = render_readme(results, options);
    std::fs::write(path, &md).with_context(|| format!("Failed to write {}", path.display()))?;

    let ranking = rank(results);
    tracing::info!(
        path = %path.display(),
        highest = ranking.highest.len(),
        lowest = ranking.lowest.len(),
        "Wrote README"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(title: &str, score: f64) -> SentimentResult {
        SentimentResult {
            title: title.to_string(),
            score,
            magnitude: score.abs(),
            lines: vec![],
        }
    }

    fn titles(list: &[&SentimentResult]) -> Vec<String> {
        list.iter().map(|s| s.title.clone()).collect()
    }

    #[test]
    fn test_rank_ties_at_top_and_bottom() {
        let results = vec![
            song("A", 0.8),
            song("B", 0.8),
            song("C", 0.5),
            song("D", -0.9),
            song("E", -0.9),
        ];
        let ranking = rank(&results);
        assert_eq!(titles(&ranking.lowest), vec!["D", "E"]);
        assert_eq!(titles(&ranking.highest), vec!["A", "B"]);
    }

    #[test]
    fn test_rank_two_distinct_top_scores() {
        let results = vec![
            song("Xanny", 0.3),
            song("Lovely", 0.9),
            song("Bellyache", -0.2),
            song("Ocean Eyes", 0.3),
            song("Copycat", 0.1),
        ];
        let ranking = rank(&results);
        // Second place is tied, so both songs at 0.3 are listed
        assert_eq!(titles(&ranking.highest), vec!["Lovely", "Ocean Eyes", "Xanny"]);
        assert_eq!(titles(&ranking.lowest), vec!["Bellyache"]);
    }

    #[test]
    fn test_rank_negative_zero_ties_with_zero() {
        let results = vec![song("A", 0.0), song("B", -0.0), song("C", 0.5)];
        let ranking = rank(&results);
        assert_eq!(titles(&ranking.highest), vec!["C", "A", "B"]);
        assert_eq!(titles(&ranking.lowest), vec!["A", "B"]);
    }

    #[test]
    fn test_rank_small_datasets() {
        let empty: Vec<SentimentResult> = vec![];
        assert!(rank(&empty).highest.is_empty());
        assert!(rank(&empty).lowest.is_empty());

        let one = vec![song("Hostage", -0.3)];
        let ranking = rank(&one);
        assert_eq!(titles(&ranking.highest), vec!["Hostage"]);
        assert_eq!(titles(&ranking.lowest), vec!["Hostage"]);
    }

    #[test]
    fn test_chart_link_encodes_title() {
        assert_eq!(
            chart_link("https://example.github.io/lyrics/charts/", "bad guy", HTML_FILE),
            "https://example.github.io/lyrics/charts/bad%20guy/chart.html"
        );
        assert_eq!(chart_link("charts", "Ocean Eyes", PNG_FILE), "charts/Ocean%20Eyes/chart.png");
    }

    #[test]
    fn test_render_readme() {
        let results = vec![song("bad guy", -0.123), song("Ocean Eyes", 0.456), song("idontwannabeyouanymore", 0.1)];
        let options = ReadmeOptions {
            heading: "Billie Eilish lyrics sentiment".into(),
            chart_base_url: "https://example.github.io/lyrics/charts".into(),
            image_base_url: "charts".into(),
            generated_on: NaiveDate::from_ymd_opt(2026, 10, 17),
        };
        let md = render_readme(&results, &options);

        assert!(md.starts_with("# Billie Eilish lyrics sentiment\n"));
        let highest = md.find("## Songs with highest sentiment score").unwrap();
        let lowest = md.find("## Songs with lowest sentiment score").unwrap();
        let charts = md.find("## Charts").unwrap();
        assert!(highest < lowest && lowest < charts);

        assert!(md[highest..lowest].contains("- Ocean Eyes (0.46)"));
        assert!(md[highest..lowest].contains("- idontwannabeyouanymore (0.10)"));
        assert!(md[lowest..charts].contains("- bad guy (-0.12)"));
        assert!(md.contains(
            "[![bad guy](charts/bad%20guy/chart.png)](https://example.github.io/lyrics/charts/bad%20guy/chart.html)"
        ));
        assert_eq!(md.matches("### ").count(), 3);
        assert!(md.contains("_Generated on 2026-10-17 by lyricmood._"));
    }

    #[test]
    fn test_write_readme() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        write_readme(&path, &[song("Bored", 0.0)], &ReadmeOptions::default()).unwrap();
        let md = std::fs::read_to_string(&path).unwrap();
        assert!(md.contains("- Bored (0.00)"));
    }
}
