use serde::{Deserialize, Serialize};

/// Sentiment analysis result for one song.
///
/// `score` and `magnitude` describe the whole lyric document; `lines` holds
/// one entry per sentence in the order the analysis service segmented them.
/// This is the record persisted in the dataset file, so field order here is
/// the field order on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub title: String,
    pub score: f64,
    pub magnitude: f64,
    pub lines: Vec<LineSentiment>,
}

/// Sentiment of a single sentence of a song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSentiment {
    pub text: String,
    pub score: f64,
    pub magnitude: f64,
}

impl SentimentResult {
    /// Chart label for each line: `L1: first line`, `L2: ...`.
    pub fn line_labels(&self) -> Vec<String> {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| format!("L{}: {}", i + 1, line.text))
            .collect()
    }

    /// Most negative and most positive line, if the song has any lines.
    pub fn extremes(&self) -> Option<(&LineSentiment, &LineSentiment)> {
        let min = self
            .lines
            .iter()
            .min_by(|a, b| a.score.total_cmp(&b.score))?;
        let max = self
            .lines
            .iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))?;
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song() -> SentimentResult {
        SentimentResult {
            title: "Ocean Eyes".to_string(),
            score: 0.1,
            magnitude: 2.4,
            lines: vec![
                LineSentiment { text: "I've been watching you.".into(), score: 0.3, magnitude: 0.3 },
                LineSentiment { text: "No fair.".into(), score: -0.6, magnitude: 0.6 },
                LineSentiment { text: "Those ocean eyes.".into(), score: 0.8, magnitude: 0.8 },
            ],
        }
    }

    #[test]
    fn test_line_labels() {
        let labels = song().line_labels();
        assert_eq!(labels[0], "L1: I've been watching you.");
        assert_eq!(labels[2], "L3: Those ocean eyes.");
    }

    #[test]
    fn test_extremes() {
        let s = song();
        let (min, max) = s.extremes().unwrap();
        assert_eq!(min.text, "No fair.");
        assert_eq!(max.text, "Those ocean eyes.");

        let empty = SentimentResult { lines: vec![], ..song() };
        assert!(empty.extremes().is_none());
    }

    #[test]
    fn test_field_order_on_disk() {
        let json = serde_json::to_string(&song()).unwrap();
        let title = json.find("\"title\"").unwrap();
        let score = json.find("\"score\"").unwrap();
        let magnitude = json.find("\"magnitude\"").unwrap();
        let lines = json.find("\"lines\"").unwrap();
        assert!(title < score && score < magnitude && magnitude < lines);
        assert!(json.contains(r#"{"text":"No fair.","score":-0.6,"magnitude":0.6}"#));
    }
}
