//! Wire types for `documents:analyzeSentiment`.
//!
//! The service speaks proto3 JSON: camelCase keys, and zero values are
//! omitted, so every numeric field defaults to 0.

use lyricmood_model::{LineSentiment, SentimentResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeSentimentRequest {
    pub document: Document,
    pub encoding_type: EncodingType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub content: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub language: String,
}

impl Document {
    pub fn plain_text(content: &str, language: &str) -> Self {
        Self {
            content: content.to_string(),
            doc_type: DocumentType::PlainText,
            language: language.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    PlainText,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EncodingType {
    Utf8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeSentimentResponse {
    #[serde(default)]
    pub document_sentiment: Sentiment,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub sentences: Vec<Sentence>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub magnitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub text: TextSpan,
    #[serde(default)]
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpan {
    pub content: String,
    #[serde(default)]
    pub begin_offset: i64,
}

impl AnalyzeSentimentResponse {
    /// Convert into the stored record, keeping sentence order.
    pub fn into_result(self, title: &str) -> SentimentResult {
        SentimentResult {
            title: title.to_string(),
            score: self.document_sentiment.score,
            magnitude: self.document_sentiment.magnitude,
            lines: self
                .sentences
                .into_iter()
                .map(|s| LineSentiment {
                    text: s.text.content,
                    score: s.sentiment.score,
                    magnitude: s.sentiment.magnitude,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = AnalyzeSentimentRequest {
            document: Document::plain_text("I'm the bad guy.", "en"),
            encoding_type: EncodingType::Utf8,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "document": { "content": "I'm the bad guy.", "type": "PLAIN_TEXT", "language": "en" },
                "encodingType": "UTF8"
            })
        );
    }

    #[test]
    fn test_parse_response_with_omitted_zeros() {
        let json = r#"{
            "documentSentiment": { "magnitude": 1.3, "score": -0.1 },
            "language": "en",
            "sentences": [
                { "text": { "content": "White shirt now red, my bloody nose.", "beginOffset": 0 },
                  "sentiment": { "magnitude": 0.6, "score": -0.6 } },
                { "text": { "content": "Duh.", "beginOffset": 37 },
                  "sentiment": {} }
            ]
        }"#;
        let response: AnalyzeSentimentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.document_sentiment.score, -0.1);
        assert_eq!(response.sentences[1].sentiment, Sentiment::default());

        let result = response.into_result("bad guy");
        assert_eq!(result.title, "bad guy");
        assert_eq!(result.magnitude, 1.3);
        assert_eq!(result.lines.len(), 2);
        assert_eq!(result.lines[0].text, "White shirt now red, my bloody nose.");
        assert_eq!(result.lines[0].score, -0.6);
        assert_eq!(result.lines[1].text, "Duh.");
        assert_eq!(result.lines[1].magnitude, 0.0);
    }

    #[test]
    fn test_parse_empty_response() {
        let response: AnalyzeSentimentResponse = serde_json::from_str("{}").unwrap();
        let result = response.into_result("Silence");
        assert_eq!(result.score, 0.0);
        assert!(result.lines.is_empty());
    }
}
