pub mod api;
pub mod client;
pub mod credentials;
pub mod error;

pub use api::{AnalyzeSentimentResponse, Document, Sentiment};
pub use client::{LanguageClient, DEFAULT_ENDPOINT};
pub use credentials::Credentials;
pub use error::SentimentError;

/// Something that scores a document's sentiment.
///
/// Implemented by [`LanguageClient`] for the real service.
#[allow(async_fn_in_trait)]
pub trait SentimentAnalyzer {
    async fn analyze(&self, text: &str) -> Result<AnalyzeSentimentResponse, SentimentError>;
}
