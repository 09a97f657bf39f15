use crate::api::{AnalyzeSentimentRequest, AnalyzeSentimentResponse, Document, EncodingType};
use crate::credentials::{Credentials, ServiceAccountKey};
use crate::error::SentimentError;
use crate::SentimentAnalyzer;
use serde::Deserialize;
use std::cell::RefCell;
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "https://language.googleapis.com/v1/documents:analyzeSentiment";

/// Refresh this many seconds before the token actually expires.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Client for the Cloud Natural Language `analyzeSentiment` method.
pub struct LanguageClient {
    http: reqwest::Client,
    auth: Auth,
    endpoint: String,
    language: String,
}

enum Auth {
    ApiKey(String),
    ServiceAccount {
        key: ServiceAccountKey,
        token: RefCell<Option<AccessToken>>,
    },
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

impl LanguageClient {
    pub fn new(credentials: Credentials, language: &str) -> Result<Self, SentimentError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("lyricmood/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| SentimentError::Http {
                url: DEFAULT_ENDPOINT.to_string(),
                source,
            })?;

        let auth = match credentials {
            Credentials::ApiKey { api_key } => Auth::ApiKey(api_key),
            Credentials::ServiceAccount(key) => Auth::ServiceAccount {
                key,
                token: RefCell::new(None),
            },
        };

        Ok(Self {
            http,
            auth,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language: language.to_string(),
        })
    }

    /// Load credentials from `path` and build a client.
    pub fn from_credentials_file(path: &Path, language: &str) -> Result<Self, SentimentError> {
        Self::new(Credentials::from_file(path)?, language)
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    fn request_body(&self, text: &str) -> AnalyzeSentimentRequest {
        AnalyzeSentimentRequest {
            document: Document::plain_text(text, &self.language),
            encoding_type: EncodingType::Utf8,
        }
    }

    /// Current bearer token, exchanging a fresh assertion when needed.
    async fn bearer_token(
        &self,
        key: &ServiceAccountKey,
        cache: &RefCell<Option<AccessToken>>,
    ) -> Result<String, SentimentError> {
        let now = chrono::Utc::now().timestamp();
        let cached = cache
            .borrow()
            .as_ref()
            .filter(|t| t.expires_at - EXPIRY_MARGIN_SECS > now)
            .map(|t| t.value.clone());
        if let Some(token) = cached {
            return Ok(token);
        }

        tracing::debug!(token_uri = %key.token_uri, "Requesting access token");
        let assertion = key.signed_assertion(now)?;
        let response = self
            .http
            .post(&key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|source| SentimentError::Http {
                url: key.token_uri.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SentimentError::Token(format!("HTTP {status}: {body}")));
        }
        let token: TokenResponse = response.json().await.map_err(|source| SentimentError::Decode {
            url: key.token_uri.clone(),
            source,
        })?;

        tracing::info!(expires_in = token.expires_in, "Obtained access token");
        *cache.borrow_mut() = Some(AccessToken {
            value: token.access_token.clone(),
            expires_at: now + token.expires_in,
        });
        Ok(token.access_token)
    }
}

impl SentimentAnalyzer for LanguageClient {
    async fn analyze(&self, text: &str) -> Result<AnalyzeSentimentResponse, SentimentError> {
        let request = self.http.post(&self.endpoint).json(&self.request_body(text));
        let request = match &self.auth {
            Auth::ApiKey(key) => request.query(&[("key", key)]),
            Auth::ServiceAccount { key, token } => {
                request.bearer_auth(self.bearer_token(key, token).await?)
            }
        };

        tracing::debug!(chars = text.chars().count(), language = %self.language, "Requesting sentiment analysis");
        let response = request.send().await.map_err(|source| SentimentError::Http {
            url: self.endpoint.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SentimentError::Status {
                url: self.endpoint.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let analysis: AnalyzeSentimentResponse =
            response.json().await.map_err(|source| SentimentError::Decode {
                url: self.endpoint.clone(),
                source,
            })?;
        tracing::debug!(
            score = analysis.document_sentiment.score,
            magnitude = analysis.document_sentiment.magnitude,
            sentences = analysis.sentences.len(),
            "Received sentiment analysis"
        );
        Ok(analysis)
    }
}
