use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("failed to read credentials file {path}: {source}")]
    CredentialsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid credentials file {path}: {reason}")]
    Credentials { path: PathBuf, reason: String },

    #[error("failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("access token exchange failed: {0}")]
    Token(String),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
