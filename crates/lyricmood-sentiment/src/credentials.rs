use crate::error::SentimentError;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const LANGUAGE_SCOPE: &str = "https://www.googleapis.com/auth/cloud-language";

/// Token lifetime requested in the assertion. Google caps it at one hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Contents of a credentials file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Credentials {
    /// A Google Cloud service-account key, as downloaded from the console.
    ServiceAccount(ServiceAccountKey),
    /// `{ "api_key": "..." }`
    ApiKey { api_key: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// JWT claims for the OAuth 2.0 JWT-bearer grant.
#[derive(Debug, Serialize)]
pub(crate) struct AssertionClaims<'a> {
    pub iss: &'a str,
    pub scope: &'a str,
    pub aud: &'a str,
    pub iat: i64,
    pub exp: i64,
}

impl Credentials {
    /// Load credentials from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, SentimentError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SentimentError::CredentialsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let credentials = Self::from_json(&contents).map_err(|reason| SentimentError::Credentials {
            path: path.to_path_buf(),
            reason,
        })?;

        match &credentials {
            Credentials::ServiceAccount(key) => tracing::info!(
                path = %path.display(),
                client_email = %key.client_email,
                project = key.project_id.as_deref().unwrap_or("-"),
                "Loaded service account credentials"
            ),
            Credentials::ApiKey { .. } => {
                tracing::info!(path = %path.display(), "Loaded API key credentials")
            }
        }
        Ok(credentials)
    }

    fn from_json(json: &str) -> Result<Self, String> {
        let credentials: Credentials = serde_json::from_str(json).map_err(|_| {
            "expected a service account key (client_email, private_key) or {\"api_key\": ...}"
                .to_string()
        })?;
        if let Credentials::ServiceAccount(key) = &credentials {
            if let Some(kind) = key.key_type.as_deref().filter(|k| *k != "service_account") {
                return Err(format!("unsupported credential type '{kind}'"));
            }
        }
        Ok(credentials)
    }
}

impl ServiceAccountKey {
    /// Build the signed assertion exchanged for an access token.
    pub fn signed_assertion(&self, now: i64) -> Result<String, SentimentError> {
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: LANGUAGE_SCOPE,
            aud: &self.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())?;
        Ok(jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)?)
    }
}
