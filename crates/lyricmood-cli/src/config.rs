use anyhow::{Context, Result};
use lyricmood_acquire::lyrics::DEFAULT_URL_TEMPLATE;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Config file read when `--config` is not given. Optional.
pub const DEFAULT_CONFIG_FILE: &str = "lyricmood.toml";

/// Settings loaded from TOML. Every field has a default, so an empty or
/// missing file is a valid configuration. Command-line flags override
/// these values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Wikipedia category name or full listing URL.
    pub category: String,
    /// Lyrics page URL with a `{slug}` placeholder.
    pub lyrics_url_template: String,
    /// Service account key or API key file for the sentiment service.
    pub credentials: Option<PathBuf>,
    /// Document language sent to the sentiment service.
    pub language: String,
    pub user_agent: String,
    /// Alternative analyzeSentiment endpoint (regional or test server).
    pub sentiment_endpoint: Option<String>,
    pub output: OutputConfig,
    pub readme: ReadmeConfig,
    /// Extra slug overrides: title marker → slug fragment.
    pub slug_overrides: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dataset: PathBuf,
    pub csv: PathBuf,
    pub charts_dir: PathBuf,
    pub readme: PathBuf,
    /// Where to archive fetched lyrics; not written when unset.
    pub lyrics_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReadmeConfig {
    pub heading: String,
    pub chart_base_url: String,
    pub image_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            category: "Billie_Eilish_songs".to_string(),
            lyrics_url_template: DEFAULT_URL_TEMPLATE.to_string(),
            credentials: None,
            language: "en".to_string(),
            user_agent: concat!("lyricmood/", env!("CARGO_PKG_VERSION"), " (lyrics sentiment tool)")
                .to_string(),
            sentiment_endpoint: None,
            output: OutputConfig::default(),
            readme: ReadmeConfig::default(),
            slug_overrides: BTreeMap::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("songs_sentiment.json"),
            csv: PathBuf::from("songs_sentiment_scores.csv"),
            charts_dir: PathBuf::from("charts"),
            readme: PathBuf::from("README.md"),
            lyrics_dir: None,
        }
    }
}

impl Default for ReadmeConfig {
    fn default() -> Self {
        Self {
            heading: "Billie Eilish song lyrics sentiment".to_string(),
            chart_base_url: "charts".to_string(),
            image_base_url: "charts".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `lyricmood.toml` in the
    /// working directory is used if present, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    tracing::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Credentials path, or an error explaining how to provide one.
    pub fn credentials_path(&self) -> Result<&Path> {
        self.credentials.as_deref().context(
            "No sentiment service credentials configured; pass --credentials, \
             set LYRICMOOD_CREDENTIALS, or set `credentials` in the config file",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.category, "Billie_Eilish_songs");
        assert_eq!(config.lyrics_url_template, DEFAULT_URL_TEMPLATE);
        assert_eq!(config.language, "en");
        assert_eq!(config.output.charts_dir, PathBuf::from("charts"));
        assert!(config.slug_overrides.is_empty());
        assert!(config.credentials_path().is_err());
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
            category = "Category:Khalid songs"
            lyrics_url_template = "https://genius.com/Khalid-{slug}-lyrics"
            credentials = "./service_account_viewer.json"
            sentiment_endpoint = "http://localhost:8080/v1/documents:analyzeSentiment"

            [output]
            dataset = "out/khalid.json"
            lyrics_dir = "out/lyrics"

            [readme]
            chart_base_url = "https://example.github.io/khalid/charts"

            [slug_overrides]
            "Love Lies" = "and-normani-love-lies"
        "#;
        let config = AppConfig::from_toml(toml).unwrap();
        assert_eq!(config.category, "Category:Khalid songs");
        assert_eq!(config.credentials_path().unwrap(), Path::new("./service_account_viewer.json"));
        assert_eq!(config.output.dataset, PathBuf::from("out/khalid.json"));
        assert_eq!(config.output.csv, PathBuf::from("songs_sentiment_scores.csv"));
        assert_eq!(config.output.lyrics_dir, Some(PathBuf::from("out/lyrics")));
        assert_eq!(config.readme.chart_base_url, "https://example.github.io/khalid/charts");
        assert_eq!(config.readme.image_base_url, "charts");
        assert_eq!(config.slug_overrides["Love Lies"], "and-normani-love-lies");
    }

    #[test]
    fn test_unknown_types_rejected() {
        assert!(AppConfig::from_toml("language = 5").is_err());
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        assert!(AppConfig::load(Some(Path::new("/nonexistent/lyricmood.toml"))).is_err());
    }
}
