use anyhow::{Context, Result};

/// A fetched HTML page. Non-success statuses are returned, not raised,
/// so callers decide whether a miss is fatal.
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL after redirects.
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl Page {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Source of HTML pages.
///
/// The pipeline only ever fetches with GET, one page at a time.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    async fn get(&self, url: &str) -> Result<Page>;
}

/// reqwest-backed fetcher used by the CLI.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<Page> {
        tracing::debug!(url = %url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text().await.context("Failed to read response body")?;
        tracing::debug!(url = %final_url, status, bytes = body.len(), "Received page");

        Ok(Page {
            url: final_url,
            status,
            body,
        })
    }
}
