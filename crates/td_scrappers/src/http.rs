use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use td_core::{Error, PageFetcher, Result};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; TickerDigest/0.1)";

/// reqwest-backed page fetcher. Every request is bounded by the client timeout.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Scraping(format!("{} returned {}", url, status)));
        }
        Ok(response.text().await?)
    }
}

/// Serves pages from memory, keyed by exact URL. Unknown URLs are errors.
#[derive(Debug, Clone, Default)]
pub struct MemoryPageFetcher {
    pages: HashMap<String, String>,
}

impl MemoryPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, body: impl Into<String>) {
        self.pages.insert(url.into(), body.into());
    }
}

#[async_trait]
impl PageFetcher for MemoryPageFetcher {
    async fn get_text(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| Error::Scraping(format!("No page stored for {}", url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_fetcher() {
        let pages = MemoryPageFetcher::new().with_page("https://example.com/a", "<p>hi</p>");
        assert_eq!(pages.get_text("https://example.com/a").await.unwrap(), "<p>hi</p>");
        assert!(pages.get_text("https://example.com/b").await.is_err());
    }

    #[test]
    fn test_http_fetcher_builds() {
        assert!(HttpPageFetcher::new(Duration::from_secs(1)).is_ok());
    }
}
