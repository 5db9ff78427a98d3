use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use td_core::{Candidate, CandidateStrategy, Error, PageFetcher, Result};
use url::Url;

use super::candidate_from;

const NEWS_URL: &str = "https://api.marketaux.com/v1/news/all";

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    data: Vec<NewsItem>,
}

#[derive(Debug, Deserialize)]
struct NewsItem {
    title: Option<String>,
    url: Option<String>,
    source: Option<String>,
}

/// Marketaux news API, used both for per-symbol search and general market news.
pub struct Marketaux {
    pages: Arc<dyn PageFetcher>,
    base_url: String,
    token: String,
    limit: usize,
}

impl Marketaux {
    pub fn new(pages: Arc<dyn PageFetcher>, token: impl Into<String>) -> Self {
        Self {
            pages,
            base_url: NEWS_URL.to_string(),
            token: token.into(),
            limit: 5,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    fn news_url(&self, search: Option<&str>) -> Result<String> {
        let limit = self.limit.to_string();
        let mut params = Vec::with_capacity(4);
        if let Some(term) = search {
            params.push(("search", term));
        }
        params.push(("countries", "us"));
        params.push(("limit", limit.as_str()));
        params.push(("api_token", self.token.as_str()));

        let url = Url::parse_with_params(&self.base_url, &params)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        Ok(url.to_string())
    }

    fn parse(body: &str) -> Result<Vec<Candidate>> {
        let response: NewsResponse = serde_json::from_str(body)?;
        Ok(response
            .data
            .into_iter()
            .filter_map(|n| candidate_from(n.title, n.url, n.source))
            .collect())
    }

    /// Latest US market news, not tied to any search term.
    pub async fn latest(&self) -> Result<Vec<Candidate>> {
        let url = self.news_url(None)?;
        let body = self.pages.get_text(&url).await?;
        Self::parse(&body)
    }
}

#[async_trait]
impl CandidateStrategy for Marketaux {
    fn name(&self) -> &str {
        "marketaux"
    }

    async fn query(&self, term: &str) -> Result<Vec<Candidate>> {
        let url = self.news_url(Some(term))?;
        let body = self.pages.get_text(&url).await?;
        Self::parse(&body)
    }
}
