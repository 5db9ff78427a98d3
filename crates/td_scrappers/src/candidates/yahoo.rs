use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use td_core::{Candidate, CandidateStrategy, Error, PageFetcher, Result};
use url::Url;

use super::candidate_from;

const SEARCH_URL: &str = "https://query1.finance.yahoo.com/v1/finance/search";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<SearchNews>,
}

#[derive(Debug, Deserialize)]
struct SearchNews {
    title: Option<String>,
    link: Option<String>,
    publisher: Option<String>,
}

/// Yahoo Finance search endpoint; returns the news block of a symbol search.
pub struct YahooSearch {
    pages: Arc<dyn PageFetcher>,
    base_url: String,
    news_count: usize,
}

impl YahooSearch {
    pub fn new(pages: Arc<dyn PageFetcher>) -> Self {
        Self {
            pages,
            base_url: SEARCH_URL.to_string(),
            news_count: 10,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn search_url(&self, term: &str) -> Result<String> {
        let news_count = self.news_count.to_string();
        let url = Url::parse_with_params(
            &self.base_url,
            &[("q", term), ("newsCount", news_count.as_str())],
        )
        .map_err(|e| Error::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        Ok(url.to_string())
    }

    fn parse(body: &str) -> Result<Vec<Candidate>> {
        let response: SearchResponse = serde_json::from_str(body)?;
        Ok(response
            .news
            .into_iter()
            .filter_map(|n| candidate_from(n.title, n.link, n.publisher))
            .collect())
    }
}

#[async_trait]
impl CandidateStrategy for YahooSearch {
    fn name(&self) -> &str {
        "yahoo-search"
    }

    async fn query(&self, term: &str) -> Result<Vec<Candidate>> {
        let url = self.search_url(term)?;
        let body = self.pages.get_text(&url).await?;
        Self::parse(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MemoryPageFetcher;

    #[test]
    fn test_search_url_encodes_term() {
        let search = YahooSearch::new(Arc::new(MemoryPageFetcher::new()));
        assert_eq!(
            search.search_url("Intuitive Machines").unwrap(),
            "https://query1.finance.yahoo.com/v1/finance/search?q=Intuitive+Machines&newsCount=10"
        );
    }

    #[test]
    fn test_parse_skips_incomplete_items() {
        let body = r#"{"quotes":[],"news":[
            {"title":"IonQ beats estimates","link":"https://finance.yahoo.com/a","publisher":"Reuters"},
            {"title":"No link here"},
            {"link":"https://finance.yahoo.com/b"},
            {"title":"Missing publisher","link":"https://finance.yahoo.com/c"}
        ]}"#;
        let candidates = YahooSearch::parse(body).unwrap();
        assert_eq!(
            candidates,
            vec![
                Candidate::new("IonQ beats estimates", "https://finance.yahoo.com/a", "Reuters"),
                Candidate::new("Missing publisher", "https://finance.yahoo.com/c", ""),
            ]
        );
    }

    #[test]
    fn test_parse_without_news_block() {
        assert!(YahooSearch::parse(r#"{"quotes":[]}"#).unwrap().is_empty());
        assert!(YahooSearch::parse("<html>rate limited</html>").is_err());
    }

    #[tokio::test]
    async fn test_query_uses_fetcher() {
        let pages = MemoryPageFetcher::new().with_page(
            "https://search.test/?q=IONQ&newsCount=10",
            r#"{"news":[{"title":"IonQ news","link":"https://x.test/1","publisher":"X"}]}"#,
        );
        let search = YahooSearch::new(Arc::new(pages)).with_base_url("https://search.test/");
        let candidates = search.query("IONQ").await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].publisher, "X");
    }
}
