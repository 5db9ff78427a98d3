use std::sync::Arc;

use scraper::Html;
use td_core::{Article, Candidate, PageFetcher};
use tracing::{debug, warn};

use super::extract::{default_strategies, ExtractionStrategy};
use super::timestamp;

/// Downloads candidate pages and extracts body text plus publication time.
pub struct ArticleFetcher {
    pages: Arc<dyn PageFetcher>,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl ArticleFetcher {
    pub fn new(pages: Arc<dyn PageFetcher>) -> Self {
        Self::with_strategies(pages, default_strategies())
    }

    pub fn with_strategies(pages: Arc<dyn PageFetcher>, strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { pages, strategies }
    }

    /// Never fails: a page that cannot be fetched becomes an empty article
    /// with an unknown publication time.
    pub async fn fetch(&self, candidate: &Candidate) -> Article {
        match self.pages.get_text(&candidate.url).await {
            Ok(html) => self.parse(candidate, &html),
            Err(e) => {
                warn!("⚠️ Failed to fetch {}: {}", candidate.url, e);
                Article::empty(candidate.clone())
            }
        }
    }

    pub fn parse(&self, candidate: &Candidate, html: &str) -> Article {
        let document = Html::parse_document(html);
        let content = self.extract(&document).unwrap_or_default();
        let published = timestamp::discover(&document);
        Article {
            candidate: candidate.clone(),
            content,
            published,
        }
    }

    fn extract(&self, document: &Html) -> Option<String> {
        self.strategies.iter().find_map(|strategy| {
            let text = strategy.extract(document)?;
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            debug!("🧾 Extracted {} chars with {}", text.len(), strategy.name());
            Some(text.to_string())
        })
    }
}
