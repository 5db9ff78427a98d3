use std::collections::HashSet;
use std::sync::Arc;

use td_core::{Candidate, CandidateStrategy, DigestConfig, PageFetcher, TrackedItem};
use tracing::{debug, warn};

pub mod marketaux;
pub mod yahoo;

pub use marketaux::Marketaux;
pub use yahoo::YahooSearch;

/// Builds a candidate from loosely typed response fields. Title and URL are
/// required; a missing publisher becomes an empty string.
pub(crate) fn candidate_from(
    title: Option<String>,
    url: Option<String>,
    publisher: Option<String>,
) -> Option<Candidate> {
    let title = title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())?;
    let url = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())?;
    let publisher = publisher.map(|p| p.trim().to_string()).unwrap_or_default();
    Some(Candidate { title, url, publisher })
}

/// Runs the query plan (search terms × strategies) and merges the results.
pub struct CandidateSource {
    strategies: Vec<Box<dyn CandidateStrategy>>,
    min_candidates: usize,
}

impl CandidateSource {
    pub fn new(strategies: Vec<Box<dyn CandidateStrategy>>, min_candidates: usize) -> Self {
        Self {
            strategies,
            min_candidates,
        }
    }

    /// Yahoo search first, then Marketaux.
    pub fn from_config(config: &DigestConfig, pages: Arc<dyn PageFetcher>) -> Self {
        Self::new(
            vec![
                Box::new(YahooSearch::new(pages.clone())),
                Box::new(Marketaux::new(pages, config.marketaux_token.clone())),
            ],
            config.min_candidates,
        )
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub async fn find(&self, search_key: &str) -> Vec<Candidate> {
        self.find_terms(&[search_key]).await
    }

    /// Searches the item's symbol first, then its aliases.
    pub async fn find_item(&self, item: &TrackedItem) -> Vec<Candidate> {
        self.find_terms(&item.search_terms()).await
    }

    /// Tries every strategy for every term in order. Failures are skipped.
    /// Stops once `min_candidates` unique URLs are collected (0 disables the
    /// early stop). Output keeps first-seen order.
    pub async fn find_terms(&self, terms: &[&str]) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        'plan: for term in terms {
            for strategy in &self.strategies {
                match strategy.query(term).await {
                    Ok(candidates) => {
                        debug!("🔎 {} returned {} candidates for {}", strategy.name(), candidates.len(), term);
                        for candidate in candidates {
                            if seen.insert(candidate.url.clone()) {
                                found.push(candidate);
                            }
                        }
                    }
                    Err(e) => warn!("⚠️ {} failed for {}: {}", strategy.name(), term, e),
                }

                if self.min_candidates > 0 && found.len() >= self.min_candidates {
                    break 'plan;
                }
            }
        }

        found
    }
}

/// Keeps candidates whose titles mention a catalyst keyword. When none do, the
/// first `fallback` candidates are kept instead. An empty keyword list keeps
/// everything.
pub fn focus_headlines(candidates: Vec<Candidate>, keywords: &[String], fallback: usize) -> Vec<Candidate> {
    let keywords: Vec<String> = keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.is_empty() {
        return candidates;
    }

    let (matching, rest): (Vec<Candidate>, Vec<Candidate>) = candidates.into_iter().partition(|c| {
        let title = c.title.to_lowercase();
        keywords.iter().any(|k| title.contains(k.as_str()))
    });

    if matching.is_empty() {
        rest.into_iter().take(fallback).collect()
    } else {
        matching
    }
}
