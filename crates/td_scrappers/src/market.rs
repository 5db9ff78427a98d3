use std::sync::Arc;

use futures::future::join_all;
use td_core::{Candidate, DigestConfig, MarketIndex, PageFetcher, PriceSource};
use tracing::warn;

use crate::candidates::Marketaux;

pub const NOTHING_NOTABLE: &str = "no market-moving news";
pub const UNAVAILABLE: &str = "market news unavailable";
pub const SNAPSHOT_UNAVAILABLE: &str = "(no data)";

const FETCH_LIMIT: usize = 15;
const MAX_HEADLINES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketHeadlines {
    Headlines(Vec<Candidate>),
    NothingNotable,
    Unavailable,
}

impl MarketHeadlines {
    pub fn render(&self) -> String {
        match self {
            MarketHeadlines::Headlines(headlines) => headlines
                .iter()
                .map(|c| {
                    if c.publisher.is_empty() {
                        format!("- {}", c.title)
                    } else {
                        format!("- {} ({})", c.title, c.publisher)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"),
            MarketHeadlines::NothingNotable => format!("- {}", NOTHING_NOTABLE),
            MarketHeadlines::Unavailable => format!("- {}", UNAVAILABLE),
        }
    }
}

/// General market news filtered down to market-moving headlines.
pub struct MarketNews {
    client: Marketaux,
    keywords: Vec<String>,
    max_headlines: usize,
}

impl MarketNews {
    pub fn new(client: Marketaux, keywords: &[String]) -> Self {
        Self {
            client,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            max_headlines: MAX_HEADLINES,
        }
    }

    pub fn from_config(config: &DigestConfig, pages: Arc<dyn PageFetcher>) -> Self {
        let client = Marketaux::new(pages, config.marketaux_token.clone()).with_limit(FETCH_LIMIT);
        Self::new(client, &config.market_keywords)
    }

    fn is_market_moving(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.keywords.iter().any(|k| title.contains(k.as_str()))
    }

    pub async fn headlines(&self) -> MarketHeadlines {
        let latest = match self.client.latest().await {
            Ok(latest) => latest,
            Err(e) => {
                warn!("⚠️ Market news request failed: {}", e);
                return MarketHeadlines::Unavailable;
            }
        };

        let notable: Vec<Candidate> = latest
            .into_iter()
            .filter(|c| self.is_market_moving(&c.title))
            .take(self.max_headlines)
            .collect();

        if notable.is_empty() {
            MarketHeadlines::NothingNotable
        } else {
            MarketHeadlines::Headlines(notable)
        }
    }
}

/// Last close of each configured index, or nothing when any is missing.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketSnapshot {
    Levels(Vec<(String, f64)>),
    Unavailable,
}

impl MarketSnapshot {
    pub fn render(&self) -> String {
        match self {
            MarketSnapshot::Levels(levels) => levels
                .iter()
                .map(|(name, close)| format!("{} {:.2}", name, close))
                .collect::<Vec<_>>()
                .join(" | "),
            MarketSnapshot::Unavailable => SNAPSHOT_UNAVAILABLE.to_string(),
        }
    }
}

/// Looks up the index levels through a `PriceSource`.
pub struct IndexSnapshot {
    prices: Arc<dyn PriceSource>,
    indices: Vec<MarketIndex>,
}

impl IndexSnapshot {
    pub fn new(prices: Arc<dyn PriceSource>, indices: Vec<MarketIndex>) -> Self {
        Self { prices, indices }
    }

    pub fn from_config(config: &DigestConfig, prices: Arc<dyn PriceSource>) -> Self {
        Self::new(prices, config.market_indices.clone())
    }

    pub async fn snapshot(&self) -> MarketSnapshot {
        if self.indices.is_empty() {
            return MarketSnapshot::Unavailable;
        }

        let quotes = join_all(self.indices.iter().map(|index| self.prices.current_price(&index.symbol))).await;

        let mut levels = Vec::with_capacity(self.indices.len());
        for (index, quote) in self.indices.iter().zip(quotes) {
            match quote {
                Some(quote) => levels.push((index.name.clone(), quote.price)),
                None => {
                    warn!("⚠️ No level for {} ({})", index.name, index.symbol);
                    return MarketSnapshot::Unavailable;
                }
            }
        }
        MarketSnapshot::Levels(levels)
    }
}
