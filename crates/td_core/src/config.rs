use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{Position, Recommendation};
use crate::{Error, Result};

/// Adding is suggested once the price drops below this share of the average cost.
const ADD_BELOW_AVG_COST: f64 = 0.9;

/// Price bands for a held item: buy at or below `buy_at_or_below`, consider
/// trimming above `trim_above`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceZones {
    pub buy_at_or_below: f64,
    pub trim_above: f64,
}

/// A tracked item, the alternative search terms tried after its symbol, and
/// optional holding details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedItem {
    pub symbol: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub avg_cost: Option<f64>,
    #[serde(default)]
    pub zones: Option<PriceZones>,
}

impl TrackedItem {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            aliases: Vec::new(),
            avg_cost: None,
            zones: None,
        }
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_avg_cost(mut self, avg_cost: f64) -> Self {
        self.avg_cost = Some(avg_cost);
        self
    }

    pub fn with_zones(mut self, buy_at_or_below: f64, trim_above: f64) -> Self {
        self.zones = Some(PriceZones {
            buy_at_or_below,
            trim_above,
        });
        self
    }

    /// Whether the item carries any holding details to advise on.
    pub fn is_held(&self) -> bool {
        self.avg_cost.is_some() || self.zones.is_some()
    }

    /// Zones win over the average cost; a price between the zones falls back
    /// to the average-cost check.
    pub fn recommend(&self, price: f64) -> Recommendation {
        if let Some(zones) = self.zones {
            if price <= zones.buy_at_or_below {
                return Recommendation::Buy {
                    ceiling: zones.buy_at_or_below,
                };
            }
            if price > zones.trim_above {
                return Recommendation::Trim;
            }
        }
        match self.avg_cost {
            Some(avg) if price < avg * ADD_BELOW_AVG_COST => Recommendation::ConsiderAdding,
            _ => Recommendation::Hold,
        }
    }

    pub fn position(&self, price: f64) -> Option<Position> {
        self.is_held().then(|| Position {
            avg_cost: self.avg_cost,
            recommendation: self.recommend(price),
        })
    }

    /// Search terms in priority order: the symbol, then each alias.
    pub fn search_terms(&self) -> Vec<&str> {
        std::iter::once(self.symbol.as_str())
            .chain(self.aliases.iter().map(String::as_str))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationConfig {
    pub url: String,
    #[serde(default = "default_source_lang")]
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_source_lang() -> String {
    "en".to_string()
}

/// A market index shown in the snapshot line, e.g. `S&P500` / `^GSPC`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketIndex {
    pub name: String,
    pub symbol: String,
}

impl MarketIndex {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    pub items: Vec<TrackedItem>,
    pub window_hours: u32,
    pub max_sentences: usize,
    pub min_candidates: usize,
    pub max_articles: usize,
    pub headline_fallback: usize,
    pub min_sentence_chars: usize,
    pub short_sentence_tokens: usize,
    pub short_sentence_factor: f64,
    pub request_timeout_secs: u64,
    pub concurrency: usize,
    pub marketaux_token: String,
    pub domain_keywords: Vec<String>,
    pub favorable_keywords: Vec<String>,
    pub unfavorable_keywords: Vec<String>,
    pub recency_phrases: Vec<String>,
    pub headline_keywords: Vec<String>,
    pub market_keywords: Vec<String>,
    pub market_indices: Vec<MarketIndex>,
    pub translation: Option<TranslationConfig>,
}

fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            items: vec![
                TrackedItem::new("IONQ").with_avg_cost(56.2).with_zones(50.0, 56.0),
                TrackedItem::new("FLY").with_avg_cost(24.635).with_zones(20.0, 30.0),
                TrackedItem::new("LUNR")
                    .with_aliases(strings(&["Intuitive Machines"]))
                    .with_avg_cost(9.23)
                    .with_zones(9.5, 12.0),
            ],
            window_hours: 48,
            max_sentences: 3,
            min_candidates: 5,
            max_articles: 5,
            headline_fallback: 3,
            min_sentence_chars: 20,
            short_sentence_tokens: 6,
            short_sentence_factor: 0.7,
            request_timeout_secs: 10,
            concurrency: 4,
            marketaux_token: "demo".to_string(),
            domain_keywords: strings(&[
                "earnings", "revenue", "quarter", "guidance", "contract", "acquisition",
                "merger", "agreement", "launch", "mission", "nasa", "defense", "partnership",
                "press release",
            ]),
            favorable_keywords: strings(&[
                "beat", "raised guidance", "raises guidance", "contract awarded", "wins contract",
                "record", "acquisition", "upgrade", "partnership", "approval", "surge",
                "successful",
            ]),
            unfavorable_keywords: strings(&[
                "missed", "guidance cut", "cuts guidance", "delay", "investigation",
                "loss widened", "downgrade", "lawsuit", "recall", "layoffs", "failure",
                "plunge",
            ]),
            recency_phrases: strings(&[
                "today", "hours ago", "hour ago", "minutes ago", "just now", "breaking",
            ]),
            headline_keywords: strings(&[
                "earnings", "q1", "q2", "q3", "q4", "quarter", "result", "guidance",
                "press release", "acquir", "contract", "launch", "mission", "nasa", "defense",
                "merger", "agreement", "closing",
            ]),
            market_keywords: strings(&[
                "fed", "cpi", "inflation", "interest", "recession", "jobs", "unemployment",
                "gdp", "debt ceiling", "shutdown", "earnings", "bank", "rate cut", "rate hike",
                "semiconductor", "defense", "nasa",
            ]),
            market_indices: vec![
                MarketIndex::new("S&P500", "^GSPC"),
                MarketIndex::new("Nasdaq", "^IXIC"),
                MarketIndex::new("Dow", "^DJI"),
            ],
            translation: None,
        }
    }
}

impl DigestConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.short_sentence_factor) {
            return Err(Error::Config(format!(
                "short_sentence_factor must be within 0..=1, got {}",
                self.short_sentence_factor
            )));
        }
        for item in &self.items {
            if let Some(zones) = item.zones {
                if zones.buy_at_or_below > zones.trim_above {
                    return Err(Error::Config(format!(
                        "{}: buy zone {} is above trim threshold {}",
                        item.symbol, zones.buy_at_or_below, zones.trim_above
                    )));
                }
            }
            if matches!(item.avg_cost, Some(avg) if avg <= 0.0) {
                return Err(Error::Config(format!("{}: avg_cost must be positive", item.symbol)));
            }
        }
        if let Some(translation) = &self.translation {
            url::Url::parse(&translation.url)
                .map_err(|e| Error::InvalidUrl(format!("{}: {}", translation.url, e)))?;
        }
        Ok(())
    }

    pub fn item(&self, symbol: &str) -> TrackedItem {
        self.items
            .iter()
            .find(|item| item.symbol.eq_ignore_ascii_case(symbol))
            .cloned()
            .unwrap_or_else(|| TrackedItem::new(symbol.to_uppercase()))
    }
}
