use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An unfetched article reference returned by a candidate strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub title: String,
    pub url: String,
    pub publisher: String,
}

impl Candidate {
    pub fn new(title: impl Into<String>, url: impl Into<String>, publisher: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            publisher: publisher.into(),
        }
    }
}

/// Publication time as discovered on the page.
///
/// `Raw` keeps a value that was found but could not be parsed, so the recency
/// heuristics can still look at it. `Unknown` means nothing was found at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Published {
    At(DateTime<Utc>),
    Raw(String),
    Unknown,
}

impl Published {
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Published::At(at) => Some(*at),
            _ => None,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        match self {
            Published::Raw(raw) => Some(raw.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub candidate: Candidate,
    pub content: String,
    pub published: Published,
}

impl Article {
    /// The article returned when a fetch fails: no body and no timestamp.
    pub fn empty(candidate: Candidate) -> Self {
        Self {
            candidate,
            content: String::new(),
            published: Published::Unknown,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
    /// Index of the sentence in source order.
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSentence {
    pub sentence: Sentence,
    pub score: f64,
}

/// Extractive digest of one article. Sentences keep their source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub candidate: Candidate,
    pub sentences: Vec<Sentence>,
}

impl Summary {
    pub fn new(candidate: Candidate, sentences: Vec<Sentence>) -> Self {
        Self { candidate, sentences }
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn text(&self) -> String {
        self.sentences
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImpactLabel {
    Favorable,
    Unfavorable,
    Neutral,
}

impl fmt::Display for ImpactLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ImpactLabel::Favorable => "favorable",
            ImpactLabel::Unfavorable => "unfavorable",
            ImpactLabel::Neutral => "neutral",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactAssessment {
    pub label: ImpactLabel,
    pub justification: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDigest {
    pub summary: Summary,
    pub assessment: ImpactAssessment,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: f64,
    pub change: f64,
    pub change_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PriceStatus {
    NotRequested,
    Unavailable,
    Available(Quote),
}

/// Suggested action for a held item at its current price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Recommendation {
    /// Price is inside the buy zone, which tops out at `ceiling`.
    Buy { ceiling: f64 },
    /// Price ran above the trim threshold.
    Trim,
    /// Price sits more than 10% under the average cost.
    ConsiderAdding,
    Hold,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Buy { ceiling } => write!(f, "Buy (zone up to ${:.2})", ceiling),
            Recommendation::Trim => f.write_str("Hold / consider trimming"),
            Recommendation::ConsiderAdding => f.write_str("Consider adding (below your avg cost)"),
            Recommendation::Hold => f.write_str("Hold"),
        }
    }
}

/// Holding details shown under the item header when a price is known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub avg_cost: Option<f64>,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemOutcome {
    /// No candidate articles were found, or the item was never started.
    NoData,
    /// Candidates existed but none produced a fresh, non-empty summary.
    NoRecentCoverage,
    Digests(Vec<ArticleDigest>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemReport {
    pub symbol: String,
    pub price: PriceStatus,
    #[serde(default)]
    pub position: Option<Position>,
    pub outcome: ItemOutcome,
}

impl ItemReport {
    pub fn no_data(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price: PriceStatus::NotRequested,
            position: None,
            outcome: ItemOutcome::NoData,
        }
    }
}
