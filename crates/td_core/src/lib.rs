pub mod config;
pub mod error;
pub mod sources;
pub mod types;

pub use config::{DigestConfig, MarketIndex, PriceZones, TrackedItem, TranslationConfig};
pub use error::{Error, Result};
pub use sources::{CandidateStrategy, PageFetcher, PriceSource, Translator};
pub use types::{
    Article, ArticleDigest, Candidate, ImpactAssessment, ImpactLabel, ItemOutcome, ItemReport,
    PriceStatus, Position, Published, Quote, Recommendation, ScoredSentence, Sentence, Summary,
};
