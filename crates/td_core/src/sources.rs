use async_trait::async_trait;

use crate::types::{Candidate, Quote};
use crate::Result;

/// Raw GET access to the web. Implementations bound every call by a timeout.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn get_text(&self, url: &str) -> Result<String>;
}

/// One backend that turns a search term into candidate articles.
#[async_trait]
pub trait CandidateStrategy: Send + Sync {
    /// Returns the name of the backend
    fn name(&self) -> &str;

    /// Looks up candidate articles for a single search term
    async fn query(&self, term: &str) -> Result<Vec<Candidate>>;
}

/// Best-effort text translation. Callers must keep the original text on error.
#[async_trait]
pub trait Translator: Send + Sync {
    fn name(&self) -> &str;

    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String>;
}

#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Latest quote for a symbol, or `None` when the market data is unavailable
    async fn current_price(&self, symbol: &str) -> Option<Quote>;
}
