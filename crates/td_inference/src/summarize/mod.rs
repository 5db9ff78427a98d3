use td_core::{Article, DigestConfig, Summary};
use tracing::debug;

pub mod scorer;
pub mod selector;
pub mod splitter;

pub use scorer::RelevanceScorer;
pub use selector::SummarySelector;
pub use splitter::{SentenceSplitter, Sentences};

/// Split → score → select, for one article.
#[derive(Debug, Clone)]
pub struct Summarizer {
    splitter: SentenceSplitter,
    scorer: RelevanceScorer,
    selector: SummarySelector,
    max_sentences: usize,
}

impl Summarizer {
    pub fn new(config: &DigestConfig) -> Self {
        Self {
            splitter: SentenceSplitter::from_config(config),
            scorer: RelevanceScorer::from_config(config),
            selector: SummarySelector::new(),
            max_sentences: config.max_sentences,
        }
    }

    pub fn splitter(&self) -> &SentenceSplitter {
        &self.splitter
    }

    /// An article whose text yields no sentence gets an empty summary.
    pub fn summarize(&self, article: &Article) -> Summary {
        let scored = self.scorer.score(self.splitter.split(&article.content));
        debug!(
            "📑 {} sentences scored for {}",
            scored.len(),
            article.candidate.url
        );
        self.selector
            .select(&article.candidate, &scored, self.max_sentences)
    }
}
