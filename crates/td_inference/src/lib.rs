pub mod impact;
pub mod models;
pub mod report;
pub mod summarize;

pub use impact::ImpactClassifier;
pub use models::create_translator;
pub use report::SectionFormatter;
pub use summarize::{RelevanceScorer, SentenceSplitter, Summarizer, SummarySelector};

pub mod prelude {
    pub use super::impact::ImpactClassifier;
    pub use super::models::create_translator;
    pub use super::report::{outlook, SectionFormatter};
    pub use super::summarize::Summarizer;
    pub use td_core::{Article, ImpactAssessment, ImpactLabel, Result, Summary};
}
