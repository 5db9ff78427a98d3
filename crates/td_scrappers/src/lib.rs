pub mod candidates;
pub mod cli;
pub mod http;
pub mod logging;
pub mod manager;
pub mod market;
pub mod price;
pub mod recency;
pub mod scrapers;

pub use candidates::{focus_headlines, CandidateSource, Marketaux, YahooSearch};
pub use cli::{handle_command, CommandContext, DigestCommands};
pub use http::{HttpPageFetcher, MemoryPageFetcher};
pub use logging::{init_logging, Logger};
pub use manager::DigestManager;
pub use market::{IndexSnapshot, MarketHeadlines, MarketNews, MarketSnapshot};
pub use price::YahooChartPrice;
pub use recency::{HeadlineDateOracle, RecencyFilter, RecencyOracle, RejectUndated};
pub use scrapers::{ArticleFetcher, ExtractionStrategy};

pub mod prelude {
    pub use super::candidates::CandidateSource;
    pub use super::manager::DigestManager;
    pub use super::recency::RecencyFilter;
    pub use super::scrapers::ArticleFetcher;
    pub use td_core::{Article, Candidate, Error, ItemReport, Result};
}
