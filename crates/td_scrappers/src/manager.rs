use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use td_core::{
    Article, ArticleDigest, Candidate, DigestConfig, ItemOutcome, ItemReport, PageFetcher,
    PriceSource, PriceStatus, Result, TrackedItem,
};
use td_inference::{ImpactClassifier, Summarizer};
use tokio::sync::Semaphore;

use crate::candidates::{focus_headlines, CandidateSource};
use crate::logging::Logger;
use crate::recency::RecencyFilter;
use crate::scrapers::ArticleFetcher;

/// Runs the per-item pipeline: candidates, fetch, recency, summary, impact.
pub struct DigestManager {
    config: DigestConfig,
    candidates: CandidateSource,
    fetcher: ArticleFetcher,
    recency: RecencyFilter,
    summarizer: Summarizer,
    classifier: ImpactClassifier,
    prices: Option<Arc<dyn PriceSource>>,
    semaphore: Arc<Semaphore>,
}

impl DigestManager {
    pub fn new(config: DigestConfig, pages: Arc<dyn PageFetcher>) -> Result<Self> {
        let candidates = CandidateSource::from_config(&config, pages.clone());
        let fetcher = ArticleFetcher::new(pages);
        Self::from_parts(config, candidates, fetcher)
    }

    pub fn from_parts(config: DigestConfig, candidates: CandidateSource, fetcher: ArticleFetcher) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            recency: RecencyFilter::from_config(&config),
            summarizer: Summarizer::new(&config),
            classifier: ImpactClassifier::from_config(&config),
            semaphore: Arc::new(Semaphore::new(config.concurrency)),
            prices: None,
            candidates,
            fetcher,
            config,
        })
    }

    pub fn with_prices(mut self, prices: Arc<dyn PriceSource>) -> Self {
        self.prices = Some(prices);
        self
    }

    pub fn with_recency(mut self, recency: RecencyFilter) -> Self {
        self.recency = recency;
        self
    }

    pub fn config(&self) -> &DigestConfig {
        &self.config
    }

    pub fn candidate_source(&self) -> &CandidateSource {
        &self.candidates
    }

    /// Digests every item with at most `concurrency` items in flight.
    /// Reports keep the order of `items`. Once `cancel` is set, items that
    /// have not started report "no data".
    pub async fn run(&self, items: &[TrackedItem], now: DateTime<Utc>, cancel: &AtomicBool) -> Vec<ItemReport> {
        let futures = items.iter().map(|item| async move {
            let _permit = match self.semaphore.acquire().await {
                Ok(permit) => permit,
                Err(e) => {
                    Logger::for_item(&item.symbol).warn(&format!("⚠️ Could not start: {}", e));
                    return ItemReport::no_data(&item.symbol);
                }
            };
            if cancel.load(Ordering::SeqCst) {
                Logger::for_item(&item.symbol).warn("🛑 Cancelled before start");
                return ItemReport::no_data(&item.symbol);
            }
            self.digest_item(item, now).await
        });

        join_all(futures).await
    }

    pub async fn digest_item(&self, item: &TrackedItem, now: DateTime<Utc>) -> ItemReport {
        let logger = Logger::for_item(&item.symbol);
        let price = self.price_status(&item.symbol).await;
        let position = match &price {
            PriceStatus::Available(quote) => item.position(quote.price),
            _ => None,
        };

        let candidates = self.candidates.find_item(item).await;
        if candidates.is_empty() {
            logger.info("📭 No candidate articles");
            return ItemReport {
                symbol: item.symbol.clone(),
                price,
                position,
                outcome: ItemOutcome::NoData,
            };
        }
        logger.info(&format!("🔎 Found {} candidates", candidates.len()));

        let mut focused = focus_headlines(
            candidates,
            &self.config.headline_keywords,
            self.config.headline_fallback,
        );
        focused.truncate(self.config.max_articles);

        let articles = join_all(focused.iter().map(|c| self.fetcher.fetch(c))).await;
        let digests: Vec<ArticleDigest> = articles
            .into_iter()
            .filter(|article| self.keep(article, now, &logger))
            .filter_map(|article| self.digest_article(&article))
            .collect();

        let outcome = if digests.is_empty() {
            logger.info("🕰️ No recent coverage");
            ItemOutcome::NoRecentCoverage
        } else {
            logger.info(&format!("✨ {} articles digested", digests.len()));
            ItemOutcome::Digests(digests)
        };

        ItemReport {
            symbol: item.symbol.clone(),
            price,
            position,
            outcome,
        }
    }

    fn keep(&self, article: &Article, now: DateTime<Utc>, logger: &Logger) -> bool {
        if article.is_empty() {
            logger.debug(&format!("Dropping {}: no body text", article.candidate.url));
            return false;
        }
        if !self.recency.is_fresh(article, self.config.window_hours, now) {
            logger.debug(&format!("Dropping {}: outside {}h window", article.candidate.url, self.config.window_hours));
            return false;
        }
        true
    }

    /// Summary and impact for one article, or `None` when no sentence survives.
    pub fn digest_article(&self, article: &Article) -> Option<ArticleDigest> {
        let summary = self.summarizer.summarize(article);
        if summary.is_empty() {
            return None;
        }
        let assessment = self.classifier.classify_summary(&summary);
        Some(ArticleDigest { summary, assessment })
    }

    /// Fetches and digests a single page without the recency window.
    pub async fn digest_url(&self, candidate: &Candidate) -> Option<ArticleDigest> {
        let article = self.fetcher.fetch(candidate).await;
        self.digest_article(&article)
    }

    /// Digests already downloaded HTML.
    pub fn digest_html(&self, candidate: &Candidate, html: &str) -> Option<ArticleDigest> {
        let article = self.fetcher.parse(candidate, html);
        self.digest_article(&article)
    }

    async fn price_status(&self, symbol: &str) -> PriceStatus {
        match &self.prices {
            None => PriceStatus::NotRequested,
            Some(prices) => match prices.current_price(symbol).await {
                Some(quote) => PriceStatus::Available(quote),
                None => PriceStatus::Unavailable,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MemoryPageFetcher;
    use crate::recency::RejectUndated;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use td_core::{CandidateStrategy, Position, Quote, Recommendation};

    struct OneEach;

    #[async_trait]
    impl CandidateStrategy for OneEach {
        fn name(&self) -> &str {
            "one-each"
        }

        async fn query(&self, term: &str) -> Result<Vec<Candidate>> {
            Ok(vec![Candidate::new(
                format!("{} wins contract", term),
                format!("https://news.test/{}", term),
                "Wire",
            )])
        }
    }

    struct FixedPrice;

    #[async_trait]
    impl PriceSource for FixedPrice {
        async fn current_price(&self, symbol: &str) -> Option<Quote> {
            (symbol == "IONQ").then_some(Quote {
                price: 9.23,
                change: 0.11,
                change_pct: 1.2,
            })
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 12, 15, 0, 0).unwrap()
    }

    fn page(published: &str) -> String {
        format!(
            r#"<html><head><meta property="article:published_time" content="{}"></head>
            <body><article>
            <p>The company announced that it wins contract work worth millions from NASA.</p>
            <p>Management said the contract extends through the next fiscal year.</p>
            </article></body></html>"#,
            published
        )
    }

    fn manager(pages: MemoryPageFetcher) -> DigestManager {
        let pages: Arc<dyn PageFetcher> = Arc::new(pages);
        let config = DigestConfig {
            concurrency: 2,
            ..DigestConfig::default()
        };
        let candidates = CandidateSource::new(vec![Box::new(OneEach)], 1);
        DigestManager::from_parts(config, candidates, ArticleFetcher::new(pages)).unwrap()
    }

    #[tokio::test]
    async fn test_run_preserves_order_and_reports_outcomes() {
        let pages = MemoryPageFetcher::new()
            .with_page("https://news.test/IONQ", page("2024-06-12T09:00:00Z"))
            .with_page("https://news.test/FLY", page("2024-05-01T09:00:00Z"));
        let items = vec![TrackedItem::new("IONQ"), TrackedItem::new("FLY"), TrackedItem::new("LUNR")];
        let reports = manager(pages).run(&items, now(), &AtomicBool::new(false)).await;

        let symbols: Vec<&str> = reports.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["IONQ", "FLY", "LUNR"]);
        assert!(matches!(reports[0].outcome, ItemOutcome::Digests(ref d) if d.len() == 1));
        assert_eq!(reports[1].outcome, ItemOutcome::NoRecentCoverage);
        assert_eq!(reports[2].outcome, ItemOutcome::NoRecentCoverage);
    }

    #[tokio::test]
    async fn test_cancelled_items_report_no_data() {
        let pages = MemoryPageFetcher::new().with_page("https://news.test/IONQ", page("2024-06-12T09:00:00Z"));
        let cancel = AtomicBool::new(true);
        let reports = manager(pages).run(&[TrackedItem::new("IONQ")], now(), &cancel).await;
        assert_eq!(reports, vec![ItemReport::no_data("IONQ")]);
    }

    #[tokio::test]
    async fn test_no_candidates_is_no_data() {
        let pages: Arc<dyn PageFetcher> = Arc::new(MemoryPageFetcher::new());
        let manager = DigestManager::from_parts(
            DigestConfig::default(),
            CandidateSource::new(Vec::new(), 5),
            ArticleFetcher::new(pages),
        )
        .unwrap();
        let report = manager.digest_item(&TrackedItem::new("IONQ"), now()).await;
        assert_eq!(report.outcome, ItemOutcome::NoData);
        assert_eq!(report.price, PriceStatus::NotRequested);
    }

    #[tokio::test]
    async fn test_price_status() {
        let pages = MemoryPageFetcher::new();
        let manager = manager(pages).with_prices(Arc::new(FixedPrice));
        let ionq = manager.digest_item(&TrackedItem::new("IONQ"), now()).await;
        assert!(matches!(ionq.price, PriceStatus::Available(q) if q.price == 9.23));
        let fly = manager.digest_item(&TrackedItem::new("FLY"), now()).await;
        assert_eq!(fly.price, PriceStatus::Unavailable);
    }

    #[tokio::test]
    async fn test_position_needs_price_and_holding() {
        let manager = manager(MemoryPageFetcher::new()).with_prices(Arc::new(FixedPrice));
        let held = TrackedItem::new("IONQ").with_avg_cost(11.0).with_zones(8.0, 12.0);
        let report = manager.digest_item(&held, now()).await;
        assert_eq!(
            report.position,
            Some(Position {
                avg_cost: Some(11.0),
                recommendation: Recommendation::ConsiderAdding,
            })
        );

        let unheld = manager.digest_item(&TrackedItem::new("IONQ"), now()).await;
        assert!(unheld.position.is_none());

        let unpriced = manager.digest_item(&TrackedItem::new("FLY").with_avg_cost(20.0), now()).await;
        assert!(unpriced.position.is_none());
    }

    #[tokio::test]
    async fn test_undated_pages_follow_oracle() {
        let undated = r#"<html><body><article>
            <p>The company announced that it wins contract work worth millions from NASA.</p>
            </article></body></html>"#;
        let pages = MemoryPageFetcher::new().with_page("https://news.test/IONQ", undated);
        let manager = manager(pages).with_recency(RecencyFilter::new(Box::new(RejectUndated)));
        let report = manager.digest_item(&TrackedItem::new("IONQ"), now()).await;
        assert_eq!(report.outcome, ItemOutcome::NoRecentCoverage);
    }

    #[test]
    fn test_digest_html_labels_article() {
        let manager = manager(MemoryPageFetcher::new());
        let candidate = Candidate::new("Contract news", "https://news.test/x", "Wire");
        let digest = manager.digest_html(&candidate, &page("2020-01-01T00:00:00Z")).unwrap();
        assert_eq!(digest.assessment.label, td_core::ImpactLabel::Favorable);
        assert!(manager.digest_html(&candidate, "<html></html>").is_none());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let pages: Arc<dyn PageFetcher> = Arc::new(MemoryPageFetcher::new());
        let config = DigestConfig {
            concurrency: 0,
            ..DigestConfig::default()
        };
        assert!(DigestManager::new(config, pages).is_err());
    }
}
