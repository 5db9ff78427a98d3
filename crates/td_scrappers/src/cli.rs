use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use chrono::{DateTime, Utc};
use clap::Subcommand;
use futures::future::join_all;
use td_core::{Candidate, ItemOutcome, ItemReport, PriceStatus, Result, TrackedItem};
use td_inference::SectionFormatter;

use crate::manager::DigestManager;
use crate::market::{IndexSnapshot, MarketNews};

#[derive(Subcommand, Debug, Clone)]
pub enum DigestCommands {
    /// Digest recent news for tracked symbols (all configured items by default)
    Digest {
        symbols: Vec<String>,
    },
    /// Summarize and label a single article
    Article {
        url: String,
        /// Symbol shown in the section header
        #[arg(long)]
        symbol: Option<String>,
        /// Read the page from a local HTML file instead of downloading it
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Show index levels and market-moving headlines
    Market,
    /// List candidate search strategies
    Sources,
}

/// Everything a command needs, built once by the binary.
pub struct CommandContext {
    pub manager: DigestManager,
    pub formatter: SectionFormatter,
    pub market: MarketNews,
    pub snapshot: IndexSnapshot,
}

/// Runs one command and returns the text to print.
pub async fn handle_command(
    command: DigestCommands,
    context: &CommandContext,
    now: DateTime<Utc>,
    cancel: &AtomicBool,
) -> Result<String> {
    match command {
        DigestCommands::Digest { symbols } => {
            let items: Vec<TrackedItem> = if symbols.is_empty() {
                context.manager.config().items.clone()
            } else {
                symbols.iter().map(|s| context.manager.config().item(s)).collect()
            };

            let reports = context.manager.run(&items, now, cancel).await;
            let sections = join_all(reports.iter().map(|r| context.formatter.format(r))).await;

            let mut out = vec![format!("📰 News digest {}", now.format("%Y-%m-%d %H:%M UTC"))];
            out.extend(sections);
            Ok(out.join("\n\n"))
        }
        DigestCommands::Article { url, symbol, file } => {
            let candidate = Candidate::new(url.clone(), url, "");
            let digest = match file {
                Some(path) => {
                    let html = tokio::fs::read_to_string(&path).await?;
                    context.manager.digest_html(&candidate, &html)
                }
                None => context.manager.digest_url(&candidate).await,
            };
            let report = ItemReport {
                symbol: symbol.unwrap_or_else(|| "ARTICLE".to_string()).to_uppercase(),
                price: PriceStatus::NotRequested,
                position: None,
                outcome: match digest {
                    Some(digest) => ItemOutcome::Digests(vec![digest]),
                    None => ItemOutcome::NoRecentCoverage,
                },
            };
            Ok(context.formatter.format(&report).await)
        }
        DigestCommands::Market => {
            let (snapshot, headlines) =
                futures::join!(context.snapshot.snapshot(), context.market.headlines());
            let text = format!(
                "🌎 Market snapshot\n{}\n\n📰 Market headlines\n{}",
                snapshot.render(),
                headlines.render()
            );
            Ok(context.formatter.localize(text).await)
        }
        DigestCommands::Sources => {
            let names = context.manager.candidate_source().strategy_names();
            Ok(names
                .iter()
                .map(|name| format!("- {}", name))
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::CandidateSource;
    use crate::http::MemoryPageFetcher;
    use crate::scrapers::ArticleFetcher;
    use chrono::TimeZone;
    use std::sync::Arc;
    use crate::price::YahooChartPrice;
    use td_core::{DigestConfig, PageFetcher, PriceSource};

    fn context(pages: MemoryPageFetcher, with_strategies: bool) -> CommandContext {
        let pages: Arc<dyn PageFetcher> = Arc::new(pages);
        let config = DigestConfig::default();
        let candidates = if with_strategies {
            CandidateSource::from_config(&config, pages.clone())
        } else {
            CandidateSource::new(Vec::new(), config.min_candidates)
        };
        let prices: Arc<dyn PriceSource> = Arc::new(YahooChartPrice::new(pages.clone()));
        CommandContext {
            market: MarketNews::from_config(&config, pages.clone()),
            snapshot: IndexSnapshot::from_config(&config, prices),
            manager: DigestManager::from_parts(config, candidates, ArticleFetcher::new(pages)).unwrap(),
            formatter: SectionFormatter::new(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 12, 15, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_digest_without_sources_reports_no_data() {
        let out = handle_command(
            DigestCommands::Digest { symbols: vec!["ionq".to_string()] },
            &context(MemoryPageFetcher::new(), false),
            now(),
            &AtomicBool::new(false),
        )
        .await
        .unwrap();
        assert_eq!(out, "📰 News digest 2024-06-12 15:00 UTC\n\n🔹 IONQ\n- no data");
    }

    #[tokio::test]
    async fn test_sources_lists_strategies() {
        let out = handle_command(
            DigestCommands::Sources,
            &context(MemoryPageFetcher::new(), true),
            now(),
            &AtomicBool::new(false),
        )
        .await
        .unwrap();
        assert_eq!(out, "- yahoo-search\n- marketaux");
    }

    #[tokio::test]
    async fn test_article_from_unreachable_url() {
        let out = handle_command(
            DigestCommands::Article {
                url: "https://news.test/missing".to_string(),
                symbol: Some("lunr".to_string()),
                file: None,
            },
            &context(MemoryPageFetcher::new(), false),
            now(),
            &AtomicBool::new(false),
        )
        .await
        .unwrap();
        assert_eq!(out, "🔹 LUNR\n- no recent coverage");
    }

    #[tokio::test]
    async fn test_market_without_data() {
        let out = handle_command(
            DigestCommands::Market,
            &context(MemoryPageFetcher::new(), false),
            now(),
            &AtomicBool::new(false),
        )
        .await
        .unwrap();
        assert_eq!(
            out,
            "🌎 Market snapshot\n(no data)\n\n📰 Market headlines\n- market news unavailable"
        );
    }
}
