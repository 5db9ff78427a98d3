use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use td_core::{DigestConfig, PageFetcher, Result, TranslationConfig};
use td_inference::{create_translator, SectionFormatter};
use td_scrappers::{
    handle_command, init_logging, CommandContext, DigestCommands, DigestManager, HttpPageFetcher,
    IndexSnapshot, MarketNews, YahooChartPrice,
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON configuration file; missing fields keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Recency window in hours
    #[arg(long, global = true)]
    window: Option<u32>,
    /// Maximum sentences per article summary
    #[arg(long, global = true)]
    sentences: Option<usize>,
    /// Target language for the output
    #[arg(long, global = true)]
    lang: Option<String>,
    /// LibreTranslate-compatible endpoint used with --lang
    #[arg(long, global = true)]
    translate_url: Option<String>,
    /// Include the latest price in each item header
    #[arg(long, global = true)]
    prices: bool,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: DigestCommands,
}

impl Cli {
    /// Layers command-line overrides on top of the loaded config.
    fn apply(&self, config: &mut DigestConfig) -> Result<()> {
        if let Some(window) = self.window {
            config.window_hours = window;
        }
        if let Some(sentences) = self.sentences {
            config.max_sentences = sentences;
        }
        if let Some(url) = &self.translate_url {
            match &mut config.translation {
                Some(translation) => translation.url = url.clone(),
                None => {
                    config.translation = Some(TranslationConfig {
                        url: url.clone(),
                        source: "en".to_string(),
                        target: self.lang.clone().unwrap_or_else(|| "en".to_string()),
                        api_key: None,
                    })
                }
            }
        }
        if let Some(lang) = &self.lang {
            match &mut config.translation {
                Some(translation) => translation.target = lang.clone(),
                None => warn!("⚠️ --lang {} ignored: no translation endpoint configured", lang),
            }
        }
        config.validate()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => DigestConfig::from_file(path)?,
        None => DigestConfig::default(),
    };
    cli.apply(&mut config)?;

    let timeout = Duration::from_secs(config.request_timeout_secs);
    let pages: Arc<dyn PageFetcher> = Arc::new(HttpPageFetcher::new(timeout)?);

    let mut formatter = SectionFormatter::new();
    if let Some(translation) = &config.translation {
        let translator = create_translator(Some(translation), timeout)?;
        info!("🌐 Translating {} → {} via {}", translation.source, translation.target, translator.name());
        formatter = formatter.with_translator(
            translator,
            translation.source.clone(),
            translation.target.clone(),
            timeout,
        );
    }

    let market = MarketNews::from_config(&config, pages.clone());
    let chart = Arc::new(YahooChartPrice::new(pages.clone()));
    let snapshot = IndexSnapshot::from_config(&config, chart.clone());
    let mut manager = DigestManager::new(config, pages)?;
    if cli.prices {
        manager = manager.with_prices(chart);
    }
    info!(
        "🦗 Candidate strategies: {}",
        manager.candidate_source().strategy_names().join(", ")
    );

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("🛑 Interrupted, items not yet started will report no data");
                cancel.store(true, Ordering::SeqCst);
            }
        });
    }

    let context = CommandContext {
        manager,
        formatter,
        market,
        snapshot,
    };
    let output = handle_command(cli.command, &context, Utc::now(), &cancel).await?;
    println!("{}", output);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = Cli::try_parse_from([
            "td", "digest", "IONQ", "--window", "24", "--sentences", "2",
            "--translate-url", "http://localhost:5000/translate", "--lang", "th",
        ])
        .unwrap();
        let mut config = DigestConfig::default();
        cli.apply(&mut config).unwrap();

        assert_eq!(config.window_hours, 24);
        assert_eq!(config.max_sentences, 2);
        let translation = config.translation.unwrap();
        assert_eq!(translation.target, "th");
        assert_eq!(translation.source, "en");
        assert!(matches!(cli.command, DigestCommands::Digest { ref symbols } if symbols == &["IONQ"]));
    }

    #[test]
    fn test_lang_without_endpoint_is_ignored() {
        let cli = Cli::try_parse_from(["td", "--lang", "th", "market"]).unwrap();
        let mut config = DigestConfig::default();
        cli.apply(&mut config).unwrap();
        assert!(config.translation.is_none());
    }

    #[test]
    fn test_article_command_parses() {
        let cli = Cli::try_parse_from(["td", "article", "https://news.test/a", "--symbol", "LUNR"]).unwrap();
        match cli.command {
            DigestCommands::Article { url, symbol, file } => {
                assert_eq!(url, "https://news.test/a");
                assert_eq!(symbol.as_deref(), Some("LUNR"));
                assert!(file.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
