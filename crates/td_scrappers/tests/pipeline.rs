use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use td_core::{DigestConfig, ItemOutcome, ImpactLabel, PageFetcher};
use td_inference::SectionFormatter;
use td_scrappers::{
    ArticleFetcher, CandidateSource, DigestManager, Marketaux, MemoryPageFetcher, YahooChartPrice,
    YahooSearch,
};

const FRESH: &str = "https://news.test/ionq-earnings";
const STALE: &str = "https://news.test/ionq-quarter";
const MISSING: &str = "https://news.test/ionq-contract";
const LUNR_OLD: &str = "https://news.test/lunr-mission";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 12, 15, 0, 0).unwrap()
}

fn article_page(published: &str, paragraphs: &[&str]) -> String {
    let body: String = paragraphs.iter().map(|p| format!("<p>{}</p>", p)).collect();
    format!(
        r#"<html><head><meta property="article:published_time" content="{}"></head>
        <body><nav><p>Markets</p></nav><article>{}</article></body></html>"#,
        published, body
    )
}

fn pages() -> MemoryPageFetcher {
    MemoryPageFetcher::new()
        .with_page(
            "https://search.test/?q=IONQ&newsCount=10",
            format!(
                r#"{{"news":[
                    {{"title":"IonQ earnings beat estimates","link":"{}","publisher":"Reuters"}},
                    {{"title":"IonQ quarter in review","link":"{}","publisher":"Barron's"}},
                    {{"title":"IonQ contract talks","link":"{}","publisher":"Wire"}}
                ]}}"#,
                FRESH, STALE, MISSING
            ),
        )
        .with_page(
            "https://mx.test/news?search=IONQ&countries=us&limit=5&api_token=demo",
            format!(
                r#"{{"data":[{{"title":"IonQ earnings beat (syndicated)","url":"{}","source":"mx"}}]}}"#,
                FRESH
            ),
        )
        .with_page("https://search.test/?q=FLY&newsCount=10", r#"{"news":[]}"#)
        .with_page(
            "https://search.test/?q=LUNR&newsCount=10",
            format!(
                r#"{{"news":[{{"title":"Intuitive Machines mission update","link":"{}","publisher":"Space"}}]}}"#,
                LUNR_OLD
            ),
        )
        .with_page(
            FRESH,
            article_page(
                "2024-06-12T08:00:00Z",
                &[
                    "IonQ reported quarterly revenue that beat analyst estimates by a wide margin.",
                    "The company also raised guidance for the full year on strong demand.",
                    "Shares rose in early trading on Wednesday morning.",
                ],
            ),
        )
        .with_page(
            STALE,
            article_page(
                "2024-06-01T08:00:00Z",
                &["A lawsuit over the delay weighed on the stock last week."],
            ),
        )
        .with_page(
            LUNR_OLD,
            article_page(
                "2024-05-20T08:00:00Z",
                &["The lander mission suffered a delay after a sensor failure."],
            ),
        )
        .with_page(
            "https://chart.test/IONQ?range=5d&interval=1d",
            r#"{"chart":{"result":[{"indicators":{"quote":[{"close":[8.0,10.0]}]}}]}}"#,
        )
}

fn manager(pages: Arc<dyn PageFetcher>, config: DigestConfig) -> DigestManager {
    let candidates = CandidateSource::new(
        vec![
            Box::new(YahooSearch::new(pages.clone()).with_base_url("https://search.test/")),
            Box::new(Marketaux::new(pages.clone(), "demo").with_base_url("https://mx.test/news")),
        ],
        config.min_candidates,
    );
    DigestManager::from_parts(config, candidates, ArticleFetcher::new(pages)).unwrap()
}

#[tokio::test]
async fn test_digest_reports_every_item() {
    let pages: Arc<dyn PageFetcher> = Arc::new(pages());
    let config = DigestConfig::default();
    let items = config.items.clone();
    let reports = manager(pages, config).run(&items, now(), &AtomicBool::new(false)).await;

    assert_eq!(reports.len(), 3);

    let ionq = &reports[0];
    assert_eq!(ionq.symbol, "IONQ");
    let digests = match &ionq.outcome {
        ItemOutcome::Digests(digests) => digests,
        other => panic!("unexpected outcome {:?}", other),
    };
    assert_eq!(digests.len(), 1);
    assert_eq!(digests[0].summary.candidate.url, FRESH);
    assert_eq!(digests[0].summary.candidate.publisher, "Reuters");
    assert_eq!(digests[0].assessment.label, ImpactLabel::Favorable);
    assert_eq!(digests[0].assessment.justification.len(), 2);

    assert_eq!(reports[1].symbol, "FLY");
    assert_eq!(reports[1].outcome, ItemOutcome::NoData);

    assert_eq!(reports[2].symbol, "LUNR");
    assert_eq!(reports[2].outcome, ItemOutcome::NoRecentCoverage);
}

#[tokio::test]
async fn test_sections_render_markers_and_prices() {
    let pages: Arc<dyn PageFetcher> = Arc::new(pages());
    let config = DigestConfig::default();
    let items = config.items.clone();
    let manager = manager(pages.clone(), config)
        .with_prices(Arc::new(YahooChartPrice::new(pages).with_base_url("https://chart.test")));
    let reports = manager.run(&items, now(), &AtomicBool::new(false)).await;

    let formatter = SectionFormatter::new();
    let ionq = formatter.format(&reports[0]).await;
    let fly = formatter.format(&reports[1]).await;
    let lunr = formatter.format(&reports[2]).await;

    assert!(ionq.starts_with(
        "🔹 IONQ — $10.00 (+25.00%)\navg: $56.20\nRecommendation: Buy (zone up to $50.00)\n• IonQ earnings beat estimates (Reuters) [favorable]"
    ));
    assert!(ionq.contains("    - The company also raised guidance for the full year on strong demand."));
    assert!(ionq.ends_with("Outlook: lean favorable"));
    assert!(!ionq.contains("Shares rose"));

    assert_eq!(fly, "🔹 FLY — (no price data)\n- no data");
    assert_eq!(lunr, "🔹 LUNR — (no price data)\n- no recent coverage");
}

#[tokio::test]
async fn test_wider_window_admits_older_coverage() {
    let pages: Arc<dyn PageFetcher> = Arc::new(pages());
    let config = DigestConfig {
        window_hours: 24 * 30,
        ..DigestConfig::default()
    };
    let items = config.items.clone();
    let reports = manager(pages, config).run(&items, now(), &AtomicBool::new(false)).await;

    match &reports[2].outcome {
        ItemOutcome::Digests(digests) => {
            assert_eq!(digests.len(), 1);
            assert_eq!(digests[0].assessment.label, ImpactLabel::Unfavorable);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}
