use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use td_core::{Error, PageFetcher, PriceSource, Quote, Result};
use tracing::warn;
use url::form_urlencoded;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Quote from a close series. A single close reports no change.
pub fn quote_from_closes(closes: &[f64]) -> Option<Quote> {
    let (&last, rest) = closes.split_last()?;
    let previous = rest.last().copied().unwrap_or(last);
    let change = last - previous;
    let change_pct = if previous != 0.0 { change / previous * 100.0 } else { 0.0 };
    Some(Quote {
        price: round_to(last, 4),
        change: round_to(change, 4),
        change_pct: round_to(change_pct, 2),
    })
}

/// Last close and change from the Yahoo 5-day daily chart.
pub struct YahooChartPrice {
    pages: Arc<dyn PageFetcher>,
    base_url: String,
}

impl YahooChartPrice {
    pub fn new(pages: Arc<dyn PageFetcher>) -> Self {
        Self {
            pages,
            base_url: CHART_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Index symbols such as `^GSPC` are percent-encoded into the path.
    fn chart_url(&self, symbol: &str) -> String {
        let symbol: String = form_urlencoded::byte_serialize(symbol.as_bytes()).collect();
        format!("{}/{}?range=5d&interval=1d", self.base_url.trim_end_matches('/'), symbol)
    }

    fn parse(body: &str) -> Result<Vec<f64>> {
        let response: ChartResponse = serde_json::from_str(body)?;
        let series = response
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .and_then(|result| result.indicators.quote.into_iter().next())
            .ok_or_else(|| Error::Scraping("chart response has no quote series".to_string()))?;
        Ok(series.close.into_iter().flatten().collect())
    }

    async fn closes(&self, symbol: &str) -> Result<Vec<f64>> {
        let body = self.pages.get_text(&self.chart_url(symbol)).await?;
        Self::parse(&body)
    }
}

#[async_trait]
impl PriceSource for YahooChartPrice {
    async fn current_price(&self, symbol: &str) -> Option<Quote> {
        match self.closes(symbol).await {
            Ok(closes) => quote_from_closes(&closes),
            Err(e) => {
                warn!("⚠️ Price lookup failed for {}: {}", symbol, e);
                None
            }
        }
    }
}
