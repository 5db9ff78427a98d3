use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use td_core::{ArticleDigest, ImpactLabel, ItemOutcome, ItemReport, PriceStatus, Translator};
use tracing::warn;

pub const NO_DATA: &str = "no data";
pub const NO_RECENT_COVERAGE: &str = "no recent coverage";

/// Majority vote of favorable against unfavorable labels.
pub fn outlook(labels: impl IntoIterator<Item = ImpactLabel>) -> &'static str {
    let (favorable, unfavorable) = labels.into_iter().fold((0usize, 0usize), |(f, u), label| match label {
        ImpactLabel::Favorable => (f + 1, u),
        ImpactLabel::Unfavorable => (f, u + 1),
        ImpactLabel::Neutral => (f, u),
    });
    if favorable > unfavorable {
        "lean favorable"
    } else if unfavorable > favorable {
        "lean unfavorable"
    } else {
        "mixed"
    }
}

struct Localization {
    translator: Arc<dyn Translator>,
    source: String,
    target: String,
    timeout: Duration,
}

/// Assembles an item report into a plain text block.
pub struct SectionFormatter {
    localization: Option<Localization>,
}

impl SectionFormatter {
    pub fn new() -> Self {
        Self { localization: None }
    }

    pub fn with_translator(
        mut self,
        translator: Arc<dyn Translator>,
        source: impl Into<String>,
        target: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        self.localization = Some(Localization {
            translator,
            source: source.into(),
            target: target.into(),
            timeout,
        });
        self
    }

    /// Renders and then localizes the section. Translation problems leave the
    /// rendered text untouched.
    pub async fn format(&self, report: &ItemReport) -> String {
        let text = self.render(report);
        self.localize(text).await
    }

    pub async fn localize(&self, text: String) -> String {
        let Some(localization) = &self.localization else {
            return text;
        };

        let call = localization
            .translator
            .translate(&text, &localization.source, &localization.target);
        match tokio::time::timeout(localization.timeout, call).await {
            Ok(Ok(translated)) if !translated.trim().is_empty() => translated,
            Ok(Ok(_)) => {
                warn!("🌐 {} returned empty text, keeping original", localization.translator.name());
                text
            }
            Ok(Err(e)) => {
                warn!("🌐 Translation via {} failed: {}", localization.translator.name(), e);
                text
            }
            Err(_) => {
                warn!("🌐 Translation via {} timed out", localization.translator.name());
                text
            }
        }
    }

    pub fn render(&self, report: &ItemReport) -> String {
        let mut out = String::new();
        out.push_str(&header(report));
        out.push('\n');
        if let Some(position) = &report.position {
            if let Some(avg_cost) = position.avg_cost {
                let _ = writeln!(out, "avg: ${:.2}", avg_cost);
            }
            let _ = writeln!(out, "Recommendation: {}", position.recommendation);
        }

        match &report.outcome {
            ItemOutcome::NoData => {
                let _ = writeln!(out, "- {}", NO_DATA);
            }
            ItemOutcome::NoRecentCoverage => {
                let _ = writeln!(out, "- {}", NO_RECENT_COVERAGE);
            }
            ItemOutcome::Digests(digests) => {
                for digest in digests {
                    render_digest(&mut out, digest);
                }
                let _ = writeln!(
                    out,
                    "Outlook: {}",
                    outlook(digests.iter().map(|d| d.assessment.label))
                );
            }
        }

        out.trim_end().to_string()
    }
}

impl Default for SectionFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(report: &ItemReport) -> String {
    match &report.price {
        PriceStatus::NotRequested => format!("🔹 {}", report.symbol),
        PriceStatus::Unavailable => format!("🔹 {} — (no price data)", report.symbol),
        PriceStatus::Available(quote) => format!(
            "🔹 {} — ${:.2} ({:+.2}%)",
            report.symbol, quote.price, quote.change_pct
        ),
    }
}

fn render_digest(out: &mut String, digest: &ArticleDigest) {
    let candidate = &digest.summary.candidate;
    if candidate.publisher.is_empty() {
        let _ = writeln!(out, "• {} [{}]", candidate.title, digest.assessment.label);
    } else {
        let _ = writeln!(
            out,
            "• {} ({}) [{}]",
            candidate.title, candidate.publisher, digest.assessment.label
        );
    }
    for line in &digest.assessment.justification {
        let _ = writeln!(out, "    - {}", line);
    }
}
