use chrono::{DateTime, Duration, Utc};
use td_core::{Article, DigestConfig};

/// Decides freshness for articles whose publication time could not be parsed.
pub trait RecencyOracle: Send + Sync {
    fn name(&self) -> &str;

    fn looks_recent(&self, article: &Article, now: DateTime<Utc>) -> bool;
}

/// Accepts undated articles that carry a recency phrase in the title or raw
/// timestamp, or the current year or month abbreviation in the title, URL or
/// raw timestamp.
///
/// This is a loose textual heuristic: "mar" matches "market", and any page
/// from earlier this year passes the year check.
#[derive(Debug, Clone)]
pub struct HeadlineDateOracle {
    phrases: Vec<String>,
}

impl HeadlineDateOracle {
    pub fn new(phrases: &[String]) -> Self {
        Self {
            phrases: phrases.iter().map(|p| p.to_lowercase()).collect(),
        }
    }
}

impl RecencyOracle for HeadlineDateOracle {
    fn name(&self) -> &str {
        "headline-date"
    }

    fn looks_recent(&self, article: &Article, now: DateTime<Utc>) -> bool {
        let title = article.candidate.title.to_lowercase();
        let raw = article.published.raw().unwrap_or_default().to_lowercase();
        if self
            .phrases
            .iter()
            .any(|p| title.contains(p.as_str()) || raw.contains(p.as_str()))
        {
            return true;
        }

        let year = now.format("%Y").to_string();
        let month = now.format("%b").to_string().to_lowercase();
        let url = article.candidate.url.to_lowercase();

        [title.as_str(), url.as_str(), raw.as_str()]
            .iter()
            .any(|field| field.contains(&year) || field.contains(&month))
    }
}

/// Treats every undated article as stale.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectUndated;

impl RecencyOracle for RejectUndated {
    fn name(&self) -> &str {
        "reject-undated"
    }

    fn looks_recent(&self, _article: &Article, _now: DateTime<Utc>) -> bool {
        false
    }
}

pub struct RecencyFilter {
    oracle: Box<dyn RecencyOracle>,
}

impl RecencyFilter {
    pub fn new(oracle: Box<dyn RecencyOracle>) -> Self {
        Self { oracle }
    }

    pub fn from_config(config: &DigestConfig) -> Self {
        Self::new(Box::new(HeadlineDateOracle::new(&config.recency_phrases)))
    }

    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }

    /// A parsed timestamp is fresh when `0 <= now - published <= window`.
    pub fn is_fresh(&self, article: &Article, window_hours: u32, now: DateTime<Utc>) -> bool {
        match article.published.instant() {
            Some(published) => {
                let age = now.signed_duration_since(published);
                age >= Duration::zero() && age <= Duration::hours(i64::from(window_hours))
            }
            None => self.oracle.looks_recent(article, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use td_core::{Candidate, Published};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 12, 15, 0, 0).unwrap()
    }

    fn article(title: &str, url: &str, published: Published) -> Article {
        Article {
            candidate: Candidate::new(title, url, "Wire"),
            content: "Body text.".to_string(),
            published,
        }
    }

    fn filter() -> RecencyFilter {
        RecencyFilter::from_config(&DigestConfig::default())
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let at_edge = article("t", "https://x/a", Published::At(now() - Duration::hours(48)));
        assert!(filter().is_fresh(&at_edge, 48, now()));

        let past_edge = article(
            "t",
            "https://x/a",
            Published::At(now() - Duration::hours(48) - Duration::microseconds(1)),
        );
        assert!(!filter().is_fresh(&past_edge, 48, now()));

        let exactly_now = article("t", "https://x/a", Published::At(now()));
        assert!(filter().is_fresh(&exactly_now, 48, now()));
    }

    #[test]
    fn test_future_timestamp_is_stale() {
        let ahead = article("t", "https://x/a", Published::At(now() + Duration::minutes(5)));
        assert!(!filter().is_fresh(&ahead, 48, now()));
    }

    #[test]
    fn test_parsed_timestamp_ignores_headline() {
        let old = article("Breaking today", "https://x/2024/jun/a", Published::At(now() - Duration::days(30)));
        assert!(!filter().is_fresh(&old, 48, now()));
    }

    #[test]
    fn test_undated_uses_heuristic() {
        let phrase = article("Shares jump today on contract", "https://x/a", Published::Unknown);
        assert!(filter().is_fresh(&phrase, 48, now()));

        let dated_url = article("Shares", "https://x/2024/06/a", Published::Unknown);
        assert!(filter().is_fresh(&dated_url, 48, now()));

        let raw = article("Shares", "https://x/a", Published::Raw("Jun 11 at 4pm".to_string()));
        assert!(filter().is_fresh(&raw, 48, now()));

        let nothing = article("Shares", "https://x/a", Published::Unknown);
        assert!(!filter().is_fresh(&nothing, 48, now()));
    }

    #[test]
    fn test_relative_raw_timestamp_is_recent() {
        let relative = article("Shares climb on contract", "https://x/a", Published::Raw("2 hours ago".to_string()));
        assert!(filter().is_fresh(&relative, 48, now()));

        let stale_text = article("Shares climb on contract", "https://x/a", Published::Raw("last autumn".to_string()));
        assert!(!filter().is_fresh(&stale_text, 48, now()));
    }

    #[test]
    fn test_reject_undated() {
        let filter = RecencyFilter::new(Box::new(RejectUndated));
        let phrase = article("Shares jump today", "https://x/2024/a", Published::Unknown);
        assert!(!filter.is_fresh(&phrase, 48, now()));
        assert_eq!(filter.oracle_name(), "reject-undated");
    }
}
