use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use scraper::Html;
use td_core::Published;

use super::jsonld;
use super::utils::{attr, first_text};

/// Structured metadata locations, checked before JSON-LD and `<time>`.
const META_LOCATIONS: &[&str] = &[
    "meta[property='article:published_time']",
    "meta[property='og:published_time']",
    "meta[itemprop='datePublished']",
    "meta[name='pubdate']",
    "meta[name='publishdate']",
    "meta[name='date']",
];

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Finds the publication time of a page.
pub fn discover(document: &Html) -> Published {
    let raw = META_LOCATIONS
        .iter()
        .find_map(|selector| attr(document, selector, "content"))
        .or_else(|| jsonld::extract_date_published(document))
        .or_else(|| attr(document, "time[datetime]", "datetime"))
        .or_else(|| first_text(document, "time"));

    match raw {
        Some(raw) => normalize(&raw),
        None => Published::Unknown,
    }
}

/// Parses a raw timestamp into a UTC instant, keeping it as `Raw` when none of
/// the known layouts match. Naive values are taken as UTC.
pub fn normalize(raw: &str) -> Published {
    let raw = raw.trim();
    if raw.is_empty() {
        return Published::Unknown;
    }

    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Published::At(at.with_timezone(&Utc));
    }
    if let Ok(at) = DateTime::parse_from_rfc2822(raw) {
        return Published::At(at.with_timezone(&Utc));
    }
    if let Ok(at) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Published::At(at.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
            return Published::At(at.and_utc());
        }
    }
    if let Some(at) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Published::At(at.and_utc());
    }

    Published::Raw(raw.to_string())
}
