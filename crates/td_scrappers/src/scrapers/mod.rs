pub mod extract;
pub mod fetcher;
pub mod jsonld;
pub mod timestamp;

pub use extract::{default_strategies, ExtractionStrategy};
pub use fetcher::ArticleFetcher;

/// Common utilities for page extraction
pub(crate) mod utils {
    use scraper::{ElementRef, Html, Selector};
    use td_core::{Error, Result};

    pub fn parse_selector(selector: &str) -> Result<Selector> {
        Selector::parse(selector)
            .map_err(|e| Error::Scraping(format!("Invalid selector {}: {:?}", selector, e)))
    }

    const HIDDEN: &[&str] = &["script", "style", "noscript", "template"];

    /// Element text with runs of whitespace collapsed to single spaces.
    /// Text inside script and style elements is skipped.
    pub fn clean_text(element: ElementRef<'_>) -> String {
        element
            .descendants()
            .filter_map(|node| node.value().as_text().map(|text| (node, text)))
            .filter(|(node, _)| {
                !node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .map_or(false, |el| HIDDEN.contains(&el.name()))
                })
            })
            .map(|(_, text)| &**text)
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn attr(document: &Html, selector: &str, name: &str) -> Option<String> {
        let selector = parse_selector(selector).ok()?;
        document
            .select(&selector)
            .filter_map(|el| el.value().attr(name))
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(str::to_string)
    }

    pub fn first_text(document: &Html, selector: &str) -> Option<String> {
        let selector = parse_selector(selector).ok()?;
        document
            .select(&selector)
            .map(clean_text)
            .find(|text| !text.is_empty())
    }

    pub fn paragraphs(element: ElementRef<'_>) -> Vec<String> {
        let Ok(selector) = parse_selector("p") else {
            return Vec::new();
        };
        element
            .select(&selector)
            .map(clean_text)
            .filter(|text| !text.is_empty())
            .collect()
    }

    pub fn join_paragraphs(paragraphs: Vec<String>) -> Option<String> {
        if paragraphs.is_empty() {
            None
        } else {
            Some(paragraphs.join("\n\n"))
        }
    }
}
