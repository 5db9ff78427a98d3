use scraper::{ElementRef, Html};

use super::utils::{attr, clean_text, join_paragraphs, paragraphs, parse_selector};

/// One way of pulling the body text out of a page.
pub trait ExtractionStrategy: Send + Sync {
    /// Returns the name of the strategy
    fn name(&self) -> &str;

    /// Returns the extracted text, or `None` when this strategy found nothing
    fn extract(&self, document: &Html) -> Option<String>;
}

/// Text of the first region matching one of `selectors`: its paragraphs when
/// it has any, otherwise all of its text.
pub struct RegionText {
    name: &'static str,
    selectors: &'static [&'static str],
}

impl RegionText {
    pub fn article_body() -> Self {
        Self {
            name: "article-body",
            selectors: &["[itemprop='articleBody']", ".article-body", ".caas-body", "article"],
        }
    }

    pub fn main_content() -> Self {
        Self {
            name: "main-content",
            selectors: &["main", "[role='main']", "#main-content", ".main-content"],
        }
    }
}

impl ExtractionStrategy for RegionText {
    fn name(&self) -> &str {
        self.name
    }

    fn extract(&self, document: &Html) -> Option<String> {
        self.selectors.iter().find_map(|css| {
            let selector = parse_selector(css).ok()?;
            document.select(&selector).find_map(|region| {
                join_paragraphs(paragraphs(region)).or_else(|| {
                    let text = clean_text(region);
                    (!text.is_empty()).then_some(text)
                })
            })
        })
    }
}

/// The paragraphs of the parent element whose `<p>` children carry the most text.
pub struct LargestParagraphBlock;

impl ExtractionStrategy for LargestParagraphBlock {
    fn name(&self) -> &str {
        "largest-block"
    }

    fn extract(&self, document: &Html) -> Option<String> {
        let selector = parse_selector("p").ok()?;
        let mut blocks: Vec<(Option<ElementRef<'_>>, Vec<String>, usize)> = Vec::new();

        for paragraph in document.select(&selector) {
            let text = clean_text(paragraph);
            if text.is_empty() {
                continue;
            }
            let parent = paragraph.parent().and_then(ElementRef::wrap);
            let len = text.chars().count();
            match blocks.iter_mut().find(|(id, _, _)| *id == parent) {
                Some((_, texts, total)) => {
                    texts.push(text);
                    *total += len;
                }
                None => blocks.push((parent, vec![text], len)),
            }
        }

        let mut best: Option<(Vec<String>, usize)> = None;
        for (_, texts, total) in blocks {
            if best.as_ref().map_or(true, |(_, best_total)| total > *best_total) {
                best = Some((texts, total));
            }
        }
        best.and_then(|(texts, _)| join_paragraphs(texts))
    }
}

/// Every paragraph on the page.
pub struct AllParagraphs;

impl ExtractionStrategy for AllParagraphs {
    fn name(&self) -> &str {
        "all-paragraphs"
    }

    fn extract(&self, document: &Html) -> Option<String> {
        join_paragraphs(paragraphs(document.root_element()))
    }
}

/// The page's short description meta field.
pub struct MetaDescription;

impl ExtractionStrategy for MetaDescription {
    fn name(&self) -> &str {
        "meta-description"
    }

    fn extract(&self, document: &Html) -> Option<String> {
        attr(document, "meta[name='description']", "content")
            .or_else(|| attr(document, "meta[property='og:description']", "content"))
    }
}

/// The extraction chain in priority order.
pub fn default_strategies() -> Vec<Box<dyn ExtractionStrategy>> {
    vec![
        Box::new(RegionText::article_body()),
        Box::new(RegionText::main_content()),
        Box::new(LargestParagraphBlock),
        Box::new(AllParagraphs),
        Box::new(MetaDescription),
    ]
}
