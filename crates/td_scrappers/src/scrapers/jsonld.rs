use scraper::{Html, Selector};
use serde_json::Value;

/// Extracts `datePublished` from the JSON-LD blocks of the document.
/// Objects, arrays of objects and `@graph` containers are all searched, in
/// document order.
pub fn extract_date_published(document: &Html) -> Option<String> {
    let script_selector = Selector::parse("script[type='application/ld+json']").ok()?;

    document.select(&script_selector).find_map(|script| {
        let raw = script.text().collect::<String>();
        let json = serde_json::from_str::<Value>(raw.trim()).ok()?;
        find_date_published(&json)
    })
}

fn find_date_published(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => items.iter().find_map(find_date_published),
        Value::Object(obj) => {
            if let Some(date) = obj.get("datePublished").and_then(date_string) {
                return Some(date);
            }
            obj.get("@graph").and_then(find_date_published)
        }
        _ => None,
    }
}

fn date_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) => items.iter().find_map(date_string),
        _ => None,
    }
}
