use std::fmt;

use td_core::{Result, Translator};

/// Returns the text unchanged. Used when no translation service is configured.
pub struct PassthroughTranslator;

impl fmt::Debug for PassthroughTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassthroughTranslator").finish()
    }
}

impl PassthroughTranslator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PassthroughTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Translator for PassthroughTranslator {
    fn name(&self) -> &str {
        "Passthrough"
    }

    async fn translate(&self, text: &str, _source_lang: &str, _target_lang: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passthrough_returns_input() {
        let translator = PassthroughTranslator::new();
        let text = "🔹 IONQ\n- no data";
        assert_eq!(translator.translate(text, "en", "th").await.unwrap(), text);
    }
}
