use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use td_core::{Error, Result, TranslationConfig, Translator};

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
    error: Option<String>,
}

/// Client for a LibreTranslate-compatible `/translate` endpoint.
pub struct LibreTranslator {
    client: Arc<Client>,
    url: String,
    api_key: Option<String>,
}

impl LibreTranslator {
    pub fn new(config: &TranslationConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client: Arc::new(client),
            url: config.url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn parse_response(response: TranslateResponse) -> Result<String> {
        match (response.translated_text, response.error) {
            (Some(text), _) => Ok(text),
            (None, Some(error)) => Err(Error::Translation(error)),
            (None, None) => Err(Error::Translation("response carried no text".to_string())),
        }
    }
}

impl fmt::Debug for LibreTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibreTranslator")
            .field("client", &"<reqwest::Client>")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[async_trait]
impl Translator for LibreTranslator {
    fn name(&self) -> &str {
        "LibreTranslate"
    }

    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        let request = TranslateRequest {
            q: text,
            source: source_lang,
            target: target_lang,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self.client.post(&self.url).json(&request).send().await?;
        let status = response.status();
        let body = response.json::<TranslateResponse>().await?;
        if !status.is_success() {
            return Err(Error::Translation(format!(
                "{} returned {}: {}",
                self.url,
                status,
                body.error.unwrap_or_default()
            )));
        }

        Self::parse_response(body)
    }
}
