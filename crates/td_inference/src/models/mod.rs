use std::sync::Arc;
use std::time::Duration;

use td_core::{Result, TranslationConfig, Translator};

pub mod libre;
pub mod passthrough;

pub use libre::LibreTranslator;
pub use passthrough::PassthroughTranslator;

/// Builds the translator for a translation config, or a passthrough when none
/// is configured.
pub fn create_translator(
    config: Option<&TranslationConfig>,
    timeout: Duration,
) -> Result<Arc<dyn Translator>> {
    match config {
        Some(config) => Ok(Arc::new(LibreTranslator::new(config, timeout)?)),
        None => Ok(Arc::new(PassthroughTranslator::new())),
    }
}
