// Translation capability abstraction
//
// The formatter and workflow only depend on the `Translator` trait; the
// concrete implementation fetches the Google translate web page. Tests
// substitute mocks so no network is involved.

pub mod cache;
pub mod google;

use async_trait::async_trait;

pub use cache::{CacheEntry, TranslationCache};
pub use google::GoogleWebTranslator;

use crate::config::TranslateConfig;
use crate::error::Result;

/// External translation capability consumed by the core.
///
/// `language_pair` is a `source|target` code pair (e.g. `ja|en`) passed
/// through unmodified. Implementations return already HTML-decoded text
/// and fail with `RomajiError::TranslationUnavailable` on transport or
/// parse problems; the core never retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate text to the target language (used for Katakana loanwords).
    async fn translate(&self, text: &str, language_pair: &str) -> Result<String>;

    /// Render text phonetically in the target script (used for
    /// Hiragana/Kanji runs and for whole protected fields).
    async fn transliterate(&self, text: &str, language_pair: &str) -> Result<String>;

    /// Name of this provider, for logging.
    fn provider_name(&self) -> &str;
}

/// Factory for creating translator instances
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Create the default web-page-backed translator
    pub fn create_translator(config: TranslateConfig) -> Box<dyn Translator> {
        Box::new(GoogleWebTranslator::new(config))
    }
}
