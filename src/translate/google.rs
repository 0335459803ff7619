use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

use super::Translator;
use super::cache::TranslationCache;
use crate::config::TranslateConfig;
use crate::error::{Result, RomajiError};

/// Element carrying the phonetic rendering of the submitted text.
const TRANSLITERATION_ID: &str = "src-translit";
/// Element carrying the translated text.
const TRANSLATION_ID: &str = "result_box";

/// Translator backed by the Google translate web page.
///
/// A single page fetch carries both the translation and the phonetic
/// rendering of the submitted text; each capability extracts its own
/// element. Successful results are cached persistently.
pub struct GoogleWebTranslator {
    client: Client,
    config: TranslateConfig,
    cache: TranslationCache,
}

impl GoogleWebTranslator {
    pub fn new(config: TranslateConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("HTTP client creation should not fail");

        let cache = TranslationCache::new(config.cache_dir.clone());

        Self {
            client,
            config,
            cache,
        }
    }

    async fn fetch_page(&self, text: &str, language_pair: &str) -> Result<String> {
        debug!("Fetching translation page from: {}", self.config.endpoint);

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("hl", "en"),
                ("ie", "UTF8"),
                ("text", text),
                ("langpair", language_pair),
            ])
            .send()
            .await
            .map_err(|e| {
                RomajiError::TranslationUnavailable(format!("HTTP request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(RomajiError::TranslationUnavailable(format!(
                "Translation endpoint returned HTTP {}",
                response.status()
            )));
        }

        response.text().await.map_err(|e| {
            RomajiError::TranslationUnavailable(format!("Failed to read response body: {}", e))
        })
    }

    async fn lookup(&self, text: &str, language_pair: &str, element_id: &str, kind: &str) -> Result<String> {
        let cache_key = TranslationCache::key(text, language_pair, kind);
        if let Some(cached) = self.cache.get(&cache_key).await {
            return Ok(cached);
        }

        let page = self.fetch_page(text, language_pair).await?;

        let output = extract_element_text(&page, element_id).ok_or_else(|| {
            RomajiError::TranslationUnavailable(format!(
                "Response page carries no #{} element",
                element_id
            ))
        })?;

        let output = output.trim().to_string();
        if output.is_empty() {
            return Err(RomajiError::TranslationUnavailable(
                "Empty translation received".to_string(),
            ));
        }

        if let Err(e) = self
            .cache
            .put(&cache_key, text, language_pair, kind, &output)
            .await
        {
            debug!("Skipping cache write: {}", e);
        }

        Ok(output)
    }
}

#[async_trait]
impl Translator for GoogleWebTranslator {
    async fn translate(&self, text: &str, language_pair: &str) -> Result<String> {
        self.lookup(text, language_pair, TRANSLATION_ID, "translate").await
    }

    async fn transliterate(&self, text: &str, language_pair: &str) -> Result<String> {
        self.lookup(text, language_pair, TRANSLITERATION_ID, "transliterate").await
    }

    fn provider_name(&self) -> &str {
        "Google Translate (web)"
    }
}

/// Collect the text content of the element with the given id. Entity
/// escapes are decoded by the HTML parser, so callers receive plain text.
fn extract_element_text(html: &str, id: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse(&format!("#{}", id)).ok()?;

    doc.select(&selector)
        .next()
        .map(|node| node.text().collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
            <div id="result_box">Vampire</div>
            <div id="src-translit" class="translit" dir="ltr">yuki furu yoru</div>
        </body></html>
    "#;

    #[test]
    fn extracts_the_transliteration_element() {
        assert_eq!(
            extract_element_text(PAGE, TRANSLITERATION_ID).as_deref(),
            Some("yuki furu yoru")
        );
    }

    #[test]
    fn extracts_the_translation_element() {
        assert_eq!(
            extract_element_text(PAGE, TRANSLATION_ID).as_deref(),
            Some("Vampire")
        );
    }

    #[test]
    fn entity_escapes_are_decoded() {
        let page = r#"<div id="result_box">Rock &amp; Roll &quot;Night&quot;</div>"#;
        assert_eq!(
            extract_element_text(page, TRANSLATION_ID).as_deref(),
            Some(r#"Rock & Roll "Night""#)
        );
    }

    #[test]
    fn nested_markup_flattens_to_text() {
        let page = r#"<div id="result_box"><span>Yuki</span> <span>Yoru</span></div>"#;
        assert_eq!(
            extract_element_text(page, TRANSLATION_ID).as_deref(),
            Some("Yuki Yoru")
        );
    }

    #[test]
    fn missing_element_yields_none() {
        assert_eq!(extract_element_text("<html><body></body></html>", TRANSLATION_ID), None);
    }
}
