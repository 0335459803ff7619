//! Per-token translation dispatch and output formatting.
//!
//! Latin tokens pass through untouched. Kana/Kanji tokens are rendered
//! phonetically and cleaned up (ordered substitutions, title-casing,
//! particle casing restoration). Katakana tokens are translated and
//! title-cased. The token prefix computed at segmentation time is
//! re-attached last.

use regex::{Regex, RegexBuilder};

use crate::config::ConvertConfig;
use crate::error::{Result, RomajiError};
use crate::token::{ScriptClass, TextToken, segment};
use crate::translate::Translator;

/// Formatter with the configured substitution and particle patterns
/// compiled once.
#[derive(Debug)]
pub struct TokenFormatter {
    substitutions: Vec<(Regex, String)>,
    particles: Vec<(Regex, String)>,
    language_pair: String,
}

impl TokenFormatter {
    pub fn new(config: &ConvertConfig, language_pair: &str) -> Result<Self> {
        let mut substitutions = Vec::with_capacity(config.substitutions.len());
        for sub in &config.substitutions {
            let regex = RegexBuilder::new(&sub.pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    RomajiError::Config(format!(
                        "Invalid substitution pattern '{}': {}",
                        sub.pattern, e
                    ))
                })?;
            substitutions.push((regex, sub.replacement.clone()));
        }

        let mut particles = Vec::with_capacity(config.particles.len());
        for particle in &config.particles {
            let regex = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(particle)))
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    RomajiError::Config(format!("Invalid particle '{}': {}", particle, e))
                })?;
            particles.push((regex, particle.clone()));
        }

        Ok(Self {
            substitutions,
            particles,
            language_pair: language_pair.to_string(),
        })
    }

    /// Format a single token, invoking the external capability as its
    /// script class requires.
    pub async fn format_token(
        &self,
        token: &TextToken,
        translator: &dyn Translator,
    ) -> Result<String> {
        match token.class {
            ScriptClass::Latin => Ok(format!("{}{}", token.prefix, token.text)),

            ScriptClass::KanaKanji => {
                let phonetic = translator
                    .transliterate(&token.text, &self.language_pair)
                    .await?;

                let mut out = phonetic;
                // Later substitutions see the results of earlier ones.
                for (regex, replacement) in &self.substitutions {
                    out = regex.replace_all(&out, replacement.as_str()).into_owned();
                }
                out = title_case(&out);
                for (regex, canonical) in &self.particles {
                    out = regex.replace_all(&out, canonical.as_str()).into_owned();
                }

                Ok(format!("{}{}", token.prefix, out.trim()))
            }

            ScriptClass::Katakana => {
                let translated = translator
                    .translate(&token.text, &self.language_pair)
                    .await?;

                let out = title_case(&translated);
                Ok(format!("{}{}", token.prefix, out.trim()))
            }
        }
    }

    /// Segment a whole string and format every token in order.
    pub async fn format_string(
        &self,
        text: &str,
        translator: &dyn Translator,
    ) -> Result<String> {
        let mut out = String::with_capacity(text.len());
        for token in segment(text) {
            out.push_str(&self.format_token(&token, translator).await?);
        }
        Ok(out)
    }
}

/// Capitalize the first letter of every whitespace-delimited word, leaving
/// the rest of each word untouched.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for c in text.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConvertConfig, Substitution};
    use crate::error::RomajiError;
    use crate::translate::MockTranslator;

    fn convert_config(substitutions: Vec<(&str, &str)>, particles: Vec<&str>) -> ConvertConfig {
        let mut config = crate::config::Config::default().convert;
        config.substitutions = substitutions
            .into_iter()
            .map(|(pattern, replacement)| Substitution {
                pattern: pattern.to_string(),
                replacement: replacement.to_string(),
            })
            .collect();
        config.particles = particles.into_iter().map(String::from).collect();
        config
    }

    fn formatter(substitutions: Vec<(&str, &str)>, particles: Vec<&str>) -> TokenFormatter {
        TokenFormatter::new(&convert_config(substitutions, particles), "ja|en").unwrap()
    }

    fn token(class: ScriptClass, text: &str, prefix: &str) -> TextToken {
        TextToken {
            class,
            text: text.to_string(),
            prefix: prefix.to_string(),
        }
    }

    #[test]
    fn title_case_capitalizes_each_word() {
        assert_eq!(title_case("yuki furu yoru"), "Yuki Furu Yoru");
        assert_eq!(title_case("  double  spaced "), "  Double  Spaced ");
        assert_eq!(title_case("already Upper"), "Already Upper");
        assert_eq!(title_case(""), "");
    }

    #[tokio::test]
    async fn latin_token_passes_through_without_external_calls() {
        let formatter = formatter(vec![], vec![]);
        // No expectations: any translator call panics the test.
        let translator = MockTranslator::new();

        let token = token(ScriptClass::Latin, "Cake 01. ", " ");
        let out = formatter.format_token(&token, &translator).await.unwrap();
        assert_eq!(out, " Cake 01. ");
    }

    #[tokio::test]
    async fn kanakanji_token_is_transliterated_and_title_cased() {
        let formatter = formatter(vec![], vec!["no"]);
        let mut translator = MockTranslator::new();
        translator
            .expect_transliterate()
            .withf(|text, pair| text == "雪の夜" && pair == "ja|en")
            .returning(|_, _| Ok("yuki no yoru".to_string()));

        let token = token(ScriptClass::KanaKanji, "雪の夜", "");
        let out = formatter.format_token(&token, &translator).await.unwrap();
        assert_eq!(out, "Yuki no Yoru");
    }

    #[tokio::test]
    async fn katakana_token_is_translated_without_particle_handling() {
        let formatter = formatter(vec![], vec!["no"]);
        let mut translator = MockTranslator::new();
        translator
            .expect_translate()
            .withf(|text, pair| text == "ヴァンパイア" && pair == "ja|en")
            .returning(|_, _| Ok("vampire no more".to_string()));

        let token = token(ScriptClass::Katakana, "ヴァンパイア", " ");
        let out = formatter.format_token(&token, &translator).await.unwrap();
        // Particles apply only to the phonetic path.
        assert_eq!(out, " Vampire No More");
    }

    #[tokio::test]
    async fn substitutions_apply_in_order_case_insensitively() {
        let formatter = formatter(vec![("tu", "tsu"), ("tsuki", "zuki")], vec![]);
        let mut translator = MockTranslator::new();
        translator
            .expect_transliterate()
            .returning(|_, _| Ok("Tuki".to_string()));

        let token = token(ScriptClass::KanaKanji, "月", "");
        let out = formatter.format_token(&token, &translator).await.unwrap();
        // "Tuki" -> "tsuki" (first substitution, case-insensitive)
        //        -> "zuki" (second substitution sees the first's output)
        assert_eq!(out, "Zuki");
    }

    #[tokio::test]
    async fn particles_regain_their_canonical_casing_after_title_casing() {
        let formatter = formatter(vec![], vec!["no", "wa"]);
        let mut translator = MockTranslator::new();
        translator
            .expect_transliterate()
            .returning(|_, _| Ok("kimi wa boku no hikari".to_string()));

        let token = token(ScriptClass::KanaKanji, "君は僕の光", "");
        let out = formatter.format_token(&token, &translator).await.unwrap();
        assert_eq!(out, "Kimi wa Boku no Hikari");
    }

    #[tokio::test]
    async fn particle_matching_respects_word_boundaries() {
        let formatter = formatter(vec![], vec!["no"]);
        let mut translator = MockTranslator::new();
        translator
            .expect_transliterate()
            .returning(|_, _| Ok("north no note".to_string()));

        let token = token(ScriptClass::KanaKanji, "北", "");
        let out = formatter.format_token(&token, &translator).await.unwrap();
        // Only the standalone word is lowered back.
        assert_eq!(out, "North no Note");
    }

    #[tokio::test]
    async fn transliterated_output_is_trimmed_before_the_prefix() {
        let formatter = formatter(vec![], vec![]);
        let mut translator = MockTranslator::new();
        translator
            .expect_transliterate()
            .returning(|_, _| Ok("  yoru \n".to_string()));

        let token = token(ScriptClass::KanaKanji, "夜", " ");
        let out = formatter.format_token(&token, &translator).await.unwrap();
        assert_eq!(out, " Yoru");
    }

    #[tokio::test]
    async fn translation_failures_propagate_unchanged() {
        let formatter = formatter(vec![], vec![]);
        let mut translator = MockTranslator::new();
        translator.expect_transliterate().returning(|_, _| {
            Err(RomajiError::TranslationUnavailable("offline".to_string()))
        });

        let token = token(ScriptClass::KanaKanji, "夜", "");
        let err = formatter.format_token(&token, &translator).await.unwrap_err();
        assert!(matches!(err, RomajiError::TranslationUnavailable(_)));
    }

    #[tokio::test]
    async fn format_string_concatenates_tokens_in_order() {
        let formatter = formatter(vec![], vec![]);
        let mut translator = MockTranslator::new();
        translator
            .expect_translate()
            .withf(|text, _| text == "ヴァンパイア")
            .returning(|_, _| Ok("vampire".to_string()));
        translator
            .expect_transliterate()
            .withf(|text, _| text == "雪降る夜")
            .returning(|_, _| Ok("yuki furu yoru".to_string()));

        let out = formatter
            .format_string("Cake 01. ヴァンパイア雪降る夜", &translator)
            .await
            .unwrap();
        assert_eq!(out, "Cake 01. Vampire Yuki Furu Yoru");
    }

    #[tokio::test]
    async fn ascii_only_string_makes_no_external_calls() {
        let formatter = formatter(vec![], vec![]);
        let translator = MockTranslator::new();

        let out = formatter
            .format_string("Plain English 42", &translator)
            .await
            .unwrap();
        assert_eq!(out, "Plain English 42");
    }

    #[test]
    fn invalid_substitution_pattern_is_a_config_error() {
        let config = convert_config(vec![("[", "x")], vec![]);
        let err = TokenFormatter::new(&config, "ja|en").unwrap_err();
        assert!(matches!(err, RomajiError::Config(_)));
    }
}
