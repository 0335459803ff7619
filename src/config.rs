use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, RomajiError};

// Default values for translation configuration
fn default_timeout_secs() -> u64 {
    30
}

fn default_cache_dir() -> String {
    ".romaji/cache/translations".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub translate: TranslateConfig,
    pub convert: ConvertConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Translation page endpoint
    pub endpoint: String,
    /// Source|target language code pair passed through unmodified
    pub language_pair: String,
    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Directory for the persistent translation cache
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConversionMode {
    /// Batched: protect ASCII positions and send each whole field through
    /// a single transliteration call
    Batched,
    /// Segmented: split each field into script runs and dispatch per token
    Segmented,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Conversion orchestration mode
    pub mode: ConversionMode,
    /// Placeholder character for protected ASCII positions
    pub map_char: char,
    /// Separator used to join multi-valued tag fields for conversion
    pub field_separator: char,
    /// Ordered pattern/replacement pairs applied to transliterated output
    pub substitutions: Vec<Substitution>,
    /// Grammatical particles whose casing is restored after title-casing
    pub particles: Vec<String>,
    /// File extensions picked up by directory conversion
    pub audio_extensions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Substitution {
    /// Case-insensitive regex pattern
    pub pattern: String,
    pub replacement: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translate: TranslateConfig {
                endpoint: "https://www.google.com/translate_t".to_string(),
                language_pair: "ja|en".to_string(),
                timeout_secs: default_timeout_secs(),
                cache_dir: default_cache_dir(),
            },
            convert: ConvertConfig {
                mode: ConversionMode::Batched,
                map_char: '`',
                field_separator: ':',
                substitutions: Vec::new(),
                particles: vec![
                    "no".to_string(),
                    "ni".to_string(),
                    "wa".to_string(),
                    "wo".to_string(),
                    "to".to_string(),
                    "ga".to_string(),
                    "de".to_string(),
                    "mo".to_string(),
                    "e".to_string(),
                ],
                audio_extensions: vec![
                    "mp3".to_string(),
                    "flac".to_string(),
                    "m4a".to_string(),
                    "aac".to_string(),
                    "ogg".to_string(),
                    "opus".to_string(),
                    "wav".to_string(),
                    "aiff".to_string(),
                    "wma".to_string(),
                ],
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RomajiError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| RomajiError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| RomajiError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| RomajiError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
