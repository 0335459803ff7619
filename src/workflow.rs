use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::{Config, ConversionMode};
use crate::error::{Result, RomajiError};
use crate::format::TokenFormatter;
use crate::protect::{protect, restore};
use crate::tags::{TagProcessor, TagProcessorFactory, TrackTags};
use crate::translate::{Translator, TranslatorFactory};

/// What happened to a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionStatus {
    Converted,
    Unchanged,
    Failed(String),
}

/// Explicit per-file result returned by the conversion loop.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub source: PathBuf,
    /// Equals `source` when nothing changed or the file failed.
    pub target: PathBuf,
    pub status: ConversionStatus,
}

pub struct Workflow {
    config: Config,
    formatter: TokenFormatter,
    translator: Box<dyn Translator>,
    tags: Box<dyn TagProcessor>,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        let translator = TranslatorFactory::create_translator(config.translate.clone());
        let tags = TagProcessorFactory::create_processor();
        Self::with_backends(config, translator, tags)
    }

    /// Wire explicit backends; used by tests to avoid network and codecs.
    pub fn with_backends(
        config: Config,
        translator: Box<dyn Translator>,
        tags: Box<dyn TagProcessor>,
    ) -> Result<Self> {
        let formatter = TokenFormatter::new(&config.convert, &config.translate.language_pair)?;
        Ok(Self {
            config,
            formatter,
            translator,
            tags,
        })
    }

    /// Convert every audio file under a directory tree.
    pub async fn convert_directory(&self, input_dir: &Path, dry_run: bool) -> Result<Vec<FileOutcome>> {
        info!("Converting directory: {}", input_dir.display());

        if !input_dir.is_dir() {
            return Err(RomajiError::Config(
                "Input path is not a directory".to_string(),
            ));
        }

        let mut audio_files = Vec::new();
        for entry in WalkDir::new(input_dir).into_iter().filter_map(|e| e.ok()) {
            if let Some(extension) = entry.path().extension() {
                if let Some(ext_str) = extension.to_str() {
                    if self
                        .config
                        .convert
                        .audio_extensions
                        .iter()
                        .any(|known| known == &ext_str.to_lowercase())
                    {
                        audio_files.push(entry.path().to_path_buf());
                    }
                }
            }
        }

        info!("Found {} audio files to convert", audio_files.len());

        self.convert_files(&audio_files, dry_run).await
    }

    /// Convert an explicit list of files, continuing past per-file failures.
    pub async fn convert_files(&self, files: &[PathBuf], dry_run: bool) -> Result<Vec<FileOutcome>> {
        let total = files.len();
        let mut outcomes = Vec::with_capacity(total);

        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );

        for (idx, path) in files.iter().enumerate() {
            pb.set_message(
                path.file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string(),
            );

            info!("┌─ Converting file {}/{} ────────", idx + 1, total);
            info!("│ Source: {}", path.display());

            match self.convert_file(path, dry_run).await {
                Ok(outcome) => {
                    info!("│ Target: {}", outcome.target.display());
                    info!("└─────────────────────────────────────");
                    outcomes.push(outcome);
                }
                Err(e) => {
                    warn!("│ Failed: {}", e);
                    warn!("└─────────────────────────────────────");
                    outcomes.push(FileOutcome {
                        source: path.clone(),
                        target: path.clone(),
                        status: ConversionStatus::Failed(e.to_string()),
                    });
                }
            }

            pb.inc(1);
        }

        pb.finish_and_clear();

        Ok(outcomes)
    }

    /// Convert one file: tags, then the filename itself.
    pub async fn convert_file(&self, path: &Path, dry_run: bool) -> Result<FileOutcome> {
        if !path.exists() {
            return Err(RomajiError::FileNotFound(path.display().to_string()));
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let old_tags = self.tags.read_tags(path)?;

        let new_tags = TrackTags {
            title: self.convert_optional(&old_tags.title).await?,
            performers: self.convert_list(&old_tags.performers).await?,
            album_artists: self.convert_list(&old_tags.album_artists).await?,
            album: self.convert_optional(&old_tags.album).await?,
        };

        let new_stem = self.convert_field(&stem).await?;

        if new_stem == stem && new_tags == old_tags {
            return Ok(FileOutcome {
                source: path.to_path_buf(),
                target: path.to_path_buf(),
                status: ConversionStatus::Unchanged,
            });
        }

        let target = if new_stem == stem {
            path.to_path_buf()
        } else {
            // Translated text can contain path separators.
            let file_name = format!("{}{}", new_stem.replace(['/', '\\'], "_"), extension);
            path.parent()
                .map(|parent| parent.join(&file_name))
                .unwrap_or_else(|| PathBuf::from(file_name))
        };

        if !dry_run {
            if new_tags != old_tags {
                self.tags.write_tags(path, &new_tags)?;
            }

            if target != path {
                if target.exists() {
                    return Err(RomajiError::Config(format!(
                        "Refusing to overwrite existing file: {}",
                        target.display()
                    )));
                }
                tokio::fs::rename(path, &target).await?;
                info!("Renamed {} -> {}", path.display(), target.display());
            }
        }

        Ok(FileOutcome {
            source: path.to_path_buf(),
            target,
            status: ConversionStatus::Converted,
        })
    }

    async fn convert_optional(&self, value: &Option<String>) -> Result<Option<String>> {
        match value {
            Some(text) if !text.is_empty() => Ok(Some(self.convert_field(text).await?)),
            _ => Ok(value.clone()),
        }
    }

    /// Multi-valued fields are joined for one conversion pass and split
    /// back afterwards, entries trimmed.
    async fn convert_list(&self, values: &[String]) -> Result<Vec<String>> {
        if values.is_empty() {
            return Ok(Vec::new());
        }

        let separator = self.config.convert.field_separator;
        let joined = values.join(&separator.to_string());
        let converted = self.convert_field(&joined).await?;

        Ok(converted
            .split(separator)
            .map(|item| item.trim().to_string())
            .collect())
    }

    async fn convert_field(&self, text: &str) -> Result<String> {
        let converted = match self.config.convert.mode {
            ConversionMode::Segmented => {
                self.formatter
                    .format_string(text, self.translator.as_ref())
                    .await?
            }
            ConversionMode::Batched => self.convert_field_batched(text).await?,
        };

        Ok(converted.trim().to_string())
    }

    /// Whole-field conversion with ASCII protection: a single external
    /// call covers the entire field, with Latin characters shielded by
    /// placeholders.
    async fn convert_field_batched(&self, text: &str) -> Result<String> {
        if text.chars().all(|c| c.is_ascii()) {
            return Ok(text.to_string());
        }

        let map_char = self.config.convert.map_char;
        let (mapped, map) = protect(text, map_char);

        let translated = self
            .translator
            .transliterate(&mapped, &self.config.translate.language_pair)
            .await?;

        Ok(restore(&translated, &map, map_char))
    }
}
