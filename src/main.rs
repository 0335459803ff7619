//! Romaji - Japanese Audio Filename and Tag Conversion
//!
//! This is the main entry point for the romaji application, which renames
//! audio files and rewrites their metadata tags from mixed Japanese/Latin
//! text into readable romanized text.

use anyhow::Result;
use clap::Parser;
use tracing::{Level, info};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use romaji::cli::{Args, CacheAction, Commands};
use romaji::config::{Config, ConversionMode};
use romaji::error::RomajiError;
use romaji::token::segment;
use romaji::translate::TranslationCache;
use romaji::workflow::{ConversionStatus, FileOutcome, Workflow};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    // Load configuration
    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            // Try to load config.toml from current directory first
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    // Execute command
    match args.command {
        Commands::Convert { files, mode, dry_run } => {
            if let Some(mode) = mode {
                config.convert.mode = parse_conversion_mode(&mode)?;
            }

            let workflow = Workflow::new(config)?;
            let outcomes = workflow.convert_files(&files, dry_run).await?;
            print_outcomes(&outcomes, dry_run);
        }

        Commands::Batch { input_dir, mode, dry_run } => {
            if let Some(mode) = mode {
                config.convert.mode = parse_conversion_mode(&mode)?;
            }

            let workflow = Workflow::new(config)?;
            let outcomes = workflow.convert_directory(&input_dir, dry_run).await?;
            print_outcomes(&outcomes, dry_run);
        }

        Commands::Preview { text } => {
            let tokens = segment(&text);

            println!("\nScript runs:");
            println!("{:<12} {:<8} {}", "Class", "Prefix", "Text");
            println!("{}", "-".repeat(50));

            for token in tokens {
                println!(
                    "{:<12} {:<8} {:?}",
                    format!("{:?}", token.class),
                    format!("{:?}", token.prefix),
                    token.text
                );
            }
        }

        Commands::Cache { action } => {
            let cache = TranslationCache::new(config.translate.cache_dir.clone());

            match action {
                CacheAction::List => {
                    let entries = cache.list().await?;

                    if entries.is_empty() {
                        println!("No cached translations found.");
                    } else {
                        println!("\nCached Translations:");
                        println!("{:<15} {:<10} {:<15} {:<40}", "Pair", "Kind", "Cached", "Source");
                        println!("{}", "-".repeat(80));

                        for entry in entries {
                            let cached_ago = std::time::SystemTime::now()
                                .duration_since(std::time::UNIX_EPOCH)
                                .unwrap_or_default()
                                .as_secs()
                                .saturating_sub(entry.cached_at);

                            println!(
                                "{:<15} {:<10} {:<15} {:<40}",
                                entry.language_pair,
                                entry.kind,
                                format_duration(cached_ago),
                                entry.source_text
                            );
                        }
                    }
                }
                CacheAction::Clear => {
                    let count = cache.clear().await?;
                    println!("Cleared {} cached translations", count);
                }
            }
        }
    }

    Ok(())
}

/// Print per-file results and a summary line
fn print_outcomes(outcomes: &[FileOutcome], dry_run: bool) {
    let mut converted = 0;
    let mut unchanged = 0;
    let mut failed = 0;

    for outcome in outcomes {
        match &outcome.status {
            ConversionStatus::Converted => {
                converted += 1;
                println!(
                    "{} -> {}",
                    outcome.source.display(),
                    outcome.target.display()
                );
            }
            ConversionStatus::Unchanged => {
                unchanged += 1;
                println!("{} (unchanged)", outcome.source.display());
            }
            ConversionStatus::Failed(reason) => {
                failed += 1;
                println!("{} FAILED: {}", outcome.source.display(), reason);
            }
        }
    }

    let prefix = if dry_run { "Would convert" } else { "Converted" };
    println!(
        "\n{} {} file(s), {} unchanged, {} failed",
        prefix, converted, unchanged, failed
    );
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let romaji_dir = std::env::current_dir()?.join(".romaji");
    let log_dir = romaji_dir.join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "romaji.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Create console layer
    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    // Create file layer
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    // Setup layered subscriber
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    // Initialize the subscriber
    subscriber
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Format duration in seconds to human readable string
fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    }
}

/// Parse conversion mode from string
fn parse_conversion_mode(mode: &str) -> Result<ConversionMode> {
    match mode.to_lowercase().as_str() {
        "batched" => Ok(ConversionMode::Batched),
        "segmented" => Ok(ConversionMode::Segmented),
        _ => Err(RomajiError::Config(format!(
            "Invalid conversion mode '{}'. Valid modes: batched, segmented",
            mode
        ))
        .into()),
    }
}
