use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert filenames and tags of the given audio files
    Convert {
        /// Audio files to convert
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Conversion mode (batched or segmented)
        #[arg(long)]
        mode: Option<String>,

        /// Report what would change without touching anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Convert all audio files in a directory tree
    Batch {
        /// Input directory containing audio files
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Conversion mode (batched or segmented)
        #[arg(long)]
        mode: Option<String>,

        /// Report what would change without touching anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Show how a string splits into script runs, without any network calls
    Preview {
        /// Text to segment
        #[arg(short, long)]
        text: String,
    },

    /// Manage the translation cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// List cached translations
    List,

    /// Clear all cached translations
    Clear,
}
