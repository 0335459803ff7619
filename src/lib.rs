//! Romaji - Japanese Audio Filename and Tag Conversion
//!
//! Converts mixed-script Japanese/Latin filenames and metadata tags into
//! readable romanized text by segmenting each field per writing system:
//! Latin text passes through, Hiragana/Kanji is rendered phonetically, and
//! Katakana loanwords are translated back to their source language.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod protect;
pub mod tags;
pub mod token;
pub mod translate;
pub mod workflow;
