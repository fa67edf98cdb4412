//! Error types for quran-drawer
//!
//! Each subsystem gets its own enum; the search drawer collapses every
//! `SearchError` into a single error state before it reaches the view.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a remote search request
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search API responded with {0}")]
    Status(StatusCode),

    #[error("malformed search response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure while loading chapter audio
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("audio request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("audio API responded with {0}")]
    Status(StatusCode),

    #[error("malformed audio response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no audio file for chapter {chapter} by reciter {reciter}")]
    NotFound { reciter: u32, chapter: u16 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history file is corrupt: {0}")]
    Format(#[from] serde_json::Error),
}
