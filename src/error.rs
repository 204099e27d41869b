//! Unified error types for loading and serving pages.

use std::path::PathBuf;

use comic_archive::error::ArchiveError;
use thiserror::Error;

/// Everything that can abort a book load. The first one observed wins.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error("invalid archive content: {path} is {media_type}")]
    InvalidContent { path: String, media_type: String },
    #[error("cannot open an empty archive")]
    EmptyArchive,
    #[error("load cancelled")]
    Cancelled,
    #[error("Extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a page request could not be answered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Could not load page: no page id given")]
    MissingId,
    #[error("Could not load page: `{0}` is not a page id")]
    InvalidId(String),
    #[error("Could not load page {0}: id does not exist")]
    NotFound(usize),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
