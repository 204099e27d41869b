use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Unsupported archive format: {0}")]
    UnsupportedArchive(PathBuf),
    #[error("Cannot open archive {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Entry not found in archive: {0}")]
    EntryNotFound(String),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[cfg(feature = "rar")]
    #[error("Rar error: {0}")]
    Rar(String),
    #[error("Traversal error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Internal IO error: {0}")]
    Io(#[from] std::io::Error),
}
