//! Read-only access to comic archives (CBZ, CBR, folders) for page extraction.

pub mod error;
pub mod prelude;
pub mod sniff;
pub mod walk;

mod zip_archive;
pub use zip_archive::ZipSource;

mod folder_archive;
pub use folder_archive::FolderSource;

#[cfg(feature = "rar")]
mod rar_archive;
#[cfg(feature = "rar")]
pub use rar_archive::RarSource;

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::prelude::*;

/// Page filenames the walker hands out. The match is case-sensitive.
#[macro_export]
macro_rules! is_page_image {
    ($name:expr) => {
        $name.ends_with(".jpg") || $name.ends_with(".jpeg") || $name.ends_with(".png")
    };
}

/// Container extensions offered to the user when picking a book.
pub const COMIC_EXTENSIONS: &[&str] = &[
    "cbz",
    "zip",
    #[cfg(feature = "rar")]
    "cbr",
    #[cfg(feature = "rar")]
    "rar",
];

/// Returns true when `path` looks like a container [`ArchiveSource::open`] accepts.
pub fn is_comic_archive(path: &Path) -> bool {
    if path.is_dir() {
        return true;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| COMIC_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Entry names of an archive, in the archive's own order.
pub type EntryNames<'a> = Box<dyn Iterator<Item = Result<String, ArchiveError>> + Send + 'a>;

/// A container format backend.
pub trait ArchiveBackend: Send + Sync {
    /// Every regular file in the container. Directory entries are not listed.
    fn entries(&self) -> Result<EntryNames<'_>, ArchiveError>;

    /// A fresh handle for reading entries. Each worker owns one.
    fn reader(&self) -> Result<Box<dyn EntryReader>, ArchiveError>;
}

/// Per-worker entry access. The returned reader borrows the handle, so at
/// most one entry is open per handle and it is closed on drop.
pub trait EntryReader: Send {
    fn open(&mut self, name: &str) -> Result<Box<dyn Read + '_>, ArchiveError>;
}

/// An opened archive, viewed as a read-only file tree.
pub struct ArchiveSource {
    path: PathBuf,
    backend: Box<dyn ArchiveBackend>,
}

impl ArchiveSource {
    /// Open the container at `path`, picking the backend from the extension.
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let backend: Box<dyn ArchiveBackend> = if path.is_dir() {
            Box::new(FolderSource::new(path)?)
        } else {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_lowercase();

            match ext.as_str() {
                "cbz" | "zip" => Box::new(ZipSource::new(path)?),
                #[cfg(feature = "rar")]
                "cbr" | "rar" => Box::new(RarSource::new(path)?),
                _ => return Err(ArchiveError::UnsupportedArchive(path.to_path_buf())),
            }
        };

        log::debug!("Opened archive {:?}", path);
        Ok(Self {
            path: path.to_path_buf(),
            backend,
        })
    }

    /// Start a new walk over the page entries. Every call re-reads the archive.
    pub fn walk(&self) -> Result<Walk<'_>, ArchiveError> {
        Ok(Walk::new(self.backend.entries()?))
    }

    pub fn reader(&self) -> Result<Box<dyn EntryReader>, ArchiveError> {
        self.backend.reader()
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }
}
