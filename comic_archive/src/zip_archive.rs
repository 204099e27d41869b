use crate::prelude::*;
use crate::walk::sort_tree_order;
use crate::EntryNames;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use zip::read::ZipArchive;

/// An archive backend for CBZ/ZIP comic archives.
pub struct ZipSource {
    /// Path to the ZIP archive file.
    path: PathBuf,
}

impl ZipSource {
    /// Open a ZIP archive, checking that its central directory can be read.
    pub fn new(path: &Path) -> Result<Self, ArchiveError> {
        ZipArchive::new(open_file(path)?)?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    fn archive(&self) -> Result<ZipArchive<File>, ArchiveError> {
        Ok(ZipArchive::new(open_file(&self.path)?)?)
    }
}

fn open_file(path: &Path) -> Result<File, ArchiveError> {
    File::open(path).map_err(|source| ArchiveError::Open {
        path: path.to_path_buf(),
        source,
    })
}

impl ArchiveBackend for ZipSource {
    fn entries(&self) -> Result<EntryNames<'_>, ArchiveError> {
        let zip = self.archive()?;
        let mut names: Vec<String> = zip
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(str::to_string)
            .collect();
        sort_tree_order(&mut names);
        Ok(Box::new(names.into_iter().map(Ok)))
    }

    fn reader(&self) -> Result<Box<dyn EntryReader>, ArchiveError> {
        Ok(Box::new(ZipEntryReader {
            zip: self.archive()?,
        }))
    }
}

/// Holds its own file handle so workers never share a seek position.
struct ZipEntryReader {
    zip: ZipArchive<File>,
}

impl EntryReader for ZipEntryReader {
    fn open(&mut self, name: &str) -> Result<Box<dyn Read + '_>, ArchiveError> {
        match self.zip.by_name(name) {
            Ok(file) => Ok(Box::new(file)),
            Err(zip::result::ZipError::FileNotFound) => {
                Err(ArchiveError::EntryNotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
