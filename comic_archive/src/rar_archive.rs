use crate::EntryNames;
use crate::prelude::*;
use crate::walk::sort_tree_order;

use std::collections::HashSet;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use unrar::{Archive, CursorBeforeHeader, OpenArchive, Process};

/// An archive backend for RAR/CBR comic archives using the bundled unrar library.
///
/// RAR is read sequentially: reading one entry means scanning the headers
/// before it.
pub struct RarSource {
    /// Path to the RAR archive file.
    path: PathBuf,
}

impl RarSource {
    /// Open a RAR archive, checking that its headers can be listed.
    pub fn new(path: &Path) -> Result<Self, ArchiveError> {
        if !path.is_file() {
            return Err(ArchiveError::Open {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }
        Archive::new(path).open_for_listing().map_err(rar_error)?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

fn rar_error(e: impl std::fmt::Display) -> ArchiveError {
    ArchiveError::Rar(e.to_string())
}

impl ArchiveBackend for RarSource {
    fn entries(&self) -> Result<EntryNames<'_>, ArchiveError> {
        let listing = Archive::new(&self.path)
            .open_for_listing()
            .map_err(rar_error)?;

        let mut names = Vec::new();
        for header in listing {
            let header = header.map_err(rar_error)?;
            if header.is_file() {
                names.push(header.filename.to_string_lossy().into_owned());
            }
        }
        sort_tree_order(&mut names);
        Ok(Box::new(names.into_iter().map(Ok)))
    }

    fn reader(&self) -> Result<Box<dyn EntryReader>, ArchiveError> {
        Ok(Box::new(RarEntryReader {
            path: self.path.clone(),
            cursor: None,
            passed: HashSet::new(),
        }))
    }
}

/// Keeps its place in the archive between opens. Workers ask for entries
/// in walk order, so most opens only scan forward from the last hit.
struct RarEntryReader {
    path: PathBuf,
    cursor: Option<OpenArchive<Process, CursorBeforeHeader>>,
    /// Entries the cursor has moved past since it was last rewound.
    passed: HashSet<String>,
}

impl RarEntryReader {
    fn rewind(&mut self) -> Result<OpenArchive<Process, CursorBeforeHeader>, ArchiveError> {
        log::trace!("Rewinding {:?}", self.path);
        self.passed.clear();
        Archive::new(&self.path)
            .open_for_processing()
            .map_err(rar_error)
    }
}

impl EntryReader for RarEntryReader {
    fn open(&mut self, name: &str) -> Result<Box<dyn Read + '_>, ArchiveError> {
        let mut archive = match self.cursor.take() {
            Some(archive) if !self.passed.contains(name) => archive,
            _ => self.rewind()?,
        };

        while let Some(header) = archive.read_header().map_err(rar_error)? {
            let entry = header.entry().filename.to_string_lossy().into_owned();
            archive = if entry == name {
                let (data, rest) = header.read().map_err(rar_error)?;
                self.passed.insert(entry);
                self.cursor = Some(rest);
                return Ok(Box::new(Cursor::new(data)));
            } else {
                self.passed.insert(entry);
                header.skip().map_err(rar_error)?
            };
        }

        Err(ArchiveError::EntryNotFound(name.to_string()))
    }
}
