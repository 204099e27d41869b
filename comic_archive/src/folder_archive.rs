use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::EntryNames;
use crate::error::ArchiveError;
use crate::{ArchiveBackend, EntryReader};

/// A directory of page images, walked recursively.
pub struct FolderSource {
    pub path: PathBuf,
}

impl FolderSource {
    pub fn new(path: &Path) -> Result<Self, ArchiveError> {
        if !path.is_dir() {
            return Err(ArchiveError::UnsupportedArchive(path.to_path_buf()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl ArchiveBackend for FolderSource {
    fn entries(&self) -> Result<EntryNames<'_>, ArchiveError> {
        let root = self.path.as_path();
        let walk = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_dir() => None,
                Ok(entry) => {
                    let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
                    Some(Ok(rel.to_string_lossy().into_owned()))
                }
                Err(e) => Some(Err(ArchiveError::Walk(e))),
            });
        Ok(Box::new(walk))
    }

    fn reader(&self) -> Result<Box<dyn EntryReader>, ArchiveError> {
        Ok(Box::new(FolderEntryReader {
            root: self.path.clone(),
        }))
    }
}

struct FolderEntryReader {
    root: PathBuf,
}

impl EntryReader for FolderEntryReader {
    fn open(&mut self, name: &str) -> Result<Box<dyn Read + '_>, ArchiveError> {
        let path = self.root.join(name);
        let file = File::open(&path).map_err(|source| ArchiveError::Open { path, source })?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_walks_nested_folders_in_tree_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("b.png"), b"b").unwrap();
        fs::write(root.join("a.png"), b"a").unwrap();
        fs::write(root.join("a/z.png"), b"z").unwrap();
        fs::write(root.join("a/b/c.png"), b"c").unwrap();

        let source = FolderSource::new(root).unwrap();
        let names: Vec<String> = source.entries().unwrap().map(Result::unwrap).collect();
        assert_eq!(names, ["a/b/c.png", "a/z.png", "a.png", "b.png"]);
    }

    #[test]
    fn test_reader() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("01.png"), b"page").unwrap();

        let source = FolderSource::new(temp_dir.path()).unwrap();
        let mut reader = source.reader().unwrap();
        let mut buf = Vec::new();
        reader.open("01.png").unwrap().read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"page");
        assert!(matches!(reader.open("02.png"), Err(ArchiveError::Open { .. })));
    }

    #[test]
    fn test_requires_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("file.png");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(
            FolderSource::new(&file),
            Err(ArchiveError::UnsupportedArchive(_))
        ));
    }
}
