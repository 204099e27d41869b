//! Page discovery: turns archive entries into numbered extraction tasks.

use std::path::Path;

use crate::EntryNames;
use crate::error::ArchiveError;
use crate::is_page_image;

/// One page entry to extract. `id` is the page number the entry will be
/// served under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTask {
    pub id: usize,
    pub path: String,
}

/// Lazy walk over the page entries of an archive.
///
/// Ids start at 0 and grow by one for every entry that passes the image
/// filter. The walk ends after the first traversal error.
pub struct Walk<'a> {
    entries: EntryNames<'a>,
    next_id: usize,
    failed: bool,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(entries: EntryNames<'a>) -> Self {
        Self {
            entries,
            next_id: 0,
            failed: false,
        }
    }
}

impl Iterator for Walk<'_> {
    type Item = Result<EntryTask, ArchiveError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            match self.entries.next()? {
                Ok(path) if is_page_image!(path) => {
                    let id = self.next_id;
                    self.next_id += 1;
                    return Some(Ok(EntryTask { id, path }));
                }
                Ok(path) => log::trace!("Skipping non-page entry: {}", path),
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Sort flat entry names into file-tree order: siblings by name, and a
/// directory's contents at the position of the directory itself.
pub(crate) fn sort_tree_order(names: &mut [String]) {
    names.sort_by(|a, b| Path::new(a).cmp(Path::new(b)));
}
