#[cfg(feature = "rar")]
pub use crate::RarSource;
pub use crate::error::ArchiveError;
pub use crate::sniff::{Sniffed, is_page_media_type, sniff, sniff_bytes};
pub use crate::walk::{EntryTask, Walk};
pub use crate::{ArchiveBackend, ArchiveSource, EntryReader, FolderSource, ZipSource};
