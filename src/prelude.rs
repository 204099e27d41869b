// std
pub use std::path::{Path, PathBuf};
pub use std::sync::{Arc, Mutex, RwLock};

// external crates
pub use bytes::Bytes;
pub use comic_archive::prelude::{
    ArchiveError, ArchiveSource, EntryReader, EntryTask, is_page_media_type, sniff, sniff_bytes,
};
pub use log::{debug, info, warn};

// crate modules
pub use crate::{
    app::{App, BookInfo},
    config::*,
    error::{ConfigError, LoadError, LookupError},
    loader::{ExtractionResult, LoadState, PageLoader},
    server::{Handler, PageRoutes, PageServer, StaticAssets},
    store::{PageStore, SharedPageStore},
};
