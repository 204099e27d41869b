//! Operations exposed to the application shell.

use crate::prelude::*;

pub use comic_archive::{COMIC_EXTENSIONS, is_comic_archive};

/// Result of a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookInfo {
    /// Page the reader should open first.
    pub id: usize,
    pub pages: usize,
}

/// Owns the page store and everything that reads or writes it.
pub struct App {
    loader: PageLoader,
    pages: PageServer,
    route_prefix: String,
}

impl App {
    pub fn new(settings: &Settings) -> Self {
        let store = PageStore::shared();
        Self {
            loader: PageLoader::new(Arc::clone(&store), settings.worker_count()),
            pages: PageServer::new(store),
            route_prefix: settings.route_prefix.clone(),
        }
    }

    /// Replace the current book with the one at `path`. Pages `0..pages`
    /// resolve once this returns `Ok`.
    pub async fn load_book(&self, path: impl AsRef<Path>) -> Result<BookInfo, LoadError> {
        let pages = self.loader.load_book(path).await?;
        Ok(BookInfo { id: 0, pages })
    }

    pub fn page_count(&self) -> usize {
        self.loader.store().size()
    }

    pub fn load_state(&self) -> LoadState {
        self.loader.state()
    }

    pub fn pages(&self) -> &PageServer {
        &self.pages
    }

    /// Page routes under the configured prefix, falling through to `next`.
    pub fn routes<H: Handler>(&self, next: H) -> PageRoutes<H> {
        self.pages.middleware(self.route_prefix.clone(), next)
    }
}
