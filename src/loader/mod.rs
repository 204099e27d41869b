//! Concurrent book loading: walk the archive, extract and validate every page
//! on a bounded pool of workers, and collect the results into the page store.

mod fail_fast;
mod worker;

use crate::prelude::*;
use std::sync::PoisonError;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use fail_fast::FailFast;
use worker::{Worker, dispatch};

/// One extracted, validated page.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub id: usize,
    pub data: Bytes,
}

/// Progress of the most recent load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Walking,
    Aggregating,
    Ready,
    Failed,
}

/// Loads books into a page store, one at a time.
pub struct PageLoader {
    store: SharedPageStore,
    workers: usize,
    state: Mutex<LoadState>,
    in_flight: tokio::sync::Mutex<()>,
}

impl PageLoader {
    pub fn new(store: SharedPageStore, workers: usize) -> Self {
        Self {
            store,
            workers: workers.max(1),
            state: Mutex::new(LoadState::Idle),
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    pub fn store(&self) -> &SharedPageStore {
        &self.store
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn state(&self) -> LoadState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: LoadState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Load every page of the archive at `path` and return the page count.
    ///
    /// The store is emptied before anything else happens, so the previous
    /// book is gone even when this load fails. On error the store holds
    /// whatever pages were written before the failure was noticed and must
    /// not be trusted. Overlapping calls wait for each other.
    pub async fn load_book(&self, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        let path = path.as_ref().to_path_buf();
        let _in_flight = self.in_flight.lock().await;

        info!("Loading {:?} with {} workers", path, self.workers);
        self.store.replace();
        self.set_state(LoadState::Walking);

        let result = self.run(path.clone()).await;
        match &result {
            Ok(pages) => {
                self.set_state(LoadState::Ready);
                info!("Loaded {} pages from {:?}", pages, path);
            }
            Err(e) => {
                self.set_state(LoadState::Failed);
                warn!(
                    "Failed to load {:?} ({} pages stored before abort): {}",
                    path,
                    self.store.size(),
                    e
                );
            }
        }
        result
    }

    async fn run(&self, path: PathBuf) -> Result<usize, LoadError> {
        let source = tokio::task::spawn_blocking(move || ArchiveSource::open(&path)).await??;
        let source = Arc::new(source);

        let fail_fast = Arc::new(FailFast::new());
        let (task_tx, task_rx) = mpsc::channel(self.workers);
        let (result_tx, result_rx) = mpsc::channel(self.workers);

        let aggregator = tokio::spawn(aggregate(Arc::clone(&self.store), result_rx));

        let queue = Arc::new(tokio::sync::Mutex::new(task_rx));
        let mut workers = JoinSet::new();
        for _ in 0..self.workers {
            let worker = Worker {
                source: Arc::clone(&source),
                queue: Arc::clone(&queue),
                results: result_tx.clone(),
                fail_fast: Arc::clone(&fail_fast),
            };
            workers.spawn(worker.run());
        }
        // Only the workers may keep the queue and result channel alive.
        drop(queue);
        drop(result_tx);

        let walker = {
            let fail_fast = Arc::clone(&fail_fast);
            tokio::task::spawn_blocking(move || dispatch(&source, task_tx, &fail_fast))
        };
        match walker.await {
            Ok(Ok(dispatched)) => debug!("Walk finished, {} pages queued", dispatched),
            Ok(Err(e)) => fail_fast.fail(e),
            Err(e) => fail_fast.fail(e.into()),
        }

        self.set_state(LoadState::Aggregating);
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                fail_fast.fail(e.into());
            }
        }
        let written = aggregator.await?;

        if let Some(err) = fail_fast.take_error() {
            return Err(err);
        }
        if written == 0 {
            return Err(LoadError::EmptyArchive);
        }
        Ok(written)
    }
}

/// The single writer: drains results into the store until every worker is
/// gone.
async fn aggregate(store: SharedPageStore, mut results: mpsc::Receiver<ExtractionResult>) -> usize {
    let mut written = 0;
    while let Some(page) = results.recv().await {
        store.put(page.id, page.data);
        written += 1;
    }
    written
}
