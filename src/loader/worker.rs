//! Extraction workers and the walker that feeds them.

use crate::prelude::*;
use std::io::Read;
use tokio::sync::mpsc;

use super::ExtractionResult;
use super::fail_fast::FailFast;

/// Pending entries, shared by all workers of a load.
pub(crate) type TaskQueue = Arc<tokio::sync::Mutex<mpsc::Receiver<EntryTask>>>;

/// Walk the archive and queue every page entry. Runs on a blocking thread;
/// a full queue blocks the walk until a worker takes a task.
pub(crate) fn dispatch(
    source: &ArchiveSource,
    tasks: mpsc::Sender<EntryTask>,
    fail_fast: &FailFast,
) -> Result<usize, LoadError> {
    let mut dispatched = 0;
    for task in source.walk()? {
        if fail_fast.is_cancelled() {
            break;
        }
        let task = task?;
        debug!("Queueing page {} from {}", task.id, task.path);
        if tasks.blocking_send(task).is_err() {
            // Queue closed by a cancelled worker.
            break;
        }
        dispatched += 1;
    }
    Ok(dispatched)
}

/// Open one entry, check that it really is a page image and buffer it.
pub(crate) fn extract_page(
    reader: &mut dyn EntryReader,
    task: EntryTask,
) -> Result<ExtractionResult, LoadError> {
    let entry = reader.open(&task.path)?;
    let (media_type, mut content) = sniff(entry)?;
    if !is_page_media_type(media_type) {
        return Err(LoadError::InvalidContent {
            path: task.path,
            media_type: media_type.to_string(),
        });
    }

    let mut data = Vec::new();
    content.read_to_end(&mut data)?;
    Ok(ExtractionResult {
        id: task.id,
        data: Bytes::from(data),
    })
}

/// One long-lived extraction worker.
pub(crate) struct Worker {
    pub(crate) source: Arc<ArchiveSource>,
    pub(crate) queue: TaskQueue,
    pub(crate) results: mpsc::Sender<ExtractionResult>,
    pub(crate) fail_fast: Arc<FailFast>,
}

impl Worker {
    pub(crate) async fn run(self) {
        if let Err(e) = self.work().await {
            self.fail_fast.fail(e);
            self.queue.lock().await.close();
        }
    }

    async fn work(&self) -> Result<(), LoadError> {
        let source = Arc::clone(&self.source);
        let mut reader = tokio::task::spawn_blocking(move || source.reader()).await??;

        while let Some(task) = self.next_task().await {
            let (returned, page) = tokio::task::spawn_blocking(move || {
                let page = extract_page(reader.as_mut(), task);
                (reader, page)
            })
            .await?;
            reader = returned;
            self.deliver(page?).await?;
        }
        Ok(())
    }

    /// Next queued entry, or `None` once the walk is done or the load is
    /// cancelled. Cancellation closes the queue so the walker stops too.
    async fn next_task(&self) -> Option<EntryTask> {
        let token = self.fail_fast.token();
        let mut queue = tokio::select! {
            biased;
            _ = token.cancelled() => return None,
            queue = self.queue.lock() => queue,
        };
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                queue.close();
                None
            }
            task = queue.recv() => task,
        }
    }

    async fn deliver(&self, page: ExtractionResult) -> Result<(), LoadError> {
        let id = page.id;
        tokio::select! {
            biased;
            _ = self.fail_fast.token().cancelled() => Err(LoadError::Cancelled),
            sent = self.results.send(page) => {
                sent.map_err(|_| LoadError::Cancelled)?;
                debug!("Extracted page {}", id);
                Ok(())
            }
        }
    }
}
