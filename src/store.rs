//! In-memory page cache, replaced wholesale on every load.

use crate::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLockReadGuard, RwLockWriteGuard};

/// Shared handle to the page store.
pub type SharedPageStore = Arc<PageStore>;

/// Page id to page bytes.
///
/// Writers are serialized by the loader's aggregator; readers only hold the
/// lock long enough to clone a `Bytes` handle.
#[derive(Default)]
pub struct PageStore {
    pages: RwLock<HashMap<usize, Bytes>>,
    generation: AtomicU64,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedPageStore {
        Arc::new(Self::new())
    }

    /// Drop every page and start a new, empty generation.
    pub fn replace(&self) {
        let mut pages = self.write();
        *pages = HashMap::new();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Page store reset, generation {}", generation);
    }

    pub fn put(&self, id: usize, data: Bytes) {
        self.write().insert(id, data);
    }

    pub fn get(&self, id: usize) -> Option<Bytes> {
        self.read().get(&id).cloned()
    }

    pub fn size(&self) -> usize {
        self.read().len()
    }

    /// Number of times the store has been replaced.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<usize, Bytes>> {
        self.pages.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<usize, Bytes>> {
        self.pages.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_size() {
        let store = PageStore::new();
        assert_eq!(store.size(), 0);
        assert!(store.get(0).is_none());

        store.put(0, Bytes::from_static(b"zero"));
        store.put(1, Bytes::from_static(b"one"));
        store.put(1, Bytes::from_static(b"uno"));

        assert_eq!(store.size(), 2);
        assert_eq!(store.get(0).unwrap(), Bytes::from_static(b"zero"));
        assert_eq!(store.get(1).unwrap(), Bytes::from_static(b"uno"));
        assert!(store.get(2).is_none());
    }

    #[test]
    fn test_replace_discards_everything() {
        let store = PageStore::new();
        assert_eq!(store.generation(), 0);
        store.put(3, Bytes::from_static(b"page"));

        store.replace();
        assert_eq!(store.generation(), 1);
        assert_eq!(store.size(), 0);
        assert!(store.get(3).is_none());
    }

    #[test]
    fn test_concurrent_readers() {
        let store = PageStore::shared();
        for id in 0..64 {
            store.put(id, Bytes::from(vec![id as u8; 16]));
        }

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    (0..64).all(|id| store.get(id).is_some_and(|page| page[0] == id as u8))
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
