//! Per-page mutual exclusion.
//!
//! All writes to one page serialize on that page's mutex; writes to
//! different pages never contend. Entries are created on first use and
//! removed when the page is deleted so the map does not grow without bound.

use dashmap::DashMap;
use folio_model::PageId;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct PageLocks {
    locks: DashMap<PageId, Arc<Mutex<()>>>,
}

impl PageLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mutex for `page_id`, created on first use.
    pub fn lock_for(&self, page_id: PageId) -> Arc<Mutex<()>> {
        // Clone out of the map so the shard guard is released before locking.
        self.locks
            .entry(page_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Runs `f` while holding the page's lock.
    pub fn with_lock<T>(&self, page_id: PageId, f: impl FnOnce() -> T) -> T {
        let lock = self.lock_for(page_id);
        let _guard = lock.lock();
        f()
    }

    pub fn remove(&self, page_id: &PageId) {
        self.locks.remove(page_id);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn test_same_page_shares_lock() {
        let locks = PageLocks::new();
        let id = PageId::new();
        assert!(Arc::ptr_eq(&locks.lock_for(id), &locks.lock_for(id)));
        assert!(!Arc::ptr_eq(&locks.lock_for(id), &locks.lock_for(PageId::new())));
    }

    #[test]
    fn test_with_lock_serializes() {
        let locks = Arc::new(PageLocks::new());
        let id = PageId::new();
        let inside = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                thread::spawn(move || {
                    for _ in 0..100 {
                        locks.with_lock(id, || {
                            assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                            inside.fetch_sub(1, Ordering::SeqCst);
                        });
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_remove_drops_entry() {
        let locks = PageLocks::new();
        let id = PageId::new();
        locks.lock_for(id);
        assert_eq!(locks.len(), 1);
        locks.remove(&id);
        assert!(locks.is_empty());
    }
}
