//! In-process keyed cache.
//!
//! [`Cache`] is the only shared mutable state between the ingestion path and
//! the read path. It sits behind a single readers-writer lock: any number of
//! `get`/`get_all`/`size` calls proceed together, while `set`/`delete` hold the
//! lock exclusively for one map operation. No method performs I/O and none can
//! fail.
//!
//! Entries are never evicted or expired.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::framework::Record;

/// A thread-safe map from record key to record.
///
/// Records are stored behind [`Arc`], so a hit hands out a shared handle
/// instead of cloning the record, and [`Cache::get_all`] copies only the map.
pub struct Cache<T: Record> {
    entries: RwLock<HashMap<T::Key, Arc<T>>>,
}

impl<T: Record> Default for Cache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Cache<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the record stored under `key`, if any.
    pub fn get(&self, key: &T::Key) -> Option<Arc<T>> {
        self.read().get(key).cloned()
    }

    /// Inserts `record` under its own key, replacing any previous entry.
    pub fn set(&self, record: T) {
        self.set_shared(Arc::new(record));
    }

    /// Like [`Cache::set`] for a record that is already shared.
    pub fn set_shared(&self, record: Arc<T>) {
        let key = record.key().clone();
        self.write().insert(key, record);
    }

    /// Removes the entry for `key`. Does nothing if there is none.
    pub fn delete(&self, key: &T::Key) {
        self.write().remove(key);
    }

    pub fn size(&self) -> usize {
        self.read().len()
    }

    /// Returns a snapshot of every entry.
    ///
    /// The returned map is independent of the cache: mutating it never
    /// affects the cache, and later cache writes never show up in it.
    pub fn get_all(&self) -> HashMap<T::Key, Arc<T>> {
        self.read().clone()
    }

    // Each critical section is a single map operation, so a poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<T::Key, Arc<T>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<T::Key, Arc<T>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Order;
    use std::thread;

    #[test]
    fn test_unseen_key_is_not_found() {
        let cache = Cache::<Order>::new();
        assert!(cache.get(&"missing".to_string()).is_none());
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_set_get_delete() {
        let cache = Cache::new();
        let order = Order::sample("o1");

        cache.set(order.clone());
        assert_eq!(cache.get(&"o1".to_string()).as_deref(), Some(&order));

        cache.delete(&"o1".to_string());
        assert!(cache.get(&"o1".to_string()).is_none());

        // Deleting again is a no-op.
        cache.delete(&"o1".to_string());
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_last_writer_wins() {
        let cache = Cache::new();
        let first = Order::sample("o1");
        let mut second = Order::sample("o1");
        second.track_number = "SECOND".to_string();

        cache.set(first);
        cache.set(second);

        assert_eq!(cache.size(), 1);
        assert_eq!(cache.get(&"o1".to_string()).unwrap().track_number, "SECOND");
    }

    #[test]
    fn test_get_all_is_a_snapshot() {
        let cache = Cache::new();
        cache.set(Order::sample("o1"));
        cache.set(Order::sample("o2"));

        let mut snapshot = cache.get_all();
        assert_eq!(snapshot.len(), 2);

        snapshot.remove("o1");
        snapshot.insert("o3".to_string(), Arc::new(Order::sample("o3")));
        assert!(cache.get(&"o1".to_string()).is_some());
        assert!(cache.get(&"o3".to_string()).is_none());

        cache.delete(&"o2".to_string());
        assert!(snapshot.contains_key("o2"));
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_size_tracks_inserts_minus_deletes() {
        let cache = Cache::new();
        for i in 0..10 {
            cache.set(Order::sample(format!("o{}", i)));
        }
        // Overwrites do not grow the cache.
        cache.set(Order::sample("o0"));
        for i in 0..4 {
            cache.delete(&format!("o{}", i));
        }
        assert_eq!(cache.size(), 6);
    }

    #[test]
    fn test_concurrent_writers_then_readers() {
        const WRITERS: usize = 32;
        const READERS: usize = 64;

        let cache = Arc::new(Cache::new());

        let writers: Vec<_> = (0..WRITERS)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.set(Order::sample(format!("order-{}", i))))
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let readers: Vec<_> = (0..READERS)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.get(&format!("order-{}", i % WRITERS)).is_some())
            })
            .collect();
        for reader in readers {
            assert!(reader.join().unwrap());
        }

        assert_eq!(cache.size(), WRITERS);
    }

    #[test]
    fn test_poisoned_lock_keeps_serving() {
        let cache = Arc::new(Cache::new());
        cache.set(Order::sample("o1"));

        let poisoner = Arc::clone(&cache);
        let _ = thread::spawn(move || {
            let _guard = poisoner.write();
            panic!("poison the lock");
        })
        .join();

        assert!(cache.get(&"o1".to_string()).is_some());
        cache.set(Order::sample("o2"));
        assert_eq!(cache.size(), 2);
    }
}
