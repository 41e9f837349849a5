//! Process-lifetime cache of resolved images.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug, Default)]
struct Entries {
    values: HashMap<String, String>,
    // insertion order, oldest first
    order: VecDeque<String>,
}

/// Maps a page URL to the image resolved for it.
///
/// Eviction is first-in-first-out: once full, inserting a new key drops
/// the key that was inserted earliest, no matter how recently it was read.
/// All access goes through one mutex, so the cache can be shared between
/// concurrent lookups.
#[derive(Debug)]
pub struct ImageResolutionCache {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl Default for ImageResolutionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ImageResolutionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(Entries::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        // map and queue are only mutated together, so poisoning is harmless
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    /// Insert or update `key`. Updating keeps the key's original position
    /// in the eviction order.
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        let key = key.into();
        let mut entries = self.lock();
        if entries.values.insert(key.clone(), value.into()).is_none() {
            entries.order.push_back(key);
            while entries.order.len() > self.capacity {
                if let Some(oldest) = entries.order.pop_front() {
                    entries.values.remove(&oldest);
                }
            }
        }
    }

    pub fn size(&self) -> usize {
        self.lock().values.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn key(i: usize) -> String {
        format!("https://example.com/recipe/{i}")
    }

    #[test]
    fn test_get_and_put() {
        let cache = ImageResolutionCache::default();
        assert_eq!(cache.get("missing"), None);

        cache.put("a", "https://img.example/a.jpg");
        assert_eq!(cache.get("a").as_deref(), Some("https://img.example/a.jpg"));
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_evicts_first_inserted_not_least_recently_read() {
        let cache = ImageResolutionCache::new(100);
        for i in 0..100 {
            cache.put(key(i), format!("image-{i}"));
        }
        // reading the oldest entry does not protect it
        assert_eq!(cache.get(&key(0)).as_deref(), Some("image-0"));

        cache.put(key(100), "image-100");

        assert_eq!(cache.size(), 100);
        assert_eq!(cache.get(&key(0)), None);
        assert_eq!(cache.get(&key(1)).as_deref(), Some("image-1"));
        assert_eq!(cache.get(&key(100)).as_deref(), Some("image-100"));
    }

    #[test]
    fn test_update_keeps_insertion_position() {
        let cache = ImageResolutionCache::new(2);
        cache.put("a", "1");
        cache.put("b", "2");
        cache.put("a", "3");
        assert_eq!(cache.size(), 2);

        cache.put("c", "4");

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b").as_deref(), Some("2"));
        assert_eq!(cache.get("c").as_deref(), Some("4"));
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let cache = ImageResolutionCache::new(0);
        cache.put("a", "1");
        assert_eq!(cache.size(), 0);
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_concurrent_puts_respect_capacity() {
        let cache = Arc::new(ImageResolutionCache::new(100));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..50 {
                        cache.put(key(t * 50 + i), "img");
                        let _ = cache.get(&key(i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.size(), 100);
    }
}
