use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// Thread-safe LRU cache of article summaries keyed by title.
///
/// Shared by the summary workers of a provider so a title fetched once is
/// never requested again while it stays resident, across any number of
/// bulk fetches and searches.
pub struct SummaryCache {
    cache: Mutex<LruCache<String, String>>,
}

impl SummaryCache {
    /// Create a new summary cache holding at most `capacity` entries
    /// (a capacity of 0 is treated as 1).
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);

        Self {
            cache: Mutex::new(LruCache::new(cap)),
        }
    }

    /// Get a cached summary, marking it recently used
    pub fn get(&self, title: &str) -> Option<String> {
        self.cache.lock().unwrap().get(title).cloned()
    }

    /// Store a summary
    pub fn put(&self, title: String, summary: String) {
        self.cache.lock().unwrap().put(title, summary);
    }

    /// Number of resident summaries
    pub fn resident(&self) -> usize {
        self.cache.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_cache_put_and_get() {
        let cache = SummaryCache::new(10);
        cache.put("Bat".to_string(), "Bats are flying mammals.".to_string());

        assert_eq!(cache.get("Bat").as_deref(), Some("Bats are flying mammals."));
        assert!(cache.get("Owl").is_none());
    }

    #[test]
    fn test_cache_eviction_respects_recency() {
        let cache = SummaryCache::new(2);
        cache.put("A".to_string(), "a".to_string());
        cache.put("B".to_string(), "b".to_string());

        // touching A makes B the eviction candidate
        let _ = cache.get("A");
        cache.put("C".to_string(), "c".to_string());

        assert_eq!(cache.resident(), 2);
        assert!(cache.get("A").is_some());
        assert!(cache.get("B").is_none());
        assert!(cache.get("C").is_some());
    }

    #[test]
    fn test_cache_zero_capacity_holds_one() {
        let cache = SummaryCache::new(0);
        cache.put("A".to_string(), "a".to_string());
        cache.put("B".to_string(), "b".to_string());
        assert_eq!(cache.resident(), 1);
        assert!(cache.get("B").is_some());
    }

    #[test]
    fn test_cache_shared_across_threads() {
        let cache = Arc::new(SummaryCache::new(100));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.put(format!("T{}", i), format!("s{}", i)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.resident(), 8);
    }
}
