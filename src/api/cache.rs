use lru::LruCache;
use serde_json::Value;
use std::num::NonZeroUsize;

/// Response bodies keyed by request path.
///
/// Invalidation is wholesale: [`ResponseCache::clear`] drops every entry and
/// advances the epoch. A response fetched under an older epoch is refused by
/// [`ResponseCache::store`].
pub struct ResponseCache {
    entries: LruCache<String, Value>,
    epoch: u64,
}

impl ResponseCache {
    /// Create a cache holding at most `capacity` responses.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            epoch: 0,
        }
    }

    /// Look up a cached response.
    pub fn get(&mut self, path: &str) -> Option<Value> {
        self.entries.get(path).cloned()
    }

    /// Store a response fetched while `epoch` was current.
    ///
    /// Returns `false` (and stores nothing) if the cache was cleared since.
    pub fn store(&mut self, path: &str, value: Value, epoch: u64) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.entries.put(path.to_string(), value);
        true
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.epoch += 1;
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_store_and_get() {
        let mut cache = ResponseCache::new(4);
        let epoch = cache.epoch();
        assert!(cache.store("/vendors", json!([{"vendor_id": "HV0003"}]), epoch));
        assert_eq!(cache.get("/vendors"), Some(json!([{"vendor_id": "HV0003"}])));
        assert!(cache.get("/vendors?limit=1").is_none());
    }

    #[test]
    fn test_clear_refuses_stale_epoch() {
        let mut cache = ResponseCache::new(4);
        let before = cache.epoch();
        cache.store("/trips", json!([]), before);
        cache.clear();

        assert!(cache.is_empty());
        assert!(!cache.store("/trips", json!([1]), before));
        assert!(cache.get("/trips").is_none());
        assert!(cache.store("/trips", json!([2]), cache.epoch()));
    }

    #[test]
    fn test_capacity_evicts_least_recent() {
        let mut cache = ResponseCache::new(2);
        let epoch = cache.epoch();
        cache.store("/a", json!(1), epoch);
        cache.store("/b", json!(2), epoch);
        cache.get("/a");
        cache.store("/c", json!(3), epoch);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("/b").is_none());
        assert_eq!(cache.get("/a"), Some(json!(1)));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut cache = ResponseCache::new(0);
        assert!(cache.store("/a", json!(1), 0));
        assert_eq!(cache.len(), 1);
    }
}
