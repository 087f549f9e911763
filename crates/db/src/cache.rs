//! Response caching using Moka.
//!
//! A process-wide TTL cache for list responses, keyed by request URI.
//! Writes clear the whole store rather than tracking per-entity keys;
//! population is unsynchronized, so a stale read may be re-cached right
//! after a clear until its TTL lapses.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

/// Default cache capacity (number of entries).
const DEFAULT_CACHE_CAPACITY: u64 = 1_000;

/// Default time-to-live for cache entries (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

/// TTL cache for serialized list responses.
///
/// Thread-safe and cheap to clone; suitable for concurrent access.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    cache: Cache<String, Arc<serde_json::Value>>,
}

impl ResponseCache {
    /// Creates a new response cache with default settings.
    ///
    /// Default: 1000 entries max, 5 minute TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a new response cache with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `max_capacity` - Maximum number of entries to cache
    /// * `ttl_secs` - Time-to-live in seconds for each entry
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Looks up a cached response by request URI.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<serde_json::Value>> {
        self.cache.get(key)
    }

    /// Stores a response under the given request URI.
    pub fn insert(&self, key: String, value: serde_json::Value) {
        self.cache.insert(key, Arc::new(value));
    }

    /// Invalidates all cached entries.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_after_insert() {
        let cache = ResponseCache::new();
        cache.insert("/v1/movies?page=1".to_string(), json!({"data": []}));

        let hit = cache.get("/v1/movies?page=1").unwrap();
        assert_eq!(*hit, json!({"data": []}));
    }

    #[test]
    fn test_miss_for_unknown_key() {
        let cache = ResponseCache::new();
        assert!(cache.get("/v1/movies").is_none());
    }

    #[test]
    fn test_invalidate_all_clears_entries() {
        let cache = ResponseCache::new();
        cache.insert("/v1/movies".to_string(), json!({"data": [1]}));
        cache.insert("/v1/movie-sessions".to_string(), json!({"data": [2]}));

        cache.invalidate_all();
        // moka applies invalidation lazily; run pending tasks so reads miss.
        cache.cache.run_pending_tasks();

        assert!(cache.get("/v1/movies").is_none());
        assert!(cache.get("/v1/movie-sessions").is_none());
    }

    #[test]
    fn test_entries_expire_after_ttl() {
        let cache = ResponseCache::with_config(10, 1);
        cache.insert("/v1/movies".to_string(), json!({"data": []}));
        assert!(cache.get("/v1/movies").is_some());

        std::thread::sleep(Duration::from_millis(1100));
        assert!(cache.get("/v1/movies").is_none());
    }
}
