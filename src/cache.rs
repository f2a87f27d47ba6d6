//! Time-bounded cache of fetched suggestions.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::RawSuggestion;

/// Default lifetime of a cache entry.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Cache key: the session mode and the trimmed query text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub mode: String,
    pub query: String,
}

impl CacheKey {
    pub fn new(mode: impl Into<String>, query: &str) -> Self {
        Self {
            mode: mode.into(),
            query: query.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Vec<RawSuggestion>,
    created_at: Instant,
}

/// Suggestion cache with passive TTL expiry.
///
/// Entries are never swept; an expired entry is dropped when it is next
/// looked up or overwritten by a fresh fetch.
#[derive(Debug)]
pub struct SuggestionCache {
    ttl: Duration,
    entries: HashMap<CacheKey, CacheEntry>,
}

impl SuggestionCache {
    /// Creates an empty cache with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Returns the cached payload if it is younger than the TTL.
    pub fn get(&mut self, key: &CacheKey) -> Option<Vec<RawSuggestion>> {
        let entry = self.entries.get(key)?;
        if entry.created_at.elapsed() < self.ttl {
            return Some(entry.payload.clone());
        }
        self.entries.remove(key);
        None
    }

    /// Stores a payload, replacing any previous entry for the key.
    pub fn insert(&mut self, key: CacheKey, payload: Vec<RawSuggestion>) {
        self.entries.insert(
            key,
            CacheEntry {
                payload,
                created_at: Instant::now(),
            },
        );
    }

    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the configured TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for SuggestionCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> Vec<RawSuggestion> {
        vec![RawSuggestion::new("天气预报", "baidu")]
    }

    #[test]
    fn test_cache_key_trims_query() {
        assert_eq!(CacheKey::new("all", "  rust "), CacheKey::new("all", "rust"));
        assert_ne!(CacheKey::new("all", "rust"), CacheKey::new("enhanced", "rust"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_hit_within_ttl() {
        let mut cache = SuggestionCache::default();
        let key = CacheKey::new("all", "天气");
        cache.insert(key.clone(), payload());

        tokio::time::advance(Duration::from_secs(299)).await;
        assert_eq!(cache.get(&key), Some(payload()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_expires_after_ttl() {
        let mut cache = SuggestionCache::default();
        let key = CacheKey::new("all", "天气");
        cache.insert(key.clone(), payload());

        tokio::time::advance(Duration::from_secs(301)).await;
        assert_eq!(cache.get(&key), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_insert_refreshes_timestamp() {
        let mut cache = SuggestionCache::new(Duration::from_secs(10));
        let key = CacheKey::new("all", "q");
        cache.insert(key.clone(), payload());
        tokio::time::advance(Duration::from_secs(8)).await;
        cache.insert(key.clone(), vec![]);
        tokio::time::advance(Duration::from_secs(8)).await;
        assert_eq!(cache.get(&key), Some(vec![]));
    }

    #[test]
    fn test_cache_modes_are_separate() {
        let mut cache = SuggestionCache::default();
        cache.insert(CacheKey::new("all", "q"), payload());
        assert!(cache.get(&CacheKey::new("enhanced", "q")).is_none());
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_ttl() {
        assert_eq!(SuggestionCache::default().ttl(), DEFAULT_TTL);
    }
}
