//! Time-bounded cache of ranked search results
//!
//! Expiration is lazy: entries are checked against the TTL on read and
//! dropped once stale. There is no background eviction.

use crate::search::{SearchFilters, SearchResult};
use ahash::AHashMap;
use std::time::{Duration, Instant};

pub struct SearchCache {
    entries: AHashMap<String, (Vec<SearchResult>, Instant)>,
    ttl: Duration,
}

/// Convert a configured TTL into a duration without panicking: NaN and
/// negative values expire everything immediately, overflow and infinity
/// never expire
fn ttl_duration(ttl_seconds: f64) -> Duration {
    Duration::try_from_secs_f64(ttl_seconds.max(0.0)).unwrap_or(Duration::MAX)
}

impl SearchCache {
    pub fn new(ttl_seconds: f64) -> Self {
        Self {
            entries: AHashMap::new(),
            ttl: ttl_duration(ttl_seconds),
        }
    }

    /// Compute the cache key for a query signature
    ///
    /// Filters serialize with a fixed field order, so identical calls always
    /// hash to the same key.
    pub fn key(query: &str, search_type: &str, filters: &SearchFilters) -> String {
        let data = format!("{}:{}:{}", query, search_type, filters.cache_token());
        format!("{:.32}", blake3::hash(data.as_bytes()).to_hex())
    }

    /// Get cached results if present and unexpired
    pub fn get(&mut self, key: &str) -> Option<Vec<SearchResult>> {
        let expired = match self.entries.get(key) {
            Some((_, inserted_at)) => inserted_at.elapsed() >= self.ttl,
            None => return None,
        };
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|(results, _)| results.clone())
    }

    pub fn set(&mut self, key: String, results: Vec<SearchResult>) {
        self.entries.insert(key, (results, Instant::now()));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Change the TTL applied on subsequent reads
    pub fn set_ttl(&mut self, ttl_seconds: f64) {
        self.ttl = ttl_duration(ttl_seconds);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
