//! Expiring Cache
//!
//! Bounded read cache with a fixed time-to-live per entry and
//! least-recently-used eviction on overflow.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug)]
struct CacheEntry<V> {
    expires_at: Instant,
    value: V,
}

/// TTL + LRU cache keyed by canonical query text.
///
/// A zero TTL or zero capacity disables the cache: lookups always miss and
/// inserts are dropped.
#[derive(Debug)]
pub struct ExpiringCache<V> {
    ttl: Duration,
    entries: Option<LruCache<String, CacheEntry<V>>>,
}

impl<V: Clone> ExpiringCache<V> {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        let entries = match NonZeroUsize::new(capacity) {
            Some(capacity) if !ttl.is_zero() => Some(LruCache::new(capacity)),
            _ => None,
        };
        Self { ttl, entries }
    }

    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    /// Look up a live entry, marking it most recently used.
    ///
    /// An expired entry is removed and reported as a miss.
    pub fn get(&mut self, key: &str, now: Instant) -> Option<V> {
        let entries = self.entries.as_mut()?;

        let expired = now > entries.peek(key)?.expires_at;
        if expired {
            entries.pop(key);
            tracing::trace!("cache entry expired: {}", key);
            return None;
        }

        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Store a value with a fresh expiry, evicting the least recently used
    /// entry when full.
    pub fn put(&mut self, key: String, value: V, now: Instant) {
        let Some(entries) = self.entries.as_mut() else {
            return;
        };

        let entry = CacheEntry {
            expires_at: now + self.ttl,
            value,
        };
        if let Some((evicted, _)) = entries.push(key.clone(), entry) {
            if evicted != key {
                tracing::debug!("cache full, evicted {}", evicted);
            }
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        if let Some(entries) = self.entries.as_mut() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, LruCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
