//! In-memory cache manager for normalized daily feeds
//!
//! Provides a `TodayCache` that keeps a handful of recently built values in a
//! recency-ordered map, each stamped with an expiry computed from the injected
//! clock. Expired entries read as absent.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use tracing::warn;

use crate::clock::Clock;

/// Default time-to-live for a cached day
pub const DEFAULT_TTL: StdDuration = StdDuration::from_secs(60 * 60);

/// Default number of distinct keys kept
pub const DEFAULT_MAX_SIZE: usize = 10;

/// Wrapper struct for a cached value
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    /// The cached data
    data: T,
    /// When the cache entry expires
    expires_at: DateTime<Utc>,
}

/// Size and lifetime bounds for a [`TodayCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// How long an entry stays fresh after it is written
    pub ttl: StdDuration,
    /// Maximum number of keys held at once
    pub max_size: NonZeroUsize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_size: NonZeroUsize::new(DEFAULT_MAX_SIZE).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// Thread-safe cache with expire-after-write and least-recently-used eviction
///
/// Keys are built with [`TodayCache::key`] as `"{date}|{zone}"`. The cache is
/// not durable: a restart starts cold.
pub struct TodayCache<T> {
    entries: Mutex<LruCache<String, CacheEntry<T>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<T: Clone> TodayCache<T> {
    /// Creates a new cache with the given bounds, reading time from `clock`
    pub fn new(settings: CacheSettings, clock: Arc<dyn Clock>) -> Self {
        let ttl = Duration::from_std(settings.ttl).unwrap_or(Duration::MAX);
        Self {
            entries: Mutex::new(LruCache::new(settings.max_size)),
            ttl,
            clock,
        }
    }

    /// Builds the cache key for a calendar date in a zone
    pub fn key(date: impl std::fmt::Display, zone: impl std::fmt::Display) -> String {
        format!("{}|{}", date, zone)
    }

    fn lock(&self, op: &'static str) -> MutexGuard<'_, LruCache<String, CacheEntry<T>>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!(op, "recovered from poisoned cache lock");
                poisoned.into_inner()
            }
        }
    }

    /// Reads a fresh value from the cache
    ///
    /// Returns `None` if the key was never written, was evicted, or has
    /// outlived its TTL. Expired entries are dropped on read.
    pub fn get(&self, key: &str) -> Option<T> {
        let now = self.clock.now();
        let mut entries = self.lock("get");

        let expired = match entries.get(key) {
            Some(entry) if now < entry.expires_at => return Some(entry.data.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
        }
        None
    }

    /// Writes a value, replacing any previous entry for the key
    ///
    /// When the key count would exceed the size bound, the least recently
    /// used key is evicted.
    pub fn put(&self, key: impl Into<String>, data: T) {
        let now = self.clock.now();
        let entry = CacheEntry {
            data,
            expires_at: now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.lock("put").put(key.into(), entry);
    }

    /// Number of keys currently held, including ones that have expired but
    /// not yet been read
    pub fn len(&self) -> usize {
        self.lock("len").len()
    }

    /// Returns true if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry
    pub fn clear(&self) {
        self.lock("clear").clear();
    }
}
