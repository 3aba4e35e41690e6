//! Today's feed, cached
//!
//! Resolves "today" in the configured zone from the injected clock, serves the
//! normalized list from the cache when fresh, and otherwise fetches, normalizes
//! and stores it.

use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::{debug, warn};

use super::neows::{FeedFetcher, FetchError};
use super::normalize::normalize_for_date;
use super::NeoSummary;
use crate::cache::{CacheSettings, TodayCache};
use crate::clock::Clock;

/// Normalized summaries as shared between the cache and callers
pub type Summaries = Arc<Vec<NeoSummary>>;

/// Retrieves today's near-Earth objects
///
/// Concurrent misses for the same day may each call upstream; the last write
/// wins and every writer stores the same normalized value.
pub struct TodayService {
    fetcher: Arc<dyn FeedFetcher>,
    cache: TodayCache<Summaries>,
    zone: Tz,
    clock: Arc<dyn Clock>,
}

impl TodayService {
    /// Creates a service with its own cache
    pub fn new(
        fetcher: Arc<dyn FeedFetcher>,
        zone: Tz,
        clock: Arc<dyn Clock>,
        cache_settings: CacheSettings,
    ) -> Self {
        let cache = TodayCache::new(cache_settings, Arc::clone(&clock));
        Self::with_cache(fetcher, zone, clock, cache)
    }

    /// Creates a service around an existing cache
    pub fn with_cache(
        fetcher: Arc<dyn FeedFetcher>,
        zone: Tz,
        clock: Arc<dyn Clock>,
        cache: TodayCache<Summaries>,
    ) -> Self {
        Self {
            fetcher,
            cache,
            zone,
            clock,
        }
    }

    /// The configured zone
    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// The backing cache
    pub fn cache(&self) -> &TodayCache<Summaries> {
        &self.cache
    }

    /// Today's calendar date in the configured zone
    pub fn today(&self) -> NaiveDate {
        self.clock.now().with_timezone(&self.zone).date_naive()
    }

    /// Cache key for today, `"{date}|{zone}"`
    pub fn cache_key_today(&self) -> String {
        TodayCache::<Summaries>::key(self.today(), self.zone)
    }

    /// Returns today's summaries, fetching from upstream on a cache miss
    ///
    /// # Returns
    /// * `Ok(Summaries)` - Ordered summaries for today (possibly empty)
    /// * `Err(FetchError)` - If the upstream fetch fails; nothing is cached
    pub async fn today_summaries(&self) -> Result<Summaries, FetchError> {
        let today = self.today();
        let key = TodayCache::<Summaries>::key(today, self.zone);

        if let Some(cached) = self.cache.get(&key) {
            debug!(%today, zone = %self.zone, "serving NEOs from cache");
            return Ok(cached);
        }

        debug!(%today, zone = %self.zone, "fetching NEOs from NeoWs");
        let feed = self.fetcher.fetch_feed(today, today).await.map_err(|err| {
            warn!(%today, status = ?err.upstream_status(), error = %err, "NeoWs fetch failed");
            err
        })?;

        let summaries: Summaries = Arc::new(normalize_for_date(feed.as_ref(), today, self.zone));
        debug!(%today, count = summaries.len(), "normalized NEO feed");
        self.cache.put(key, Arc::clone(&summaries));
        Ok(summaries)
    }
}
