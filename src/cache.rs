//! Memoisation of advisory runs.
//!
//! The cache is an ordinary value owned by whoever orchestrates advisory
//! calls and injected into [`crate::AdvisoryChain`]; there is no global
//! instance. Entries are keyed by [`input_hash`], bounded by an LRU capacity
//! and expire after a TTL.

use crate::advice::AdvisorResponse;
use crate::advisor::AdvisorPreferences;
use crate::error::Result;
use crate::schema::{ForecastResult, ForecastSummary, ScenarioInput};
use chrono::{DateTime, Duration, Utc};
use log::debug;
use lru::LruCache;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::sync::Mutex;

pub const DEFAULT_CACHE_CAPACITY: usize = 256;
pub const DEFAULT_CACHE_TTL_SECS: i64 = 3600;

#[derive(Serialize)]
struct HashInput<'a> {
    scenario: &'a ScenarioInput,
    summary: &'a ForecastSummary,
    preferences: &'a AdvisorPreferences,
}

/// Stable SHA-256 digest (hex) of the scenario, the forecast summary and the
/// advisor preferences.
pub fn input_hash(
    scenario: &ScenarioInput,
    forecast: &ForecastResult,
    preferences: &AdvisorPreferences,
) -> Result<String> {
    let normalized = serde_json::to_vec(&HashInput {
        scenario,
        summary: &forecast.summary,
        preferences,
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&normalized);
    Ok(hex::encode(hasher.finalize()))
}

#[derive(Debug, Clone)]
struct CachedAdvice {
    response: AdvisorResponse,
    cached_at: DateTime<Utc>,
}

pub struct AdvisoryCache {
    entries: Mutex<LruCache<String, CachedAdvice>>,
    ttl: Duration,
}

impl AdvisoryCache {
    /// A capacity of zero is bumped to one.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<AdvisorResponse> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        let expired = match entries.get(key) {
            Some(entry) => Utc::now() - entry.cached_at >= self.ttl,
            None => {
                debug!("Advisory cache miss for {}", key);
                return None;
            }
        };

        if expired {
            debug!("Advisory cache entry {} expired", key);
            entries.pop(key);
            return None;
        }

        debug!("Advisory cache hit for {}", key);
        entries.get(key).map(|entry| entry.response.clone())
    }

    pub fn insert(&self, key: String, response: AdvisorResponse) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.put(
            key,
            CachedAdvice {
                response,
                cached_at: Utc::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl Default for AdvisoryCache {
    fn default() -> Self {
        Self::new(
            DEFAULT_CACHE_CAPACITY,
            Duration::seconds(DEFAULT_CACHE_TTL_SECS),
        )
    }
}
