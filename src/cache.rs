//! In-memory result cache with TTL expiry and LRU eviction
//!
//! Keys are normalized (trimmed, lower-cased) on every call. An entry lives
//! for a fixed TTL from insertion; lookups never extend it. When a new key is
//! inserted into a full cache exactly one entry is evicted: an expired one if
//! present, otherwise the least recently used (recency is bumped by `get`
//! hits and by `put`).

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::config::CacheConfig;
use crate::models::{WeatherDosha, normalize_key};

const FAR_FUTURE_SECS: u64 = 30 * 365 * 86_400;

struct StoredEntry {
    value: WeatherDosha,
    expires_at: Instant,
    last_used: u64,
}

struct CacheState {
    entries: HashMap<String, StoredEntry>,
    /// Monotonic recency counter
    tick: u64,
}

impl CacheState {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn evict_one(&mut self, now: Instant) {
        // expired entries sort first, then by recency; ticks are unique
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| (entry.expires_at > now, entry.last_used))
            .map(|(key, _)| key.clone());

        if let Some(key) = victim {
            debug!("Evicting cache entry '{}'", key);
            self.entries.remove(&key);
        }
    }
}

/// Shared cache of pipeline results, keyed by normalized location
pub struct ResultCache {
    state: Mutex<CacheState>,
    ttl: Duration,
    max_entries: usize,
}

impl ResultCache {
    /// Create an empty cache. A zero capacity is raised to one.
    #[must_use]
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                tick: 0,
            }),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(Duration::from_secs(config.ttl_seconds), config.max_entries)
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    /// Fresh entry for `key`, or `None` on a miss or an expired entry.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub fn get(&self, key: &str) -> Option<WeatherDosha> {
        let key = normalize_key(key);
        let now = Instant::now();
        let mut state = self.state.lock();
        let tick = state.next_tick();

        let expired = match state.entries.get_mut(&key) {
            Some(entry) if now < entry.expires_at => {
                entry.last_used = tick;
                debug!("Key found and still fresh");
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            debug!("Key found but expired");
            state.entries.remove(&key);
        } else {
            debug!("Key not found");
        }
        None
    }

    /// Store `value` under `key`, replacing any previous entry.
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub fn put(&self, key: &str, value: WeatherDosha) {
        let key = normalize_key(key);
        let now = Instant::now();
        let mut state = self.state.lock();
        let tick = state.next_tick();

        if !state.entries.contains_key(&key) && state.entries.len() >= self.max_entries {
            state.evict_one(now);
        }

        state.entries.insert(
            key,
            StoredEntry {
                value,
                expires_at: expiry(now, self.ttl),
                last_used: tick,
            },
        );
    }

    /// Number of live entries. Expired entries are purged first.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        let mut state = self.state.lock();
        state.entries.retain(|_, entry| now < entry.expires_at);
        state.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `now + ttl`, saturating at roughly thirty years out
fn expiry(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(ttl)
        .unwrap_or_else(|| now + Duration::from_secs(FAR_FUTURE_SECS))
}
