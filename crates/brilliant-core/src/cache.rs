// ── Time-boxed single-slot cache ──
//
// One value per key, persisted through a `KeyValueStore`, reusable only
// while younger than the TTL. Expired or unreadable entries are deleted on
// read and reported as a miss.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::error::CoreError;
use crate::store::KeyValueStore;

/// A cached value plus the instant it was captured.
///
/// Serialized flat: the value's own fields sit next to a `timestamp` in
/// Unix milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub inserted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub value: T,
}

/// Why a lookup did not produce a usable entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMiss {
    Absent,
    Expired,
    Corrupt,
}

/// Single-slot TTL cache over a key-value store.
pub struct TtlCache<T> {
    key: String,
    ttl: Duration,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    _value: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for TtlCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("key", &self.key)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl<T: Serialize + DeserializeOwned> TtlCache<T> {
    pub fn new(
        key: impl Into<String>,
        ttl: Duration,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            key: key.into(),
            ttl,
            store,
            clock,
            _value: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Age of `entry` right now. Negative when the entry claims to come
    /// from the future.
    pub fn age(&self, entry: &CacheEntry<T>) -> TimeDelta {
        self.clock.now() - entry.inserted_at
    }

    /// `true` while `0 <= age < ttl`.
    pub fn is_fresh(&self, entry: &CacheEntry<T>) -> bool {
        let age = self.age(entry);
        let ttl = TimeDelta::from_std(self.ttl).unwrap_or(TimeDelta::MAX);
        age >= TimeDelta::zero() && age < ttl
    }

    /// Return the entry if present and fresh.
    ///
    /// Stale and corrupt entries are deleted. Storage failures are logged
    /// and treated as a miss.
    pub fn get(&self) -> Option<CacheEntry<T>> {
        self.lookup().ok()
    }

    /// Like [`get`](Self::get) but reports why nothing usable was found.
    pub fn lookup(&self) -> Result<CacheEntry<T>, CacheMiss> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Err(CacheMiss::Absent),
            Err(e) => {
                warn!(key = %self.key, error = %e, "cache read failed");
                return Err(CacheMiss::Absent);
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key = %self.key, error = %e, "discarding unreadable cache entry");
                self.discard();
                return Err(CacheMiss::Corrupt);
            }
        };

        if !self.is_fresh(&entry) {
            debug!(key = %self.key, age_ms = self.age(&entry).num_milliseconds(), "cache entry expired");
            self.discard();
            return Err(CacheMiss::Expired);
        }

        Ok(entry)
    }

    /// Read the stored entry without freshness checks or cleanup.
    pub fn peek(&self) -> Result<Option<CacheEntry<T>>, CoreError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| CoreError::Storage {
                message: format!("unreadable cache entry '{}': {e}", self.key),
            })
    }

    /// Stamp `value` with the current time and store it, replacing any
    /// previous entry.
    pub fn put(&self, value: T) -> Result<CacheEntry<T>, CoreError> {
        let entry = CacheEntry {
            inserted_at: self.clock.now(),
            value,
        };
        let raw = serde_json::to_string(&entry)
            .map_err(|e| CoreError::Internal(format!("cache encode failed: {e}")))?;
        self.store.set(&self.key, &raw)?;
        Ok(entry)
    }

    /// Delete the entry.
    pub fn invalidate(&self) -> Result<(), CoreError> {
        self.store.remove(&self.key)
    }

    fn discard(&self) {
        if let Err(e) = self.invalidate() {
            warn!(key = %self.key, error = %e, "failed to delete cache entry");
        }
    }
}
