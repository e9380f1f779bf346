//! Time-expiring in-memory store for raw catalog responses
//!
//! Provides a `Cache` that maps resource keys (normally full URLs) to the raw,
//! undecoded bytes of a response. Entries older than the configured interval are
//! invisible to reads and are physically removed by a background reaper.

use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

use super::reaper::Reaper;

/// Smallest period the reaper can tick at
const MIN_SWEEP_PERIOD: Duration = Duration::from_millis(1);

pub(crate) type EntryMap = HashMap<String, CacheEntry>;

/// A single cached payload with its insertion time
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Raw response bytes
    payload: Bytes,
    /// When the entry was inserted
    created_at: Instant,
}

impl CacheEntry {
    fn new(payload: Bytes) -> Self {
        Self {
            payload,
            created_at: Instant::now(),
        }
    }

    /// Whether the entry has reached `max_age` as of `now`
    pub(crate) fn is_stale(&self, now: Instant, max_age: Duration) -> bool {
        now.saturating_duration_since(self.created_at) >= max_age
    }
}

/// Thread-safe TTL cache of raw payloads
///
/// A single interval controls both how old an entry may get before reads stop
/// returning it and how often the reaper sweeps stale entries out of memory.
/// Reads always check staleness themselves, so an entry the reaper has not
/// reached yet is still never served.
///
/// Every access to the entry map, including a full sweep, goes through one mutex.
///
/// The reaper is a Tokio task, so a `Cache` must be created inside a runtime.
#[derive(Debug)]
pub struct Cache {
    entries: Arc<Mutex<EntryMap>>,
    interval: Duration,
    reaper: Mutex<Option<Reaper>>,
}

impl Cache {
    /// Creates a cache and starts its background reaper
    ///
    /// # Arguments
    /// * `interval` - Staleness threshold and period between sweeps
    pub fn new(interval: Duration) -> Self {
        let entries = Arc::new(Mutex::new(EntryMap::new()));
        let reaper = Reaper::spawn(
            Arc::clone(&entries),
            interval,
            interval.max(MIN_SWEEP_PERIOD),
        );

        Self {
            entries,
            interval,
            reaper: Mutex::new(Some(reaper)),
        }
    }

    /// Inserts or overwrites the entry for `key`, stamped with the current time
    pub fn put(&self, key: impl Into<String>, payload: impl Into<Bytes>) {
        let key = key.into();
        let entry = CacheEntry::new(payload.into());
        lock(&self.entries).insert(key, entry);
    }

    /// Returns the payload stored under `key` if it exists and is not stale
    ///
    /// Never mutates the cache: a stale entry is left for the reaper.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        let entries = lock(&self.entries);
        let entry = entries.get(key)?;

        if entry.is_stale(Instant::now(), self.interval) {
            None
        } else {
            Some(entry.payload.clone())
        }
    }

    /// The interval this cache was built with
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of entries physically held, including stale ones not yet swept
    pub fn entry_count(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Whether the background reaper is still running
    pub fn is_reaping(&self) -> bool {
        lock(&self.reaper).is_some()
    }

    /// Stops the background reaper and waits for it to finish
    ///
    /// Calling this more than once is a no-op. The cache keeps serving reads and
    /// writes afterwards; stale entries are simply no longer reclaimed.
    pub async fn shutdown(&self) {
        let reaper = lock(&self.reaper).take();
        if let Some(reaper) = reaper {
            reaper.shutdown().await;
        }
    }
}

/// Removes every entry that is stale as of now, returning how many were dropped
pub(crate) fn sweep(entries: &Mutex<EntryMap>, max_age: Duration) -> usize {
    let mut entries = lock(entries);
    let now = Instant::now();
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_stale(now, max_age));
    before - entries.len()
}

/// Locks a mutex, recovering the guard if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
