//! Cache module for keeping raw catalog responses in memory
//!
//! This module provides a string-keyed store of undecoded response bytes with
//! age-based expiry. Reads never return an entry older than the cache interval,
//! and a background reaper periodically drops such entries to reclaim memory.

mod reaper;
mod store;

pub use store::{Cache, CacheEntry};
