//! Allow-cache abstraction for recently verified callers.
//!
//! The cache is injected into the verifier rather than resolved from
//! ambient context, so tests and alternative backends (an external KV
//! store, for instance) can supply their own implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

/// Key-value store with per-entry TTL.
///
/// Values are idempotent "verified" markers; concurrent writers racing to
/// populate the same key is benign (last write wins).
#[async_trait]
pub trait AllowCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn put(&self, key: &str, value: String, ttl: Duration);
}

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-process allow-cache backed by a concurrent map.
///
/// Entries expire lazily: an expired entry is removed on the first `get`
/// that observes it.
#[derive(Debug, Default)]
pub struct MemoryAllowCache {
    entries: DashMap<String, Entry>,
}

impl MemoryAllowCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AllowCache for MemoryAllowCache {
    async fn get(&self, key: &str) -> Option<String> {
        // The read guard must be released before removing the expired
        // entry, or the shard lock would be taken re-entrantly.
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    async fn put(&self, key: &str, value: String, ttl: Duration) {
        self.entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }
}
