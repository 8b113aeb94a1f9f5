//! Session-scoped cache of the last resolved payload per feed
//!
//! The cache is a thin typed layer over a [`SessionBackend`], a synchronous
//! key/value store that lives as long as the browsing session. Reads never
//! touch the network and never fail: anything unreadable is reported as a
//! miss.

mod local;
mod memory;

pub use local::LocalBackend;
pub use memory::MemoryBackend;

use crate::error::CacheError;
use crate::types::FeedPayload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result type for cache backend operations
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Key/value store scoped to one browsing session
pub trait SessionBackend: Send + Sync {
    /// Read the value stored under `key`, if any
    fn read(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Store `data` under `key`, replacing any previous value
    fn write(&self, key: &str, data: Vec<u8>) -> CacheResult<()>;

    /// Remove the value under `key`; missing keys are not an error
    fn remove(&self, key: &str) -> CacheResult<()>;

    /// All stored values, in no particular order
    fn values(&self) -> CacheResult<Vec<Vec<u8>>>;

    /// Drop everything; the session is over
    fn clear(&self) -> CacheResult<()>;
}

/// A cached feed payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub feed_name: String,
    pub payload: FeedPayload,
    pub written_at: DateTime<Utc>,
}

/// Last-good feed payloads for the current session
#[derive(Clone)]
pub struct SessionFeedCache {
    backend: Arc<dyn SessionBackend>,
}

impl SessionFeedCache {
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        Self { backend }
    }

    /// Cache backed by process memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Payload cached for `feed_name`
    pub fn read(&self, feed_name: &str) -> Option<FeedPayload> {
        self.read_entry(feed_name).map(|entry| entry.payload)
    }

    /// Full entry cached for `feed_name`, including when it was written
    pub fn read_entry(&self, feed_name: &str) -> Option<CacheEntry> {
        let data = match self.backend.read(feed_name) {
            Ok(Some(data)) => data,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(feed = feed_name, "Failed to read cached feed: {}", e);
                return None;
            }
        };

        match serde_json::from_slice::<CacheEntry>(&data) {
            Ok(entry) if entry.feed_name == feed_name => Some(entry),
            Ok(entry) => {
                tracing::warn!(
                    feed = feed_name,
                    stored = %entry.feed_name,
                    "Cached entry belongs to another feed, ignoring"
                );
                None
            }
            Err(e) => {
                tracing::warn!(feed = feed_name, "Discarding corrupt cached feed: {}", e);
                None
            }
        }
    }

    /// Store `payload` for `feed_name`, overwriting any previous entry
    pub fn write(&self, feed_name: &str, payload: &FeedPayload) -> CacheResult<()> {
        let entry = CacheEntry {
            feed_name: feed_name.to_string(),
            payload: payload.clone(),
            written_at: Utc::now(),
        };
        let data = serde_json::to_vec(&entry)?;
        self.backend.write(feed_name, data)
    }

    /// Every readable entry, sorted by feed name
    pub fn entries(&self) -> Vec<CacheEntry> {
        let values = match self.backend.values() {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!("Failed to list cached feeds: {}", e);
                return Vec::new();
            }
        };

        let mut entries: Vec<CacheEntry> = values
            .iter()
            .filter_map(|data| serde_json::from_slice(data).ok())
            .collect();
        entries.sort_by(|a, b| a.feed_name.cmp(&b.feed_name));
        entries
    }

    /// Forget one feed
    pub fn invalidate(&self, feed_name: &str) -> CacheResult<()> {
        self.backend.remove(feed_name)
    }

    /// End the session, destroying every entry
    pub fn end_session(&self) -> CacheResult<()> {
        self.backend.clear()
    }
}
