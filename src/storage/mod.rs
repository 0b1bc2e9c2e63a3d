//! Result cache keyed by query fingerprint.
//!
//! ## Directory Structure
//!
//! ```text
//! cache/
//! ├── 3f9a...e1.json        # one entry per query fingerprint
//! └── b07c...42.json
//! ```
//!
//! Entries are overwritten whole and never expire. There is no locking
//! between writers; the last write for a fingerprint wins.

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{ColumnarResult, EncodedQuery, Fingerprint};

// Re-export for convenience
pub use local::LocalCache;

/// A collected result as persisted in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Cache key
    pub fingerprint: Fingerprint,
    /// Canonical query the entry was collected for
    pub query: EncodedQuery,
    /// When the collection finished
    pub created_at: DateTime<Utc>,
    /// Pre-fetch limit that cut the id list, if any
    pub truncated_at: Option<usize>,
    /// Normalized vacancies, unfiltered
    pub result: ColumnarResult,
}

impl CacheEntry {
    pub fn new(
        fingerprint: Fingerprint,
        query: EncodedQuery,
        truncated_at: Option<usize>,
        result: ColumnarResult,
    ) -> Self {
        Self {
            fingerprint,
            query,
            created_at: Utc::now(),
            truncated_at,
            result,
        }
    }

    /// Whether this entry holds every row a request with `limit` could need.
    pub fn covers(&self, limit: Option<usize>) -> bool {
        match (self.truncated_at, limit) {
            (None, _) => true,
            (Some(cut), Some(limit)) => limit <= cut,
            (Some(_), None) => false,
        }
    }
}

/// Trait for result cache backends.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up an entry. Any read or decode failure is a miss.
    async fn get(&self, fingerprint: &Fingerprint) -> Option<CacheEntry>;

    /// Store an entry, replacing any previous one for its fingerprint.
    async fn put(&self, entry: &CacheEntry) -> Result<()>;

    /// Remove every entry, returning how many were removed.
    async fn clear(&self) -> Result<usize>;
}
