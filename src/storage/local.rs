//! Local filesystem cache implementation.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── {fingerprint}.json    # CacheEntry as pretty JSON
//! └── {fingerprint}.{pid}.{seq}.tmp   # in-progress write
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Fingerprint;
use crate::storage::{CacheEntry, CacheStore};

/// Distinguishes temp files of concurrent writes within one process.
static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Filesystem cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct LocalCache {
    root_dir: PathBuf,
}

impl LocalCache {
    /// Create a LocalCache rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Get the file path for a fingerprint.
    fn path(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.root_dir.join(format!("{fingerprint}.json"))
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.root_dir).await?;

        let seq = WRITE_SEQ.fetch_add(1, Ordering::Relaxed);
        let tmp = path.with_extension(format!("{}.{seq}.tmp", std::process::id()));
        let written = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(bytes).await?;
            file.flush().await?;
            drop(file);
            tokio::fs::rename(&tmp, path).await
        }
        .await;

        if written.is_err() {
            let _ = tokio::fs::remove_file(&tmp).await;
        }
        Ok(written?)
    }

    /// Whether `path` is a file this cache wrote: a finished entry, or the
    /// temp file of a write that never completed.
    fn is_cache_file(path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        let Some((stem, rest)) = name.split_once('.') else {
            return false;
        };
        let is_fingerprint = stem.len() == 64 && stem.bytes().all(|b| b.is_ascii_hexdigit());
        is_fingerprint && (rest == "json" || rest.ends_with(".tmp"))
    }

    /// Read and decode an entry, checking it belongs to `fingerprint`.
    async fn read_entry(&self, fingerprint: &Fingerprint) -> Result<CacheEntry> {
        let bytes = tokio::fs::read(self.path(fingerprint)).await?;
        let entry: CacheEntry = serde_json::from_slice(&bytes)?;
        if entry.fingerprint != *fingerprint {
            return Err(AppError::validation(format!(
                "entry holds fingerprint {}",
                entry.fingerprint
            )));
        }
        entry.result.validate()?;
        Ok(entry)
    }
}

#[async_trait]
impl CacheStore for LocalCache {
    async fn get(&self, fingerprint: &Fingerprint) -> Option<CacheEntry> {
        match self.read_entry(fingerprint).await {
            Ok(entry) => {
                log::info!(
                    "Cache hit for {} ({} vacancies, collected {})",
                    fingerprint,
                    entry.result.len(),
                    entry.created_at
                );
                Some(entry)
            }
            Err(AppError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("Cache miss for {fingerprint}");
                None
            }
            Err(e) => {
                log::debug!("Unreadable cache entry for {fingerprint}, treating as miss: {e}");
                None
            }
        }
    }

    async fn put(&self, entry: &CacheEntry) -> Result<()> {
        let path = self.path(&entry.fingerprint);
        let bytes = serde_json::to_vec_pretty(entry)?;
        self.write_bytes(&path, &bytes).await?;
        log::info!(
            "Cached {} vacancies to {}",
            entry.result.len(),
            path.display()
        );
        Ok(())
    }

    async fn clear(&self) -> Result<usize> {
        let mut dir = match tokio::fs::read_dir(&self.root_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut removed = 0;
        while let Some(item) = dir.next_entry().await? {
            let path = item.path();
            if Self::is_cache_file(&path) {
                tokio::fs::remove_file(&path).await?;
                removed += 1;
            }
        }
        log::info!("Removed {} cache entries from {}", removed, self.root_dir.display());
        Ok(removed)
    }
}
