// src/pipeline/collect.rs

//! Vacancy collection: cache lookup, enumeration, fetch, normalization.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{AppError, Result};
use crate::models::{
    ColumnarResult, Config, EncodedQuery, ExchangeRateTable, FilterSpec, Fingerprint, Query,
};
use crate::services::{ConcurrentFetcher, PageEnumerator, VacancySource};
use crate::storage::{CacheEntry, CacheStore};

use super::{encode, filter, normalize};

/// One collection call.
#[derive(Debug, Clone, Default)]
pub struct CollectRequest {
    /// Search parameters; the only input to the cache key
    pub query: Query,
    /// Ignore any cached entry and collect again
    pub refresh: bool,
    /// Applied after collection, never cached
    pub filter: Option<FilterSpec>,
    /// Cuts the id list before fetching, and the filtered rows after
    pub limit: Option<usize>,
}

impl CollectRequest {
    pub fn new(query: Query) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }
}

/// Collects normalized vacancies for a query, caching by query fingerprint.
pub struct Collector {
    source: Arc<dyn VacancySource>,
    cache: Arc<dyn CacheStore>,
    rates: ExchangeRateTable,
    workers: usize,
    deadline: Option<Duration>,
}

impl Collector {
    /// Create a collector with one worker and no deadline.
    pub fn new(
        source: Arc<dyn VacancySource>,
        cache: Arc<dyn CacheStore>,
        rates: ExchangeRateTable,
    ) -> Self {
        Self {
            source,
            cache,
            rates,
            workers: 1,
            deadline: None,
        }
    }

    /// Create a collector with rates, workers and deadline from `config`.
    pub fn from_config(
        config: &Config,
        source: Arc<dyn VacancySource>,
        cache: Arc<dyn CacheStore>,
    ) -> Result<Self> {
        let collector = Self::new(source, cache, config.rate_table()?)
            .workers(config.collector.workers);
        Ok(match config.collector.deadline() {
            Some(deadline) => collector.deadline(deadline),
            None => collector,
        })
    }

    /// Maximum concurrent detail requests (at least 1).
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Fail with [`AppError::DeadlineExceeded`] if a collection takes longer.
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Collect, filter and limit vacancies for `request`.
    pub async fn collect(&self, request: &CollectRequest) -> Result<ColumnarResult> {
        self.collect_with_cancel(request, CancellationToken::new()).await
    }

    /// Like [`Collector::collect`], aborting with [`AppError::Cancelled`]
    /// when `cancel` fires.
    pub async fn collect_with_cancel(
        &self,
        request: &CollectRequest,
        cancel: CancellationToken,
    ) -> Result<ColumnarResult> {
        let (encoded, fingerprint) = encode::fingerprint_query(&request.query);
        log::info!("Collecting vacancies for '{}' ({})", encoded, fingerprint);

        let mut collected = match self.lookup(&fingerprint, request).await {
            Some(entry) => entry.result,
            None => {
                let gather = self.gather(&encoded, &fingerprint, request.limit, &cancel);
                let entry = self.guard(gather, &cancel).await?;
                self.store(&entry).await;
                entry.result
            }
        };

        // A cached entry may hold more rows than this request would have fetched
        if let Some(limit) = request.limit {
            collected.truncate(limit);
        }

        let result = filter::apply(&collected, request.filter.as_ref(), request.limit);
        log::info!(
            "Returning {} of {} collected vacancies",
            result.len(),
            collected.len()
        );
        Ok(result)
    }

    /// Cached entry usable for `request`, if any.
    async fn lookup(
        &self,
        fingerprint: &Fingerprint,
        request: &CollectRequest,
    ) -> Option<CacheEntry> {
        if request.refresh {
            log::info!("Refresh requested, bypassing cache");
            return None;
        }

        let entry = self.cache.get(fingerprint).await?;
        if !entry.covers(request.limit) {
            log::info!(
                "Cached entry was limited to {:?} vacancies, collecting again",
                entry.truncated_at
            );
            return None;
        }
        Some(entry)
    }

    /// Enumerate, fetch and normalize; the cache-miss path.
    async fn gather(
        &self,
        encoded: &EncodedQuery,
        fingerprint: &Fingerprint,
        limit: Option<usize>,
        cancel: &CancellationToken,
    ) -> Result<CacheEntry> {
        let mut ids = PageEnumerator::new(Arc::clone(&self.source))
            .enumerate(encoded)
            .await?;

        let truncated_at = limit.filter(|&limit| ids.len() > limit);
        if let Some(limit) = truncated_at {
            log::info!("Fetching only the first {} of {} vacancies", limit, ids.len());
            ids.truncate(limit);
        }

        let fetcher = ConcurrentFetcher::new(Arc::clone(&self.source), self.workers);
        log::info!(
            "Fetching {} vacancy details with {} workers",
            ids.len(),
            fetcher.workers()
        );
        let details = fetcher.fetch_all(&ids, cancel).await?;

        let records = details
            .iter()
            .map(|detail| normalize::normalize(detail, &self.rates))
            .collect::<Result<Vec<_>>>()?;

        Ok(CacheEntry::new(
            fingerprint.clone(),
            encoded.clone(),
            truncated_at,
            ColumnarResult::from_records(records),
        ))
    }

    /// Run `work` under the cancellation token and the deadline, if set.
    async fn guard<T>(
        &self,
        work: impl Future<Output = Result<T>>,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let cancellable = async {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(AppError::Cancelled),
                result = work => result,
            }
        };

        match self.deadline {
            Some(after) => tokio::time::timeout(after, cancellable)
                .await
                .map_err(|_| {
                    log::warn!("Collection exceeded its {:?} deadline", after);
                    AppError::DeadlineExceeded { after }
                })?,
            None => cancellable.await,
        }
    }

    /// Persist a fresh entry; failure is only logged.
    async fn store(&self, entry: &CacheEntry) {
        if let Err(e) = self.cache.put(entry).await {
            log::warn!(
                "Failed to cache result for {}: {}. Returning it uncached.",
                entry.fingerprint,
                e
            );
        }
    }
}
