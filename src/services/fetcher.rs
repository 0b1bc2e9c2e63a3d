// src/services/fetcher.rs

//! Bounded, order-preserving vacancy detail fetching.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, Result};
use crate::models::RawDetail;

use super::VacancySource;

/// Fetches vacancy details with at most `workers` requests in flight.
pub struct ConcurrentFetcher {
    source: Arc<dyn VacancySource>,
    workers: usize,
}

impl ConcurrentFetcher {
    /// `workers` below 1 is treated as 1.
    pub fn new(source: Arc<dyn VacancySource>, workers: usize) -> Self {
        Self {
            source,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Fetch the detail of every id. Output order matches `ids`, whatever
    /// order the responses arrive in.
    ///
    /// The first failed request fails the whole call; requests still in
    /// flight are dropped. Cancelling `cancel` does the same and returns
    /// [`AppError::Cancelled`].
    pub async fn fetch_all(
        &self,
        ids: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<RawDetail>> {
        let total = ids.len();
        let mut slots: Vec<Option<RawDetail>> = vec![None; total];

        let mut responses = stream::iter(ids.iter().enumerate())
            .map(|(index, id)| async move { (index, id, self.source.fetch_detail(id).await) })
            .buffer_unordered(self.workers);

        let mut done = 0;
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    log::warn!("Detail fetch cancelled after {done}/{total} vacancies");
                    return Err(AppError::Cancelled);
                }
                next = responses.next() => next,
            };
            let Some((index, id, result)) = next else {
                break;
            };

            let mut detail = result.inspect_err(|e| {
                log::warn!("Failed to fetch vacancy {id}: {e}");
            })?;
            detail.id = Some(id.clone());
            slots[index] = Some(detail);

            done += 1;
            log::debug!("Fetched {done}/{total} vacancies");
        }

        slots
            .into_iter()
            .zip(ids)
            .map(|(slot, id)| {
                slot.ok_or_else(|| AppError::malformed(format!("vacancy {id}"), "no response"))
            })
            .collect()
    }
}
