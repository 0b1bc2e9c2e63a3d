// src/services/pages.rs

//! Listing page enumeration.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::EncodedQuery;

use super::VacancySource;

/// Collects every vacancy id a query matches, page by page.
pub struct PageEnumerator {
    source: Arc<dyn VacancySource>,
}

impl PageEnumerator {
    pub fn new(source: Arc<dyn VacancySource>) -> Self {
        Self { source }
    }

    /// Read the declared page count from page 0, then walk pages `0..=pages`
    /// in order. Ids keep discovery order and are not deduplicated.
    ///
    /// A page without `items` ends the walk early without error.
    pub async fn enumerate(&self, query: &EncodedQuery) -> Result<Vec<String>> {
        let first = self.source.fetch_page(query, 0).await?;
        let pages = first
            .pages
            .ok_or_else(|| AppError::malformed("listing page 0", "missing `pages` field"))?;
        log::info!("Query declares {} result pages", pages);

        let mut ids = Vec::new();
        for page in 0..=pages {
            let listing = self.source.fetch_page(query, page).await?;
            let Some(items) = listing.items else {
                log::debug!("Page {page} has no items, stopping");
                break;
            };
            ids.extend(items.into_iter().map(|item| item.id));
        }

        log::info!("Enumerated {} vacancy ids", ids.len());
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ListingItem, ListingPage, Query};
    use crate::pipeline::encode::encode;
    use crate::services::source::mock::MockSource;

    fn page(pages: Option<u32>, ids: Option<&[&str]>) -> ListingPage {
        ListingPage {
            pages,
            items: ids.map(|ids| {
                ids.iter()
                    .map(|id| ListingItem { id: id.to_string() })
                    .collect()
            }),
        }
    }

    async fn run(source: MockSource) -> (Result<Vec<String>>, Arc<MockSource>) {
        let source = Arc::new(source);
        let enumerator = PageEnumerator::new(source.clone());
        let ids = enumerator.enumerate(&encode(&Query::new())).await;
        (ids, source)
    }

    #[tokio::test]
    async fn test_walks_pages_inclusive() {
        let source = MockSource {
            pages: vec![
                page(Some(2), Some(&["1", "2"])),
                page(Some(2), Some(&["3"])),
                page(Some(2), Some(&["4", "5"])),
            ],
            ..MockSource::default()
        };
        let (ids, source) = run(source).await;

        assert_eq!(ids.unwrap(), vec!["1", "2", "3", "4", "5"]);
        // page 0 for the count, then 0, 1, 2
        assert_eq!(*source.requested_pages.lock().unwrap(), vec![0, 0, 1, 2]);
    }

    #[tokio::test]
    async fn test_stops_at_page_without_items() {
        let source = MockSource {
            pages: vec![
                page(Some(5), Some(&["1"])),
                page(None, None),
                page(None, Some(&["never"])),
            ],
            ..MockSource::default()
        };
        let (ids, source) = run(source).await;

        assert_eq!(ids.unwrap(), vec!["1"]);
        assert_eq!(*source.requested_pages.lock().unwrap(), vec![0, 0, 1]);
    }

    #[tokio::test]
    async fn test_keeps_duplicates() {
        let source = MockSource {
            pages: vec![page(Some(1), Some(&["1", "2"])), page(Some(1), Some(&["2"]))],
            ..MockSource::default()
        };
        let (ids, _) = run(source).await;
        assert_eq!(ids.unwrap(), vec!["1", "2", "2"]);
    }

    #[tokio::test]
    async fn test_missing_page_count_is_malformed() {
        let source = MockSource {
            pages: vec![page(None, Some(&["1"]))],
            ..MockSource::default()
        };
        let (ids, _) = run(source).await;
        assert!(matches!(ids, Err(AppError::Malformed { .. })));
    }
}
