//! Service layer for the collector.
//!
//! This module contains the remote-facing logic:
//! - API access (`VacancySource`, `HttpSource`)
//! - Listing enumeration (`PageEnumerator`)
//! - Detail fetching (`ConcurrentFetcher`)
//! - Area lookup (`find_area_id`, `resolve_area`)

mod areas;
mod fetcher;
mod pages;
pub(crate) mod source;

pub use areas::{find_area_id, resolve_area};
pub use fetcher::ConcurrentFetcher;
pub use pages::PageEnumerator;
pub use source::{HttpSource, VacancySource};
