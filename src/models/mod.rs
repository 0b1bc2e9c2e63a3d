// src/models/mod.rs

//! Domain models for the collector.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod filter;
mod query;
mod rates;
mod raw;
mod vacancy;

// Re-export all public types
pub use config::{ApiConfig, CacheConfig, CollectorConfig, Config};
pub use filter::FilterSpec;
pub use query::{EncodedQuery, Fingerprint, Query, QueryValue};
pub use rates::ExchangeRateTable;
pub use raw::{Area, ListingItem, ListingPage, Named, RawDetail, RawSalary};
pub use vacancy::{ColumnarResult, VacancyRecord};
