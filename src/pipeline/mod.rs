//! Collection pipeline.
//!
//! - `encode`: Canonical query string and cache fingerprint
//! - `normalize`: Raw vacancy detail to flat record
//! - `filter`: Post-collection filtering and limiting
//! - `collect`: The `Collector` tying the stages to the cache

pub mod collect;
pub mod encode;
pub mod filter;
pub mod normalize;

pub use collect::{CollectRequest, Collector};
