// src/lib.rs

//! hh-collector Library
//!
//! Collects vacancies from the hh.ru API, normalizes salaries into one base
//! currency and caches each query's result on disk.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
