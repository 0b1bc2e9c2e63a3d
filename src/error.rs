// src/error.rs

//! Unified error handling for the collector.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for collector operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Transport failure or non-success HTTP status
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not have the expected JSON shape
    #[error("Malformed response from {context}: {message}")]
    Malformed { context: String, message: String },

    /// Salary currency has no entry in the exchange rate table
    #[error("No exchange rate for currency '{currency}'")]
    MissingRate { currency: String },

    /// Collection was cancelled by the caller
    #[error("Collection cancelled")]
    Cancelled,

    /// Collection did not finish before its deadline
    #[error("Collection deadline of {after:?} exceeded")]
    DeadlineExceeded { after: Duration },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a malformed-response error with context.
    pub fn malformed(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Malformed {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a missing exchange rate error.
    pub fn missing_rate(currency: impl Into<String>) -> Self {
        Self::MissingRate {
            currency: currency.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
