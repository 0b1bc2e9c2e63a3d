//! Exchange rate table used for salary conversion.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Currency code to rate, expressed as units of that currency per one unit
/// of the base currency (so the base currency itself has rate `1.0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct ExchangeRateTable {
    rates: BTreeMap<String, f64>,
}

impl ExchangeRateTable {
    /// Build a table, rejecting rates that are not finite and positive.
    pub fn new<I, K>(rates: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut table = BTreeMap::new();
        for (code, rate) in rates {
            let code = code.into();
            if !rate.is_finite() || rate <= 0.0 {
                return Err(AppError::validation(format!(
                    "exchange rate for {code} must be positive, got {rate}"
                )));
            }
            table.insert(code, rate);
        }
        Ok(Self { rates: table })
    }

    /// Look up the rate for `currency`.
    pub fn rate(&self, currency: &str) -> Result<f64> {
        self.rates
            .get(currency)
            .copied()
            .ok_or_else(|| AppError::missing_rate(currency))
    }
}

impl TryFrom<BTreeMap<String, f64>> for ExchangeRateTable {
    type Error = AppError;

    fn try_from(rates: BTreeMap<String, f64>) -> Result<Self> {
        Self::new(rates)
    }
}

impl From<ExchangeRateTable> for BTreeMap<String, f64> {
    fn from(table: ExchangeRateTable) -> Self {
        table.rates
    }
}
