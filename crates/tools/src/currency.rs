//! Currency converter tool — fixed-rate stub.
//!
//! Every rate is expressed against one base currency; a conversion divides
//! by the source rate (normalising to the base) and multiplies by the target
//! rate. No network lookups are made.

use async_trait::async_trait;
use std::collections::BTreeMap;
use thinkloop_core::error::ToolError;
use thinkloop_core::tool::{Arguments, Tool, ToolParameter, number_arg, string_arg};

use crate::calculator::{render_number, round2};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurrencyError {
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("conversion result is not a finite number")]
    NotFinite,
}

impl From<CurrencyError> for ToolError {
    fn from(e: CurrencyError) -> Self {
        ToolError::ExecutionFailed(e.to_string())
    }
}

/// Exchange rates keyed by upper-case currency code.
#[derive(Debug, Clone)]
pub struct RateTable {
    base: String,
    rates: BTreeMap<String, f64>,
}

impl RateTable {
    /// Build a table. Codes are normalised to upper case.
    pub fn new(base: impl Into<String>, rates: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            base: base.into().to_uppercase(),
            rates: rates
                .into_iter()
                .map(|(code, rate)| (code.to_uppercase(), rate))
                .collect(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Supported codes, sorted.
    pub fn codes(&self) -> Vec<&str> {
        self.rates.keys().map(|s| s.as_str()).collect()
    }

    fn rate(&self, code: &str) -> Result<f64, CurrencyError> {
        let code = code.trim().to_uppercase();
        self.rates
            .get(&code)
            .copied()
            .ok_or(CurrencyError::UnsupportedCurrency(code))
    }

    /// Convert `amount` from one currency to another, rounded to 2 decimals.
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, CurrencyError> {
        let from_rate = self.rate(from)?;
        let to_rate = self.rate(to)?;
        let in_base = amount / from_rate;
        let converted = round2(in_base * to_rate);
        if !converted.is_finite() {
            return Err(CurrencyError::NotFinite);
        }
        Ok(converted)
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::new(
            "EUR",
            [
                ("EUR", 1.0),
                ("USD", 1.10),
                ("GBP", 0.85),
                ("JPY", 156.0),
                ("CHF", 0.95),
            ]
            .into_iter()
            .map(|(code, rate)| (code.to_string(), rate)),
        )
    }
}

pub struct CurrencyConverterTool {
    rates: RateTable,
    description: String,
}

impl CurrencyConverterTool {
    pub fn new(rates: RateTable) -> Self {
        let description = format!(
            "Convert an amount from one currency to another. Supports: {}.",
            rates.codes().join(", ")
        );
        Self { rates, description }
    }
}

#[async_trait]
impl Tool for CurrencyConverterTool {
    fn name(&self) -> &str {
        "convert_currency"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        vec![
            ToolParameter::new("amount", "float - the amount to convert"),
            ToolParameter::new("from_currency", "string - source currency code (e.g. 'EUR')"),
            ToolParameter::new("to_currency", "string - target currency code (e.g. 'USD')"),
        ]
    }

    async fn execute(&self, arguments: &Arguments) -> Result<String, ToolError> {
        let amount = number_arg(arguments, "amount")?;
        let from = string_arg(arguments, "from_currency")?;
        let to = string_arg(arguments, "to_currency")?;

        let converted = self.rates.convert(amount, &from, &to)?;
        Ok(render_number(converted))
    }
}
