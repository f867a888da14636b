//! Currencies, the exchange rate table and the conversion seam.
//!
//! Every aggregate the application reports is normalized into the home
//! currency (TWD). The [`RateTable`] is the single current mapping from a
//! currency to its multiplier into TWD; it is replaced wholesale on each
//! successful refresh and never partially updated.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

/// All aggregates are reported in this currency.
pub const HOME_CURRENCY: Currency = Currency::Twd;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Twd,
    Jpy,
    Usd,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Twd, Currency::Jpy, Currency::Usd];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Twd => "TWD",
            Currency::Jpy => "JPY",
            Currency::Usd => "USD",
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TWD" => Ok(Currency::Twd),
            "JPY" => Ok(Currency::Jpy),
            "USD" => Ok(Currency::Usd),
            _ => Err(anyhow::anyhow!("Unsupported currency: {}", s)),
        }
    }
}

/// A single quoted rate: multiplier converting 1 unit into TWD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    pub rate: f64,
    pub updated_at: DateTime<Utc>,
}

/// The current rate table.
///
/// Lookups for a currency that is missing from the table fall back to 1.0
/// (no conversion) instead of failing; the fixed three-currency set makes
/// that path unreachable in practice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    quotes: HashMap<Currency, RateQuote>,
}

impl RateTable {
    /// A table that only knows the home currency, pinned at 1.0. This is the
    /// fallback before any refresh has ever succeeded.
    pub fn home_only(as_of: DateTime<Utc>) -> Self {
        let mut table = RateTable::default();
        table.insert(HOME_CURRENCY, 1.0, as_of);
        table
    }

    pub fn insert(&mut self, currency: Currency, rate: f64, updated_at: DateTime<Utc>) {
        self.quotes.insert(currency, RateQuote { rate, updated_at });
    }

    pub fn quote(&self, currency: Currency) -> Option<&RateQuote> {
        self.quotes.get(&currency)
    }

    pub fn rate(&self, currency: Currency) -> f64 {
        self.quotes.get(&currency).map_or(1.0, |q| q.rate)
    }

    /// Converts an amount in `currency` into the home currency. Pure: the
    /// result depends only on the amount and this table. No rounding is
    /// applied; formatting is a presentation concern.
    pub fn to_home(&self, amount: f64, currency: Currency) -> f64 {
        amount * self.rate(currency)
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Currency, &RateQuote)> {
        self.quotes.iter().map(|(c, q)| (*c, q))
    }
}

/// Source of a fresh rate table. Implementations fetch from an external
/// feed and must fail closed: an error leaves the caller's current table
/// untouched.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self) -> Result<RateTable>;
}
