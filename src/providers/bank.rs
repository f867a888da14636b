//! Bank exchange-rate feed.
//!
//! The endpoint returns a JSON array of per-currency records carrying a
//! `buy` quote. USD is quoted as TWD per USD and used directly; JPY is
//! quoted inverted by the source and converted as `1 / buy`. TWD is pinned
//! at 1.0. The parse is strict: malformed payloads or unusable quotes are
//! errors, so a failed refresh leaves the caller's current table untouched.

use crate::core::currency::{Currency, HOME_CURRENCY, RateProvider, RateTable};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, instrument};

const FETCH_RETRIES: usize = 3;
const RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Deserialize)]
struct BankRateRecord {
    currency: String,
    buy: f64,
}

pub struct BankRateProvider {
    base_url: String,
}

impl BankRateProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Retries transport-level failures; HTTP error pages surface through
    /// the parse step instead.
    async fn send_request(&self, client: &reqwest::Client, url: &str) -> Result<reqwest::Response> {
        let mut attempt = 1;
        loop {
            match client.get(url).send().await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    if attempt > FETCH_RETRIES {
                        return Err(err).context("Exchange rate request failed");
                    }
                    debug!(
                        "Attempt {}/{} failed: {}. Retrying...",
                        attempt, FETCH_RETRIES, err
                    );
                    attempt += 1;
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }
    }

    fn quote_to_rate(currency: Currency, buy: f64) -> Result<f64> {
        if !buy.is_finite() || buy <= 0.0 {
            bail!("Unusable buy quote {buy} for {currency}");
        }
        Ok(match currency {
            // The feed quotes JPY per TWD; invert into TWD per JPY.
            Currency::Jpy => 1.0 / buy,
            Currency::Usd => buy,
            Currency::Twd => 1.0,
        })
    }
}

#[async_trait]
impl RateProvider for BankRateProvider {
    #[instrument(name = "BankRateFetch", skip(self))]
    async fn fetch_rates(&self) -> Result<RateTable> {
        let url = format!("{}/rates", self.base_url);
        debug!("Requesting exchange rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent(concat!("tourbook/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let response = self.send_request(&client, &url).await?;

        let response_text = response
            .text()
            .await
            .context("Failed to get response text")?;

        let records: Vec<BankRateRecord> = match serde_json::from_str(&response_text) {
            Ok(data) => data,
            Err(e) => {
                error!(
                    error = ?e,
                    response = %response_text,
                    "Failed to parse exchange rate response"
                );
                return Err(e).context("Failed to parse exchange rate response");
            }
        };

        let fetched_at = Utc::now();
        let mut table = RateTable::home_only(fetched_at);
        for record in &records {
            // Currencies outside the supported set are not an error.
            let Ok(currency) = record.currency.parse::<Currency>() else {
                debug!(currency = %record.currency, "Skipping unsupported currency");
                continue;
            };
            if currency == HOME_CURRENCY {
                continue;
            }
            let rate = Self::quote_to_rate(currency, record.buy)?;
            table.insert(currency, rate, fetched_at);
        }
        debug!(?table, "Built fresh rate table");
        Ok(table)
    }
}
