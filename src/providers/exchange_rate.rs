use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};
use crate::rate_source::RateSource;

/// Used whenever the exchange-rate API cannot be reached or parsed. An
/// approximate conversion beats a broken dashboard.
pub const FALLBACK_USD_TO_LOCAL: f64 = 1.55;

/// Client for a `/v4/latest/USD` style exchange-rate API.
pub struct ExchangeRateSource {
    base_url: String,
    currency: String,
    client: reqwest::Client,
}

impl ExchangeRateSource {
    pub fn new(base_url: &str, currency: &str) -> Result<Self> {
        Ok(ExchangeRateSource {
            base_url: base_url.to_string(),
            currency: currency.to_uppercase(),
            client: super::http_client()?,
        })
    }

    async fn fetch_rate(&self) -> Result<f64> {
        let url = format!("{}/v4/latest/USD", self.base_url);
        debug!("Requesting exchange rates from {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Error::UpstreamStatus(response.status()));
        }

        let data = response
            .json::<LatestRatesResponse>()
            .await
            .map_err(|e| Error::InvalidResponse(format!("unexpected rates payload: {e}")))?;

        let rate = data.rates.get(&self.currency).copied().ok_or_else(|| {
            Error::InvalidResponse(format!("no {} rate in response", self.currency))
        })?;
        if rate <= 0.0 {
            return Err(Error::InvalidResponse(format!(
                "non-positive {} rate: {rate}",
                self.currency
            )));
        }
        Ok(rate)
    }
}

#[derive(Deserialize, Debug)]
struct LatestRatesResponse {
    rates: HashMap<String, f64>,
}

#[async_trait]
impl RateSource for ExchangeRateSource {
    /// Never fails outward: any fetch or parse problem degrades to the
    /// fallback constant so the render cycle always completes.
    #[instrument(name = "ExchangeRateFetch", skip(self))]
    async fn usd_to_local(&self) -> f64 {
        match self.fetch_rate().await {
            Ok(rate) => rate,
            Err(e) => {
                warn!(error = %e, fallback = FALLBACK_USD_TO_LOCAL, "Rate fetch failed, using fallback");
                FALLBACK_USD_TO_LOCAL
            }
        }
    }
}
