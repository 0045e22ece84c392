use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

use crate::config::AssetEntry;
use crate::error::{Error, Result};
use crate::price_source::{AssetQuote, QuoteSource};

/// Client for CoinGecko's `simple/price` endpoint. All tracked assets are
/// fetched in one batched request to stay inside upstream rate limits.
pub struct CoinGeckoSource {
    base_url: String,
    client: reqwest::Client,
}

impl CoinGeckoSource {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(CoinGeckoSource {
            base_url: base_url.to_string(),
            client: super::http_client()?,
        })
    }
}

/// One entry of the `simple/price` response map.
#[derive(Deserialize, Debug)]
struct SimplePriceEntry {
    usd: f64,
    usd_24h_change: Option<f64>,
}

#[async_trait]
impl QuoteSource for CoinGeckoSource {
    #[instrument(name = "CoinGeckoFetch", skip_all, fields(assets = assets.len()))]
    async fn fetch_quotes(&self, assets: &[AssetEntry]) -> Result<Vec<AssetQuote>> {
        let ids: Vec<&str> = assets.iter().map(|a| a.provider_id.as_str()).collect();
        let url = format!(
            "{}/api/v3/simple/price?ids={}&vs_currencies=usd&include_24hr_change=true",
            self.base_url,
            ids.join(",")
        );
        debug!("Requesting prices from {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Error::UpstreamStatus(response.status()));
        }

        let text = response.text().await?;
        let prices: HashMap<String, SimplePriceEntry> = serde_json::from_str(&text)
            .map_err(|e| Error::InvalidResponse(format!("unexpected price payload: {e}")))?;

        // Request order is display order. Assets missing from the response
        // are dropped, not errors; callers tolerate a short result.
        let mut quotes = Vec::with_capacity(assets.len());
        for asset in assets {
            match prices.get(&asset.provider_id) {
                Some(entry) => quotes.push(AssetQuote {
                    symbol: asset.symbol.clone(),
                    provider_id: asset.provider_id.clone(),
                    price_usd: entry.usd,
                    change_percent_24h: entry.usd_24h_change.unwrap_or(0.0),
                }),
                None => warn!(
                    symbol = %asset.symbol,
                    provider_id = %asset.provider_id,
                    "Asset missing from price response, skipping"
                ),
            }
        }

        Ok(quotes)
    }
}
