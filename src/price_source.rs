//! Quote types and the price source abstraction

use crate::config::AssetEntry;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A point-in-time quote for one tracked asset. Created fresh on every
/// fetch and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetQuote {
    pub symbol: String,
    pub provider_id: String,
    pub price_usd: f64,
    /// 24-hour change in percent. Always numeric; defaults to 0 when the
    /// upstream response omits it.
    pub change_percent_24h: f64,
}

#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch quotes for the given assets in one batched request. Assets the
    /// upstream does not know are silently dropped, so the result may be
    /// shorter than the request. Result order follows the request order.
    async fn fetch_quotes(&self, assets: &[AssetEntry]) -> Result<Vec<AssetQuote>>;
}
