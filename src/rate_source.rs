//! Currency conversion abstractions

use async_trait::async_trait;

#[async_trait]
pub trait RateSource: Send + Sync {
    /// USD to local-currency multiplier. Infallible outward: implementations
    /// fall back to an approximate constant rather than fail a render cycle.
    async fn usd_to_local(&self) -> f64;
}
