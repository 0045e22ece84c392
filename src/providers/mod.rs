//! External data providers
//!
//! Thin HTTP clients over the two upstream collaborators: a CoinGecko-style
//! simple price API and an exchange-rate API for the dashboard conversion.

pub mod coingecko;
pub mod exchange_rate;

/// Shared HTTP client with the crate user agent.
pub(crate) fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("coinbrief/", env!("CARGO_PKG_VERSION")))
        .build()
}
