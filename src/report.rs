//! The shared render input
//!
//! Every front end (chat, dashboard page, email) formats the same
//! `PriceReport`; only the markup differs per transport.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::price_source::AssetQuote;
use crate::valuation::PortfolioValuation;

#[derive(Debug, Clone)]
pub struct PriceReport {
    /// Quotes in configured display order. May be shorter than the tracked
    /// set when the upstream dropped assets this cycle; empty means the
    /// fetch produced nothing renderable.
    pub quotes: Vec<AssetQuote>,
    /// None when the held asset had no quote this cycle. Renderers show a
    /// "no portfolio data" state rather than zeros.
    pub portfolio: Option<PortfolioValuation>,
    /// USD to local multiplier, when a conversion was performed.
    pub usd_to_local: Option<f64>,
    /// Local currency code for labels, e.g. "AUD".
    pub currency: String,
    /// Wall-clock time in the fixed display timezone.
    pub generated_at: DateTime<Tz>,
}
