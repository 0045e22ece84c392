//! Portfolio valuation
//!
//! Pure arithmetic over one quote, the configured holdings quantity and the
//! USD-to-local rate. The valuator is never run for an asset the upstream
//! dropped this cycle; callers render a "no data" state instead, because a
//! fabricated zero is indistinguishable from a flat 24h change.

use serde::Serialize;

use crate::price_source::AssetQuote;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuation {
    pub symbol: String,
    pub quantity: f64,
    pub value_usd: f64,
    pub value_local: f64,
    pub change_usd_24h: f64,
    pub change_local_24h: f64,
}

pub fn valuate(quote: &AssetQuote, quantity: f64, usd_to_local: f64) -> PortfolioValuation {
    let value_usd = quote.price_usd * quantity;
    let change_usd_24h = value_usd * (quote.change_percent_24h / 100.0);
    PortfolioValuation {
        symbol: quote.symbol.clone(),
        quantity,
        value_usd,
        value_local: value_usd * usd_to_local,
        change_usd_24h,
        change_local_24h: change_usd_24h * usd_to_local,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(price_usd: f64, change: f64) -> AssetQuote {
        AssetQuote {
            symbol: "COOKIE".to_string(),
            provider_id: "cookie".to_string(),
            price_usd,
            change_percent_24h: change,
        }
    }

    #[test]
    fn test_valuation_formulas() {
        let v = valuate(&quote(0.15, 5.2), 150000.0, 1.52);

        assert!((v.value_usd - 22500.0).abs() < 1e-9);
        assert!((v.value_local - 22500.0 * 1.52).abs() < 1e-9);
        assert!((v.change_usd_24h - 22500.0 * 0.052).abs() < 1e-9);
        assert!((v.change_local_24h - 22500.0 * 0.052 * 1.52).abs() < 1e-9);
    }

    #[test]
    fn test_local_values_scale_with_rate() {
        for (price, qty, rate) in [
            (0.0, 10.0, 1.55),
            (0.00012345, 1e6, 0.92),
            (65000.0, 0.5, 1.52),
        ] {
            let v = valuate(&quote(price, -1.3), qty, rate);
            assert!((v.value_local - v.value_usd * rate).abs() < 1e-9 * v.value_usd.abs().max(1.0));
            assert!(
                (v.change_local_24h - v.change_usd_24h * rate).abs()
                    < 1e-9 * v.change_usd_24h.abs().max(1.0)
            );
        }
    }

    #[test]
    fn test_negative_change_produces_negative_deltas() {
        let v = valuate(&quote(65000.0, -1.3), 2.0, 1.5);
        assert!(v.change_usd_24h < 0.0);
        assert!(v.change_local_24h < 0.0);
        assert!(v.value_usd > 0.0);
    }
}
