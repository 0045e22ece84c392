//! Report rendering
//!
//! One formatting contract, three transports. `ChatRenderer` emits Telegram
//! Markdown, `PageRenderer` a full dashboard document, `EmailRenderer` an
//! HTML body that survives script- and stylesheet-stripping mail clients.
//! All three are pure: identical report in, byte-identical string out.

pub mod chat;
pub mod email;
pub mod page;

pub use chat::ChatRenderer;
pub use email::EmailRenderer;
pub use page::PageRenderer;

use chrono::DateTime;
use chrono_tz::Tz;

use crate::report::PriceReport;

pub trait ReportRenderer {
    fn render(&self, report: &PriceReport) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Zero counts as up, so a flat day still gets the up indicator.
pub fn direction(change_percent: f64) -> Direction {
    if change_percent >= 0.0 {
        Direction::Up
    } else {
        Direction::Down
    }
}

/// USD price with 2 to 8 fractional digits. Sub-cent precision from the
/// upstream is kept; everything else is clamped to the usual two decimals.
pub fn format_usd(price: f64) -> String {
    let full = format!("{price:.8}");
    let trimmed = full.trim_end_matches('0');
    let (int_part, frac) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    if frac.len() <= 2 {
        format!("${price:.2}")
    } else {
        format!("${int_part}.{frac}")
    }
}

/// 24h change with an explicit sign, e.g. "+5.20%" or "-1.30%".
pub fn format_change(change_percent: f64) -> String {
    format!("{change_percent:+.2}%")
}

/// Signed local/USD amount for portfolio deltas, e.g. "+1170.00".
pub fn format_signed_amount(amount: f64) -> String {
    format!("{amount:+.2}")
}

/// Unsigned amount with two decimals for portfolio values.
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Timestamp in the fixed display timezone, e.g. "29 Aug 2026 09:00 AEST".
pub fn format_timestamp(at: &DateTime<Tz>) -> String {
    at.format("%d %b %Y %H:%M %Z").to_string()
}

/// Every config-sourced string interpolated into HTML output goes through
/// here, for the page and the email body alike.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Australia::Brisbane;

    #[test]
    fn test_price_clamps_to_two_decimals() {
        assert_eq!(format_usd(65000.0), "$65000.00");
        assert_eq!(format_usd(3200.5), "$3200.50");
        assert_eq!(format_usd(0.15), "$0.15");
        assert_eq!(format_usd(0.0), "$0.00");
    }

    #[test]
    fn test_price_keeps_sub_cent_precision() {
        assert_eq!(format_usd(0.000123), "$0.000123");
        assert_eq!(format_usd(0.047), "$0.047");
        // Trailing zeros beyond the precision are not invented.
        assert_eq!(format_usd(0.105), "$0.105");
    }

    #[test]
    fn test_change_always_carries_a_sign() {
        assert_eq!(format_change(5.2), "+5.20%");
        assert_eq!(format_change(-1.3), "-1.30%");
        assert_eq!(format_change(0.0), "+0.00%");
    }

    #[test]
    fn test_zero_change_counts_as_up() {
        assert_eq!(direction(0.0), Direction::Up);
        assert_eq!(direction(5.2), Direction::Up);
        assert_eq!(direction(-0.01), Direction::Down);
    }

    #[test]
    fn test_timestamp_renders_in_brisbane_time() {
        // 2026-08-28 23:00 UTC is 09:00 next day in Brisbane (UTC+10).
        let at = Brisbane.with_ymd_and_hms(2026, 8, 29, 9, 0, 0).unwrap();
        assert_eq!(format_timestamp(&at), "29 Aug 2026 09:00 AEST");
    }
}
