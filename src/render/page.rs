//! Dashboard page rendering
//!
//! A full interactive HTML document: styled price cards, a portfolio
//! section, a manual refresh control and an inline script that reloads the
//! page periodically. An empty quote list still produces a valid document
//! with a visible error banner instead of an empty page.

use crate::render::{
    Direction, ReportRenderer, direction, escape_html, format_amount, format_change,
    format_signed_amount, format_timestamp, format_usd,
};
use crate::report::PriceReport;

/// Client-side reload interval, in milliseconds.
const RELOAD_INTERVAL_MS: u32 = 60_000;

pub struct PageRenderer;

fn arrow(d: Direction) -> &'static str {
    match d {
        Direction::Up => "\u{25B2}",   // ▲
        Direction::Down => "\u{25BC}", // ▼
    }
}

fn change_class(d: Direction) -> &'static str {
    match d {
        Direction::Up => "up",
        Direction::Down => "down",
    }
}

fn render_cards(report: &PriceReport, out: &mut String) {
    out.push_str("    <section class=\"cards\">\n");
    for quote in &report.quotes {
        let d = direction(quote.change_percent_24h);
        out.push_str(&format!(
            "      <div class=\"card\">\n        <h2>{}</h2>\n        <p class=\"price\">{}</p>\n        <p class=\"change {}\">{} {}</p>\n      </div>\n",
            escape_html(&quote.symbol),
            format_usd(quote.price_usd),
            change_class(d),
            arrow(d),
            format_change(quote.change_percent_24h),
        ));
    }
    out.push_str("    </section>\n");
}

fn render_portfolio(report: &PriceReport, out: &mut String) {
    out.push_str("    <section class=\"portfolio\">\n      <h2>Portfolio</h2>\n");
    match &report.portfolio {
        Some(p) => {
            let d = direction(p.change_usd_24h);
            out.push_str(&format!(
                "      <p class=\"holding\">{} {}</p>\n      <p class=\"value\">{} <span class=\"local\">({} {})</span></p>\n      <p class=\"change {}\">{} {} USD ({} {}) 24h</p>\n",
                format_amount(p.quantity),
                escape_html(&p.symbol),
                format_usd(p.value_usd),
                format_amount(p.value_local),
                escape_html(&report.currency),
                change_class(d),
                arrow(d),
                format_signed_amount(p.change_usd_24h),
                format_signed_amount(p.change_local_24h),
                escape_html(&report.currency),
            ));
        }
        None => {
            out.push_str("      <p class=\"no-data\">No portfolio data available this cycle.</p>\n");
        }
    }
    if let Some(rate) = report.usd_to_local {
        out.push_str(&format!(
            "      <p class=\"rate\">1 USD = {} {}</p>\n",
            format_amount(rate),
            escape_html(&report.currency),
        ));
    }
    out.push_str("    </section>\n");
}

impl ReportRenderer for PageRenderer {
    fn render(&self, report: &PriceReport) -> String {
        let mut out = String::from(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n  <title>Coinbrief</title>\n  <style>\n    body { font-family: -apple-system, sans-serif; background: #10141f; color: #e8e8e8; margin: 0; }\n    header { display: flex; justify-content: space-between; align-items: center; padding: 1rem 2rem; }\n    header h1 { font-size: 1.4rem; margin: 0; }\n    header button { background: #2563eb; color: #fff; border: 0; border-radius: 6px; padding: 0.5rem 1rem; cursor: pointer; }\n    main { padding: 0 2rem 2rem; }\n    .cards { display: flex; flex-wrap: wrap; gap: 1rem; }\n    .card, .portfolio { background: #1b2130; border-radius: 10px; padding: 1rem 1.5rem; min-width: 10rem; }\n    .card h2 { margin: 0 0 0.5rem; font-size: 1rem; color: #9aa4bd; }\n    .price { font-size: 1.3rem; margin: 0; }\n    .change { margin: 0.3rem 0 0; }\n    .change.up { color: #4ade80; }\n    .change.down { color: #f87171; }\n    .portfolio { margin-top: 1.5rem; }\n    .no-data { color: #9aa4bd; font-style: italic; }\n    .rate { color: #9aa4bd; font-size: 0.85rem; }\n    .banner { background: #7f1d1d; border-radius: 10px; padding: 1rem 1.5rem; }\n    footer { padding: 1rem 2rem; color: #9aa4bd; font-size: 0.85rem; }\n  </style>\n</head>\n<body>\n  <header>\n    <h1>\u{1F4CA} Coinbrief</h1>\n    <button onclick=\"location.reload()\">Refresh</button>\n  </header>\n  <main>\n",
        );

        if report.quotes.is_empty() {
            out.push_str(
                "    <div class=\"banner\">Price data is currently unavailable. The dashboard will retry automatically.</div>\n",
            );
        } else {
            render_cards(report, &mut out);
            render_portfolio(report, &mut out);
        }

        out.push_str(&format!(
            "  </main>\n  <footer>Updated {}</footer>\n  <script>setTimeout(function () {{ location.reload(); }}, {RELOAD_INTERVAL_MS});</script>\n</body>\n</html>\n",
            format_timestamp(&report.generated_at),
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price_source::AssetQuote;
    use crate::valuation::valuate;
    use chrono::TimeZone;
    use chrono_tz::Australia::Brisbane;

    fn quote(symbol: &str, price: f64, change: f64) -> AssetQuote {
        AssetQuote {
            symbol: symbol.to_string(),
            provider_id: symbol.to_lowercase(),
            price_usd: price,
            change_percent_24h: change,
        }
    }

    fn base_report() -> PriceReport {
        let quotes = vec![quote("COOKIE", 0.15, 5.2), quote("BTC", 65000.0, -1.3)];
        let portfolio = Some(valuate(&quotes[0], 150000.0, 1.52));
        PriceReport {
            quotes,
            portfolio,
            usd_to_local: Some(1.52),
            currency: "AUD".to_string(),
            generated_at: Brisbane.with_ymd_and_hms(2026, 8, 29, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_full_page_renders_cards_and_portfolio() {
        let html = PageRenderer.render(&base_report());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h2>COOKIE</h2>"));
        assert!(html.contains("$0.15"));
        assert!(html.contains("\u{25B2} +5.20%"));
        assert!(html.contains("\u{25BC} -1.30%"));
        assert!(html.contains("1 USD = 1.52 AUD"));
        assert!(html.contains("location.reload()"));
        assert!(html.contains("Updated 29 Aug 2026 09:00 AEST"));
    }

    #[test]
    fn test_empty_quotes_still_render_a_document_with_banner() {
        let report = PriceReport {
            quotes: vec![],
            portfolio: None,
            usd_to_local: None,
            currency: "AUD".to_string(),
            generated_at: Brisbane.with_ymd_and_hms(2026, 8, 29, 9, 0, 0).unwrap(),
        };
        let html = PageRenderer.render(&report);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("class=\"banner\""));
        assert!(html.contains("currently unavailable"));
        assert!(!html.contains("class=\"card\""));
    }

    #[test]
    fn test_missing_portfolio_shows_no_data_state() {
        let mut report = base_report();
        report.portfolio = None;
        let html = PageRenderer.render(&report);

        assert!(html.contains("No portfolio data available this cycle."));
        // A zero-valued portfolio must not be fabricated.
        assert!(!html.contains("$0.00 <span"));
    }

    #[test]
    fn test_symbols_are_escaped() {
        let mut report = base_report();
        report.quotes[0].symbol = "<script>".to_string();
        let html = PageRenderer.render(&report);
        assert!(html.contains("&lt;script&gt;"));
    }
}
