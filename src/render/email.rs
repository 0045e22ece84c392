//! Email body rendering
//!
//! Same data contract as the page, but mail clients routinely strip scripts
//! and external stylesheets, so everything is inlined `style=""` attributes
//! and there is no script at all.

use crate::render::{
    Direction, ReportRenderer, direction, escape_html, format_amount, format_change,
    format_signed_amount, format_timestamp, format_usd,
};
use crate::report::PriceReport;

pub struct EmailRenderer;

fn change_color(d: Direction) -> &'static str {
    match d {
        Direction::Up => "#15803d",
        Direction::Down => "#b91c1c",
    }
}

fn arrow(d: Direction) -> &'static str {
    match d {
        Direction::Up => "\u{25B2}",
        Direction::Down => "\u{25BC}",
    }
}

impl ReportRenderer for EmailRenderer {
    fn render(&self, report: &PriceReport) -> String {
        let mut out = String::from(
            "<div style=\"font-family: Arial, sans-serif; max-width: 480px; margin: 0 auto;\">\n  <h1 style=\"font-size: 18px;\">\u{1F4CA} Daily Crypto Brief</h1>\n",
        );

        if report.quotes.is_empty() {
            out.push_str(
                "  <p style=\"background: #fee2e2; color: #b91c1c; padding: 12px; border-radius: 6px;\">Price data was unavailable for this report.</p>\n",
            );
        } else {
            out.push_str(
                "  <table style=\"width: 100%; border-collapse: collapse;\">\n",
            );
            for quote in &report.quotes {
                let d = direction(quote.change_percent_24h);
                out.push_str(&format!(
                    "    <tr>\n      <td style=\"padding: 8px 0; font-weight: bold; border-bottom: 1px solid #e5e7eb;\">{}</td>\n      <td style=\"padding: 8px 0; text-align: right; border-bottom: 1px solid #e5e7eb;\">{}</td>\n      <td style=\"padding: 8px 0; text-align: right; color: {}; border-bottom: 1px solid #e5e7eb;\">{} {}</td>\n    </tr>\n",
                    escape_html(&quote.symbol),
                    format_usd(quote.price_usd),
                    change_color(d),
                    arrow(d),
                    format_change(quote.change_percent_24h),
                ));
            }
            out.push_str("  </table>\n");

            match &report.portfolio {
                Some(p) => out.push_str(&format!(
                    "  <p style=\"margin-top: 16px;\"><strong>Portfolio ({})</strong>: {} ({} {}), {} USD over 24h</p>\n",
                    escape_html(&p.symbol),
                    format_usd(p.value_usd),
                    format_amount(p.value_local),
                    escape_html(&report.currency),
                    format_signed_amount(p.change_usd_24h),
                )),
                None => out.push_str(
                    "  <p style=\"margin-top: 16px; color: #6b7280;\">No portfolio data available this cycle.</p>\n",
                ),
            }
        }

        out.push_str(&format!(
            "  <p style=\"color: #6b7280; font-size: 12px;\">Generated {}</p>\n</div>\n",
            format_timestamp(&report.generated_at),
        ));
        out
    }
}
