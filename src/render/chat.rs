//! Telegram Markdown rendering
//!
//! Lightweight bold/emoji markup. The caller is responsible for suppressing
//! the send entirely when there are no quotes to report.

use crate::render::{Direction, ReportRenderer, direction, format_change, format_usd};
use crate::report::PriceReport;

pub struct ChatRenderer;

fn indicator(d: Direction) -> &'static str {
    match d {
        Direction::Up => "\u{1F4C8}",   // 📈
        Direction::Down => "\u{1F4C9}", // 📉
    }
}

impl ReportRenderer for ChatRenderer {
    fn render(&self, report: &PriceReport) -> String {
        let mut out = String::from("*\u{1F4CA} Daily Crypto Brief*\n\n");

        for quote in &report.quotes {
            out.push_str(&format!(
                "{} *{}*: {} ({})\n",
                indicator(direction(quote.change_percent_24h)),
                quote.symbol,
                format_usd(quote.price_usd),
                format_change(quote.change_percent_24h),
            ));
        }

        if let Some(p) = &report.portfolio {
            out.push_str(&format!(
                "\n\u{1F4BC} *Portfolio ({})*: {} / {} {} ({} USD 24h)\n",
                p.symbol,
                format_usd(p.value_usd),
                crate::render::format_amount(p.value_local),
                report.currency,
                crate::render::format_signed_amount(p.change_usd_24h),
            ));
        }

        out.push_str(&format!(
            "\n_{}_",
            crate::render::format_timestamp(&report.generated_at)
        ));
        out
    }
}
