//! End-to-end pipeline runs
//!
//! One `Pipeline` value wires the immutable config to the upstream sources
//! and delivery adapters. Every run is stateless: it fetches, values,
//! renders and delivers from scratch, so concurrent runs never interact.

use anyhow::Context;
use chrono::Utc;
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::delivery::{Mailer, TelegramNotifier};
use crate::error::{Error, Result};
use crate::price_source::QuoteSource;
use crate::rate_source::RateSource;
use crate::render::{ChatRenderer, EmailRenderer, ReportRenderer};
use crate::report::PriceReport;
use crate::valuation::valuate;

const FAILURE_NOTICE: &str =
    "\u{26A0} Daily crypto brief failed: could not fetch prices. Will try again tomorrow.";

pub struct Pipeline {
    config: Arc<AppConfig>,
    tz: Tz,
    quotes: Arc<dyn QuoteSource>,
    rates: Arc<dyn RateSource>,
    telegram: Option<TelegramNotifier>,
}

impl Pipeline {
    pub fn new(
        config: Arc<AppConfig>,
        quotes: Arc<dyn QuoteSource>,
        rates: Arc<dyn RateSource>,
    ) -> anyhow::Result<Self> {
        let tz = config.display_tz().context("Invalid display timezone")?;
        let telegram = config
            .telegram
            .as_ref()
            .map(TelegramNotifier::new)
            .transpose()
            .context("Failed to build Telegram client")?;
        Ok(Pipeline {
            config,
            tz,
            quotes,
            rates,
            telegram,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn display_tz(&self) -> Tz {
        self.tz
    }

    pub fn bot_configured(&self) -> bool {
        self.telegram.is_some()
    }

    fn now_local(&self) -> chrono::DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    /// Full report for the dashboard and email paths: quotes and conversion
    /// rate fetched concurrently, then the held asset valued. The valuation
    /// stays `None` when the held asset's quote is absent.
    pub async fn build_report(&self) -> Result<PriceReport> {
        let (quotes, rate) = futures::join!(
            self.quotes.fetch_quotes(&self.config.assets),
            self.rates.usd_to_local()
        );
        let quotes = quotes?;

        let portfolio = quotes
            .iter()
            .find(|q| q.symbol == self.config.holdings.symbol)
            .map(|q| valuate(q, self.config.holdings.quantity, rate));

        Ok(PriceReport {
            quotes,
            portfolio,
            usd_to_local: Some(rate),
            currency: self.config.currency.clone(),
            generated_at: self.now_local(),
        })
    }

    /// Push variant: fetch, render chat markup, send. A fetch failure aborts
    /// the run and triggers one best-effort plain failure notice; a failure
    /// of that secondary send is only logged.
    pub async fn run_notify(&self) -> Result<()> {
        let telegram = match &self.telegram {
            Some(t) => t,
            None => {
                warn!("Telegram bot credentials not configured, skipping notification");
                return Err(Error::MissingConfig("telegram bot credentials"));
            }
        };

        let quotes = match self.quotes.fetch_quotes(&self.config.assets).await {
            Ok(quotes) => quotes,
            Err(e) => {
                error!(error = %e, "Price fetch failed, aborting notification run");
                if let Err(notice_err) = telegram.send_message(FAILURE_NOTICE).await {
                    warn!(error = %notice_err, "Failure notice could not be delivered");
                }
                return Err(e);
            }
        };

        if quotes.is_empty() {
            warn!("No quotes returned, suppressing notification");
            return Ok(());
        }

        let report = PriceReport {
            quotes,
            portfolio: None,
            usd_to_local: None,
            currency: self.config.currency.clone(),
            generated_at: self.now_local(),
        };
        telegram.send_message(&ChatRenderer.render(&report)).await?;
        info!("Daily notification delivered");
        Ok(())
    }

    /// Email variant: full report rendered with inline styling and handed
    /// to the SMTP relay.
    pub async fn run_email(&self, mailer: &Mailer) -> anyhow::Result<()> {
        let report = self.build_report().await?;
        mailer.send_report(EmailRenderer.render(&report)).await?;
        info!("Report email delivered");
        Ok(())
    }

    /// One scheduled fire: the chat brief and, when a mailer is wired up,
    /// the email report. Either sink may fail without taking the other or
    /// the scheduler down; failures are logged, never retried.
    pub async fn run_scheduled(&self, mailer: Option<&Mailer>) {
        if self.bot_configured() {
            if let Err(e) = self.run_notify().await {
                error!(error = %e, "Scheduled notification run failed");
            }
        }
        if let Some(mailer) = mailer {
            if let Err(e) = self.run_email(mailer).await {
                error!(error = %e, "Scheduled email run failed");
            }
        }
    }
}
