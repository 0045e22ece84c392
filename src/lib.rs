pub mod config;
pub mod delivery;
pub mod error;
pub mod log;
pub mod pipeline;
pub mod price_source;
pub mod providers;
pub mod rate_source;
pub mod render;
pub mod report;
pub mod scheduler;
pub mod server;
pub mod valuation;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::delivery::Mailer;
use crate::pipeline::Pipeline;
use crate::providers::coingecko::CoinGeckoSource;
use crate::providers::exchange_rate::ExchangeRateSource;
use crate::scheduler::Scheduler;
use crate::server::AppState;

pub enum AppCommand {
    /// Send one chat notification now.
    Notify,
    /// Send one email report now.
    Email,
    /// Run the dashboard server with the daily notification schedule.
    Serve,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Coinbrief starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    let config = Arc::new(config);
    let pipeline = Arc::new(build_pipeline(&config)?);

    match command {
        AppCommand::Notify => {
            pipeline.run_notify().await?;
            Ok(())
        }
        AppCommand::Email => {
            let email_config = config
                .email
                .as_ref()
                .context("No email block in the configuration")?;
            let mailer = Mailer::from_config(email_config)?;
            pipeline.run_email(&mailer).await
        }
        AppCommand::Serve => run_serve(&config, pipeline).await,
    }
}

fn build_pipeline(config: &Arc<AppConfig>) -> Result<Pipeline> {
    let price_base = config
        .providers
        .coingecko
        .as_ref()
        .map_or("https://api.coingecko.com", |p| &p.base_url);
    let rate_base = config
        .providers
        .exchange_rate
        .as_ref()
        .map_or("https://api.exchangerate-api.com", |p| &p.base_url);

    Pipeline::new(
        Arc::clone(config),
        Arc::new(CoinGeckoSource::new(price_base)?),
        Arc::new(ExchangeRateSource::new(rate_base, &config.currency)?),
    )
}

async fn run_serve(config: &Arc<AppConfig>, pipeline: Arc<Pipeline>) -> Result<()> {
    let scheduler = Scheduler::new(config.schedule.fire_time()?, config.display_tz()?);

    // The daily brief runs alongside the dashboard when at least one
    // delivery sink is configured; the dashboard itself never needs them.
    let mailer = config
        .email
        .as_ref()
        .map(Mailer::from_config)
        .transpose()?
        .map(Arc::new);

    if pipeline.bot_configured() || mailer.is_some() {
        let job_pipeline = Arc::clone(&pipeline);
        tokio::spawn(scheduler.run(move || {
            let pipeline = Arc::clone(&job_pipeline);
            let mailer = mailer.clone();
            async move {
                pipeline.run_scheduled(mailer.as_deref()).await;
            }
        }));
    } else {
        info!("No delivery sinks configured, running dashboard only");
    }

    let state = Arc::new(AppState::new(pipeline, Some(scheduler)));
    server::serve(state, config.server.port).await
}
