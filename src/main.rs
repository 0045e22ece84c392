use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use coinbrief::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for coinbrief::AppCommand {
    fn from(cmd: Commands) -> coinbrief::AppCommand {
        match cmd {
            Commands::Notify => coinbrief::AppCommand::Notify,
            Commands::Email => coinbrief::AppCommand::Email,
            Commands::Serve => coinbrief::AppCommand::Serve,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Send the price brief to the configured Telegram chat now
    Notify,
    /// Send the HTML price report email now
    Email,
    /// Run the web dashboard and the daily notification schedule
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => coinbrief::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = coinbrief::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
assets:
  - symbol: "COOKIE"
    provider_id: "cookie"
  - symbol: "BTC"
    provider_id: "bitcoin"
  - symbol: "ETH"
    provider_id: "ethereum"

holdings:
  symbol: "COOKIE"
  quantity: 150000.0

# telegram:
#   bot_token: "..."   # or COINBRIEF_BOT_TOKEN
#   chat_id: "..."     # or COINBRIEF_CHAT_ID

# email:
#   smtp_host: "smtp.example.com"
#   username: "bot@example.com"
#   password: "..."    # or COINBRIEF_SMTP_PASSWORD
#   from: "Coinbrief <bot@example.com>"
#   to: "you@example.com"

server:
  port: 3000

schedule:
  time: "09:00"

currency: "AUD"
timezone: "Australia/Brisbane"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
