use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// One tracked asset. The config file lists assets in display order; that
/// order is preserved everywhere downstream (an ordered list, not a map,
/// because the per-asset ordering is part of the output contract).
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AssetEntry {
    /// Short display symbol, e.g. "BTC".
    pub symbol: String,
    /// The price API's own identifier for the asset, e.g. "bitcoin".
    pub provider_id: String,
}

/// Fixed holdings used for the portfolio valuation on the dashboard.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HoldingsConfig {
    pub symbol: String,
    pub quantity: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: String,
    #[serde(default = "default_email_subject")]
    pub subject: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: default_port(),
        }
    }
}

/// Daily fire time for the push notification, expressed in the app's
/// display timezone. Keeping the timezone explicit means daylight-saving
/// transitions are handled by timezone-aware scheduling, not offset math.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScheduleConfig {
    #[serde(default = "default_schedule_time")]
    pub time: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            time: default_schedule_time(),
        }
    }
}

impl ScheduleConfig {
    pub fn fire_time(&self) -> Result<chrono::NaiveTime> {
        chrono::NaiveTime::parse_from_str(&self.time, "%H:%M")
            .with_context(|| format!("Invalid schedule time (expected HH:MM): {}", self.time))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PriceProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub coingecko: Option<PriceProviderConfig>,
    pub exchange_rate: Option<PriceProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            coingecko: Some(PriceProviderConfig {
                base_url: "https://api.coingecko.com".to_string(),
            }),
            exchange_rate: Some(PriceProviderConfig {
                base_url: "https://api.exchangerate-api.com".to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub assets: Vec<AssetEntry>,
    pub holdings: HoldingsConfig,
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
    #[serde(default)]
    pub email: Option<EmailConfig>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Local currency code for the dashboard conversion, e.g. "AUD".
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Display timezone for every rendered timestamp and for the daily
    /// schedule. Recipients expect a stable local time regardless of the
    /// host timezone.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_email_subject() -> String {
    "Daily crypto brief".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_schedule_time() -> String {
    "09:00".to_string()
}

fn default_currency() -> String {
    "AUD".to_string()
}

fn default_timezone() -> String {
    "Australia/Brisbane".to_string()
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "coinbrief", "coinbrief")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.apply_env_overrides();
        config.validate()?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Secrets may live in the environment instead of the file. Only
    /// credentials are overridable; everything else comes from the file.
    fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("COINBRIEF_BOT_TOKEN") {
            match &mut self.telegram {
                Some(t) => t.bot_token = token,
                None => {
                    if let Ok(chat_id) = std::env::var("COINBRIEF_CHAT_ID") {
                        self.telegram = Some(TelegramConfig {
                            bot_token: token,
                            chat_id,
                            api_base: default_telegram_api_base(),
                        });
                    }
                }
            }
        }
        if let Ok(chat_id) = std::env::var("COINBRIEF_CHAT_ID")
            && let Some(t) = &mut self.telegram
        {
            t.chat_id = chat_id;
        }
        if let Ok(password) = std::env::var("COINBRIEF_SMTP_PASSWORD")
            && let Some(e) = &mut self.email
        {
            e.password = password;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.assets.is_empty() {
            bail!("Config must track at least one asset");
        }
        for asset in &self.assets {
            if asset.provider_id.trim().is_empty() {
                bail!("Asset {} has an empty provider_id", asset.symbol);
            }
        }
        if self.holdings.quantity <= 0.0 {
            bail!("Holdings quantity must be positive");
        }
        self.display_tz()?;
        self.schedule.fire_time()?;
        Ok(())
    }

    pub fn display_tz(&self) -> Result<chrono_tz::Tz> {
        self.timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|e| anyhow::anyhow!("Invalid timezone {}: {e}", self.timezone))
    }
}
