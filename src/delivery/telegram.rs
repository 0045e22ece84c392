use serde_json::json;
use tracing::{debug, instrument};

use crate::config::TelegramConfig;
use crate::error::{Error, Result};

/// Bot API client for one destination chat. The bot credential rides in the
/// URL path, per the Bot API contract.
pub struct TelegramNotifier {
    api_base: String,
    bot_token: String,
    chat_id: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        Ok(TelegramNotifier {
            api_base: config.api_base.clone(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
            client: crate::providers::http_client()?,
        })
    }

    #[instrument(name = "TelegramSend", skip_all)]
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let body = json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "Markdown",
            "disable_web_page_preview": true,
        });

        debug!(chars = text.len(), "Posting message to Telegram");
        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(Error::Delivery(format!(
                "Telegram API returned HTTP {}",
                response.status()
            )));
        }
        Ok(())
    }
}
