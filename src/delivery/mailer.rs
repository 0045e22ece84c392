use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, instrument};

use crate::config::EmailConfig;

/// Authenticated SMTP relay for the HTML report.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
    to: String,
    subject: String,
}

impl Mailer {
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .with_context(|| format!("Failed to configure SMTP relay {}", config.smtp_host))?
            .credentials(creds)
            .build();

        Ok(Mailer {
            transport,
            from: config.from.clone(),
            to: config.to.clone(),
            subject: config.subject.clone(),
        })
    }

    #[instrument(name = "EmailSend", skip_all)]
    pub async fn send_report(&self, html_body: String) -> Result<()> {
        let message = Message::builder()
            .from(self.from.parse().context("Invalid from address")?)
            .to(self.to.parse().context("Invalid to address")?)
            .subject(&self.subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body)
            .context("Failed to build email message")?;

        debug!(to = %self.to, "Sending report email");
        self.transport
            .send(message)
            .await
            .context("SMTP send failed")?;
        Ok(())
    }
}
