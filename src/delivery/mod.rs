//! Outbound delivery adapters

pub mod mailer;
pub mod telegram;

pub use mailer::Mailer;
pub use telegram::TelegramNotifier;
