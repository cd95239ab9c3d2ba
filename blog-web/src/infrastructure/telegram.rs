use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

use crate::domain::error::DomainError;
use crate::infrastructure::config::TelegramConfig;

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Sends messages through the Telegram Bot API. Without configuration every
/// send fails with `NotificationsDisabled`.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    config: Option<TelegramConfig>,
}

impl TelegramNotifier {
    pub fn new(config: Option<TelegramConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    pub async fn send(&self, text: &str) -> Result<(), DomainError> {
        let config = self
            .config
            .as_ref()
            .ok_or(DomainError::NotificationsDisabled)?;
        let url = format!(
            "{}/bot{}/sendMessage",
            config.api_url.trim_end_matches('/'),
            config.bot_token
        );

        self.client
            .post(&url)
            .json(&SendMessage {
                chat_id: &config.chat_id,
                text,
            })
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                // reqwest errors embed the URL, which contains the bot token.
                let e = e.without_url();
                error!("telegram sendMessage failed: {}", e);
                DomainError::Notification(e.to_string())
            })?;

        info!(chat_id = %config.chat_id, "telegram message sent");
        Ok(())
    }
}
