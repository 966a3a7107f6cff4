use std::time::Duration;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::Recipient;
use tracing::{debug, info};

use common::{Error, Notifier, Result};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends plain-text messages to one Telegram chat or channel.
pub struct TelegramNotifier {
    bot: Bot,
    chat: Recipient,
}

impl TelegramNotifier {
    /// `chat` is a numeric chat id or an `@channel` username.
    pub fn new(token: &str, chat: &str) -> Result<Self> {
        let client = teloxide::net::default_reqwest_settings()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Notify(format!("failed to build HTTP client: {e}")))?;

        let chat = parse_chat(chat);
        info!(chat = ?chat, "Telegram notifier ready");
        Ok(Self {
            bot: Bot::with_client(token, client),
            chat,
        })
    }
}

/// Numeric ids become `ChatId`s, anything else is taken as a channel username.
pub fn parse_chat(raw: &str) -> Recipient {
    let raw = raw.trim();
    match raw.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(raw.to_string()),
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> Result<()> {
        self.bot
            .send_message(self.chat.clone(), text)
            .await
            .map_err(|e| Error::Notify(e.to_string()))?;
        debug!(chat = ?self.chat, "Telegram message delivered");
        Ok(())
    }
}
