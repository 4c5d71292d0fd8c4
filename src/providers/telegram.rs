use crate::{
    foundation::error::{DaybreakError, DaybreakResult},
    providers::{MessagingChannel, http::join_url},
};

/// Public Telegram Bot API host.
pub const TELEGRAM_URL: &str = "https://api.telegram.org";

/// Bot API limit for photo captions, in characters.
pub const CAPTION_LIMIT: usize = 1024;

#[derive(serde::Deserialize)]
struct BotReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Messaging channel that posts the card to one chat through a Telegram bot.
#[derive(Clone)]
pub struct TelegramChannel {
    client: reqwest::blocking::Client,
    base_url: String,
    bot_token: String,
    chat_id: String,
}

impl std::fmt::Debug for TelegramChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramChannel")
            .field("base_url", &self.base_url)
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramChannel {
    /// Channel posting to `chat_id` via `base_url` (e.g. [`TELEGRAM_URL`]).
    pub fn new(
        client: reqwest::blocking::Client,
        base_url: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }
}

impl MessagingChannel for TelegramChannel {
    fn deliver(&self, image_png: &[u8], caption: &str) -> DaybreakResult<()> {
        let url = join_url(&self.base_url, &format!("bot{}/sendPhoto", self.bot_token));
        let photo = reqwest::blocking::multipart::Part::bytes(image_png.to_vec())
            .file_name("daybreak.png")
            .mime_str("image/png")
            .map_err(|e| DaybreakError::delivery(format!("build photo part: {e}")))?;
        let form = reqwest::blocking::multipart::Form::new()
            .text("chat_id", self.chat_id.clone())
            .text("caption", clip_caption(caption))
            .part("photo", photo);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .map_err(|e| DaybreakError::delivery(format!("send photo: {}", e.without_url())))?;
        let status = response.status();
        let reply: Option<BotReply> = response.json().ok();

        match reply {
            Some(BotReply { ok: true, .. }) if status.is_success() => Ok(()),
            Some(BotReply { description, .. }) => Err(DaybreakError::delivery(format!(
                "bot api rejected photo ({status}): {}",
                description.unwrap_or_else(|| "no description".to_string())
            ))),
            None => Err(DaybreakError::delivery(format!(
                "bot api returned {status} with an unreadable body"
            ))),
        }
    }
}

/// Clip `caption` to [`CAPTION_LIMIT`] characters, marking the cut with an ellipsis.
pub(crate) fn clip_caption(caption: &str) -> String {
    if caption.chars().count() <= CAPTION_LIMIT {
        return caption.to_string();
    }
    let mut out: String = caption.chars().take(CAPTION_LIMIT - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
#[path = "../../tests/unit/providers/telegram.rs"]
mod tests;
