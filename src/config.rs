use std::{path::PathBuf, time::Duration};

use crate::{
    foundation::core::Rgba8,
    foundation::error::{DaybreakError, DaybreakResult},
    job::orchestrator::{DEFAULT_TITLE, Orchestrator, RunPaths},
    providers::{
        http::{HttpSettings, build_client},
        photo::{UNSPLASH_URL, UnsplashProvider},
        quote::{ZENQUOTES_URL, ZenQuotesProvider},
        telegram::{TELEGRAM_URL, TelegramChannel},
    },
    render::card::TextCard,
    schedule::daily::DailyTrigger,
    text::fonts::FontChain,
};

/// Everything a job run needs, usually sourced from the environment.
#[derive(Clone)]
pub struct Settings {
    /// Photo provider API key.
    pub unsplash_access_key: String,
    /// Bot credential.
    pub telegram_bot_token: String,
    /// Recipient chat identifier.
    pub telegram_chat_id: String,
    /// Daily trigger, `HH:MM` local.
    pub send_time: String,
    /// Directory for per-run artifacts.
    pub work_dir: PathBuf,
    /// Font file tried before the platform candidates.
    pub font: Option<PathBuf>,
    /// Outbound request timeout.
    pub http_timeout: Duration,
    /// Quote provider base URL.
    pub quote_url: String,
    /// Photo provider base URL.
    pub photo_url: String,
    /// Bot API base URL.
    pub telegram_url: String,
    /// Card title.
    pub title: String,
    /// Text color.
    pub text_color: Rgba8,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("send_time", &self.send_time)
            .field("work_dir", &self.work_dir)
            .field("font", &self.font)
            .field("http_timeout", &self.http_timeout)
            .field("quote_url", &self.quote_url)
            .field("photo_url", &self.photo_url)
            .field("telegram_url", &self.telegram_url)
            .field("title", &self.title)
            .field("text_color", &self.text_color)
            .finish_non_exhaustive()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            unsplash_access_key: String::new(),
            telegram_bot_token: String::new(),
            telegram_chat_id: String::new(),
            send_time: "07:30".to_string(),
            work_dir: PathBuf::from("."),
            font: None,
            http_timeout: Duration::from_secs(30),
            quote_url: ZENQUOTES_URL.to_string(),
            photo_url: UNSPLASH_URL.to_string(),
            telegram_url: TELEGRAM_URL.to_string(),
            title: DEFAULT_TITLE.to_string(),
            text_color: Rgba8::WHITE,
        }
    }
}

impl Settings {
    /// Check credentials, timeout and send time.
    pub fn validate(&self) -> DaybreakResult<()> {
        let required = [
            ("UNSPLASH_ACCESS_KEY", &self.unsplash_access_key),
            ("TELEGRAM_BOT_TOKEN", &self.telegram_bot_token),
            ("TELEGRAM_CHAT_ID", &self.telegram_chat_id),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(DaybreakError::config(format!("{name} must be set")));
            }
        }
        if self.http_timeout.is_zero() {
            return Err(DaybreakError::config("http timeout must be > 0"));
        }
        self.trigger()?;
        Ok(())
    }

    /// Parsed daily trigger.
    pub fn trigger(&self) -> DaybreakResult<DailyTrigger> {
        DailyTrigger::parse(&self.send_time)
    }

    /// Artifact paths inside the work dir.
    pub fn run_paths(&self) -> RunPaths {
        RunPaths::in_dir(&self.work_dir)
    }

    /// Font chain with the configured font in front.
    pub fn font_chain(&self) -> FontChain {
        match &self.font {
            Some(path) => FontChain::new().with_explicit(path),
            None => FontChain::new(),
        }
    }

    /// Card renderer for these settings.
    pub fn card(&self) -> TextCard {
        TextCard::new(self.font_chain()).with_color(self.text_color)
    }

    /// Validate and wire the production collaborators.
    pub fn orchestrator(&self) -> DaybreakResult<Orchestrator> {
        self.validate()?;
        let client = build_client(&HttpSettings {
            timeout: self.http_timeout,
            ..HttpSettings::default()
        })?;

        let quotes = ZenQuotesProvider::new(client.clone(), &self.quote_url);
        let photos = UnsplashProvider::new(
            client.clone(),
            &self.photo_url,
            &self.unsplash_access_key,
        );
        let channel = TelegramChannel::new(
            client,
            &self.telegram_url,
            &self.telegram_bot_token,
            &self.telegram_chat_id,
        );

        Ok(Orchestrator::new(quotes, photos, self.card(), channel).with_title(&self.title))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/settings.rs"]
mod tests;
