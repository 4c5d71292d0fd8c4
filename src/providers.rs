use crate::foundation::{core::Quote, error::DaybreakResult};

pub(crate) mod http;
pub(crate) mod photo;
pub(crate) mod quote;
pub(crate) mod telegram;

#[cfg(test)]
#[path = "../tests/unit/providers/server.rs"]
pub(crate) mod test_server;

/// Source of the daily quote.
pub trait QuoteProvider {
    /// Fetch one quote.
    fn fetch_quote(&self) -> DaybreakResult<Quote>;
}

/// Source of background photos.
pub trait PhotoProvider {
    /// Fetch raw image bytes for a photo matching `term`.
    fn fetch_photo(&self, term: &str) -> DaybreakResult<Vec<u8>>;
}

/// Delivery channel for the finished card.
pub trait MessagingChannel {
    /// Send `image_png` with `caption` to the configured recipient.
    fn deliver(&self, image_png: &[u8], caption: &str) -> DaybreakResult<()>;
}
