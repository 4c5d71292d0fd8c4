use crate::{
    foundation::core::Quote,
    foundation::error::{DaybreakError, DaybreakResult},
    providers::{
        QuoteProvider,
        http::{join_url, send_checked},
    },
};

/// Public ZenQuotes host.
pub const ZENQUOTES_URL: &str = "https://zenquotes.io";

#[derive(serde::Deserialize)]
struct ZenQuote {
    q: String,
    a: String,
}

/// Quote provider backed by the ZenQuotes `api/random` endpoint.
#[derive(Clone, Debug)]
pub struct ZenQuotesProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl ZenQuotesProvider {
    /// Provider talking to `base_url` (e.g. [`ZENQUOTES_URL`]).
    pub fn new(client: reqwest::blocking::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl QuoteProvider for ZenQuotesProvider {
    fn fetch_quote(&self) -> DaybreakResult<Quote> {
        let url = join_url(&self.base_url, "api/random");
        let response = send_checked(self.client.get(url), "quote provider")?;
        let items: Vec<ZenQuote> = response
            .json()
            .map_err(|e| DaybreakError::provider(format!("quote provider: bad payload: {e}")))?;
        let first = items
            .into_iter()
            .next()
            .ok_or_else(|| DaybreakError::provider("quote provider: empty response"))?;

        let text = first.q.trim();
        if text.is_empty() {
            return Err(DaybreakError::provider("quote provider: empty quote text"));
        }
        Ok(Quote::new(text, first.a.trim()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/providers/quote.rs"]
mod tests;
