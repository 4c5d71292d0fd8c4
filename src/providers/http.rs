use std::time::Duration;

use crate::foundation::error::{DaybreakError, DaybreakResult};

/// Outbound HTTP settings shared by every provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpSettings {
    /// Whole-request timeout (connect, send, and read the body).
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("daybreak/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Build a blocking client with an explicit timeout.
pub fn build_client(settings: &HttpSettings) -> DaybreakResult<reqwest::blocking::Client> {
    if settings.timeout.is_zero() {
        return Err(DaybreakError::config("http timeout must be > 0"));
    }
    reqwest::blocking::Client::builder()
        .timeout(settings.timeout)
        .user_agent(settings.user_agent.clone())
        .build()
        .map_err(|e| DaybreakError::config(format!("build http client: {e}")))
}

/// Send `request` and turn transport errors and non-2xx statuses into provider errors.
pub(crate) fn send_checked(
    request: reqwest::blocking::RequestBuilder,
    what: &str,
) -> DaybreakResult<reqwest::blocking::Response> {
    let response = request
        .send()
        .map_err(|e| {
            DaybreakError::provider(format!("{what}: request failed: {}", e.without_url()))
        })?;
    let status = response.status();
    if !status.is_success() {
        return Err(DaybreakError::provider(format!(
            "{what}: unexpected status {status}"
        )));
    }
    Ok(response)
}

/// Join a base URL and a path without doubling or dropping the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
#[path = "../../tests/unit/providers/http.rs"]
mod tests;
