use crate::{
    foundation::error::{DaybreakError, DaybreakResult},
    providers::{
        PhotoProvider,
        http::{join_url, send_checked},
    },
};

/// Public Unsplash API host.
pub const UNSPLASH_URL: &str = "https://api.unsplash.com";

#[derive(serde::Deserialize)]
struct RandomPhoto {
    urls: PhotoUrls,
}

#[derive(serde::Deserialize)]
struct PhotoUrls {
    small: String,
}

/// Photo provider backed by the Unsplash `photos/random` endpoint.
///
/// One call makes two requests: the search, then the download of the `small`
/// rendition it points to.
#[derive(Clone)]
pub struct UnsplashProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    access_key: String,
}

impl std::fmt::Debug for UnsplashProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnsplashProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl UnsplashProvider {
    /// Provider talking to `base_url` (e.g. [`UNSPLASH_URL`]) with `access_key`.
    pub fn new(
        client: reqwest::blocking::Client,
        base_url: impl Into<String>,
        access_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            access_key: access_key.into(),
        }
    }
}

impl PhotoProvider for UnsplashProvider {
    fn fetch_photo(&self, term: &str) -> DaybreakResult<Vec<u8>> {
        let url = join_url(&self.base_url, "photos/random");
        let request = self.client.get(url).query(&[
            ("query", term),
            ("count", "1"),
            ("client_id", self.access_key.as_str()),
        ]);
        let photos: Vec<RandomPhoto> = send_checked(request, "photo search")?
            .json()
            .map_err(|e| DaybreakError::provider(format!("photo search: bad payload: {e}")))?;
        let photo = photos
            .into_iter()
            .next()
            .ok_or_else(|| DaybreakError::provider(format!("photo search: no photo for '{term}'")))?;

        let bytes = send_checked(self.client.get(&photo.urls.small), "photo download")?
            .bytes()
            .map_err(|e| {
                DaybreakError::provider(format!("photo download: read body: {}", e.without_url()))
            })?;
        if bytes.is_empty() {
            return Err(DaybreakError::provider("photo download: empty body"));
        }

        tracing::debug!(term, len = bytes.len(), "downloaded photo");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/providers/photo.rs"]
mod tests;
