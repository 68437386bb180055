//! Books served over HTTP, typically by a static file host

use super::{ContentSource, SourceResult};
use crate::error::LoadError;
use async_trait::async_trait;

/// Fetches books with a single GET request
pub struct HttpSource {
    base_url: Option<String>,
    client: reqwest::Client,
}

impl HttpSource {
    /// Source that only accepts absolute URLs
    pub fn new() -> Self {
        Self {
            base_url: None,
            client: reqwest::Client::new(),
        }
    }

    /// Source resolving relative locations against `base_url`
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            client: reqwest::Client::new(),
        }
    }

    /// Resolve a location to the URL that will be requested
    pub fn resolve(&self, location: &str) -> SourceResult<String> {
        let lower = location.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(location.to_string());
        }

        let base = self.base_url.as_deref().ok_or_else(|| {
            LoadError::Fetch(format!("No base URL to resolve '{}' against", location))
        })?;
        let relative = location.trim_start_matches("./").trim_start_matches('/');
        Ok(format!("{}/{}", base.trim_end_matches('/'), relative))
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    async fn read(&self, location: &str) -> SourceResult<Vec<u8>> {
        let url = self.resolve(location)?;
        tracing::debug!(%url, "Fetching book");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LoadError::Fetch(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LoadError::Fetch(format!("{}: {}", url, e)))?;
        Ok(bytes.to_vec())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
