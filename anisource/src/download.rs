//! HTTP downloader for provider endpoints.
//!
//! One [`HttpDownloader`] instance covers one endpoint of one provider; the
//! endpoint URL is a template with an `{id}` placeholder. A staged pipeline
//! wires several instances (primary, relations, tags) against the same
//! provider.
//!
//! The client is stateless and does not cache responses; caching is the job
//! of the `anicache` layer.

use crate::error::DownloadError;
use crate::{AnimeId, Downloader, RawPayload};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "anicache/0.1 (anisource)";

/// Placeholder replaced by the anime id in endpoint templates
pub const ID_PLACEHOLDER: &str = "{id}";

/// Maps a non-success status to the matching download error.
///
/// 404 and 410 are the providers' "this id no longer exists" signals and
/// become [`DownloadError::DeadEntry`]; everything else non-success is a
/// plain status error. Returns `None` for success codes.
pub fn classify_status(status: StatusCode) -> Option<DownloadError> {
    if status.is_success() {
        return None;
    }
    match status {
        StatusCode::NOT_FOUND | StatusCode::GONE => Some(DownloadError::DeadEntry),
        other => Some(DownloadError::Status {
            code: other.as_u16(),
        }),
    }
}

/// Reqwest-backed [`Downloader`] for one provider endpoint.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
    url_template: String,
}

impl HttpDownloader {
    /// Creates a downloader for an endpoint template, e.g.
    /// `"https://api.example.org/anime/{id}"`.
    pub fn new(url_template: impl Into<String>) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self::with_client(client, url_template))
    }

    /// Creates a downloader with a custom reqwest::Client.
    ///
    /// Useful for sharing HTTP connection pools across the endpoints of one
    /// provider.
    pub fn with_client(client: Client, url_template: impl Into<String>) -> Self {
        Self {
            client,
            url_template: url_template.into(),
        }
    }

    /// Expands the endpoint template for an id.
    pub fn endpoint_for(&self, id: &AnimeId) -> String {
        self.url_template.replace(ID_PLACEHOLDER, id.as_str())
    }
}

#[async_trait::async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, id: &AnimeId) -> Result<RawPayload, DownloadError> {
        let endpoint = self.endpoint_for(id);
        tracing::debug!("Fetching {}", endpoint);

        let response = self.client.get(&endpoint).send().await?;

        if let Some(err) = classify_status(response.status()) {
            tracing::debug!("Fetch of {} failed with status {}", endpoint, response.status());
            return Err(err);
        }

        Ok(response.text().await?)
    }
}
