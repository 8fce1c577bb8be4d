//! Latest-release resolution.
//!
//! The links API returns every Bedrock distribution download in one JSON
//! document:
//!
//! ```json
//! {
//!   "result": {
//!     "links": [
//!       { "downloadType": "serverBedrockWindows", "downloadUrl": "https://.../bedrock-server-1.21.44.01.zip" },
//!       { "downloadType": "serverBedrockLinux", "downloadUrl": "https://.../bedrock-server-1.21.44.01.zip" }
//!     ]
//!   }
//! }
//! ```
//!
//! The resolver picks the entry whose `downloadType` matches the configured
//! build and returns its URL.

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::Deserialize;
use std::future::Future;
use std::sync::LazyLock;
use tracing::debug;

use crate::config::UpdaterConfig;

/// Finds the download URL of the newest server release.
pub trait VersionResolver: Send + Sync {
    fn resolve_latest_download_url(&self) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Debug, Deserialize)]
struct LinksResponse {
    result: LinksResult,
}

#[derive(Debug, Deserialize)]
struct LinksResult {
    links: Vec<DownloadLink>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DownloadLink {
    download_type: String,
    download_url: String,
}

/// Extract the URL for `download_type` from a links API response body.
///
/// # Errors
///
/// Fails if the body is not a links document or has no matching entry.
pub fn parse_download_url(body: &str, download_type: &str) -> Result<String> {
    let response: LinksResponse =
        serde_json::from_str(body).context("Links API returned an unexpected response")?;

    if let Some(link) = response.result.links.iter().find(|link| link.download_type == download_type)
    {
        return Ok(link.download_url.clone());
    }

    let available: Vec<&str> =
        response.result.links.iter().map(|link| link.download_type.as_str()).collect();
    bail!(
        "Download link for '{download_type}' not found (available: {})",
        if available.is_empty() { "none".to_string() } else { available.join(", ") }
    )
}

static VERSION_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"bedrock-server-(\d+(?:\.\d+)+)\.zip$").ok());

/// Server version embedded in a release URL, e.g. `1.21.44.01`.
#[must_use]
pub fn server_version_from_url(url: &str) -> Option<String> {
    let caps = VERSION_PATTERN.as_ref()?.captures(url)?;
    Some(caps[1].to_string())
}

/// Build the client for links API calls, bounded by the total request timeout.
pub fn http_client(config: &UpdaterConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .connect_timeout(config.connect_timeout())
        .timeout(config.request_timeout())
        .build()
        .context("Failed to build HTTP client")
}

/// Queries the official links API.
pub struct LinksApiResolver {
    client: reqwest::Client,
    endpoint: String,
    download_type: String,
}

impl LinksApiResolver {
    #[must_use]
    pub fn new(client: reqwest::Client, endpoint: String, download_type: String) -> Self {
        Self {
            client,
            endpoint,
            download_type,
        }
    }

    pub fn from_config(config: &UpdaterConfig) -> Result<Self> {
        Ok(Self::new(
            http_client(config)?,
            config.links_endpoint.clone(),
            config.download_type.clone(),
        ))
    }
}

impl VersionResolver for LinksApiResolver {
    async fn resolve_latest_download_url(&self) -> Result<String> {
        debug!("Querying {} for '{}'", self.endpoint, self.download_type);

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .with_context(|| format!("Failed to reach links API at {}", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            bail!("API request failed: HTTP {status}");
        }

        let body = response.text().await.context("Failed to read links API response")?;
        let url = parse_download_url(&body, &self.download_type)?;
        debug!("Latest download: {}", url);
        Ok(url)
    }
}
