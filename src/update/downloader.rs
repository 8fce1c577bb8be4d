//! Archive download into the staging path.

use anyhow::{Context, Result, bail};
use std::future::Future;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::config::UpdaterConfig;
use crate::utils::{ProgressBar, ensure_parent_dir};

/// Transfers a remote archive to a local file.
pub trait Downloader: Send + Sync {
    /// Write the full body of `url` to `dest`.
    ///
    /// A non-success response status is an error; `dest` may be left
    /// partially written when the transfer breaks off midway.
    fn fetch_to_file(&self, url: &str, dest: &Path) -> impl Future<Output = Result<()>> + Send;
}

/// Streams downloads over HTTP with an optional progress bar.
pub struct HttpDownloader {
    client: reqwest::Client,
    show_progress: bool,
}

impl HttpDownloader {
    #[must_use]
    pub fn new(client: reqwest::Client, show_progress: bool) -> Self {
        Self {
            client,
            show_progress,
        }
    }

    pub fn from_config(config: &UpdaterConfig, show_progress: bool) -> Result<Self> {
        Ok(Self::new(download_client(config)?, show_progress))
    }
}

/// Build the client for archive downloads.
///
/// Archives run to hundreds of megabytes, so there is no deadline on the
/// whole transfer; only connecting and each wait for more data are bounded.
pub fn download_client(config: &UpdaterConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .connect_timeout(config.connect_timeout())
        .read_timeout(config.download_idle_timeout())
        .build()
        .context("Failed to build download client")
}

impl Downloader for HttpDownloader {
    async fn fetch_to_file(&self, url: &str, dest: &Path) -> Result<()> {
        debug!("Downloading {} to {}", url, dest.display());

        let mut response =
            self.client.get(url).send().await.with_context(|| format!("Failed to reach {url}"))?;

        let status = response.status();
        if !status.is_success() {
            bail!("Download failed: HTTP {status}");
        }

        ensure_parent_dir(dest)?;
        let mut file = tokio::fs::File::create(dest)
            .await
            .with_context(|| format!("Failed to create {}", dest.display()))?;

        let progress = ProgressBar::for_download(response.content_length(), self.show_progress);
        progress.set_message("Downloading");

        while let Some(chunk) = response.chunk().await.context("Failed to read download stream")? {
            file.write_all(&chunk)
                .await
                .with_context(|| format!("Failed to write {}", dest.display()))?;
            progress.inc(chunk.len() as u64);
        }
        file.flush().await.with_context(|| format!("Failed to write {}", dest.display()))?;
        progress.finish_and_clear();

        debug!("Downloaded {} bytes", progress.position());
        Ok(())
    }
}
