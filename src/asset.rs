//! Local sound asset, downloaded on first use.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::config::SoundConfig;
use crate::error::ProvisionError;

/// Source of the sound file bytes.
pub trait Fetch {
    /// Download `url` into a new file at `dest`. Returns bytes written.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64, ProvisionError>;
}

/// Plain HTTP GET, body streamed to disk chunk by chunk.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self::with_client(client)
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64, ProvisionError> {
        let request_err = |source| ProvisionError::Request {
            url: url.to_string(),
            source,
        };
        let write_err = |source| ProvisionError::Write {
            path: dest.to_path_buf(),
            source,
        };

        let mut resp = self.client.get(url).send().await.map_err(request_err)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ProvisionError::Status {
                url: url.to_string(),
                status,
            });
        }

        let mut file = tokio::fs::File::create(dest).await.map_err(write_err)?;
        let mut written = 0u64;
        while let Some(chunk) = resp.chunk().await.map_err(request_err)? {
            file.write_all(&chunk).await.map_err(write_err)?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(write_err)?;

        debug!("Fetched {written} bytes from {url}");
        Ok(written)
    }
}

/// The cached alarm sound and where to get it from when it is missing.
#[derive(Debug, Clone)]
pub struct SoundAsset {
    path: PathBuf,
    url: String,
}

impl SoundAsset {
    pub fn new(path: PathBuf, url: impl Into<String>) -> Self {
        Self {
            path,
            url: url.into(),
        }
    }

    /// Asset at the configured (or default) path. Fails only when no path is
    /// configured and the home directory is unknown.
    pub fn from_config(config: &SoundConfig) -> Result<Self, ProvisionError> {
        let path = config.resolve_path().ok_or(ProvisionError::NoHomeDir)?;
        Ok(Self::new(path, &config.url))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Make sure the sound file exists, downloading it once if it does not.
    ///
    /// Returns `true` when a download happened. The body lands in a `.part`
    /// sibling first and is renamed into place only once complete.
    pub async fn ensure<F: Fetch>(&self, fetcher: &F) -> Result<bool, ProvisionError> {
        if self.path.exists() {
            debug!("Sound file present at {}", self.path.display());
            return Ok(false);
        }

        info!("Downloading sound file...");

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| ProvisionError::CreateDir {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }

        let partial = self.partial_path();
        if let Err(e) = fetcher.fetch(&self.url, &partial).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }

        tokio::fs::rename(&partial, &self.path)
            .await
            .map_err(|source| ProvisionError::Write {
                path: self.path.clone(),
                source,
            })?;

        info!("Sound file downloaded and saved to: {}", self.path.display());
        Ok(true)
    }

    fn partial_path(&self) -> PathBuf {
        let mut name: OsString = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".part");
        self.path.with_file_name(name)
    }
}
