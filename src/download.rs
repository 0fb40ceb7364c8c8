//! HTTP(S) download of the composer setup script.

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{Error, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Transport options for a single download.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    pub use_proxy: bool,
    pub proxy_url: Option<String>,
    pub timeout: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            use_proxy: false,
            proxy_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Fetches a remote resource into a local file.
pub trait Downloader: Send + Sync {
    fn download(&self, url: &str, dest: &Path, config: &DownloadConfig) -> Result<()>;
}

/// Blocking reqwest downloader.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpDownloader;

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path, config: &DownloadConfig) -> Result<()> {
        let failed = |reason: String| Error::Download {
            url: url.to_string(),
            reason,
        };

        let timeout = if config.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            config.timeout
        };
        let mut builder = Client::builder().timeout(timeout);
        match config.proxy_url.as_deref().filter(|_| config.use_proxy) {
            Some(proxy_url) if !proxy_url.is_empty() => {
                let proxy = reqwest::Proxy::all(proxy_url)
                    .map_err(|err| failed(format!("invalid proxy url {}: {}", proxy_url, err)))?;
                builder = builder.proxy(proxy);
            }
            _ => builder = builder.no_proxy(),
        }
        let client = builder
            .build()
            .map_err(|err| failed(format!("http client setup failed: {}", err)))?;

        log::info!("downloading {}", url);
        let mut response = client
            .get(url)
            .send()
            .map_err(|err| failed(format!("request failed: {}", err)))?;
        if !response.status().is_success() {
            return Err(failed(format!("server returned {}", response.status())));
        }

        let mut file = File::create(dest)
            .map_err(|err| failed(format!("cannot create {}: {}", dest.display(), err)))?;
        response
            .copy_to(&mut file)
            .map_err(|err| failed(format!("writing {} failed: {}", dest.display(), err)))?;
        Ok(())
    }
}
