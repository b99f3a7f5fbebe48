use async_trait::async_trait;
use neo4j_core::{
    download::Downloader,
    error::{Result, ServerError},
};
use std::fs;
use std::path::Path;
use tracing::info;

/// Downloads distribution archives over HTTP
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: reqwest::Client,
}

impl HttpDownloader {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("neo4j-tasks/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ServerError::Download(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, destination: &Path) -> Result<u64> {
        info!(url, destination = %destination.display(), "Downloading distribution");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ServerError::Download(format!("Failed to fetch {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(ServerError::Download(format!(
                "{url} returned status: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ServerError::Download(format!("Failed to read body of {url}: {e}")))?;

        fs::write(destination, &bytes).map_err(|e| ServerError::io(destination, e))?;

        info!(bytes = bytes.len(), "Download complete");
        Ok(bytes.len() as u64)
    }
}
